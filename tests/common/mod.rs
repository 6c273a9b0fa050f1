#![allow(dead_code)]

use std::sync::Once;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        sillydb::logging::init_test_logging();
    });
}

//! `sillydb` - interactive in-memory relational shell library
//!
//! This crate provides the core functionality for the `silly` CLI tool:
//! typed column-wise tables driven by a line-oriented command language,
//! with single-column predicates, equi-joins, and switchable secondary
//! indexes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line flags using clap
//! - [`value`] - Scalar value domain (int, double, bool, string)
//! - [`column`] - Typed column storage
//! - [`index`] - Secondary indexes (hash, ordered)
//! - [`table`] - Tables: columns, predicates, joins
//! - [`database`] - Name → table registry
//! - [`repl`] - Tokenizer and command dispatcher
//! - [`error`] - Error types and handling
//! - [`logging`] - Tracing initialization

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod column;
pub mod database;
pub mod error;
pub mod index;
pub mod logging;
pub mod repl;
pub mod table;
pub mod value;

pub use error::{Result, SillyError};

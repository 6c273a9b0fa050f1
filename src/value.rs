//! Scalar value domain: the four column kinds and their textual syntax.
//!
//! Every kind supports parse, render, three-way compare, equality, and
//! hashing. Doubles get a total order via `f64::total_cmp`; to keep hashing
//! consistent with equality, `-0.0` is normalized to `0.0` at the parse
//! boundary and non-finite literals are rejected, so the index maps never
//! hold a key that compares unequal to itself.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, SillyError};

/// Scalar kind of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Decimal signed integer.
    Int,
    /// Decimal floating point, finite only.
    Double,
    /// `true` or `false`, case-sensitive.
    Bool,
    /// Whitespace-delimited byte string.
    Str,
}

impl Kind {
    /// Parse a CREATE type token.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::UnknownType`] for any other token.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "int" => Ok(Self::Int),
            "double" => Ok(Self::Double),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::Str),
            _ => Err(SillyError::UnknownType(token.to_string())),
        }
    }

    /// The token this kind spells in the command language.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed value.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Parse a token as the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::ParseValue`] if the token is not a valid
    /// literal of the kind (including non-finite doubles).
    pub fn parse(kind: Kind, token: &str) -> Result<Self> {
        let parse_err = || SillyError::ParseValue {
            literal: token.to_string(),
            kind,
        };
        match kind {
            Kind::Int => token.parse::<i64>().map(Self::Int).map_err(|_| parse_err()),
            Kind::Double => {
                let v = token.parse::<f64>().map_err(|_| parse_err())?;
                if !v.is_finite() {
                    return Err(parse_err());
                }
                // -0.0 and 0.0 must land in the same index bucket
                Ok(Self::Double(if v == 0.0 { 0.0 } else { v }))
            }
            Kind::Bool => match token {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                _ => Err(parse_err()),
            },
            Kind::Str => Ok(Self::Str(token.to_string())),
        }
    }

    /// The kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Double(_) => Kind::Double,
            Self::Bool(_) => Kind::Bool,
            Self::Str(_) => Kind::Str,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Double(_) => 1,
            Self::Bool(_) => 2,
            Self::Str(_) => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Bool(v) => v.hash(state),
            Self::Str(v) => v.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            // columns are homogeneous; mixed kinds only order map keys apart
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Predicate operator of a WHERE clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Less,
    Equal,
    Greater,
}

impl CmpOp {
    /// Parse the operator token of a WHERE clause.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Less),
            "=" => Some(Self::Equal),
            ">" => Some(Self::Greater),
            _ => None,
        }
    }

    /// Whether a three-way comparison result satisfies this operator.
    #[must_use]
    pub const fn matches(self, ord: Ordering) -> bool {
        matches!(
            (self, ord),
            (Self::Less, Ordering::Less)
                | (Self::Equal, Ordering::Equal)
                | (Self::Greater, Ordering::Greater)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens_round_trip() {
        for token in ["int", "double", "bool", "string"] {
            let kind = Kind::from_token(token).unwrap();
            assert_eq!(kind.name(), token);
        }
        assert!(Kind::from_token("float").is_err());
        assert!(Kind::from_token("INT").is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(Value::parse(Kind::Int, "-42").unwrap(), Value::Int(-42));
        assert!(Value::parse(Kind::Int, "4.2").is_err());
        assert!(Value::parse(Kind::Int, "x7").is_err());
    }

    #[test]
    fn test_parse_bool_is_strict() {
        assert_eq!(Value::parse(Kind::Bool, "true").unwrap(), Value::Bool(true));
        assert_eq!(
            Value::parse(Kind::Bool, "false").unwrap(),
            Value::Bool(false)
        );
        assert!(Value::parse(Kind::Bool, "True").is_err());
        assert!(Value::parse(Kind::Bool, "1").is_err());
    }

    #[test]
    fn test_parse_double_rejects_non_finite() {
        assert!(Value::parse(Kind::Double, "NaN").is_err());
        assert!(Value::parse(Kind::Double, "inf").is_err());
        assert_eq!(
            Value::parse(Kind::Double, "2.5").unwrap(),
            Value::Double(2.5)
        );
    }

    #[test]
    fn test_negative_zero_normalizes() {
        let v = Value::parse(Kind::Double, "-0.0").unwrap();
        assert_eq!(v, Value::Double(0.0));
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn test_render_parse_round_trip() {
        let values = [
            Value::Int(-9),
            Value::Double(0.125),
            Value::Double(1e300),
            Value::Bool(true),
            Value::Str("alice".to_string()),
        ];
        for v in values {
            let back = Value::parse(v.kind(), &v.to_string()).unwrap();
            assert_eq!(back, v);
        }
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Bool(false) < Value::Bool(true));
        assert!(Value::Str("a".into()) < Value::Str("ab".into()));
        assert!(Value::Double(-1.5) < Value::Double(0.0));
    }

    #[test]
    fn test_cmp_op() {
        assert_eq!(CmpOp::from_token("="), Some(CmpOp::Equal));
        assert_eq!(CmpOp::from_token(">="), None);
        assert!(CmpOp::Greater.matches(Ordering::Greater));
        assert!(!CmpOp::Greater.matches(Ordering::Equal));
    }
}

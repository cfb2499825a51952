//! The scalar payload carried by every node of the value tree.

use std::cmp::Ordering;
use std::fmt;

/// A node's scalar slot.
///
/// `Path` is the path-typed scalar: it holds a rendered location (such as
/// `items[1].score`) and is the only kind accepted where a navigable location
/// is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scalar {
    #[default]
    Undefined,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    Path(String),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Undefined => "undefined",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Long(_) => "long",
            Scalar::Double(_) => "double",
            Scalar::Str(_) => "string",
            Scalar::Bytes(_) => "raw",
            Scalar::Path(_) => "path",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Scalar::Undefined)
    }

    /// Strings and paths both compare and concatenate as text.
    pub fn is_textual(&self) -> bool {
        matches!(self, Scalar::Str(_) | Scalar::Path(_))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Scalar::Path(_))
    }

    /// Coerces to a boolean.
    ///
    /// Numbers are true only when their integral part is positive, strings only
    /// when they spell `true`, raw bytes when the first byte is non-zero.
    pub fn to_bool(&self) -> bool {
        match self {
            Scalar::Undefined | Scalar::Path(_) => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i > 0,
            Scalar::Long(l) => *l > 0,
            Scalar::Double(d) => (*d as i64) > 0,
            Scalar::Str(s) => s.trim().eq_ignore_ascii_case("true"),
            Scalar::Bytes(bytes) => bytes.first().is_some_and(|b| *b != 0),
        }
    }

    pub fn to_long(&self) -> i64 {
        match self {
            Scalar::Undefined | Scalar::Path(_) => 0,
            Scalar::Bool(b) => i64::from(*b),
            Scalar::Int(i) => i64::from(*i),
            Scalar::Long(l) => *l,
            Scalar::Double(d) => *d as i64,
            Scalar::Str(s) => s.trim().parse().unwrap_or(0),
            Scalar::Bytes(bytes) => bytes
                .get(..8)
                .and_then(|b| b.try_into().ok())
                .map(i64::from_be_bytes)
                .unwrap_or(0),
        }
    }

    pub fn to_double(&self) -> f64 {
        match self {
            Scalar::Undefined | Scalar::Path(_) => 0.0,
            Scalar::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Int(i) => f64::from(*i),
            Scalar::Long(l) => *l as f64,
            Scalar::Double(d) => *d,
            Scalar::Str(s) => s.trim().parse().unwrap_or(0.0),
            Scalar::Bytes(bytes) => bytes
                .get(..8)
                .and_then(|b| b.try_into().ok())
                .map(f64::from_be_bytes)
                .unwrap_or(0.0),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Scalar::Undefined => Vec::new(),
            Scalar::Bool(b) => vec![u8::from(*b)],
            Scalar::Int(i) => i.to_be_bytes().to_vec(),
            Scalar::Long(l) => l.to_be_bytes().to_vec(),
            Scalar::Double(d) => d.to_be_bytes().to_vec(),
            Scalar::Str(s) | Scalar::Path(s) => s.as_bytes().to_vec(),
            Scalar::Bytes(bytes) => bytes.clone(),
        }
    }

    /// Language-level equality.
    ///
    /// Undefined equals only undefined. Otherwise the comparison happens in the
    /// "widest" kind present on either side, tried in the order raw, text,
    /// double, long, int, bool.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        if !other.is_defined() {
            return !self.is_defined();
        }
        if matches!(self, Scalar::Bytes(_)) || matches!(other, Scalar::Bytes(_)) {
            self.to_bytes() == other.to_bytes()
        } else if self.is_textual() || other.is_textual() {
            self.to_string() == other.to_string()
        } else if matches!(self, Scalar::Double(_)) || matches!(other, Scalar::Double(_)) {
            self.to_double() == other.to_double()
        } else if matches!(self, Scalar::Long(_) | Scalar::Int(_))
            || matches!(other, Scalar::Long(_) | Scalar::Int(_))
        {
            self.to_long() == other.to_long()
        } else {
            self.to_bool() == other.to_bool()
        }
    }

    /// Language-level ordering, `None` when the operands are not comparable.
    pub fn loose_cmp(&self, other: &Scalar) -> Option<Ordering> {
        if !self.is_defined() || !other.is_defined() {
            return None;
        }
        match (self, other) {
            (Scalar::Bytes(a), Scalar::Bytes(b)) => Some(a.cmp(b)),
            (a, b) if a.is_textual() && b.is_textual() => Some(a.to_string().cmp(&b.to_string())),
            (a, b) if a.is_textual() || b.is_textual() => {
                let (l, r) = (a.to_string(), b.to_string());
                match (l.trim().parse::<f64>(), r.trim().parse::<f64>()) {
                    (Ok(ld), Ok(rd)) => ld.partial_cmp(&rd),
                    _ => Some(l.cmp(&r)),
                }
            }
            (a, b) if a.is_integral() && b.is_integral() => Some(a.to_long().cmp(&b.to_long())),
            (a, b) => a.to_double().partial_cmp(&b.to_double()),
        }
    }

    fn is_integral(&self) -> bool {
        matches!(self, Scalar::Bool(_) | Scalar::Int(_) | Scalar::Long(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Undefined => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Long(l) => write!(f, "{}", l),
            Scalar::Double(d) => write!(f, "{}", d),
            Scalar::Str(s) | Scalar::Path(s) => write!(f, "{}", s),
            Scalar::Bytes(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i)
    }
}

impl From<i64> for Scalar {
    fn from(l: i64) -> Self {
        Scalar::Long(l)
    }
}

/// Sizes stay `Int` while they fit, as vector lengths do in the language.
impl From<usize> for Scalar {
    fn from(n: usize) -> Self {
        match i32::try_from(n) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::Long(n as i64),
        }
    }
}

impl From<f64> for Scalar {
    fn from(d: f64) -> Self {
        Scalar::Double(d)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(bytes: Vec<u8>) -> Self {
        Scalar::Bytes(bytes)
    }
}

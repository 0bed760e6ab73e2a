//! Typed port values.
//!
//! A port carries a value encoded in stored form as a `"literal, tag"` pair
//! (`"7, int"`). In memory the pair is a tagged union over a closed set of
//! primitive types; type equality is tag equality and there is no coercion.

use graphrun_utils::{Error, RunResult};

/// Type tag of a port value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Str,
    Bool,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::Bool => "bool",
        }
    }

    pub fn parse(tag: &str) -> RunResult<Self> {
        match tag {
            "int" => Ok(ValueType::Int),
            "float" => Ok(ValueType::Float),
            "str" => Ok(ValueType::Str),
            "bool" => Ok(ValueType::Bool),
            t => Err(Error::undefined(t.into(), "type tag")),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed port value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    /// The type tag of this value.
    pub fn ty(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::Bool(_) => ValueType::Bool,
        }
    }

    /// Parse the stored `"literal, tag"` form. The tag is everything after
    /// the last comma so string literals may themselves contain commas.
    pub fn parse(s: &str) -> RunResult<Self> {
        let Some((lit, tag)) = s.rsplit_once(',') else {
            return Err(Error::storage(format!(
                "malformed value `{s}': expected `literal, tag'"
            )));
        };
        let lit = lit.trim();
        match ValueType::parse(tag.trim())? {
            ValueType::Int => lit
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| Error::storage(format!("bad int literal `{lit}': {e}"))),
            ValueType::Float => lit
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| Error::storage(format!("bad float literal `{lit}': {e}"))),
            ValueType::Str => Ok(Value::Str(lit.to_string())),
            ValueType::Bool => lit
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|e| Error::storage(format!("bad bool literal `{lit}': {e}"))),
        }
    }
}

/// Formats back into the stored `"literal, tag"` form.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}, int"),
            Value::Float(v) => write!(f, "{v}, float"),
            Value::Str(v) => write!(f, "{v}, str"),
            Value::Bool(v) => write!(f, "{v}, bool"),
        }
    }
}

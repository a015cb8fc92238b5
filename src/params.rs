//! Sequence metadata attached to a store: a loosely typed key -> value map
//! with typed extraction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConversionError, LookupError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeqParams(pub HashMap<String, ParamValue>);

impl SeqParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a typed copy of the value stored under `key`.
    pub fn get<T>(&self, key: &str) -> Result<T, LookupError>
    where
        T: TryFrom<ParamValue, Error = ConversionError>,
    {
        convert(self.0.get(key).cloned())
    }

    pub fn pop<T>(&mut self, key: &str) -> Result<T, LookupError>
    where
        T: TryFrom<ParamValue, Error = ConversionError>,
    {
        convert(self.0.remove(key))
    }
}

fn convert<T>(value: Option<ParamValue>) -> Result<T, LookupError>
where
    T: TryFrom<ParamValue, Error = ConversionError>,
{
    value
        .ok_or(LookupError::KeyError)?
        .try_into()
        .map_err(LookupError::ConversionError)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    None(()),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    FloatList(Vec<f64>),
}

impl ParamValue {
    /// Name of the stored kind, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::None(_) => "none",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "string",
            ParamValue::FloatList(_) => "float list",
        }
    }
}

/// `From` and `TryFrom` between a Rust type and the variant holding it.
macro_rules! param_conversions {
    ($($rust_type:ty => $variant:ident, $kind:literal;)*) => {$(
        impl From<$rust_type> for ParamValue {
            fn from(value: $rust_type) -> Self {
                ParamValue::$variant(value)
            }
        }

        impl TryFrom<ParamValue> for $rust_type {
            type Error = ConversionError;

            fn try_from(value: ParamValue) -> Result<Self, Self::Error> {
                match value {
                    ParamValue::$variant(inner) => Ok(inner),
                    other => Err(ConversionError {
                        from: other.kind(),
                        into: $kind,
                    }),
                }
            }
        }
    )*};
}

param_conversions! {
    () => None, "none";
    bool => Bool, "bool";
    i64 => Int, "int";
    f64 => Float, "float";
    String => Str, "string";
    Vec<f64> => FloatList, "float list";
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup() {
        let mut params = SeqParams::new();
        params.insert("TE", vec![2.5, 5.0]);
        params.insert("sequence", "gre");
        params.insert("averages", 2i64);

        assert_eq!(params.get::<Vec<f64>>("TE").unwrap(), vec![2.5, 5.0]);
        assert_eq!(params.get::<String>("sequence").unwrap(), "gre");
        assert_eq!(params.pop::<i64>("averages").unwrap(), 2);
        assert!(!params.contains("averages"));
    }

    #[test]
    fn lookup_errors() {
        let mut params = SeqParams::new();
        params.insert("TR", 10.0);

        assert_eq!(params.get::<f64>("TE"), Err(LookupError::KeyError));
        match params.get::<i64>("TR") {
            Err(LookupError::ConversionError(err)) => {
                assert_eq!(err.from, "float");
                assert_eq!(err.into, "int");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

//! Dynamic values and the field-type bridge.
//!
//! [`Value`] mirrors SQLite's storage classes one-to-one, so every value a
//! record carries can round-trip through a row without loss: `INTEGER` is
//! `i64`, `REAL` is an IEEE-754 double, `TEXT` and `BLOB` are owned buffers.
//!
//! [`FieldValue`] connects concrete Rust field types to that model. A type
//! usable as a record field declares its [`FieldKind`], whether it maps to a
//! nullable column, and lossless conversions in both directions. Unsupported
//! field types simply have no `FieldValue` impl and fail to compile.

use std::fmt;

use crate::error::ValueError;

/// Semantic column type of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit signed integers (and everything that narrows to one).
    Integer,
    /// IEEE-754 double precision floating point.
    Real,
    /// UTF-8 text.
    Text,
    /// Raw bytes.
    Blob,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "INTEGER",
            FieldKind::Real => "REAL",
            FieldKind::Text => "TEXT",
            FieldKind::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

/// An owned dynamic value, one variant per SQLite storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// An `INTEGER` value.
    Integer(i64),
    /// A `REAL` value.
    Real(f64),
    /// A `TEXT` value.
    Text(String),
    /// A `BLOB` value.
    Blob(Vec<u8>),
}

impl Value {
    /// Storage-class name of this value, for error reporting.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// A Rust type that can live in a record field.
///
/// The conversions are strict by storage class, with the same two
/// liberalities rusqlite's `FromSql` allows: integers widen into floating
/// point reads, and any nonzero integer reads as `true`.
pub trait FieldValue: Sized {
    /// The column kind this type maps to.
    const KIND: FieldKind;

    /// Whether the column admits NULL. `Option<T>` is the only nullable
    /// field shape.
    const NULLABLE: bool = false;

    /// Converts the field into an owned [`Value`].
    fn to_value(&self) -> Value;

    /// Converts a [`Value`] back into the field type.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FieldValue for i64 {
    const KIND: FieldKind = FieldKind::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(v) => Ok(v),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Integer,
                got: other.kind_name(),
            }),
        }
    }
}

/// Integer types narrower than `i64`; reads are range-checked.
macro_rules! narrow_integer_impl {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Integer(v) => {
                            <$ty>::try_from(v).map_err(|_| ValueError::OutOfRange {
                                value: v,
                                target: stringify!($ty),
                            })
                        }
                        other => Err(ValueError::KindMismatch {
                            expected: FieldKind::Integer,
                            got: other.kind_name(),
                        }),
                    }
                }
            }
        )*
    };
}

narrow_integer_impl!(i32, i16, i8, u8, u16, u32);

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(v) => Ok(v != 0),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Integer,
                got: other.kind_name(),
            }),
        }
    }
}

impl FieldValue for f64 {
    const KIND: FieldKind = FieldKind::Real;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Real(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Real,
                got: other.kind_name(),
            }),
        }
    }
}

impl FieldValue for f32 {
    const KIND: FieldKind = FieldKind::Real;

    fn to_value(&self) -> Value {
        // f32 -> f64 is exact, so the stored REAL reads back bit-identical.
        Value::Real(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Real(v) => Ok(v as f32),
            Value::Integer(v) => Ok(v as f32),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Real,
                got: other.kind_name(),
            }),
        }
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Text,
                got: other.kind_name(),
            }),
        }
    }
}

impl FieldValue for Vec<u8> {
    const KIND: FieldKind = FieldKind::Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Blob(b) => Ok(b),
            other => Err(ValueError::KindMismatch {
                expected: FieldKind::Blob,
                got: other.kind_name(),
            }),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_round_trip() {
        let v = 42_i64.to_value();
        assert_eq!(v, Value::Integer(42));
        assert_eq!(i64::from_value(v).unwrap(), 42);
    }

    #[test]
    fn test_narrow_integer_round_trip() {
        assert_eq!(i32::from_value(Value::Integer(-7)).unwrap(), -7);
        assert_eq!(u32::from_value(Value::Integer(4_000_000_000)).unwrap(), 4_000_000_000);
        assert_eq!(u8::from_value(Value::Integer(255)).unwrap(), 255);
    }

    #[test]
    fn test_narrow_integer_out_of_range() {
        let err = u8::from_value(Value::Integer(256)).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                value: 256,
                target: "u8"
            }
        );
        assert!(i32::from_value(Value::Integer(i64::MAX)).is_err());
    }

    #[test]
    fn test_bool_reads_any_nonzero_as_true() {
        assert_eq!(true.to_value(), Value::Integer(1));
        assert!(bool::from_value(Value::Integer(7)).unwrap());
        assert!(!bool::from_value(Value::Integer(0)).unwrap());
    }

    #[test]
    fn test_real_preserves_bits() {
        let v = std::f64::consts::PI.to_value();
        assert_eq!(
            f64::from_value(v).unwrap().to_bits(),
            std::f64::consts::PI.to_bits()
        );
    }

    #[test]
    fn test_real_accepts_integer_widening() {
        assert_eq!(f64::from_value(Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(f32::from_value(Value::Integer(3)).unwrap(), 3.0);
    }

    #[test]
    fn test_f32_round_trip_is_exact() {
        let x = 0.1_f32;
        let restored = f32::from_value(x.to_value()).unwrap();
        assert_eq!(restored.to_bits(), x.to_bits());
    }

    #[test]
    fn test_text_rejects_integer() {
        let err = String::from_value(Value::Integer(1)).unwrap_err();
        assert_eq!(
            err,
            ValueError::KindMismatch {
                expected: FieldKind::Text,
                got: "INTEGER"
            }
        );
    }

    #[test]
    fn test_blob_round_trip() {
        let bytes = vec![0_u8, 1, 2, 255];
        assert_eq!(Vec::<u8>::from_value(bytes.to_value()).unwrap(), bytes);
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(None::<i64>.to_value(), Value::Null);
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(Value::Text("x".into())).unwrap(),
            Some("x".to_string())
        );
        assert!(Option::<String>::NULLABLE);
        assert!(!String::NULLABLE);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind_name(), "NULL");
        assert_eq!(Value::Blob(Vec::new()).kind_name(), "BLOB");
        assert_eq!(FieldKind::Real.to_string(), "REAL");
    }
}

//! Typed key-value pairs.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::encoder::{ArrayEncoder, FieldEncoder, ObjectEncoder};

/// Value carried by a [`Field`].
///
/// Sequences and dynamic payloads live behind `Arc` so that copying a field list, which
/// every wrap does, never deep-copies the data.
#[derive(Clone)]
pub enum FieldValue {
    Bool(bool),
    I64(i64),
    I32(i32),
    I16(i16),
    I8(i8),
    U64(u64),
    U32(u32),
    U16(u16),
    U8(u8),
    F64(f64),
    F32(f32),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Duration(Duration),
    Time(SystemTime),
    Error(Arc<dyn Error + Send + Sync>),
    Any(Arc<dyn fmt::Debug + Send + Sync>),
    Bools(Arc<[bool]>),
    I64s(Arc<[i64]>),
    I32s(Arc<[i32]>),
    I16s(Arc<[i16]>),
    I8s(Arc<[i8]>),
    U64s(Arc<[u64]>),
    U32s(Arc<[u32]>),
    U16s(Arc<[u16]>),
    U8s(Arc<[u8]>),
    F64s(Arc<[f64]>),
    F32s(Arc<[f32]>),
    Durations(Arc<[Duration]>),
    Strings(Arc<[String]>),
    Array(Arc<dyn ArrayEncoder>),
    Object(Arc<dyn ObjectEncoder>),
}

impl FieldValue {
    /// Short name of the carried type; array and object values debug-print as `<name>`.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::I64(_) => "i64",
            FieldValue::I32(_) => "i32",
            FieldValue::I16(_) => "i16",
            FieldValue::I8(_) => "i8",
            FieldValue::U64(_) => "u64",
            FieldValue::U32(_) => "u32",
            FieldValue::U16(_) => "u16",
            FieldValue::U8(_) => "u8",
            FieldValue::F64(_) => "f64",
            FieldValue::F32(_) => "f32",
            FieldValue::String(_) => "string",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Duration(_) => "duration",
            FieldValue::Time(_) => "time",
            FieldValue::Error(_) => "error",
            FieldValue::Any(_) => "any",
            FieldValue::Bools(_) => "bools",
            FieldValue::I64s(_) => "i64s",
            FieldValue::I32s(_) => "i32s",
            FieldValue::I16s(_) => "i16s",
            FieldValue::I8s(_) => "i8s",
            FieldValue::U64s(_) => "u64s",
            FieldValue::U32s(_) => "u32s",
            FieldValue::U16s(_) => "u16s",
            FieldValue::U8s(_) => "u8s",
            FieldValue::F64s(_) => "f64s",
            FieldValue::F32s(_) => "f32s",
            FieldValue::Durations(_) => "durations",
            FieldValue::Strings(_) => "strings",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        use FieldValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            // Bitwise, so NaN equals itself and -0.0 differs from 0.0.
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Duration(a), Duration(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (Bools(a), Bools(b)) => a == b,
            (I64s(a), I64s(b)) => a == b,
            (I32s(a), I32s(b)) => a == b,
            (I16s(a), I16s(b)) => a == b,
            (I8s(a), I8s(b)) => a == b,
            (U64s(a), U64s(b)) => a == b,
            (U32s(a), U32s(b)) => a == b,
            (U16s(a), U16s(b)) => a == b,
            (U8s(a), U8s(b)) => a == b,
            (F64s(a), F64s(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (F32s(a), F32s(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Durations(a), Durations(b)) => a == b,
            (Strings(a), Strings(b)) => a == b,
            // Opaque payloads are equal only when they are the same allocation.
            (Error(a), Error(b)) => Arc::ptr_eq(a, b),
            (Any(a), Any(b)) => Arc::ptr_eq(a, b),
            (Array(a), Array(b)) => Arc::ptr_eq(a, b),
            (Object(a), Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FieldValue::*;
        match self {
            Bool(v) => write!(f, "{v:?}"),
            I64(v) => write!(f, "{v:?}"),
            I32(v) => write!(f, "{v:?}"),
            I16(v) => write!(f, "{v:?}"),
            I8(v) => write!(f, "{v:?}"),
            U64(v) => write!(f, "{v:?}"),
            U32(v) => write!(f, "{v:?}"),
            U16(v) => write!(f, "{v:?}"),
            U8(v) => write!(f, "{v:?}"),
            F64(v) => write!(f, "{v:?}"),
            F32(v) => write!(f, "{v:?}"),
            String(v) => write!(f, "{v:?}"),
            Bytes(v) => write!(f, "{v:?}"),
            Duration(v) => write!(f, "{v:?}"),
            Time(v) => write!(f, "{v:?}"),
            Error(v) => write!(f, "Error({v})"),
            Any(v) => write!(f, "Any({v:?})"),
            Bools(v) => write!(f, "{v:?}"),
            I64s(v) => write!(f, "{v:?}"),
            I32s(v) => write!(f, "{v:?}"),
            I16s(v) => write!(f, "{v:?}"),
            I8s(v) => write!(f, "{v:?}"),
            U64s(v) => write!(f, "{v:?}"),
            U32s(v) => write!(f, "{v:?}"),
            U16s(v) => write!(f, "{v:?}"),
            U8s(v) => write!(f, "{v:?}"),
            F64s(v) => write!(f, "{v:?}"),
            F32s(v) => write!(f, "{v:?}"),
            Durations(v) => write!(f, "{v:?}"),
            Strings(v) => write!(f, "{v:?}"),
            Array(_) | Object(_) => write!(f, "<{}>", self.type_name()),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
    f64 => F64,
    f32 => F32,
    &str => String,
    String => String,
    Arc<str> => String,
    Duration => Duration,
    SystemTime => Time,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    Vec<bool> => Bools,
    &[bool] => Bools,
    Vec<i64> => I64s,
    &[i64] => I64s,
    Vec<i32> => I32s,
    &[i32] => I32s,
    Vec<i16> => I16s,
    &[i16] => I16s,
    Vec<i8> => I8s,
    &[i8] => I8s,
    Vec<u64> => U64s,
    &[u64] => U64s,
    Vec<u32> => U32s,
    &[u32] => U32s,
    Vec<u16> => U16s,
    &[u16] => U16s,
    Vec<f64> => F64s,
    &[f64] => F64s,
    Vec<f32> => F32s,
    &[f32] => F32s,
    Vec<Duration> => Durations,
    &[Duration] => Durations,
    Vec<String> => Strings,
}

/// An immutable key and typed value.
///
/// Two fields are equal when their keys are equal and their values are equal.
#[derive(Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Arc<str>>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, value)
    }

    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, value)
    }

    pub fn bytes(key: impl Into<Cow<'static, str>>, value: impl Into<Arc<[u8]>>) -> Self {
        Self::new(key, FieldValue::Bytes(value.into()))
    }

    /// A sequence of unsigned bytes, encoded as numbers rather than as a byte string.
    pub fn u8s(key: impl Into<Cow<'static, str>>, value: impl Into<Arc<[u8]>>) -> Self {
        Self::new(key, FieldValue::U8s(value.into()))
    }

    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, value)
    }

    pub fn time(key: impl Into<Cow<'static, str>>, value: SystemTime) -> Self {
        Self::new(key, value)
    }

    pub fn error<E>(key: impl Into<Cow<'static, str>>, value: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Error(Arc::new(value)))
    }

    pub fn any<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Any(Arc::new(value)))
    }

    pub fn array<A>(key: impl Into<Cow<'static, str>>, value: A) -> Self
    where
        A: ArrayEncoder + 'static,
    {
        Self::new(key, FieldValue::Array(Arc::new(value)))
    }

    pub fn object<O>(key: impl Into<Cow<'static, str>>, value: O) -> Self
    where
        O: ObjectEncoder + 'static,
    {
        Self::new(key, FieldValue::Object(Arc::new(value)))
    }

    /// Hands the field to the one encoder operation matching its value type.
    pub fn accept<E: FieldEncoder + ?Sized>(&self, encoder: &mut E) {
        let k = self.key();
        match &self.value {
            FieldValue::Bool(v) => encoder.encode_field_bool(k, *v),
            FieldValue::I64(v) => encoder.encode_field_i64(k, *v),
            FieldValue::I32(v) => encoder.encode_field_i32(k, *v),
            FieldValue::I16(v) => encoder.encode_field_i16(k, *v),
            FieldValue::I8(v) => encoder.encode_field_i8(k, *v),
            FieldValue::U64(v) => encoder.encode_field_u64(k, *v),
            FieldValue::U32(v) => encoder.encode_field_u32(k, *v),
            FieldValue::U16(v) => encoder.encode_field_u16(k, *v),
            FieldValue::U8(v) => encoder.encode_field_u8(k, *v),
            FieldValue::F64(v) => encoder.encode_field_f64(k, *v),
            FieldValue::F32(v) => encoder.encode_field_f32(k, *v),
            FieldValue::String(v) => encoder.encode_field_string(k, v),
            FieldValue::Bytes(v) => encoder.encode_field_bytes(k, v),
            FieldValue::Duration(v) => encoder.encode_field_duration(k, *v),
            FieldValue::Time(v) => encoder.encode_field_time(k, *v),
            FieldValue::Error(v) => {
                let err: &(dyn Error + 'static) = &**v;
                encoder.encode_field_error(k, err)
            }
            FieldValue::Any(v) => {
                let any: &dyn fmt::Debug = &**v;
                encoder.encode_field_any(k, any)
            }
            FieldValue::Bools(v) => encoder.encode_field_bools(k, v),
            FieldValue::I64s(v) => encoder.encode_field_i64s(k, v),
            FieldValue::I32s(v) => encoder.encode_field_i32s(k, v),
            FieldValue::I16s(v) => encoder.encode_field_i16s(k, v),
            FieldValue::I8s(v) => encoder.encode_field_i8s(k, v),
            FieldValue::U64s(v) => encoder.encode_field_u64s(k, v),
            FieldValue::U32s(v) => encoder.encode_field_u32s(k, v),
            FieldValue::U16s(v) => encoder.encode_field_u16s(k, v),
            FieldValue::U8s(v) => encoder.encode_field_u8s(k, v),
            FieldValue::F64s(v) => encoder.encode_field_f64s(k, v),
            FieldValue::F32s(v) => encoder.encode_field_f32s(k, v),
            FieldValue::Durations(v) => encoder.encode_field_durations(k, v),
            FieldValue::Strings(v) => encoder.encode_field_strings(k, v),
            FieldValue::Array(v) => encoder.encode_field_array(k, &**v),
            FieldValue::Object(v) => encoder.encode_field_object(k, &**v),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{FieldRecorder, RecordedValue};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl Error for Boom {}

    #[test]
    fn test_scalar_equality_is_structural() {
        assert_eq!(Field::string("k", "v"), Field::string("k", String::from("v")));
        assert_eq!(Field::int("n", 7), Field::new("n", 7i64));
        assert_ne!(Field::int("n", 7), Field::int("m", 7));
        assert_ne!(Field::int("n", 7), Field::int("n", 8));
        // Same number, different width.
        assert_ne!(Field::new("n", 7i64), Field::new("n", 7i32));
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        let nan = Field::float("ratio", f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(Field::new("r", f32::NAN), Field::new("r", f32::NAN));
        assert_ne!(Field::float("z", 0.0), Field::float("z", -0.0));
        assert_eq!(
            Field::new("fs", vec![f64::NAN, 1.5]),
            Field::new("fs", vec![f64::NAN, 1.5])
        );
        assert_ne!(Field::new("fs", vec![1.5f64]), Field::new("fs", vec![1.5f64, 2.0]));
    }

    #[test]
    fn test_opaque_equality_is_identity() {
        let shared = Field::error("err", Boom);
        assert_eq!(shared, shared.clone());
        assert_ne!(Field::error("err", Boom), Field::error("err", Boom));
        assert_ne!(Field::any("a", 1u8), Field::any("a", 1u8));
    }

    #[test]
    fn test_conversions_pick_variant() {
        assert_eq!(Field::new("b", vec![1u8, 2]).value().type_name(), "bytes");
        assert_eq!(Field::u8s("b", vec![1u8, 2]).value().type_name(), "u8s");
        assert_eq!(
            Field::new("d", &[Duration::from_secs(1)][..]).value().type_name(),
            "durations"
        );
        assert_eq!(Field::new("s", vec!["x".to_string()]).value().type_name(), "strings");
    }

    #[test]
    fn test_accept_dispatches_by_type() {
        let fields = [
            Field::bool("b", true),
            Field::new("i8", -3i8),
            Field::new("u16", 9u16),
            Field::new("f32", 0.5f32),
            Field::string("s", "text"),
            Field::duration("d", Duration::from_millis(5)),
            Field::new("i64s", vec![1i64, 2]),
            Field::any("any", (1, "x")),
        ];

        let mut recorder = FieldRecorder::new();
        for field in &fields {
            field.accept(&mut recorder);
        }

        assert_eq!(recorder.get("b"), Some(&RecordedValue::Bool(true)));
        assert_eq!(recorder.get("i8"), Some(&RecordedValue::Int(-3)));
        assert_eq!(recorder.get("u16"), Some(&RecordedValue::Uint(9)));
        assert_eq!(recorder.get("f32"), Some(&RecordedValue::Float(0.5)));
        assert_eq!(
            recorder.get("s"),
            Some(&RecordedValue::String("text".to_string()))
        );
        assert_eq!(
            recorder.get("d"),
            Some(&RecordedValue::Duration(Duration::from_millis(5)))
        );
        assert_eq!(
            recorder.get("i64s"),
            Some(&RecordedValue::List(vec![
                RecordedValue::Int(1),
                RecordedValue::Int(2)
            ]))
        );
        assert_eq!(
            recorder.get("any"),
            Some(&RecordedValue::Any("(1, \"x\")".to_string()))
        );
    }

    #[test]
    fn test_accept_error_goes_through_error_encoder() {
        let mut recorder = FieldRecorder::new();
        Field::error("cause", Boom).accept(&mut recorder);

        assert_eq!(recorder.len(), 1);
        assert_eq!(
            recorder.get("cause"),
            Some(&RecordedValue::String("boom".to_string()))
        );
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Field::string("k", "v")), "k=\"v\"");
        assert_eq!(format!("{:?}", Field::int("n", 3)), "n=3");
    }

    struct Ports(Vec<u16>);

    impl ArrayEncoder for Ports {
        fn encode_logf_array(
            &self,
            encoder: &mut dyn crate::encoder::TypeEncoder,
        ) -> logf_error::Result<()> {
            for port in &self.0 {
                encoder.encode_type_u16(*port);
            }
            Ok(())
        }
    }

    #[test]
    fn test_debug_format_of_nested_values() {
        let ports = Field::array("ports", Ports(vec![80, 443]));
        assert_eq!(ports.value().type_name(), "array");
        assert_eq!(format!("{:?}", ports), "ports=<array>");
    }
}

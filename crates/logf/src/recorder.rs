//! An in-memory [`FieldEncoder`] that snapshots every encoded field.
//!
//! Useful wherever a materialized view of the encoder calls is needed: assertions in
//! tests, or handing fields to a sink that wants owned values. Nothing is deduplicated;
//! entries keep the order and multiplicity of the calls that produced them.

use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime};

use paste::paste;

use crate::encoder::{ArrayEncoder, FieldEncoder, ObjectEncoder, TypeEncoder};
use crate::error_encoder::{ErrorEncoder, default_error_encoder};

/// Owned snapshot of one encoded value.
///
/// Integers and floats widen to 64 bits; the debug text of `any` values is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Duration(Duration),
    Time(SystemTime),
    Any(String),
    List(Vec<RecordedValue>),
    Object(Vec<(String, RecordedValue)>),
    /// A nested array or object whose encoder returned an error.
    Failed(String),
}

/// Records keyed fields in call order.
pub struct FieldRecorder {
    entries: Vec<(String, RecordedValue)>,
    error_encoder: ErrorEncoder,
}

impl FieldRecorder {
    pub fn new() -> Self {
        Self::with_error_encoder(default_error_encoder)
    }

    /// Uses `error_encoder` to turn error fields into entries.
    pub fn with_error_encoder(error_encoder: ErrorEncoder) -> Self {
        Self {
            entries: Vec::new(),
            error_encoder,
        }
    }

    pub fn entries(&self) -> &[(String, RecordedValue)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, RecordedValue)> {
        self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The value most recently recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&RecordedValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: &str, value: RecordedValue) {
        self.entries.push((key.to_string(), value));
    }
}

impl Default for FieldRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

fn record_array(value: &dyn ArrayEncoder) -> RecordedValue {
    let mut elements = ElementRecorder::default();
    match value.encode_logf_array(&mut elements) {
        Ok(()) => RecordedValue::List(elements.values),
        Err(err) => {
            tracing::warn!(error = %err, "array encoder failed");
            RecordedValue::Failed(err.to_string())
        }
    }
}

fn record_object(value: &dyn ObjectEncoder, error_encoder: ErrorEncoder) -> RecordedValue {
    let mut nested = FieldRecorder::with_error_encoder(error_encoder);
    match value.encode_logf_object(&mut nested) {
        Ok(()) => RecordedValue::Object(nested.entries),
        Err(err) => {
            tracing::warn!(error = %err, "object encoder failed");
            RecordedValue::Failed(err.to_string())
        }
    }
}

macro_rules! record_fields {
    ($($name:ident: $ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        paste! {
            $(
                fn [<encode_field_ $name>](&mut self, k: &str, $v: $ty) {
                    self.push(k, $conv);
                }
            )*
        }
    };
}

fn list<T: Copy>(values: &[T], f: impl Fn(T) -> RecordedValue) -> RecordedValue {
    RecordedValue::List(values.iter().copied().map(f).collect())
}

impl FieldEncoder for FieldRecorder {
    record_fields! {
        any: &dyn fmt::Debug => |v| RecordedValue::Any(format!("{v:?}")),
        bool: bool => |v| RecordedValue::Bool(v),
        i64: i64 => |v| RecordedValue::Int(v),
        i32: i32 => |v| RecordedValue::Int(v.into()),
        i16: i16 => |v| RecordedValue::Int(v.into()),
        i8: i8 => |v| RecordedValue::Int(v.into()),
        u64: u64 => |v| RecordedValue::Uint(v),
        u32: u32 => |v| RecordedValue::Uint(v.into()),
        u16: u16 => |v| RecordedValue::Uint(v.into()),
        u8: u8 => |v| RecordedValue::Uint(v.into()),
        f64: f64 => |v| RecordedValue::Float(v),
        f32: f32 => |v| RecordedValue::Float(v.into()),
        duration: Duration => |v| RecordedValue::Duration(v),
        time: SystemTime => |v| RecordedValue::Time(v),
        string: &str => |v| RecordedValue::String(v.to_string()),
        bytes: &[u8] => |v| RecordedValue::Bytes(v.to_vec()),
        bools: &[bool] => |v| list(v, RecordedValue::Bool),
        i64s: &[i64] => |v| list(v, RecordedValue::Int),
        i32s: &[i32] => |v| list(v, |x| RecordedValue::Int(x.into())),
        i16s: &[i16] => |v| list(v, |x| RecordedValue::Int(x.into())),
        i8s: &[i8] => |v| list(v, |x| RecordedValue::Int(x.into())),
        u64s: &[u64] => |v| list(v, RecordedValue::Uint),
        u32s: &[u32] => |v| list(v, |x| RecordedValue::Uint(x.into())),
        u16s: &[u16] => |v| list(v, |x| RecordedValue::Uint(x.into())),
        u8s: &[u8] => |v| list(v, |x| RecordedValue::Uint(x.into())),
        f64s: &[f64] => |v| list(v, RecordedValue::Float),
        f32s: &[f32] => |v| list(v, |x| RecordedValue::Float(x.into())),
        durations: &[Duration] => |v| list(v, RecordedValue::Duration),
        strings: &[String] => |v| RecordedValue::List(
            v.iter().map(|s| RecordedValue::String(s.clone())).collect()
        ),
        array: &dyn ArrayEncoder => |v| record_array(v),
    }

    fn encode_field_error(&mut self, k: &str, v: &(dyn Error + 'static)) {
        let encode = self.error_encoder;
        encode(k, Some(v), self);
    }

    fn encode_field_object(&mut self, k: &str, v: &dyn ObjectEncoder) {
        let value = record_object(v, self.error_encoder);
        self.push(k, value);
    }
}

/// Collects the elements of a nested array.
#[derive(Default)]
pub(crate) struct ElementRecorder {
    pub(crate) values: Vec<RecordedValue>,
}

impl TypeEncoder for ElementRecorder {
    fn encode_type_any(&mut self, v: &dyn fmt::Debug) {
        self.values.push(RecordedValue::Any(format!("{v:?}")));
    }

    fn encode_type_bool(&mut self, v: bool) {
        self.values.push(RecordedValue::Bool(v));
    }

    fn encode_type_i64(&mut self, v: i64) {
        self.values.push(RecordedValue::Int(v));
    }

    fn encode_type_i32(&mut self, v: i32) {
        self.encode_type_i64(v.into());
    }

    fn encode_type_i16(&mut self, v: i16) {
        self.encode_type_i64(v.into());
    }

    fn encode_type_i8(&mut self, v: i8) {
        self.encode_type_i64(v.into());
    }

    fn encode_type_u64(&mut self, v: u64) {
        self.values.push(RecordedValue::Uint(v));
    }

    fn encode_type_u32(&mut self, v: u32) {
        self.encode_type_u64(v.into());
    }

    fn encode_type_u16(&mut self, v: u16) {
        self.encode_type_u64(v.into());
    }

    fn encode_type_u8(&mut self, v: u8) {
        self.encode_type_u64(v.into());
    }

    fn encode_type_f64(&mut self, v: f64) {
        self.values.push(RecordedValue::Float(v));
    }

    fn encode_type_f32(&mut self, v: f32) {
        self.encode_type_f64(v.into());
    }

    fn encode_type_duration(&mut self, v: Duration) {
        self.values.push(RecordedValue::Duration(v));
    }

    fn encode_type_time(&mut self, v: SystemTime) {
        self.values.push(RecordedValue::Time(v));
    }

    fn encode_type_string(&mut self, v: &str) {
        self.values.push(RecordedValue::String(v.to_string()));
    }

    fn encode_type_bytes(&mut self, v: &[u8]) {
        self.values.push(RecordedValue::Bytes(v.to_vec()));
    }

    fn encode_type_array(&mut self, v: &dyn ArrayEncoder) {
        self.values.push(record_array(v));
    }

    fn encode_type_object(&mut self, v: &dyn ObjectEncoder) {
        self.values.push(record_object(v, default_error_encoder));
    }
}

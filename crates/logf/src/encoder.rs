//! Visitor contracts for encoding typed field values.
//!
//! A concrete output format (JSON, console, an in-memory snapshot) implements
//! [`FieldEncoder`]; the field values themselves decide which operation to call, so no
//! runtime type inspection ever happens. There is one operation per scalar type, one per
//! homogeneous sequence type, and two structural hooks for nested arrays and objects.
//!
//! Every operation is synchronous and returns nothing. Encoders accept any UTF-8 key and
//! never deduplicate: repeated keys are recorded as many times as they are encoded.

use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime};

use logf_error::Result;

/// Keyed visitor receiving one call per encoded field.
pub trait FieldEncoder {
    fn encode_field_any(&mut self, key: &str, value: &dyn fmt::Debug);
    fn encode_field_bool(&mut self, key: &str, value: bool);
    fn encode_field_i64(&mut self, key: &str, value: i64);
    fn encode_field_i32(&mut self, key: &str, value: i32);
    fn encode_field_i16(&mut self, key: &str, value: i16);
    fn encode_field_i8(&mut self, key: &str, value: i8);
    fn encode_field_u64(&mut self, key: &str, value: u64);
    fn encode_field_u32(&mut self, key: &str, value: u32);
    fn encode_field_u16(&mut self, key: &str, value: u16);
    fn encode_field_u8(&mut self, key: &str, value: u8);
    fn encode_field_f64(&mut self, key: &str, value: f64);
    fn encode_field_f32(&mut self, key: &str, value: f32);
    fn encode_field_duration(&mut self, key: &str, value: Duration);
    fn encode_field_error(&mut self, key: &str, value: &(dyn Error + 'static));
    fn encode_field_time(&mut self, key: &str, value: SystemTime);
    fn encode_field_string(&mut self, key: &str, value: &str);
    fn encode_field_bytes(&mut self, key: &str, value: &[u8]);

    fn encode_field_bools(&mut self, key: &str, value: &[bool]);
    fn encode_field_i64s(&mut self, key: &str, value: &[i64]);
    fn encode_field_i32s(&mut self, key: &str, value: &[i32]);
    fn encode_field_i16s(&mut self, key: &str, value: &[i16]);
    fn encode_field_i8s(&mut self, key: &str, value: &[i8]);
    fn encode_field_u64s(&mut self, key: &str, value: &[u64]);
    fn encode_field_u32s(&mut self, key: &str, value: &[u32]);
    fn encode_field_u16s(&mut self, key: &str, value: &[u16]);
    fn encode_field_u8s(&mut self, key: &str, value: &[u8]);
    fn encode_field_f64s(&mut self, key: &str, value: &[f64]);
    fn encode_field_f32s(&mut self, key: &str, value: &[f32]);
    fn encode_field_durations(&mut self, key: &str, value: &[Duration]);
    fn encode_field_strings(&mut self, key: &str, value: &[String]);

    /// Encodes `value` as a nested array under `key`.
    fn encode_field_array(&mut self, key: &str, value: &dyn ArrayEncoder);
    /// Encodes `value` as a nested object under `key`.
    fn encode_field_object(&mut self, key: &str, value: &dyn ObjectEncoder);
}

/// Keyless visitor receiving the elements of a nested array.
pub trait TypeEncoder {
    fn encode_type_any(&mut self, value: &dyn fmt::Debug);
    fn encode_type_bool(&mut self, value: bool);
    fn encode_type_i64(&mut self, value: i64);
    fn encode_type_i32(&mut self, value: i32);
    fn encode_type_i16(&mut self, value: i16);
    fn encode_type_i8(&mut self, value: i8);
    fn encode_type_u64(&mut self, value: u64);
    fn encode_type_u32(&mut self, value: u32);
    fn encode_type_u16(&mut self, value: u16);
    fn encode_type_u8(&mut self, value: u8);
    fn encode_type_f64(&mut self, value: f64);
    fn encode_type_f32(&mut self, value: f32);
    fn encode_type_duration(&mut self, value: Duration);
    fn encode_type_time(&mut self, value: SystemTime);
    fn encode_type_string(&mut self, value: &str);
    fn encode_type_bytes(&mut self, value: &[u8]);
    fn encode_type_array(&mut self, value: &dyn ArrayEncoder);
    fn encode_type_object(&mut self, value: &dyn ObjectEncoder);
}

/// A value that knows how to encode itself as a sequence of elements.
pub trait ArrayEncoder: Send + Sync {
    fn encode_logf_array(&self, encoder: &mut dyn TypeEncoder) -> Result<()>;
}

/// A value that knows how to encode itself as a set of keyed fields.
pub trait ObjectEncoder: Send + Sync {
    fn encode_logf_object(&self, encoder: &mut dyn FieldEncoder) -> Result<()>;
}

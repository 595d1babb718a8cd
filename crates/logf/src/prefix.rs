//! Key-namespacing decorator over a [`FieldEncoder`].

use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime};

use paste::paste;

use crate::encoder::{ArrayEncoder, FieldEncoder, ObjectEncoder};

/// Forwards every call to the inner encoder with `prefix + key` as the key.
///
/// Lets a nested value flatten its fields into the parent namespace, e.g. an error's
/// verbose text lands at `error.verbose`, without the nested encoding logic knowing it is
/// nested.
pub struct PrefixingFieldEncoder<'a, E: FieldEncoder + ?Sized> {
    prefix: &'a str,
    inner: &'a mut E,
}

impl<'a, E: FieldEncoder + ?Sized> PrefixingFieldEncoder<'a, E> {
    pub fn new(prefix: &'a str, inner: &'a mut E) -> Self {
        Self { prefix, inner }
    }

    pub fn prefix(&self) -> &str {
        self.prefix
    }

    fn key(&self, k: &str) -> String {
        let mut key = String::with_capacity(self.prefix.len() + k.len());
        key.push_str(self.prefix);
        key.push_str(k);
        key
    }
}

macro_rules! forward {
    ($($name:ident: $ty:ty),* $(,)?) => {
        paste! {
            $(
                fn [<encode_field_ $name>](&mut self, k: &str, v: $ty) {
                    let key = self.key(k);
                    self.inner.[<encode_field_ $name>](&key, v);
                }
            )*
        }
    };
}

impl<E: FieldEncoder + ?Sized> FieldEncoder for PrefixingFieldEncoder<'_, E> {
    forward! {
        any: &dyn fmt::Debug,
        bool: bool,
        i64: i64,
        i32: i32,
        i16: i16,
        i8: i8,
        u64: u64,
        u32: u32,
        u16: u16,
        u8: u8,
        f64: f64,
        f32: f32,
        duration: Duration,
        error: &(dyn Error + 'static),
        time: SystemTime,
        string: &str,
        bytes: &[u8],
        bools: &[bool],
        i64s: &[i64],
        i32s: &[i32],
        i16s: &[i16],
        i8s: &[i8],
        u64s: &[u64],
        u32s: &[u32],
        u16s: &[u16],
        u8s: &[u8],
        f64s: &[f64],
        f32s: &[f32],
        durations: &[Duration],
        strings: &[String],
        array: &dyn ArrayEncoder,
        object: &dyn ObjectEncoder,
    }
}

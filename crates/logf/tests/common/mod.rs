//! Shared helpers for logf integration tests.
#![allow(dead_code)]

use std::fmt;

use logf::{Field, field_layers};

/// Routes library diagnostics to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Collects every layer reported for `err`, outermost first.
pub fn layers(err: Option<&(dyn std::error::Error + 'static)>) -> Vec<Vec<Field>> {
    field_layers(err).map(<[Field]>::to_vec).collect()
}

pub fn keys(fields: &[Field]) -> Vec<&str> {
    fields.iter().map(Field::key).collect()
}

/// An error whose alternate rendering carries more detail than its message.
#[derive(Debug)]
pub struct VerboseError {
    pub short: &'static str,
    pub full: &'static str,
}

impl fmt::Display for VerboseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.full)
        } else {
            write!(f, "{}", self.short)
        }
    }
}

impl std::error::Error for VerboseError {}

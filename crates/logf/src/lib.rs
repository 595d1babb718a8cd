//! # logf
//!
//! Structured fields that travel with errors.
//!
//! Attach typed fields to an error where it is created or passed upward, and let the
//! code that finally logs it recover every field from every wrapping layer, in order and
//! without the duplicates that repeated wrapping produces.
//!
//! ```rust
//! use logf::{Field, FieldRecorder, collect_error_fields, wrap_error};
//!
//! let base = vec![Field::string("user", "ann")];
//! let mut detailed = base.clone();
//! detailed.push(Field::int("attempt", 3));
//!
//! let err = wrap_error("connection reset", &detailed);
//! let err = wrap_error(err, &base);
//!
//! let fields = collect_error_fields(Some(&err));
//! let keys: Vec<&str> = fields.iter().map(Field::key).collect();
//! assert_eq!(keys, ["user", "attempt"]);
//!
//! let mut recorder = FieldRecorder::new();
//! for field in &fields {
//!     field.accept(&mut recorder);
//! }
//! assert_eq!(recorder.len(), 2);
//! ```
//!
//! ## Pieces
//!
//! - [`Field`]: an immutable key and typed value
//! - [`FieldEncoder`]: one operation per value type, implemented by output formats
//! - [`PrefixingFieldEncoder`]: namespaces keys before forwarding to another encoder
//! - [`wrap_error`], [`extract_error_fields`], [`join_fields`]: annotate and recover
//! - [`default_error_encoder`]: the error's own message and verbose rendering
//! - [`Level`], [`MutableLevel`], [`LogConfig`]: thresholds and configuration

pub mod config;
pub mod encoder;
pub mod error_encoder;
pub mod field;
pub mod level;
pub mod prefix;
pub mod recorder;
pub mod wrap;

pub use config::{LEVEL_ENV, LogConfig};
pub use encoder::{ArrayEncoder, FieldEncoder, ObjectEncoder, TypeEncoder};
pub use error_encoder::{
    ErrorEncoder, NIL_ERROR, VERBOSE_KEY, default_error_encoder, message_error_encoder,
};
pub use field::{Field, FieldValue};
pub use level::{
    Level, LevelChecker, LevelCheckerGetter, LevelCheckerGetterFn, LevelEncoder, MutableLevel,
    default_level_encoder,
};
pub use logf_error::{Error, ErrorKind, Result};
pub use prefix::PrefixingFieldEncoder;
pub use recorder::{FieldRecorder, RecordedValue};
pub use wrap::{
    BoxError, ChainLink, ErrorWrapper, FieldLayers, WrapErrorExt, collect_error_fields,
    extract_error_fields, field_layers, join_fields, wrap_error,
};

//! Attaching fields to errors and recovering them from a cause chain.
//!
//! ```text
//!     wrap_error(err, [F1, F2, F3, F4])      innermost
//!     wrap_error(.., [F1, F2, F3])
//!     wrap_error(.., [F1, F2])               outermost
//! ----------------------------------------------------------------------
//!     layers: [F1, F2], [F1, F2, F3], [F1, F2, F3, F4]
//!     joined: [F1, F2, F3, F4]
//! ```
//!
//! Each [`wrap_error`] call produces an [`ErrorWrapper`] holding its own copy of the
//! fields. [`extract_error_fields`] reports every wrapper's list from the outermost to the
//! innermost, and [`join_fields`] folds those layers into one list by skipping the
//! positional prefix a layer shares with what was already collected.
//!
//! Cause chains must be finite and acyclic; the walk does not guard against cycles.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::field::Field;

/// Boxed error accepted as the cause of a wrapper.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error annotated with the fields to log alongside it.
///
/// Displays exactly like its cause and reports the cause as its `source()`, so it is
/// transparent to code that is unaware of fields.
pub struct ErrorWrapper {
    cause: BoxError,
    fields: Box<[Field]>,
}

impl ErrorWrapper {
    pub fn new<E>(cause: E, fields: &[Field]) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            cause: cause.into(),
            // A boxed slice owns exactly `len` elements, so nothing can be appended behind
            // a published wrapper's back.
            fields: fields.to_vec().into_boxed_slice(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    pub fn into_cause(self) -> BoxError {
        self.cause
    }
}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The alternate flag reaches the cause too, so `{:#}` on a wrapper renders the
        // cause's verbose form instead of repeating its message.
        fmt::Display::fmt(&self.cause, f)
    }
}

impl fmt::Debug for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorWrapper")
            .field("cause", &self.cause)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Error for ErrorWrapper {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref() as &(dyn Error + 'static))
    }
}

/// Wraps `err` with an independent copy of `fields`.
///
/// Never fails; an empty slice produces a wrapper with no fields.
pub fn wrap_error<E>(err: E, fields: &[Field]) -> ErrorWrapper
where
    E: Into<BoxError>,
{
    ErrorWrapper::new(err, fields)
}

/// Shorthand for wrapping the error side of a `Result`.
pub trait WrapErrorExt<T> {
    fn with_fields(self, fields: &[Field]) -> Result<T, ErrorWrapper>;
}

impl<T, E> WrapErrorExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn with_fields(self, fields: &[Field]) -> Result<T, ErrorWrapper> {
        self.map_err(|err| wrap_error(err, fields))
    }
}

/// How a single error participates in a cause-chain walk.
#[derive(Debug, Clone, Copy)]
pub enum ChainLink<'a> {
    /// Carries fields and a cause.
    Annotated(&'a ErrorWrapper),
    /// Carries only a cause, which the walk follows without reporting anything.
    Caused(&'a (dyn Error + 'static)),
    /// Ends the walk.
    Terminal,
}

impl<'a> ChainLink<'a> {
    pub fn classify(err: &'a (dyn Error + 'static)) -> Self {
        if let Some(wrapper) = as_wrapper(err) {
            return ChainLink::Annotated(wrapper);
        }
        match err.source() {
            Some(cause) => ChainLink::Caused(cause),
            None => ChainLink::Terminal,
        }
    }
}

/// Finds a wrapper stored directly or behind the smart pointers a cause is commonly
/// shared through.
fn as_wrapper<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ErrorWrapper> {
    if let Some(wrapper) = err.downcast_ref::<ErrorWrapper>() {
        return Some(wrapper);
    }
    if let Some(wrapper) = err.downcast_ref::<Arc<ErrorWrapper>>() {
        return Some(wrapper.as_ref());
    }
    err.downcast_ref::<Box<ErrorWrapper>>()
        .map(|wrapper| wrapper.as_ref())
}

/// Iterator over the field lists attached along a cause chain, outermost first.
#[derive(Clone)]
pub struct FieldLayers<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for FieldLayers<'a> {
    type Item = &'a [Field];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(err) = self.next {
            match ChainLink::classify(err) {
                ChainLink::Annotated(wrapper) => {
                    let cause: &'a (dyn Error + 'static) = wrapper.cause();
                    self.next = Some(cause);
                    return Some(wrapper.fields());
                }
                ChainLink::Caused(cause) => self.next = Some(cause),
                ChainLink::Terminal => self.next = None,
            }
        }
        None
    }
}

impl std::iter::FusedIterator for FieldLayers<'_> {}

pub fn field_layers<'a>(err: Option<&'a (dyn Error + 'static)>) -> FieldLayers<'a> {
    FieldLayers { next: err }
}

/// Calls `sink` with each wrapper's field list, from the most recent wrap inward.
///
/// Plain `source()` links are followed silently; the walk stops at the first error that
/// has no source. `None` never reaches the sink.
pub fn extract_error_fields<F>(err: Option<&(dyn Error + 'static)>, mut sink: F)
where
    F: FnMut(&[Field]),
{
    for layer in field_layers(err) {
        sink(layer);
    }
}

/// Appends `fields` to `result`, skipping the leading run that already matches
/// `result` position by position.
///
/// Once a position differs, that field and every one after it are appended, even if a
/// field with the same key sits elsewhere in `result`. Deduplication is positional only.
pub fn join_fields(mut result: Vec<Field>, fields: &[Field]) -> Vec<Field> {
    let mut matching = true;
    for (i, field) in fields.iter().enumerate() {
        if !matching || result.get(i) != Some(field) {
            result.push(field.clone());
            matching = false;
        }
    }

    result
}

/// Extracts every field layer from `err` and joins them into a single list.
pub fn collect_error_fields(err: Option<&(dyn Error + 'static)>) -> Vec<Field> {
    let mut layers = 0usize;
    let mut result = Vec::new();
    extract_error_fields(err, |fields| {
        layers += 1;
        result = join_fields(std::mem::take(&mut result), fields);
    });
    tracing::trace!(layers, fields = result.len(), "collected error fields");
    result
}

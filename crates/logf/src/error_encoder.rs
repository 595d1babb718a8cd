//! Encoding an error value as one or two string fields.

use std::error::Error;

use crate::encoder::FieldEncoder;
use crate::prefix::PrefixingFieldEncoder;

/// Encodes the error found at `key`. `None` stands for a missing error.
pub type ErrorEncoder = fn(&str, Option<&(dyn Error + 'static)>, &mut dyn FieldEncoder);

/// Message recorded in place of a missing error.
pub const NIL_ERROR: &str = "<nil>";

/// Key suffix of the verbose rendering, without the separating dot.
pub const VERBOSE_KEY: &str = "verbose";

/// Encodes the error's message at `key`, plus its verbose rendering at `key.verbose`
/// when that rendering differs from the message.
///
/// The verbose rendering is the alternate `Display` form (`{:#}`). Errors that do not
/// treat `#` specially render the same text twice and get a single field.
pub fn default_error_encoder(
    key: &str,
    err: Option<&(dyn Error + 'static)>,
    encoder: &mut dyn FieldEncoder,
) {
    let Some(err) = err else {
        encoder.encode_field_string(key, NIL_ERROR);
        return;
    };

    let msg = err.to_string();
    encoder.encode_field_string(key, &msg);

    let verbose = format!("{err:#}");
    if verbose != msg {
        let prefix = format!("{key}.");
        PrefixingFieldEncoder::new(&prefix, encoder).encode_field_string(VERBOSE_KEY, &verbose);
    }
}

/// Encodes only the error's message at `key`.
pub fn message_error_encoder(
    key: &str,
    err: Option<&(dyn Error + 'static)>,
    encoder: &mut dyn FieldEncoder,
) {
    match err {
        Some(err) => encoder.encode_field_string(key, &err.to_string()),
        None => encoder.encode_field_string(key, NIL_ERROR),
    }
}

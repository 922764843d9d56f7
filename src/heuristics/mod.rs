//! Total parsers over free-text listing fields. None of these fail: an
//! unrecognised input yields `None` (or a default) and callers fall back to
//! "Not specified" or omit the value from structured metadata.

pub mod date;
pub mod location;
pub mod salary;
pub mod text;

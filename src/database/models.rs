pub mod form;
pub mod question;
pub mod response;
pub mod survey;
pub mod template;
pub mod user;

use crate::error::Error;
use std::str::FromStr;

/// Parses a TEXT column holding an enum written by this service.
pub(crate) fn stored<T>(column: &str, value: &str) -> Result<T, Error>
where
    T: FromStr<Err = Error>,
{
    value.parse().map_err(|_| Error::ServerError(format!("unexpected {} in database: {}", column, value)))
}

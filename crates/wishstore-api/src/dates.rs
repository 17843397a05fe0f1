// Local-date conversion between the server wire format and `NaiveDate`.
//
// The server speaks ISO `yyyy-MM-dd` for date-only fields. Entities carry
// `Option<NaiveDate>` locally; the serde adapter in `local_date` applies the
// conversion on every request and response body.

use chrono::NaiveDate;

use crate::error::Error;

/// Wire format for date-only fields.
pub const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Convert a server date string into a local date.
///
/// An empty string is treated like an absent value.
pub fn convert_local_date_from_server(value: &str) -> Result<Option<NaiveDate>, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, WIRE_FORMAT)
        .map(Some)
        .map_err(|_| Error::InvalidDate {
            value: value.to_owned(),
        })
}

/// Convert a local date back into the server wire format.
pub fn convert_local_date_to_server(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(WIRE_FORMAT).to_string())
}

/// Serde adapter for `Option<NaiveDate>` fields: `#[serde(with = "local_date")]`.
pub mod local_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match super::convert_local_date_to_server(*date) {
            Some(s) => ser.serialize_str(&s),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(de)?;
        match raw {
            Some(s) => {
                super::convert_local_date_from_server(&s).map_err(serde::de::Error::custom)
            }
            None => Ok(None),
        }
    }
}

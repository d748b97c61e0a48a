//! Form field validation and normalization.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CommandError;

/// Minimum Wi-Fi key length accepted by the ONT.
pub const MIN_WIFI_PASSWORD_LEN: usize = 8;

/// Maximum length of the DESC1 field.
pub const DESC1_MAX_LEN: usize = 46;

/// Maximum length of the DESC2 field.
pub const DESC2_MAX_LEN: usize = 22;

/// Length of an ALCL serial, without the colon.
pub const SERIAL_LEN: usize = 12;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Require a non-blank field. Returns the trimmed value.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::MissingField { field });
    }
    Ok(value)
}

/// Require a non-blank, digits-only field and parse it.
pub fn require_numeric<T: FromStr>(field: &'static str, value: &str) -> Result<T, CommandError> {
    let value = require(field, value)?;
    let not_numeric = || CommandError::NotNumeric {
        field,
        value: value.to_string(),
    };

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_numeric());
    }
    value.parse().map_err(|_| not_numeric())
}

/// Check a Wi-Fi key against the minimum length.
pub fn validate_wifi_password(password: &str) -> Result<(), CommandError> {
    if password.chars().count() < MIN_WIFI_PASSWORD_LEN {
        return Err(CommandError::WeakPassword {
            minimum: MIN_WIFI_PASSWORD_LEN,
        });
    }
    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Normalize DESC1 (client name): upper-case, whitespace runs become `_`.
pub fn normalize_desc1(value: &str) -> String {
    let upper = value.trim().to_uppercase();
    truncate(&WHITESPACE.replace_all(&upper, "_"), DESC1_MAX_LEN)
}

/// Normalize DESC2 (box and port, or PPPoE user).
///
/// Box codes contain `-` and are upper-cased; anything else is lower-cased.
/// Whitespace runs become `-`.
pub fn normalize_desc2(value: &str) -> String {
    let value = value.trim();
    let cased = if value.contains('-') {
        value.to_uppercase()
    } else {
        value.to_lowercase()
    };
    truncate(&WHITESPACE.replace_all(&cased, "-"), DESC2_MAX_LEN)
}

/// An ONT serial number, e.g. `ALCLB3DA95BD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Serial(String);

impl Serial {
    /// Parse a serial as typed by the technician.
    ///
    /// Input is upper-cased and the optional colon of `ALCL:` is dropped.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let upper = require("ALCL", input)?.to_uppercase();
        let compact = match upper.strip_prefix("ALCL:") {
            Some(rest) => format!("ALCL{}", rest),
            None => upper,
        };

        if let Some(found) = compact.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CommandError::SerialCharacter { found });
        }
        if compact.len() != SERIAL_LEN {
            return Err(CommandError::InvalidSerial {
                length: compact.len(),
            });
        }

        Ok(Self(compact))
    }

    /// TL1 form: `ALCLB3DA95BD`.
    pub fn tl1(&self) -> &str {
        &self.0
    }

    /// CLI form: `ALCL:B3DA95BD`.
    pub fn cli(&self) -> String {
        // ASCII only, so slicing at 4 is a char boundary.
        format!("{}:{}", &self.0[..4], &self.0[4..])
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// FXS port of the ONT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhonePort {
    One,
    Two,
}

impl PhonePort {
    /// Parse `1` or `2`.
    pub fn parse(value: &str) -> Result<Self, CommandError> {
        match value.trim() {
            "1" => Ok(PhonePort::One),
            "2" => Ok(PhonePort::Two),
            other => Err(CommandError::InvalidPhonePort {
                value: other.to_string(),
            }),
        }
    }

    /// Line number in the voice profile.
    pub fn number(self) -> u32 {
        match self {
            PhonePort::One => 1,
            PhonePort::Two => 2,
        }
    }
}

impl fmt::Display for PhonePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

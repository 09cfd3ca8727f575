use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static RAW_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5,6}$").unwrap());

/// Product code width expected by the catalog
pub const CODE_WIDTH: usize = 6;

/// A product code normalized to exactly six ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(String);

impl Code {
    /// Trim, check the raw value is 5 or 6 digits, and zero-pad to six.
    /// Returns `None` for anything else.
    pub fn sanitize(raw: &str) -> Option<Code> {
        let trimmed = raw.trim();
        if !RAW_CODE_PATTERN.is_match(trimmed) {
            return None;
        }
        Some(Code(format!("{:0>width$}", trimmed, width = CODE_WIDTH)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-function form of [`Code::sanitize`]
pub fn sanitize(raw: &str) -> Option<Code> {
    Code::sanitize(raw)
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Code {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Code::sanitize(&value).ok_or_else(|| format!("invalid product code: {}", value))
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0
    }
}

/// Sanitize every raw value. Fails with the offending raw values, in input
/// order, when any of them is invalid.
pub fn sanitize_all<S: AsRef<str>>(raw: &[S]) -> std::result::Result<Vec<Code>, Vec<String>> {
    let mut codes = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();

    for value in raw {
        match Code::sanitize(value.as_ref()) {
            Some(code) => codes.push(code),
            None => invalid.push(value.as_ref().to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(codes)
    } else {
        Err(invalid)
    }
}

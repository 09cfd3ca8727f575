use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{AppError, Result};
use super::Code;

/// Profile status written into the catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Include,
    Exclude,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Include => "INCLUDE",
            Status::Exclude => "EXCLUDE",
        }
    }

    /// Read the form selector. `""` means nothing chosen yet.
    pub fn from_selector(value: &str) -> Result<Option<Status>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "INCLUDE" => Ok(Status::Include),
            "EXCLUDE" => Ok(Status::Exclude),
            other => Err(AppError::ValidationError(format!(
                "unknown status '{}', expected INCLUDE or EXCLUDE",
                other
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trimmed, non-blank account number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account(String);

impl Account {
    pub fn new(raw: &str) -> Option<Account> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Account(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Day stamp embedded in artifact names and acknowledgement bodies (`YYMMDD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDate(NaiveDate);

impl RunDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Local calendar day of the caller
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn stamp(&self) -> String {
        self.0.format("%y%m%d").to_string()
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%y%m%d"))
    }
}

/// A file as received from the upload widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Which page of the tool produced the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Codes are written as uploaded
    #[default]
    Generator,
    /// Codes are remapped through an old → new table first
    Update,
}

impl Workflow {
    pub fn requires_mapping(&self) -> bool {
        matches!(self, Workflow::Update)
    }
}

/// Validated inputs of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub company: String,
    pub status: Status,
    pub codes: Vec<Code>,
    pub accounts: Vec<Account>,
}

impl GenerationRequest {
    pub fn new(
        company: &str,
        status: Option<Status>,
        codes: Vec<Code>,
        accounts: Vec<Account>,
    ) -> Result<Self> {
        let company = company.trim();
        if company.is_empty() {
            return Err(AppError::MissingInput("company name".to_string()));
        }
        let status = status.ok_or_else(|| AppError::MissingInput("status".to_string()))?;
        if codes.is_empty() {
            return Err(AppError::MissingInput("no product code found".to_string()));
        }
        if accounts.is_empty() {
            return Err(AppError::MissingInput("no account number found".to_string()));
        }

        Ok(Self {
            company: company.to_string(),
            status,
            codes,
            accounts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_selector() {
        assert_eq!(Status::from_selector("").unwrap(), None);
        assert_eq!(Status::from_selector("INCLUDE").unwrap(), Some(Status::Include));
        assert_eq!(Status::from_selector("EXCLUDE").unwrap(), Some(Status::Exclude));
        assert!(matches!(
            Status::from_selector("MAYBE"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_run_date_stamp() {
        let date = RunDate::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(date.stamp(), "250714");
        assert_eq!(date.to_string(), "250714");
    }

    #[test]
    fn test_account_rejects_blank() {
        assert!(Account::new("   ").is_none());
        assert_eq!(Account::new(" FR001 ").unwrap().as_str(), "FR001");
    }

    #[test]
    fn test_request_requires_fields() {
        let codes = vec![Code::sanitize("123456").unwrap()];
        let accounts = vec![Account::new("A1").unwrap()];

        let err = GenerationRequest::new(" ", Some(Status::Include), codes.clone(), accounts.clone())
            .unwrap_err();
        assert_eq!(err, AppError::MissingInput("company name".to_string()));

        let err = GenerationRequest::new("ACME", None, codes.clone(), accounts.clone()).unwrap_err();
        assert_eq!(err, AppError::MissingInput("status".to_string()));

        let err = GenerationRequest::new("ACME", Some(Status::Include), Vec::new(), accounts)
            .unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));

        let req = GenerationRequest::new(" ACME ", Some(Status::Include), codes, vec![
            Account::new("A1").unwrap(),
        ])
        .unwrap();
        assert_eq!(req.company, "ACME");
    }
}

//! Generator form
//!
//! Request-scoped state of the two pages of the tool:
//! - the Generator page (codes file, accounts file, company, status)
//! - the Update page, which adds an old → new mapping file

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::use_cases::catalog_generator::{
    CatalogGenerator, ColumnSource, GenerationInputs, MappingSource,
};
use crate::domain::error::{AppError, Result};
use crate::domain::{GenerationOutcome, RunDate, Status, UploadedFile, Workflow};
use crate::infrastructure::config::GeneratorConfig;

/// Everything the user filled in, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorForm {
    #[serde(default)]
    pub workflow: Workflow,

    pub codes_file: Option<UploadedFile>,
    pub codes_column: Option<usize>,

    pub accounts_file: Option<UploadedFile>,
    pub accounts_column: Option<usize>,

    /// Update page only
    pub mapping_file: Option<UploadedFile>,
    pub old_code_column: Option<usize>,
    pub new_code_column: Option<usize>,

    #[serde(default)]
    pub company: String,

    /// Raw status selector value, `""` when nothing was picked
    #[serde(default)]
    pub status: String,
}

impl GeneratorForm {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow,
            ..Self::default()
        }
    }

    /// Names of the fields still missing, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.workflow.requires_mapping() {
            if self.mapping_file.is_none() {
                missing.push("mapping file");
            }
            if self.old_code_column.is_none() {
                missing.push("old code column");
            }
            if self.new_code_column.is_none() {
                missing.push("new code column");
            }
        }
        if self.codes_file.is_none() {
            missing.push("codes file");
        }
        if self.codes_column.is_none() {
            missing.push("codes column");
        }
        if self.accounts_file.is_none() {
            missing.push("accounts file");
        }
        if self.accounts_column.is_none() {
            missing.push("accounts column");
        }
        if self.company.trim().is_empty() {
            missing.push("company name");
        }
        if self.status.trim().is_empty() {
            missing.push("status");
        }

        missing
    }

    /// Validate the form and run the generation
    pub fn submit(&self, config: &GeneratorConfig, run_date: &RunDate) -> Result<GenerationOutcome> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            warn!(workflow = ?self.workflow, missing = ?missing, "Form incomplete");
            return Err(AppError::MissingInput(missing.join(", ")));
        }

        let status = Status::from_selector(&self.status)?;
        let inputs = GenerationInputs {
            company: &self.company,
            status,
            codes: column_source(&self.codes_file, self.codes_column, "codes file")?,
            accounts: column_source(&self.accounts_file, self.accounts_column, "accounts file")?,
            mapping: self.mapping_source()?,
        };

        info!(workflow = ?self.workflow, company = %self.company.trim(), "Form submitted");
        CatalogGenerator::new(config.clone()).run(&inputs, run_date)
    }

    /// Submit and hand the outcome back as JSON
    pub fn submit_json(&self, config: &GeneratorConfig, run_date: &RunDate) -> Result<String> {
        let outcome = self.submit(config, run_date)?;
        serde_json::to_string(&outcome)
            .map_err(|e| AppError::Internal(format!("Failed to serialize outcome: {}", e)))
    }

    fn mapping_source(&self) -> Result<Option<MappingSource<'_>>> {
        if !self.workflow.requires_mapping() {
            return Ok(None);
        }

        match (&self.mapping_file, self.old_code_column, self.new_code_column) {
            (Some(file), Some(old_column), Some(new_column)) => Ok(Some(MappingSource {
                file,
                old_column,
                new_column,
            })),
            _ => Err(AppError::MissingInput("mapping file".to_string())),
        }
    }
}

fn column_source<'a>(
    file: &'a Option<UploadedFile>,
    column: Option<usize>,
    field: &str,
) -> Result<ColumnSource<'a>> {
    match (file, column) {
        (Some(file), Some(column)) => Ok(ColumnSource { file, column }),
        _ => Err(AppError::MissingInput(field.to_string())),
    }
}

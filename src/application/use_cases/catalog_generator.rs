// ============================================================
// CATALOG GENERATOR USE CASE
// ============================================================
// Orchestrate reading, code validation, optional remapping and rendering

use std::time::Instant;

use tracing::{info, warn};

use crate::application::use_cases::artifact_renderer::render_artifacts;
use crate::application::use_cases::code_pipeline::{
    apply_mapping, build_mapping, extract_accounts, extract_codes,
};
use crate::domain::error::{AppError, Result};
use crate::domain::{
    GenerationOutcome, GenerationRequest, Mapping, RunDate, Status, Table, UploadedFile,
};
use crate::infrastructure::config::GeneratorConfig;
use crate::infrastructure::tabular::TabularReader;

/// A file and the 1-based column to read from it
#[derive(Debug, Clone, Copy)]
pub struct ColumnSource<'a> {
    pub file: &'a UploadedFile,
    pub column: usize,
}

/// The old → new table and its two columns
#[derive(Debug, Clone, Copy)]
pub struct MappingSource<'a> {
    pub file: &'a UploadedFile,
    pub old_column: usize,
    pub new_column: usize,
}

/// Everything one generation reads
#[derive(Debug, Clone, Copy)]
pub struct GenerationInputs<'a> {
    pub company: &'a str,
    pub status: Option<Status>,
    pub codes: ColumnSource<'a>,
    pub accounts: ColumnSource<'a>,
    /// Present on the Update page only
    pub mapping: Option<MappingSource<'a>>,
}

/// Catalog generation use case
pub struct CatalogGenerator {
    config: GeneratorConfig,
    reader: TabularReader,
}

impl CatalogGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let reader = TabularReader::new(&config);
        Self { config, reader }
    }

    /// Create with default configuration
    pub fn default_config() -> Self {
        Self::new(GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Read the uploads and produce the four artifacts
    pub fn run(&self, inputs: &GenerationInputs<'_>, run_date: &RunDate) -> Result<GenerationOutcome> {
        let start = Instant::now();

        self.config.check()?;
        self.check_selector(inputs.codes.column)?;
        self.check_selector(inputs.accounts.column)?;
        if let Some(mapping) = &inputs.mapping {
            self.check_selector(mapping.old_column)?;
            self.check_selector(mapping.new_column)?;
        }

        let codes = extract_codes(&self.read(inputs.codes.file)?, inputs.codes.column)?;
        let accounts = extract_accounts(&self.read(inputs.accounts.file)?, inputs.accounts.column)?;
        let request = GenerationRequest::new(inputs.company, inputs.status, codes, accounts)?;

        let mapping = match &inputs.mapping {
            Some(source) => {
                let table = self.read(source.file)?;
                Some(build_mapping(&table, source.old_column, source.new_column)?)
            }
            None => None,
        };

        let outcome = self.generate(&request, mapping.as_ref(), run_date)?;

        info!(
            company = %request.company,
            status = %request.status,
            codes = request.codes.len(),
            accounts = request.accounts.len(),
            remapped = outcome.mapping.as_ref().map(|m| m.changed_count()).unwrap_or(0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Catalog files generated"
        );
        Ok(outcome)
    }

    /// Render a validated request, remapping its codes first when a mapping is given
    pub fn generate(
        &self,
        request: &GenerationRequest,
        mapping: Option<&Mapping>,
        run_date: &RunDate,
    ) -> Result<GenerationOutcome> {
        let remapped = mapping.map(|m| apply_mapping(&request.codes, m));
        let codes = remapped
            .as_ref()
            .map(|outcome| outcome.codes.as_slice())
            .unwrap_or(&request.codes);

        let artifacts = render_artifacts(
            codes,
            &request.accounts,
            &request.company,
            request.status,
            run_date,
        )?;

        Ok(GenerationOutcome {
            artifacts,
            mapping: remapped,
            mapping_size: mapping.map(Mapping::len),
        })
    }

    fn read(&self, file: &UploadedFile) -> Result<Table> {
        self.reader.read(&file.bytes, &file.name)
    }

    fn check_selector(&self, column: usize) -> Result<()> {
        if column == 0 || column > self.config.max_column {
            warn!(column, max = self.config.max_column, "Column selector out of bounds");
            return Err(AppError::ValidationError(format!(
                "column selector must be between 1 and {}, got {}",
                self.config.max_column, column
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactKind, HeaderMode};
    use chrono::NaiveDate;

    fn run_date() -> RunDate {
        RunDate::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap())
    }

    fn csv(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, content.as_bytes().to_vec())
    }

    fn inputs<'a>(
        codes: &'a UploadedFile,
        accounts: &'a UploadedFile,
        mapping: Option<MappingSource<'a>>,
    ) -> GenerationInputs<'a> {
        GenerationInputs {
            company: "ACME",
            status: Some(Status::Include),
            codes: ColumnSource {
                file: codes,
                column: 1,
            },
            accounts: ColumnSource {
                file: accounts,
                column: 1,
            },
            mapping,
        }
    }

    #[test]
    fn test_generator_flow() {
        let codes = csv("codes.csv", "12345\n654321\n12345\n");
        let accounts = csv("accounts.csv", "FR001\nFR002\n");
        let generator = CatalogGenerator::default_config();

        let outcome = generator
            .run(&inputs(&codes, &accounts, None), &run_date())
            .unwrap();

        assert!(outcome.mapping.is_none());
        assert!(outcome.mapping_size.is_none());
        assert_eq!(
            outcome.artifact(ArtifactKind::ProfileCatalog).content,
            "PC_PROFILE_ACME;INCLUDE;;M2_012345;frxProductCatallog:Online\n\
             PC_PROFILE_ACME;INCLUDE;;M2_654321;frxProductCatallog:Online\n"
        );
        assert_eq!(
            outcome.artifact(ArtifactKind::CompteMapping).content,
            "PC_ACME;PC_ACME;PC_PROFILE_ACME;FR001,FR002;frxProductCatalog:Online"
        );
        assert_eq!(
            outcome.artifact(ArtifactKind::ProfileCatalog).file_name,
            "DFRXHYBRPCP2507140000"
        );
    }

    #[test]
    fn test_update_flow_remaps_codes() {
        let codes = csv("codes.csv", "12345\n654321\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let table = csv("mapping.csv", "old;new\n12345;999999\n111111;222222\n");
        let generator = CatalogGenerator::default_config();

        let outcome = generator
            .run(
                &inputs(
                    &codes,
                    &accounts,
                    Some(MappingSource {
                        file: &table,
                        old_column: 1,
                        new_column: 2,
                    }),
                ),
                &run_date(),
            )
            .unwrap();

        let mapping = outcome.mapping.as_ref().unwrap();
        assert_eq!(mapping.changed, vec![true, false]);
        assert_eq!(mapping.unmatched, vec![false, true]);
        assert_eq!(outcome.mapping_size, Some(2));
        assert_eq!(
            outcome.artifact(ArtifactKind::ProfileCatalog).content,
            "PC_PROFILE_ACME;INCLUDE;;M2_999999;frxProductCatallog:Online\n\
             PC_PROFILE_ACME;INCLUDE;;M2_654321;frxProductCatallog:Online\n"
        );
    }

    #[test]
    fn test_invalid_code_aborts_before_rendering() {
        let codes = csv("codes.csv", "12345\n123456\nabcde\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let generator = CatalogGenerator::default_config();

        let err = generator
            .run(&inputs(&codes, &accounts, None), &run_date())
            .unwrap_err();
        assert_eq!(err, AppError::InvalidCode(vec!["abcde".to_string()]));
    }

    #[test]
    fn test_mistyped_first_code_is_reported() {
        let codes = csv("codes.csv", "1234O\n12345\n123456\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let generator = CatalogGenerator::default_config();
        assert_eq!(generator.config().header_detection, HeaderMode::Auto);

        let err = generator
            .run(&inputs(&codes, &accounts, None), &run_date())
            .unwrap_err();
        assert_eq!(err, AppError::InvalidCode(vec!["1234O".to_string()]));
    }

    #[test]
    fn test_missing_status_is_reported() {
        let codes = csv("codes.csv", "123456\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let mut input = inputs(&codes, &accounts, None);
        input.status = None;

        let err = CatalogGenerator::default_config()
            .run(&input, &run_date())
            .unwrap_err();
        assert_eq!(err, AppError::MissingInput("status".to_string()));
    }

    #[test]
    fn test_selector_bounds() {
        let codes = csv("codes.csv", "123456\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let mut input = inputs(&codes, &accounts, None);
        input.accounts.column = 51;

        let err = CatalogGenerator::default_config()
            .run(&input, &run_date())
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        input.accounts.column = 2;
        let err = CatalogGenerator::default_config()
            .run(&input, &run_date())
            .unwrap_err();
        assert_eq!(
            err,
            AppError::ColumnOutOfRange {
                index: 2,
                column_count: 1
            }
        );
    }

    #[test]
    fn test_empty_mapping_table() {
        let codes = csv("codes.csv", "123456\n");
        let accounts = csv("accounts.csv", "FR001\n");
        let table = csv("mapping.csv", "a;b\nc;d\n");

        let err = CatalogGenerator::default_config()
            .run(
                &inputs(
                    &codes,
                    &accounts,
                    Some(MappingSource {
                        file: &table,
                        old_column: 1,
                        new_column: 2,
                    }),
                ),
                &run_date(),
            )
            .unwrap_err();
        assert_eq!(err, AppError::EmptyMapping);
    }

    #[test]
    fn test_generate_without_mapping_keeps_codes() {
        let request = GenerationRequest::new(
            "ACME",
            Some(Status::Exclude),
            vec![crate::domain::Code::sanitize("123456").unwrap()],
            vec![crate::domain::Account::new("A1").unwrap()],
        )
        .unwrap();

        let outcome = CatalogGenerator::default_config()
            .generate(&request, None, &run_date())
            .unwrap();
        assert_eq!(
            outcome.artifacts[0].content,
            "PC_PROFILE_ACME;EXCLUDE;;M2_123456;frxProductCatallog:Online\n"
        );
    }
}

// ============================================================
// ARTIFACT RENDERER
// ============================================================
// Fixed-layout DFRX / AFRX files for the catalog ingestion

use std::collections::HashSet;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::{Account, ArtifactKind, Code, OutputArtifact, RunDate, Status};

const CATALOG_TAG: &str = "frxProductCatallog:Online";
const COMPTE_TAG: &str = "frxProductCatalog:Online";

/// Blank padding between the sender id and the status of an acknowledgement
const ACK_PADDING: &str = "                    ";

/// Render the four artifacts of a generation, in [`ArtifactKind::ALL`] order.
/// Output depends on the arguments only.
pub fn render_artifacts(
    codes: &[Code],
    accounts: &[Account],
    company: &str,
    status: Status,
    run_date: &RunDate,
) -> Result<[OutputArtifact; 4]> {
    Ok([
        OutputArtifact::plain_text(
            ArtifactKind::ProfileCatalog,
            run_date,
            render_profile_catalog(codes, company, status)?,
        ),
        OutputArtifact::plain_text(
            ArtifactKind::CompteAck,
            run_date,
            render_acknowledgement(ArtifactKind::CompteMapping, run_date),
        ),
        OutputArtifact::plain_text(
            ArtifactKind::CompteMapping,
            run_date,
            render_compte_mapping(accounts, company),
        ),
        OutputArtifact::plain_text(
            ArtifactKind::ProfileCatalogAck,
            run_date,
            render_acknowledgement(ArtifactKind::ProfileCatalog, run_date),
        ),
    ])
}

/// One `;` row per distinct code, first-occurrence order, header-less
fn render_profile_catalog(codes: &[Code], company: &str, status: Status) -> Result<String> {
    let profile = format!("PC_PROFILE_{}", company);
    let mut seen = HashSet::new();

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for code in codes.iter().filter(|c| seen.insert(*c)) {
        let product = format!("M2_{}", code);
        writer
            .write_record([profile.as_str(), status.as_str(), "", product.as_str(), CATALOG_TAG])
            .map_err(|e| AppError::Internal(format!("Failed to write catalog row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush catalog rows: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("Catalog rows are not UTF-8: {}", e)))
}

/// Single line binding the company profile to its accounts
fn render_compte_mapping(accounts: &[Account], company: &str) -> String {
    let accounts = accounts
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "PC_{company};PC_{company};PC_PROFILE_{company};{accounts};{COMPTE_TAG}",
        company = company,
        accounts = accounts,
        COMPTE_TAG = COMPTE_TAG
    )
}

/// Status line acknowledging the data file of `acknowledged`
fn render_acknowledgement(acknowledged: ArtifactKind, run_date: &RunDate) -> String {
    let (sequence, sender) = match acknowledged {
        ArtifactKind::CompteMapping => ("68240530", "CCMGHYBFRX"),
        _ => ("68200117", "RCMRHYBFRX"),
    };
    let prefix = acknowledged.prefix();
    let stamp = run_date.stamp();

    format!(
        "{prefix}{stamp}0000{sequence}IT{prefix}{stamp}{sender}{ACK_PADDING}OK000000",
        prefix = prefix,
        stamp = stamp,
        sequence = sequence,
        sender = sender,
        ACK_PADDING = ACK_PADDING
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run_date() -> RunDate {
        RunDate::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap())
    }

    fn codes(raw: &[&str]) -> Vec<Code> {
        raw.iter().map(|r| Code::sanitize(r).unwrap()).collect()
    }

    fn accounts(raw: &[&str]) -> Vec<Account> {
        raw.iter().map(|r| Account::new(r).unwrap()).collect()
    }

    #[test]
    fn test_duplicate_codes_collapse_to_one_row() {
        let artifacts = render_artifacts(
            &codes(&["111111", "111111"]),
            &accounts(&["A1"]),
            "ACME",
            Status::Exclude,
            &run_date(),
        )
        .unwrap();

        assert_eq!(
            artifacts[0].content,
            "PC_PROFILE_ACME;EXCLUDE;;M2_111111;frxProductCatallog:Online\n"
        );
    }

    #[test]
    fn test_catalog_rows_keep_first_occurrence_order() {
        let input = codes(&["222222", "111111", "222222", "333333", "111111"]);
        let content = render_profile_catalog(&input, "ACME", Status::Include).unwrap();
        let products: Vec<&str> = content
            .lines()
            .map(|l| l.split(';').nth(3).unwrap())
            .collect();

        assert_eq!(products, vec!["M2_222222", "M2_111111", "M2_333333"]);
        let distinct: HashSet<&Code> = input.iter().collect();
        assert_eq!(content.lines().count(), distinct.len());
    }

    #[test]
    fn test_company_with_delimiter_is_quoted() {
        let content = render_profile_catalog(&codes(&["123456"]), "A;B", Status::Include).unwrap();
        assert_eq!(
            content,
            "\"PC_PROFILE_A;B\";INCLUDE;;M2_123456;frxProductCatallog:Online\n"
        );
    }

    #[test]
    fn test_compte_mapping_line() {
        let artifacts = render_artifacts(
            &codes(&["123456"]),
            &accounts(&["FR001", "FR002", "FR003"]),
            "ACME",
            Status::Include,
            &run_date(),
        )
        .unwrap();

        assert_eq!(artifacts[2].file_name, "DFRXHYBRCMP2507140000");
        assert_eq!(
            artifacts[2].content,
            "PC_ACME;PC_ACME;PC_PROFILE_ACME;FR001,FR002,FR003;frxProductCatalog:Online"
        );
    }

    #[test]
    fn test_acknowledgements_depend_on_run_date_only() {
        let a = render_artifacts(
            &codes(&["123456"]),
            &accounts(&["A1"]),
            "ACME",
            Status::Include,
            &run_date(),
        )
        .unwrap();
        let b = render_artifacts(
            &codes(&["654321", "12345"]),
            &accounts(&["B2", "B3"]),
            "OTHER",
            Status::Exclude,
            &run_date(),
        )
        .unwrap();

        assert_eq!(
            a[1].content,
            "DFRXHYBRCMP250714000068240530ITDFRXHYBRCMP250714CCMGHYBFRX                    OK000000"
        );
        assert_eq!(
            a[3].content,
            "DFRXHYBRPCP250714000068200117ITDFRXHYBRPCP250714RCMRHYBFRX                    OK000000"
        );
        assert_eq!(a[1], b[1]);
        assert_eq!(a[3], b[3]);
        assert_eq!(a[1].file_name, "AFRXHYBRCMP2507140000");
        assert_eq!(a[3].file_name, "AFRXHYBRPCP2507140000");
    }

    #[test]
    fn test_render_is_deterministic() {
        let args = (codes(&["123456", "12345"]), accounts(&["A1"]));
        let first = render_artifacts(&args.0, &args.1, "ACME", Status::Include, &run_date()).unwrap();
        let second = render_artifacts(&args.0, &args.1, "ACME", Status::Include, &run_date()).unwrap();
        assert_eq!(first, second);
    }
}

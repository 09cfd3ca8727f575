use serde::{Deserialize, Serialize};

use super::{MappingOutcome, RunDate};

/// How an artifact should be offered for download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    PlainText,
}

impl ContentKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentKind::PlainText => "text/plain",
        }
    }
}

/// The four files of a generation, in the order they are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// `DFRXHYBRPCP` profile → product rows
    ProfileCatalog,
    /// `AFRXHYBRCMP` acknowledgement of the compte file
    CompteAck,
    /// `DFRXHYBRCMP` profile → accounts line
    CompteMapping,
    /// `AFRXHYBRPCP` acknowledgement of the profile-catalog file
    ProfileCatalogAck,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::ProfileCatalog,
        ArtifactKind::CompteAck,
        ArtifactKind::CompteMapping,
        ArtifactKind::ProfileCatalogAck,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::ProfileCatalog => "DFRXHYBRPCP",
            ArtifactKind::CompteAck => "AFRXHYBRCMP",
            ArtifactKind::CompteMapping => "DFRXHYBRCMP",
            ArtifactKind::ProfileCatalogAck => "AFRXHYBRPCP",
        }
    }

    pub fn file_name(&self, run_date: &RunDate) -> String {
        format!("{}{}0000", self.prefix(), run_date.stamp())
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub content: String,
    pub content_kind: ContentKind,
}

impl OutputArtifact {
    pub fn plain_text(kind: ArtifactKind, run_date: &RunDate, content: String) -> Self {
        Self {
            kind,
            file_name: kind.file_name(run_date),
            content,
            content_kind: ContentKind::PlainText,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Everything handed back to the form after a successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub artifacts: [OutputArtifact; 4],

    /// Present when codes went through a mapping table
    pub mapping: Option<MappingOutcome>,

    /// Pairs kept in the mapping table after validation and dedupe
    pub mapping_size: Option<usize>,
}

impl GenerationOutcome {
    pub fn artifact(&self, kind: ArtifactKind) -> &OutputArtifact {
        &self.artifacts[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_file_names() {
        let date = RunDate::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        let names: Vec<String> = ArtifactKind::ALL.iter().map(|k| k.file_name(&date)).collect();
        assert_eq!(
            names,
            vec![
                "DFRXHYBRPCP2507140000",
                "AFRXHYBRCMP2507140000",
                "DFRXHYBRCMP2507140000",
                "AFRXHYBRPCP2507140000",
            ]
        );
    }

    #[test]
    fn test_plain_text_mime() {
        let date = RunDate::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let artifact = OutputArtifact::plain_text(ArtifactKind::CompteAck, &date, "x".to_string());
        assert_eq!(artifact.content_kind.mime(), "text/plain");
        assert_eq!(artifact.file_name, "AFRXHYBRCMP2401020000");
        assert_eq!(artifact.as_bytes(), b"x");
    }
}

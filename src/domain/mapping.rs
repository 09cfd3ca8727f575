// ============================================================
// CODE MAPPING
// ============================================================
// Old-code → new-code lookup used by the Update workflow

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Code;

/// Old → new code pairs, unique by old code (first insertion wins)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mapping {
    /// Pairs in first-occurrence order
    pairs: Vec<(Code, Code)>,

    #[serde(skip)]
    index: HashMap<Code, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair unless `old` is already mapped. Returns whether it was kept.
    pub fn insert(&mut self, old: Code, new: Code) -> bool {
        if self.index.contains_key(&old) {
            return false;
        }
        self.index.insert(old.clone(), self.pairs.len());
        self.pairs.push((old, new));
        true
    }

    pub fn get(&self, old: &Code) -> Option<&Code> {
        self.index.get(old).map(|&i| &self.pairs[i].1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(Code, Code)] {
        &self.pairs
    }
}

impl FromIterator<(Code, Code)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Code, Code)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (old, new) in iter {
            mapping.insert(old, new);
        }
        mapping
    }
}

/// Result of remapping a code list. All three vectors are position-aligned
/// with the input; `changed[i]` and `unmatched[i]` are never both true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingOutcome {
    pub original: Vec<Code>,
    pub codes: Vec<Code>,
    pub changed: Vec<bool>,
    pub unmatched: Vec<bool>,
}

impl MappingOutcome {
    pub fn changed_count(&self) -> usize {
        self.changed.iter().filter(|&&c| c).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.iter().filter(|&&u| u).count()
    }

    /// (old, new) for every remapped position
    pub fn changed_pairs(&self) -> Vec<(&Code, &Code)> {
        self.original
            .iter()
            .zip(&self.codes)
            .zip(&self.changed)
            .filter(|(_, &changed)| changed)
            .map(|((old, new), _)| (old, new))
            .collect()
    }

    /// Codes that had no entry in the mapping
    pub fn unmatched_codes(&self) -> Vec<&Code> {
        self.original
            .iter()
            .zip(&self.unmatched)
            .filter(|(_, &unmatched)| unmatched)
            .map(|(code, _)| code)
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} code(s): {} remapped, {} without match",
            self.codes.len(),
            self.changed_count(),
            self.unmatched_count()
        )
    }
}

// src/domain/category.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSummary {
    pub code: String,
    pub name: String,
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub languages: Vec<LanguageSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub regions: Vec<Region>,
}

/// A language together with the region it is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub region: String,
    pub region_id: String,
}

impl CategoryIndex {
    /// All languages across regions, in listing order
    pub fn languages(&self) -> Vec<LanguageEntry> {
        self.regions
            .iter()
            .flat_map(|region| {
                region.languages.iter().map(move |lang| LanguageEntry {
                    code: lang.code.clone(),
                    name: lang.name.clone(),
                    flag: lang.flag.clone(),
                    region: region.name.clone(),
                    region_id: region.id.clone(),
                })
            })
            .collect()
    }

    /// Case-insensitive lookup by language code
    pub fn find(&self, code: &str) -> Option<LanguageEntry> {
        self.languages()
            .into_iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// Codes listed more than once. Progress is keyed by code, so this should be empty.
    pub fn duplicate_codes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for lang in self.regions.iter().flat_map(|r| r.languages.iter()) {
            if !seen.insert(lang.code.as_str()) && !duplicates.contains(&lang.code) {
                duplicates.push(lang.code.clone());
            }
        }
        duplicates
    }
}

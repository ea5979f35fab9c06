use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::{MediaRef, ScalarField};

/// Persian rendition of one content record, built by a single run.
///
/// Scalar fields whose translation failed are absent from `fields`; every
/// list and person entry is always present, holding the original text when
/// its call failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedRecord {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub cast: Vec<TranslatedCast>,
    #[serde(default)]
    pub crew: Vec<TranslatedCrew>,
}

impl TranslatedRecord {
    pub fn field(&self, field: ScalarField) -> Option<&str> {
        self.fields.get(field.output_key()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.genres.is_empty()
            && self.companies.is_empty()
            && self.languages.is_empty()
            && self.cast.is_empty()
            && self.crew.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedCast {
    pub id: u64,
    pub original_name: String,
    pub translated_name: String,
    pub original_character: Option<String>,
    pub translated_character: Option<String>,
    pub media: Option<MediaRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedCrew {
    pub id: u64,
    pub original_name: String,
    pub translated_name: String,
    pub original_job: String,
    pub translated_job: String,
}

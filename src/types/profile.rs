//! Patient profile records and corpus loading.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// One simulated patient, as read from the profile corpus.
///
/// All attribute keys are known in advance; the record is read once at agent
/// construction and never mutated afterwards. Missing fields deserialize to
/// `None` and render as "Not recorded" (or a field-appropriate fallback) in
/// the persona instruction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    pub hadm_id: Option<i64>,
    pub split: Option<String>,

    // Demographics
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub marital_status: Option<String>,
    pub occupation: Option<String>,
    pub living_situation: Option<String>,
    #[serde(deserialize_with = "stringly")]
    pub children: Option<String>,

    // Clinical picture
    pub chiefcomplaint: Option<String>,
    #[serde(deserialize_with = "stringly")]
    pub pain: Option<String>,
    pub diagnosis: Option<String>,
    pub present_illness_positive: Option<String>,
    pub present_illness_negative: Option<String>,
    pub medical_history: Option<String>,
    pub medication: Option<String>,
    pub allergies: Option<String>,

    // Social and family history
    pub tobacco: Option<String>,
    pub alcohol: Option<String>,
    pub illicit_drug: Option<String>,
    pub exercise: Option<String>,
    pub family_medical_history: Option<String>,

    // Persona axes (parsed leniently by the persona module)
    pub cefr: Option<String>,
    pub personality: Option<String>,
    pub recall_level: Option<String>,
    pub dazed_level: Option<String>,

    // Vocabulary tiers, comma-joined word lists
    #[serde(rename = "med_A")]
    pub med_a: Option<String>,
    #[serde(rename = "med_B")]
    pub med_b: Option<String>,
    #[serde(rename = "med_C")]
    pub med_c: Option<String>,
    #[serde(rename = "cefr_A1")]
    pub cefr_a1: Option<String>,
    #[serde(rename = "cefr_A2")]
    pub cefr_a2: Option<String>,
    #[serde(rename = "cefr_B1")]
    pub cefr_b1: Option<String>,
    #[serde(rename = "cefr_B2")]
    pub cefr_b2: Option<String>,
    #[serde(rename = "cefr_C1")]
    pub cefr_c1: Option<String>,
    #[serde(rename = "cefr_C2")]
    pub cefr_c2: Option<String>,
}

impl PatientProfile {
    /// Look up a vocabulary tier by its corpus key.
    pub fn vocab_list(&self, key: &str) -> Option<&str> {
        match key {
            "med_A" => self.med_a.as_deref(),
            "med_B" => self.med_b.as_deref(),
            "med_C" => self.med_c.as_deref(),
            "cefr_A1" => self.cefr_a1.as_deref(),
            "cefr_A2" => self.cefr_a2.as_deref(),
            "cefr_B1" => self.cefr_b1.as_deref(),
            "cefr_B2" => self.cefr_b2.as_deref(),
            "cefr_C1" => self.cefr_c1.as_deref(),
            "cefr_C2" => self.cefr_c2.as_deref(),
            _ => None,
        }
    }
}

/// Accept strings or bare numbers for fields the corpus records either way
/// (pain scores, child counts).
fn stringly<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Load the full profile corpus from a JSON array file.
pub fn load_profiles(path: impl AsRef<Path>) -> Result<Vec<PatientProfile>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let profiles = serde_json::from_str(&raw)?;
    Ok(profiles)
}

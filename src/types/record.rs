//! Dialogue output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Which simulated party authored a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum Speaker {
    Doctor,
    Patient,
}

/// One agent-authored message in a dialogue's transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Metadata the doctor agent contributes to the output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorMetadata {
    pub doctor_engine_name: String,
}

/// Metadata the patient agent contributes to the output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientMetadata {
    pub hadm_id: Option<i64>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub cefr_type: String,
    pub personality_type: String,
    pub recall_level_type: String,
    pub dazed_level_type: String,
    pub patient_engine_name: String,
}

/// One completed (or partially completed) dialogue.
///
/// Created once per simulation and never mutated afterwards; serializes to a
/// single JSON line with both agents' metadata flattened alongside the
/// transcript and the ground-truth label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub dialogue_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub patient: PatientMetadata,
    #[serde(flatten)]
    pub doctor: DoctorMetadata,
    pub dialog_history: Vec<TranscriptEntry>,
    /// Ground-truth diagnosis, carried separately from the transcript.
    pub diagnosis: Option<String>,
}

impl DialogueRecord {
    pub fn new(
        patient: PatientMetadata,
        doctor: DoctorMetadata,
        dialog_history: Vec<TranscriptEntry>,
        diagnosis: Option<String>,
    ) -> Self {
        Self {
            dialogue_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            patient,
            doctor,
            dialog_history,
            diagnosis,
        }
    }
}

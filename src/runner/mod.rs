//! Batch generation over a patient-profile corpus.
//!
//! Dialogues run sequentially; a failure while producing one dialogue is
//! caught here, logged with the failing profile's key, and never aborts the
//! batch. Inner layers propagate errors untouched; this is the outermost
//! layer that can make forward progress without the failed unit.

pub mod output;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::agent::{DoctorAgent, PatientAgent};
use crate::config::SimConfig;
use crate::error::Result;
use crate::gateway::ModelGateway;
use crate::orchestrator::DialogueOrchestrator;
use crate::types::profile::load_profiles;
use crate::types::{DialogueRecord, PatientProfile};

pub struct BatchRunner {
    config: SimConfig,
    gateway: Arc<ModelGateway>,
    profiles: Vec<PatientProfile>,
}

impl BatchRunner {
    /// Build the gateway from configuration and load the profile corpus.
    pub fn new(config: SimConfig) -> Result<Self> {
        let gateway = Arc::new(ModelGateway::from_config(
            &config.models,
            Duration::from_secs(config.simulation.request_timeout_secs),
        ));
        let profiles = load_profiles(&config.patient_profile_path)?;
        info!(
            profiles = profiles.len(),
            models = ?gateway.list_available(),
            "batch runner ready"
        );
        Ok(Self {
            config,
            gateway,
            profiles,
        })
    }

    /// Assemble a runner from pre-built parts. Used by tests and embedders
    /// that construct the gateway themselves.
    pub fn with_parts(
        config: SimConfig,
        gateway: Arc<ModelGateway>,
        profiles: Vec<PatientProfile>,
    ) -> Self {
        Self {
            config,
            gateway,
            profiles,
        }
    }

    /// Generate one dialogue for a profile, with fresh agents on both sides.
    pub async fn generate_single_dialogue(
        &self,
        profile: &PatientProfile,
        doctor_model: &str,
        patient_model: &str,
    ) -> Result<DialogueRecord> {
        let chief_complaint = profile
            .chiefcomplaint
            .as_deref()
            .unwrap_or("Not specified");

        let patient = PatientAgent::new(profile.clone(), patient_model, Arc::clone(&self.gateway));
        let doctor = DoctorAgent::new(doctor_model, Arc::clone(&self.gateway), chief_complaint);

        DialogueOrchestrator::new(self.config.simulation.max_turns)
            .with_summaries(self.config.simulation.log_summaries)
            .run(doctor, patient)
            .await
    }

    /// Generate dialogues for every profile in a split, isolating per-item
    /// failures.
    pub async fn generate_for_split(
        &self,
        split: &str,
        doctor_model: &str,
        patient_model: &str,
        limit: Option<usize>,
    ) -> Vec<DialogueRecord> {
        let selected: Vec<&PatientProfile> = self
            .profiles
            .iter()
            .filter(|p| p.split.as_deref() == Some(split))
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        info!(
            split,
            count = selected.len(),
            doctor_model,
            patient_model,
            "generating dialogues"
        );

        let mut dialogues = Vec::with_capacity(selected.len());
        for profile in selected {
            match self
                .generate_single_dialogue(profile, doctor_model, patient_model)
                .await
            {
                Ok(record) => dialogues.push(record),
                Err(e) => {
                    error!(
                        hadm_id = ?profile.hadm_id,
                        error = %e,
                        "dialogue generation failed, skipping profile"
                    );
                }
            }
        }
        dialogues
    }

    /// Generate and persist dialogues for each requested split.
    pub async fn run_full_simulation(
        &self,
        doctor_model: &str,
        patient_model: &str,
        splits: &[String],
        limit: Option<usize>,
    ) -> Result<()> {
        for split in splits {
            let dialogues = self
                .generate_for_split(split, doctor_model, patient_model, limit)
                .await;

            let path = self
                .config
                .simulation
                .output_dir
                .join(format!("{split}_test"))
                .join("llm_simulation")
                .join(patient_model)
                .join("llm_dialogue.jsonl");

            output::write_jsonl(&path, &dialogues)?;
            info!(
                split,
                count = dialogues.len(),
                path = %path.display(),
                "saved dialogues"
            );
        }
        Ok(())
    }

    /// One doctor model against several patient models.
    pub async fn run_multi_model_simulation(
        &self,
        doctor_model: &str,
        patient_models: &[String],
        splits: &[String],
        limit: Option<usize>,
    ) -> Result<()> {
        for patient_model in patient_models {
            info!(%patient_model, "starting simulation for patient model");
            self.run_full_simulation(doctor_model, patient_model, splits, limit)
                .await?;
        }
        Ok(())
    }

    /// Health-check every resolved backend.
    pub async fn check_connections(&self) -> Vec<(String, bool)> {
        let mut results = Vec::new();
        for model_id in self.gateway.list_available() {
            let ok = self.gateway.test_connection(model_id).await;
            results.push((model_id.to_string(), ok));
        }
        results
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    pub fn profiles(&self) -> &[PatientProfile] {
        &self.profiles
    }
}

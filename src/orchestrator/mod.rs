//! Dialogue orchestration: strict doctor/patient turn alternation.
//!
//! One dialogue is a single logical thread of control: the agents never run
//! concurrently because each turn depends on the previous one. Termination
//! is turn-count-bounded only; `max_turns` is a ceiling, not a target.

use tracing::{debug, warn};

use crate::agent::{DoctorAgent, PatientAgent};
use crate::error::Result;
use crate::types::{DialogueRecord, Speaker, TranscriptEntry};

/// Lifecycle phase of one simulated dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    NotStarted,
    DoctorOpening,
    PatientTurn,
    DoctorTurn,
    Ended,
}

/// Drives one dialogue between a doctor and a patient agent and assembles
/// the output record.
pub struct DialogueOrchestrator {
    max_turns: usize,
    log_summaries: bool,
}

impl DialogueOrchestrator {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            log_summaries: false,
        }
    }

    /// Log a side-channel findings summary after each finished dialogue.
    pub fn with_summaries(mut self, enabled: bool) -> Self {
        self.log_summaries = enabled;
        self
    }

    /// Run the interview to its turn-bounded end.
    ///
    /// The doctor opens; then for each turn the patient responds and, unless
    /// the ceiling is reached, the doctor follows. The patient may therefore
    /// end the dialogue one half-turn before the doctor's final word. Any
    /// generation failure aborts this dialogue and propagates to the caller.
    pub async fn run(
        &self,
        mut doctor: DoctorAgent,
        mut patient: PatientAgent,
    ) -> Result<DialogueRecord> {
        let mut phase = DialoguePhase::NotStarted;
        let mut transcript: Vec<TranscriptEntry> = Vec::with_capacity(2 * self.max_turns + 1);

        transition(&mut phase, DialoguePhase::DoctorOpening);
        let mut doctor_message = doctor.start_interview().await?;
        transcript.push(TranscriptEntry::new(Speaker::Doctor, doctor_message.clone()));

        for turn in 0..self.max_turns {
            transition(&mut phase, DialoguePhase::PatientTurn);
            let patient_message = patient.respond(&doctor_message).await?;
            transcript.push(TranscriptEntry::new(Speaker::Patient, patient_message.as_str()));

            if doctor.should_end_interview(turn + 1, self.max_turns) {
                break;
            }

            transition(&mut phase, DialoguePhase::DoctorTurn);
            doctor_message = doctor
                .respond(&patient_message, turn + 1, self.max_turns)
                .await?;
            transcript.push(TranscriptEntry::new(Speaker::Doctor, doctor_message.clone()));
        }

        transition(&mut phase, DialoguePhase::Ended);
        debug!(entries = transcript.len(), "dialogue ended");

        if self.log_summaries {
            match doctor.summarize_findings().await {
                Ok(summary) => debug!(%summary, "interview findings"),
                Err(e) => warn!(error = %e, "findings summary failed"),
            }
        }

        let diagnosis = patient.profile().diagnosis.clone();
        Ok(DialogueRecord::new(
            patient.metadata(),
            doctor.metadata(),
            transcript,
            diagnosis,
        ))
    }
}

fn transition(phase: &mut DialoguePhase, next: DialoguePhase) {
    debug!(from = ?*phase, to = ?next, "dialogue phase");
    *phase = next;
}

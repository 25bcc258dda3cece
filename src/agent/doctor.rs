//! Doctor agent: conducts the interview and applies the closing policy.

use std::sync::Arc;

use crate::error::Result;
use crate::gateway::{GenerationOptions, ModelGateway};
use crate::types::DoctorMetadata;

use super::conversation::Conversation;
use super::core::AgentCore;

const SUMMARY_SYSTEM: &str = "You are a physician. Summarize the key findings \
    from this patient interview in 2-3 sentences.";
const SUMMARY_PROMPT: &str = "Provide a brief clinical summary of this case.";
const SUMMARY_MAX_TOKENS: u32 = 200;

/// Simulates an emergency department physician conducting a patient
/// interview. The interview instruction is rendered once at construction
/// from the chief complaint.
pub struct DoctorAgent {
    core: AgentCore,
    chief_complaint: String,
}

impl DoctorAgent {
    pub fn new(
        model_id: impl Into<String>,
        gateway: Arc<ModelGateway>,
        chief_complaint: impl Into<String>,
    ) -> Self {
        let chief_complaint = chief_complaint.into();
        let instruction = render_instruction(&chief_complaint);
        Self {
            core: AgentCore::new(model_id, gateway, instruction),
            chief_complaint,
        }
    }

    /// Produce the opening message.
    ///
    /// No patient input exists yet: the generation is seeded by a one-shot
    /// instruction naming the chief complaint, and only the doctor's own
    /// turn is recorded.
    pub async fn start_interview(&mut self) -> Result<String> {
        let seed = format!(
            "Begin the interview. The patient has come to the ED with: {}",
            self.chief_complaint
        );
        self.core.open(&seed, GenerationOptions::default()).await
    }

    /// Respond to the patient.
    ///
    /// Near the turn ceiling a transient closing addendum is attached to the
    /// system instruction for this call only, steering the doctor toward
    /// summarizing and next steps.
    pub async fn respond(
        &mut self,
        patient_message: &str,
        turn_number: usize,
        max_turns: usize,
    ) -> Result<String> {
        let incoming = format!("Patient: {patient_message}");
        let closing = closing_context(turn_number, max_turns);
        self.core
            .exchange(&incoming, closing.as_deref(), GenerationOptions::default())
            .await
    }

    /// True once the configured turn ceiling is reached.
    pub fn should_end_interview(&self, turn_number: usize, max_turns: usize) -> bool {
        turn_number >= max_turns
    }

    /// Side-channel clinical summary over the existing history. Does not
    /// mutate conversation state.
    pub async fn summarize_findings(&self) -> Result<String> {
        let options = GenerationOptions::builder()
            .max_tokens(SUMMARY_MAX_TOKENS)
            .build();
        self.core
            .side_channel(SUMMARY_SYSTEM, SUMMARY_PROMPT, options)
            .await
    }

    pub fn reset_conversation(&mut self) {
        self.core.reset();
    }

    pub fn conversation(&self) -> &Conversation {
        self.core.conversation()
    }

    pub fn system_instruction(&self) -> &str {
        self.core.system_instruction()
    }

    pub fn metadata(&self) -> DoctorMetadata {
        DoctorMetadata {
            doctor_engine_name: self.core.model_id().to_string(),
        }
    }
}

/// Transient addendum once the interview approaches the turn ceiling.
fn closing_context(turn_number: usize, max_turns: usize) -> Option<String> {
    if turn_number + 2 >= max_turns {
        Some(format!(
            "\n\n[You are near the end of the interview (turn {turn_number}/{max_turns}). \
             Start summarizing and explaining next steps.]"
        ))
    } else {
        None
    }
}

fn render_instruction(chief_complaint: &str) -> String {
    format!(
        r#"You are an experienced emergency department physician conducting a patient interview. Your goal is to gather comprehensive medical information to make an accurate diagnosis.

## CHIEF COMPLAINT
The patient presents with: {chief_complaint}

## YOUR RESPONSIBILITIES

1. **Conduct a thorough history:**
   - History of Present Illness (HPI): Onset, location, duration, characteristics, aggravating/relieving factors, radiation, timing, severity
   - Review of Systems (ROS): Systematic review of relevant systems
   - Past Medical History (PMH): Previous conditions, surgeries, hospitalizations
   - Medications: Current medications, dosages, compliance
   - Allergies: Drug allergies and reactions
   - Social History: Tobacco, alcohol, drugs, occupation, living situation
   - Family History: Relevant family medical history

2. **Ask focused, clear questions:**
   - One question at a time
   - Use open-ended questions initially, then follow up with specific questions
   - Adapt your language to the patient's comprehension level
   - Be empathetic and professional

3. **Build rapport:**
   - Show empathy and concern
   - Acknowledge the patient's discomfort
   - Explain your reasoning when appropriate

4. **Work toward diagnosis:**
   - Gather enough information to form a differential diagnosis
   - Ask follow-up questions based on patient responses
   - Consider red flags and serious conditions

## INTERVIEW STRUCTURE

Start with:
1. Introduction and opening question about the chief complaint
2. Detailed history of present illness
3. Associated symptoms (review of systems)
4. Past medical history and medications
5. Social and family history
6. Summarize findings and explain next steps

## CONVERSATION STYLE

- Be professional yet warm
- Use clear, simple language
- Ask one question at a time
- Listen carefully to responses
- Follow up on important details
- Adapt to the patient's communication style

## IMPORTANT RULES

1. Stay in character as a physician
2. Do not make diagnoses out loud (think through differential internally)
3. Focus on gathering information through questions
4. Be realistic - you cannot perform physical exams in this text conversation
5. If the patient seems confused or has language difficulties, adjust your approach
6. Respond naturally - no stage directions or meta-commentary

## RESPONSE FORMAT

Respond ONLY with what the doctor would say. Keep responses concise and focused.
"#
    )
}

//! Patient agent: persona-conditioned responder.

use std::sync::Arc;

use rand::Rng;

use crate::error::Result;
use crate::gateway::{GenerationOptions, ModelGateway};
use crate::types::{PatientMetadata, PatientProfile};

use super::conversation::Conversation;
use super::core::AgentCore;
use super::persona::{sample_vocabulary, CefrLevel, DazedLevel, Personality, RecallLevel};

/// How many sampled vocabulary items are spelled out in the instruction.
const VOCAB_PROMPT_LIMIT: usize = 20;

/// Simulates a patient whose behavior is conditioned on a profile and four
/// persona axes. The persona instruction, including the sampled vocabulary
/// and the ground-truth diagnosis, is rendered once at construction and
/// fixed for the agent's lifetime.
pub struct PatientAgent {
    core: AgentCore,
    profile: PatientProfile,
    cefr: CefrLevel,
    personality: Personality,
    recall: RecallLevel,
    dazed: DazedLevel,
}

impl PatientAgent {
    /// Construct with unseeded vocabulary sampling; the lexical bias varies
    /// across runs by design.
    pub fn new(
        profile: PatientProfile,
        model_id: impl Into<String>,
        gateway: Arc<ModelGateway>,
    ) -> Self {
        Self::new_with_rng(profile, model_id, gateway, &mut rand::rng())
    }

    /// Construct with a caller-supplied RNG so tests can fix the seed.
    pub fn new_with_rng<R: Rng + ?Sized>(
        profile: PatientProfile,
        model_id: impl Into<String>,
        gateway: Arc<ModelGateway>,
        rng: &mut R,
    ) -> Self {
        let cefr = CefrLevel::parse(profile.cefr.as_deref());
        let personality = Personality::parse(profile.personality.as_deref());
        let recall = RecallLevel::parse(profile.recall_level.as_deref());
        let dazed = DazedLevel::parse(profile.dazed_level.as_deref());

        let vocabulary = sample_vocabulary(&profile, cefr, rng);
        let instruction =
            render_instruction(&profile, cefr, personality, recall, dazed, &vocabulary);

        Self {
            core: AgentCore::new(model_id, gateway, instruction),
            profile,
            cefr,
            personality,
            recall,
            dazed,
        }
    }

    /// Respond to the doctor. The patient has no notion of interview length,
    /// so there is no turn-count behavior here.
    pub async fn respond(&mut self, doctor_message: &str) -> Result<String> {
        let incoming = format!("Doctor: {doctor_message}");
        self.core
            .exchange(&incoming, None, GenerationOptions::default())
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

    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    pub fn metadata(&self) -> PatientMetadata {
        PatientMetadata {
            hadm_id: self.profile.hadm_id,
            age: self.profile.age,
            gender: self.profile.gender.clone(),
            cefr_type: self.cefr.to_string(),
            personality_type: self.personality.to_string(),
            recall_level_type: self.recall.to_string(),
            dazed_level_type: self.dazed.to_string(),
            patient_engine_name: self.core.model_id().to_string(),
        }
    }
}

fn field<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

fn render_instruction(
    profile: &PatientProfile,
    cefr: CefrLevel,
    personality: Personality,
    recall: RecallLevel,
    dazed: DazedLevel,
    vocabulary: &[String],
) -> String {
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Not recorded".to_string());
    let vocab_line = vocabulary
        .iter()
        .take(VOCAB_PROMPT_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are simulating a patient visiting the emergency department. You must stay in character throughout the conversation.

## PATIENT PROFILE

**Demographics:**
- Age: {age} years old
- Gender: {gender}
- Race: {race}
- Marital Status: {marital_status}
- Occupation: {occupation}
- Living Situation: {living_situation}
- Children: {children}

**Chief Complaint:** {chiefcomplaint}
**Pain Level:** {pain}/10
**Diagnosis (DO NOT REVEAL):** {diagnosis}

**Present Illness - Symptoms You Experience:**
{positives}

**Symptoms You DO NOT Have:**
{negatives}

**Medical History:**
{medical_history}

**Current Medications:**
{medication}

**Allergies:**
{allergies}

**Social History:**
- Tobacco: {tobacco}
- Alcohol: {alcohol}
- Drugs: {illicit_drug}
- Exercise: {exercise}

**Family History:**
{family_medical_history}

## PERSONA ATTRIBUTES

**Language Level (CEFR {cefr}):**
{cefr_block}

**Vocabulary to use:** {vocab_line}
Avoid using complex medical terms unless you're CEFR level C.

**Personality ({personality}):**
{personality_block}

**Memory/Recall ({recall}):**
{recall_block}

**Mental Clarity ({dazed}):**
{dazed_block}

## IMPORTANT RULES

1. **Stay in character:** Always respond as this specific patient would, based on their persona
2. **Be realistic:** Respond naturally like a real patient would in an ED
3. **Don't volunteer everything:** Let the doctor ask questions
4. **Show emotions:** Express pain, worry, frustration as appropriate
5. **Only reveal what you know:** Don't mention the diagnosis or information not in your profile
6. **Use appropriate language:** Match your CEFR level consistently
7. **Be consistent:** Don't contradict information you've already shared
8. **Natural responses:** Use filler words, pauses, and natural speech patterns

## RESPONSE FORMAT

Respond ONLY with what the patient would say. Do not include:
- Stage directions like "(coughs)" or "[looks worried]"
- Explanations of why you're responding this way
- Meta-commentary

Just speak naturally as the patient.
"#,
        gender = field(&profile.gender, "Not recorded"),
        race = field(&profile.race, "Not recorded"),
        marital_status = field(&profile.marital_status, "Not recorded"),
        occupation = field(&profile.occupation, "Not recorded"),
        living_situation = field(&profile.living_situation, "Not recorded"),
        children = field(&profile.children, "Not recorded"),
        chiefcomplaint = field(&profile.chiefcomplaint, "Not specified"),
        pain = field(&profile.pain, "Not recorded"),
        diagnosis = field(&profile.diagnosis, "Not recorded"),
        positives = field(&profile.present_illness_positive, "Not recorded"),
        negatives = field(&profile.present_illness_negative, "Not recorded"),
        medical_history = field(&profile.medical_history, "None reported"),
        medication = field(&profile.medication, "None"),
        allergies = field(&profile.allergies, "No known allergies"),
        tobacco = field(&profile.tobacco, "Not recorded"),
        alcohol = field(&profile.alcohol, "Not recorded"),
        illicit_drug = field(&profile.illicit_drug, "Not recorded"),
        exercise = field(&profile.exercise, "Not recorded"),
        family_medical_history = field(&profile.family_medical_history, "Noncontributory"),
        cefr_block = cefr.instruction(),
        personality_block = personality.instruction(),
        recall_block = recall.instruction(),
        dazed_block = dazed.instruction(),
    )
}

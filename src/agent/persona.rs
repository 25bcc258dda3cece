//! Persona axes and vocabulary selection for the patient agent.
//!
//! Each axis maps to a fixed instructional text block. Parsing is lenient:
//! an unrecognized value falls back to the axis default instead of failing,
//! so a malformed profile still produces a usable persona.

use rand::seq::IndexedRandom;
use rand::Rng;
use strum::{Display, EnumString};

use crate::types::PatientProfile;

/// Upper bound on the number of vocabulary items sampled into the prompt.
pub const VOCAB_SAMPLE_CAP: usize = 30;

/// Language proficiency register (CEFR band). Defaults to the intermediate
/// band when the profile value is missing or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum CefrLevel {
    #[strum(serialize = "A")]
    A,
    #[default]
    #[strum(serialize = "B")]
    B,
    #[strum(serialize = "C")]
    C,
}

impl CefrLevel {
    pub fn parse(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::A => {
                "Use very simple English. Use short sentences (5-10 words). \
                 Use only basic vocabulary. Avoid complex grammar. \
                 Speak like a beginner English learner."
            }
            Self::B => {
                "Use everyday English. Use moderate sentence length (10-15 words). \
                 Use common vocabulary. Avoid very complex words. \
                 Speak like an intermediate English speaker."
            }
            Self::C => {
                "Use fluent English. Use varied sentence structures. \
                 Use sophisticated vocabulary when appropriate. \
                 Speak like an advanced English speaker."
            }
        }
    }

    /// Vocabulary tier keys for this band. Each band is a strict superset of
    /// the one below it.
    pub fn vocab_keys(self) -> &'static [&'static str] {
        match self {
            Self::A => &["med_A", "cefr_A1", "cefr_A2"],
            Self::B => &[
                "med_A", "med_B", "cefr_A1", "cefr_A2", "cefr_B1", "cefr_B2",
            ],
            Self::C => &[
                "med_A", "med_B", "med_C", "cefr_A1", "cefr_A2", "cefr_B1", "cefr_B2", "cefr_C1",
                "cefr_C2",
            ],
        }
    }
}

/// Interpersonal trust disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Personality {
    #[default]
    Plain,
    Distrust,
}

impl Personality {
    pub fn parse(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Plain => {
                "Be cooperative and straightforward. Answer questions directly \
                 and honestly. Trust the doctor."
            }
            Self::Distrust => {
                "Be somewhat guarded and suspicious. Question the doctor's \
                 recommendations. Show reluctance to share information \
                 immediately. Express doubts about treatments."
            }
        }
    }
}

/// Memory-recall fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RecallLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RecallLevel {
    pub fn parse(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Low => {
                "You have difficulty remembering details. Often say 'I don't \
                 remember' or 'I'm not sure' when asked about specifics. \
                 Provide vague timeframes."
            }
            Self::Medium => {
                "You remember most important details but may forget minor \
                 specifics. Occasionally need prompting to recall information."
            }
            Self::High => {
                "You remember details clearly. Provide specific dates, times, \
                 and descriptions when asked."
            }
        }
    }
}

/// Mental-clarity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DazedLevel {
    #[default]
    Normal,
    Confused,
}

impl DazedLevel {
    pub fn parse(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Normal => "You are clear-headed and can follow the conversation well.",
            Self::Confused => {
                "You are somewhat confused or disoriented. Occasionally lose \
                 track of the conversation. Ask the doctor to repeat questions. \
                 Mix up some details."
            }
        }
    }
}

/// Assemble the candidate vocabulary for a proficiency band and draw a
/// bounded random sample without replacement.
///
/// Production callers pass an unseeded RNG, so the sample varies across runs
/// by design; tests pass a seeded one for reproducibility.
pub fn sample_vocabulary<R: Rng + ?Sized>(
    profile: &PatientProfile,
    level: CefrLevel,
    rng: &mut R,
) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for key in level.vocab_keys() {
        if let Some(list) = profile.vocab_list(key) {
            candidates.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(String::from),
            );
        }
    }

    let amount = candidates.len().min(VOCAB_SAMPLE_CAP);
    candidates
        .choose_multiple(rng, amount)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile_with_vocab() -> PatientProfile {
        serde_json::from_str(
            r#"{
                "med_A": "pain, fever, cough",
                "med_B": "dizzy, swelling",
                "med_C": "palpitations",
                "cefr_A1": "head, arm",
                "cefr_B1": "appointment",
                "cefr_C1": "deteriorate"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn unknown_axis_values_fall_back_to_defaults() {
        assert_eq!(CefrLevel::parse(Some("Z")), CefrLevel::B);
        assert_eq!(Personality::parse(Some("hostile")), Personality::Plain);
        assert_eq!(RecallLevel::parse(Some("")), RecallLevel::Medium);
        assert_eq!(DazedLevel::parse(None), DazedLevel::Normal);
    }

    #[test]
    fn known_axis_values_parse() {
        assert_eq!(CefrLevel::parse(Some("A")), CefrLevel::A);
        assert_eq!(Personality::parse(Some("distrust")), Personality::Distrust);
        assert_eq!(RecallLevel::parse(Some("high")), RecallLevel::High);
        assert_eq!(DazedLevel::parse(Some("confused")), DazedLevel::Confused);
    }

    #[test]
    fn vocab_key_chains_are_strict_supersets() {
        let a = CefrLevel::A.vocab_keys();
        let b = CefrLevel::B.vocab_keys();
        let c = CefrLevel::C.vocab_keys();

        assert!(a.iter().all(|k| b.contains(k)));
        assert!(b.iter().all(|k| c.contains(k)));
        assert!(a.len() < b.len() && b.len() < c.len());
    }

    #[test]
    fn sample_is_bounded_and_drawn_from_tier_lists() {
        let profile = profile_with_vocab();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_vocabulary(&profile, CefrLevel::C, &mut rng);
        assert!(sample.len() <= VOCAB_SAMPLE_CAP);

        let source: Vec<&str> = CefrLevel::C
            .vocab_keys()
            .iter()
            .filter_map(|k| profile.vocab_list(k))
            .flat_map(|l| l.split(',').map(str::trim))
            .collect();
        for word in &sample {
            assert!(source.contains(&word.as_str()), "{word} not in source");
        }
    }

    #[test]
    fn basic_band_never_samples_advanced_words() {
        let profile = profile_with_vocab();
        let mut rng = StdRng::seed_from_u64(11);

        let sample = sample_vocabulary(&profile, CefrLevel::A, &mut rng);
        assert!(!sample.iter().any(|w| w == "palpitations"));
        assert!(!sample.iter().any(|w| w == "deteriorate"));
    }

    #[test]
    fn sample_caps_at_thirty_items() {
        let words: Vec<String> = (0..50).map(|i| format!("word{i}")).collect();
        let profile: PatientProfile = serde_json::from_str(&format!(
            r#"{{"med_A": "{}"}}"#,
            words.join(", ")
        ))
        .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let sample = sample_vocabulary(&profile, CefrLevel::A, &mut rng);
        assert_eq!(sample.len(), VOCAB_SAMPLE_CAP);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let profile = profile_with_vocab();
        let first = sample_vocabulary(&profile, CefrLevel::B, &mut StdRng::seed_from_u64(3));
        let second = sample_vocabulary(&profile, CefrLevel::B, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}

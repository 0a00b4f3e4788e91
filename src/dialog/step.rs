//! Step definitions — the fixed six-step entry sequence.
//!
//! Progresses linearly: ChoosingEmotion → Intensity → TriggerEvent →
//! Motivation → CommunicationOthers → SelfCommunication → commit.
//! `next()` returns `None` only at the commit boundary; `previous()`
//! returns `None` only at the abandon boundary.

use crate::catalogue;
use crate::dialog::prompts;

/// The stages of the entry conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChoosingEmotion,
    Intensity,
    TriggerEvent,
    Motivation,
    CommunicationOthers,
    SelfCommunication,
}

/// A parsed, validated input for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValue {
    Emotion(String),
    Intensity(u8),
    Text(String),
}

/// The raw input failed the current step's grammar.
///
/// Not an `Error` — the engine recovers locally by re-prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidInput;

impl Step {
    /// The step a fresh session starts at.
    pub const FIRST: Step = Step::ChoosingEmotion;

    /// Successor step, or `None` when the next transition is the commit.
    pub fn next(&self) -> Option<Step> {
        use Step::*;
        match self {
            ChoosingEmotion => Some(Intensity),
            Intensity => Some(TriggerEvent),
            TriggerEvent => Some(Motivation),
            Motivation => Some(CommunicationOthers),
            CommunicationOthers => Some(SelfCommunication),
            SelfCommunication => None,
        }
    }

    /// Predecessor step, or `None` when going back abandons the session.
    pub fn previous(&self) -> Option<Step> {
        use Step::*;
        match self {
            ChoosingEmotion => None,
            Intensity => Some(ChoosingEmotion),
            TriggerEvent => Some(Intensity),
            Motivation => Some(TriggerEvent),
            CommunicationOthers => Some(Motivation),
            SelfCommunication => Some(CommunicationOthers),
        }
    }

    /// Whether this step takes free text (and therefore accepts the skip
    /// sentinel).
    pub fn is_free_text(&self) -> bool {
        use Step::*;
        matches!(
            self,
            TriggerEvent | Motivation | CommunicationOthers | SelfCommunication
        )
    }

    /// Validate and parse a raw input against this step's grammar.
    ///
    /// The "back" literal is not handled here — the engine recognizes it
    /// before parsing, at every step.
    pub fn parse(&self, input: &str) -> Result<StepValue, InvalidInput> {
        use Step::*;
        match self {
            ChoosingEmotion => {
                if catalogue::is_known_label(input) {
                    Ok(StepValue::Emotion(input.to_string()))
                } else {
                    Err(InvalidInput)
                }
            }
            Intensity => {
                let n: i64 = input.trim().parse().map_err(|_| InvalidInput)?;
                if (0..=100).contains(&n) {
                    Ok(StepValue::Intensity(n as u8))
                } else {
                    Err(InvalidInput)
                }
            }
            TriggerEvent | Motivation | CommunicationOthers | SelfCommunication => {
                if input == prompts::SKIP {
                    Ok(StepValue::Text(String::new()))
                } else {
                    Ok(StepValue::Text(input.to_string()))
                }
            }
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ChoosingEmotion => "choosing_emotion",
            Self::Intensity => "intensity",
            Self::TriggerEvent => "trigger_event",
            Self::Motivation => "motivation",
            Self::CommunicationOthers => "communication_others",
            Self::SelfCommunication => "self_communication",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Step; 6] = [
        Step::ChoosingEmotion,
        Step::Intensity,
        Step::TriggerEvent,
        Step::Motivation,
        Step::CommunicationOthers,
        Step::SelfCommunication,
    ];

    #[test]
    fn next_walks_all_steps_to_commit() {
        let mut current = Step::FIRST;
        for expected in &ALL[1..] {
            let next = current.next().unwrap();
            assert_eq!(next, *expected);
            current = next;
        }
        // SelfCommunication's successor is the commit.
        assert!(current.next().is_none());
    }

    #[test]
    fn previous_walks_all_steps_to_abandon() {
        let mut current = Step::SelfCommunication;
        for expected in ALL[..5].iter().rev() {
            let prev = current.previous().unwrap();
            assert_eq!(prev, *expected);
            current = prev;
        }
        // ChoosingEmotion's predecessor is the abandon.
        assert!(current.previous().is_none());
    }

    #[test]
    fn next_and_previous_are_inverse() {
        for step in ALL {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step));
            }
            if let Some(prev) = step.previous() {
                assert_eq!(prev.next(), Some(step));
            }
        }
    }

    #[test]
    fn emotion_step_requires_exact_catalogue_label() {
        let step = Step::ChoosingEmotion;
        assert_eq!(
            step.parse("😡 Гнів"),
            Ok(StepValue::Emotion("😡 Гнів".to_string()))
        );
        assert_eq!(step.parse("Гнів"), Err(InvalidInput));
        assert_eq!(step.parse("гнів"), Err(InvalidInput));
        assert_eq!(step.parse(""), Err(InvalidInput));
        // Skip is not legal at the emotion step.
        assert_eq!(step.parse(prompts::SKIP), Err(InvalidInput));
    }

    #[test]
    fn intensity_step_accepts_integers_in_range() {
        let step = Step::Intensity;
        assert_eq!(step.parse("0"), Ok(StepValue::Intensity(0)));
        assert_eq!(step.parse("57"), Ok(StepValue::Intensity(57)));
        assert_eq!(step.parse("100"), Ok(StepValue::Intensity(100)));
        // The keyboard only offers multiples of ten, but the parser takes
        // any in-range integer.
        assert_eq!(step.parse("33"), Ok(StepValue::Intensity(33)));
    }

    #[test]
    fn intensity_step_rejects_out_of_range_and_garbage() {
        let step = Step::Intensity;
        assert_eq!(step.parse("-1"), Err(InvalidInput));
        assert_eq!(step.parse("101"), Err(InvalidInput));
        assert_eq!(step.parse("abc"), Err(InvalidInput));
        assert_eq!(step.parse(""), Err(InvalidInput));
        assert_eq!(step.parse("1e2"), Err(InvalidInput));
        assert_eq!(step.parse(prompts::SKIP), Err(InvalidInput));
    }

    #[test]
    fn free_text_steps_never_reject() {
        for step in ALL.iter().filter(|s| s.is_free_text()) {
            assert_eq!(
                step.parse("будь-який текст"),
                Ok(StepValue::Text("будь-який текст".to_string()))
            );
            assert_eq!(
                step.parse(prompts::SKIP),
                Ok(StepValue::Text(String::new())),
                "skip maps to the empty string at {step}"
            );
        }
    }

    #[test]
    fn only_the_four_context_steps_are_free_text() {
        assert!(!Step::ChoosingEmotion.is_free_text());
        assert!(!Step::Intensity.is_free_text());
        assert_eq!(ALL.iter().filter(|s| s.is_free_text()).count(), 4);
    }
}

//! The fixed emotion catalogue — ten labels from the DBT emotion-regulation
//! worksheet, each with its synonym tags.
//!
//! Synonyms are descriptive metadata only; step validation matches the
//! exact label.

/// One catalogue entry: the display label (with emoji) and its synonyms.
pub struct Emotion {
    pub label: &'static str,
    pub synonyms: &'static [&'static str],
}

/// The ten recognized emotions, in keyboard order.
pub const EMOTIONS: &[Emotion] = &[
    Emotion {
        label: "😡 Гнів",
        synonyms: &["гнів", "роздратування", "лють", "обурення"],
    },
    Emotion {
        label: "🤢 Огида",
        synonyms: &["огида", "відраза", "нехіть"],
    },
    Emotion {
        label: "😒 Заздрість",
        synonyms: &["заздрість", "ревнощі до чужого"],
    },
    Emotion {
        label: "😨 Страх",
        synonyms: &["страх", "тривога", "паніка", "переляк"],
    },
    Emotion {
        label: "😊 Щастя",
        synonyms: &["щастя", "радість", "задоволення"],
    },
    Emotion {
        label: "👀 Ревнощі",
        synonyms: &["ревнощі", "підозрілість"],
    },
    Emotion {
        label: "❤️ Любов",
        synonyms: &["любов", "прихильність", "ніжність"],
    },
    Emotion {
        label: "😢 Смуток",
        synonyms: &["смуток", "горе", "туга"],
    },
    Emotion {
        label: "😳 Сором",
        synonyms: &["сором", "ніяковість", "збентеження"],
    },
    Emotion {
        label: "😔 Провина",
        synonyms: &["провина", "каяття", "жаль"],
    },
];

/// Whether `input` is exactly one of the catalogue labels.
pub fn is_known_label(input: &str) -> bool {
    EMOTIONS.iter().any(|e| e.label == input)
}

/// All labels, in keyboard order.
pub fn labels() -> impl Iterator<Item = &'static str> {
    EMOTIONS.iter().map(|e| e.label)
}

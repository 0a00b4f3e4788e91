//! User-facing texts and per-step keyboard vocabulary (Ukrainian UI).

use chrono::{DateTime, Local};

use crate::channels::Keyboard;
use crate::dialog::step::Step;

// ── Command literals ────────────────────────────────────────────────

/// Main-menu button that begins a new entry.
pub const ADD_ENTRY: &str = "📝 Додати емоцію";
/// Main-menu button that shows per-user statistics.
pub const SHOW_STATS: &str = "📊 Моя статистика";
/// Main-menu button that exports history as CSV.
pub const EXPORT_DATA: &str = "📤 Експортувати дані";
/// Main-menu help button.
pub const HELP: &str = "ℹ️ Довідка";
/// Recognized at every step; always navigates backward.
pub const BACK: &str = "🔙 Назад";
/// Recognized at the four free-text steps; records an empty field.
pub const SKIP: &str = "⏭ Пропустити";

// ── Step prompts ────────────────────────────────────────────────────

/// The prompt text for a step.
pub fn prompt(step: Step) -> &'static str {
    match step {
        Step::ChoosingEmotion => "Яку емоцію ти відчуваєш зараз або відчував(ла) нещодавно?",
        Step::Intensity => {
            "Яка інтенсивність цієї емоції?\n(0 = зовсім слабка, 100 = максимальна)"
        }
        Step::TriggerEvent => {
            "Що сталося? Опиши ситуацію, яка викликала цю емоцію\n\n(Або натисни 'Пропустити')"
        }
        Step::Motivation => {
            "Яку дію ця емоція мотивувала тебе зробити?\nЩо хотілося зробити?\n\n(Або натисни 'Пропустити')"
        }
        Step::CommunicationOthers => {
            "Як ця емоція вплинула на інших?\nЩо бачили або чули інші люди?\n\n(Або натисни 'Пропустити')"
        }
        Step::SelfCommunication => {
            "Що сказала тобі ця емоція?\nЯкі думки виникли?\n\n(Або натисни 'Пропустити')"
        }
    }
}

/// Validation-failure message for a step. Free-text steps never fail
/// validation, but a message exists for completeness.
pub fn invalid_input(step: Step) -> &'static str {
    match step {
        Step::ChoosingEmotion => "Будь ласка, обери емоцію з клавіатури",
        Step::Intensity => "Будь ласка, введи число від 0 до 100",
        _ => "Будь ласка, введи текст або натисни 'Пропустити'",
    }
}

/// The legal-input keyboard for a step.
pub fn keyboard(step: Step) -> Keyboard {
    match step {
        Step::ChoosingEmotion => Keyboard::Emotions,
        Step::Intensity => Keyboard::Intensity,
        _ => Keyboard::Skip,
    }
}

// ── Menu and status texts ───────────────────────────────────────────

pub const MAIN_MENU: &str = "Головне меню";

pub const UNKNOWN_COMMAND: &str = "Не розумію 🤔 Обери дію з клавіатури";

pub const NO_RECORDS: &str = "У тебе ще немає записів. Додай першу емоцію!";

pub const NO_EXPORT_DATA: &str = "Немає даних для експорту";

pub const STORAGE_FAILURE: &str =
    "⚠️ Не вдалося зберегти запис. Спробуй надіслати ще раз";

pub const GENERIC_FAILURE: &str = "⚠️ Сталася помилка. Спробуй ще раз";

pub const EXPORT_CAPTION: &str = "📊 Твої емоційні записи";

pub fn greeting(first_name: &str) -> String {
    format!(
        "Привіт, {first_name}! 👋\n\n\
         Я допоможу тобі відстежувати свої емоції.\n\n\
         Регулярна фіксація емоцій допомагає:\n\
         • Краще розуміти себе\n\
         • Виявляти патерни та тригери\n\
         • Розвивати емоційний інтелект\n\n\
         Натисни '📝 Додати емоцію', щоб почати!"
    )
}

pub fn help_text() -> &'static str {
    "📚 Як користуватися ботом:\n\n\
     1️⃣ Натисни '📝 Додати емоцію'\n\
     2️⃣ Обери емоцію зі списку\n\
     3️⃣ Вкажи інтенсивність (0-100)\n\
     4️⃣ Опиши ситуацію (можна пропустити)\n\
     5️⃣ Додай деталі про мотивацію та реакції\n\n\
     📊 Статистика - дивися свої записи\n\
     📤 Експорт - завантажуй дані в CSV\n\n\
     Базується на методиці DBT (Діалектична Поведінкова Терапія)"
}

/// Commit confirmation, summarizing emotion, intensity and time.
pub fn confirmation(emotion: &str, intensity: u8, at: DateTime<Local>) -> String {
    format!(
        "✅ Запис збережено!\n\n\
         Емоція: {emotion}\n\
         Інтенсивність: {intensity}/100\n\
         Час: {}",
        at.format("%d.%m.%Y %H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_has_a_prompt() {
        let steps = [
            Step::ChoosingEmotion,
            Step::Intensity,
            Step::TriggerEvent,
            Step::Motivation,
            Step::CommunicationOthers,
            Step::SelfCommunication,
        ];
        for step in steps {
            assert!(!prompt(step).is_empty());
            assert!(!invalid_input(step).is_empty());
        }
    }

    #[test]
    fn keyboards_match_step_vocabulary() {
        assert_eq!(keyboard(Step::ChoosingEmotion), Keyboard::Emotions);
        assert_eq!(keyboard(Step::Intensity), Keyboard::Intensity);
        for step in [
            Step::TriggerEvent,
            Step::Motivation,
            Step::CommunicationOthers,
            Step::SelfCommunication,
        ] {
            assert_eq!(keyboard(step), Keyboard::Skip);
        }
    }

    #[test]
    fn confirmation_contains_the_summary() {
        let at = Local::now();
        let text = confirmation("😡 Гнів", 70, at);
        assert!(text.contains("😡 Гнів"));
        assert!(text.contains("70/100"));
        assert!(text.contains(&at.format("%d.%m.%Y %H:%M").to_string()));
    }
}

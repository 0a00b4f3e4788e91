//! CSV export — builds the whole file in an in-memory buffer.
//!
//! UTF-8 with a leading BOM and CRLF row endings for spreadsheet
//! compatibility. The buffer is handed to the channel as attachment
//! bytes; no temporary file ever exists on disk.

use crate::store::EmotionEntry;

/// Localized header row, column order matches the export layout.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Дата та час",
    "Емоція",
    "Інтенсивність",
    "Тригерна подія",
    "Мотивація",
    "Вплив на інших",
    "Що сказала емоція",
];

/// Suggested attachment file name for a user's export.
pub fn export_file_name(user_id: &str) -> String {
    format!("emotions_{user_id}.csv")
}

/// Serialize entries (already ordered newest-first by the store query)
/// into CSV bytes. Internal columns (id, user_id, username) are not
/// exported.
pub fn to_csv(entries: &[EmotionEntry]) -> Vec<u8> {
    let mut out = String::from("\u{feff}");

    write_row(&mut out, EXPORT_HEADERS.iter().copied());
    for entry in entries {
        let intensity = entry.intensity.to_string();
        write_row(
            &mut out,
            [
                entry.timestamp.as_str(),
                entry.emotion.as_str(),
                intensity.as_str(),
                entry.trigger_event.as_str(),
                entry.motivation.as_str(),
                entry.communication_others.as_str(),
                entry.self_communication.as_str(),
            ],
        );
    }

    out.into_bytes()
}

fn write_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(field));
    }
    out.push_str("\r\n");
}

/// RFC 4180 quoting: quote fields containing the delimiter, quotes or
/// line breaks, doubling embedded quotes.
fn escape(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains(['"', ',', '\n', '\r']) {
        std::borrow::Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        std::borrow::Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: &str, emotion: &str, intensity: u8, trigger: &str) -> EmotionEntry {
        EmotionEntry {
            id: 1,
            user_id: "u1".to_string(),
            username: "alice".to_string(),
            emotion: emotion.to_string(),
            intensity,
            trigger_event: trigger.to_string(),
            motivation: String::new(),
            communication_others: String::new(),
            self_communication: String::new(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn starts_with_bom() {
        let bytes = to_csv(&[]);
        assert_eq!(&bytes[..3], b"\xEF\xBB\xBF");
    }

    #[test]
    fn header_row_is_localized() {
        let bytes = to_csv(&[]);
        let text = String::from_utf8(bytes).unwrap();
        let header = text.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(
            header,
            "Дата та час,Емоція,Інтенсивність,Тригерна подія,Мотивація,Вплив на інших,Що сказала емоція"
        );
    }

    #[test]
    fn one_row_per_entry_with_crlf() {
        let entries = vec![
            entry("2024-01-02 10:00:00", "😡 Гнів", 70, "сварка"),
            entry("2024-01-01 09:00:00", "😊 Щастя", 40, ""),
        ];
        let text = String::from_utf8(to_csv(&entries)).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
        assert!(text.contains("2024-01-02 10:00:00,😡 Гнів,70,сварка,,,\r\n"));
        assert!(text.contains("2024-01-01 09:00:00,😊 Щастя,40,,,,\r\n"));
    }

    #[test]
    fn skipped_fields_export_as_empty_strings() {
        let text = String::from_utf8(to_csv(&[entry("t", "😢 Смуток", 5, "")])).unwrap();
        assert!(text.contains("t,😢 Смуток,5,,,,\r\n"));
    }

    #[test]
    fn quotes_fields_with_delimiters_and_newlines() {
        let mut e = entry("t", "😨 Страх", 30, "запізнився, на поїзд");
        e.motivation = "сказав \"досить\"".to_string();
        e.self_communication = "рядок1\nрядок2".to_string();
        let text = String::from_utf8(to_csv(&[e])).unwrap();
        assert!(text.contains("\"запізнився, на поїзд\""));
        assert!(text.contains("\"сказав \"\"досить\"\"\""));
        assert!(text.contains("\"рядок1\nрядок2\""));
    }

    #[test]
    fn file_name_embeds_user_id() {
        assert_eq!(export_file_name("12345"), "emotions_12345.csv");
    }
}

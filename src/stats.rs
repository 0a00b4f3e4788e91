//! Statistics formatter — turns aggregate query results into the reply text.

use crate::store::EmotionStat;

/// Render the per-user statistics block.
///
/// Caller handles the zero-entries case (`NO_RECORDS`) before calling.
pub fn format_stats(stats: &[EmotionStat], total: i64) -> String {
    let mut text = String::from("📊 Твоя статистика емоцій:\n\n");
    for stat in stats {
        text.push_str(&format!(
            "{}\n  Записів: {}\n  Середня інтенсивність: {:.1}/100\n  Остання: {}\n\n",
            stat.emotion, stat.count, stat.mean_intensity, stat.last_timestamp
        ));
    }
    text.push_str(&format!("\n📝 Всього записів: {total}"));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(emotion: &str, count: i64, mean: f64, last: &str) -> EmotionStat {
        EmotionStat {
            emotion: emotion.to_string(),
            count,
            mean_intensity: mean,
            last_timestamp: last.to_string(),
        }
    }

    #[test]
    fn formats_each_emotion_block() {
        let stats = vec![
            stat("😡 Гнів", 2, 60.0, "2024-01-02 10:00:00"),
            stat("😨 Страх", 1, 30.0, "2024-01-01 12:00:00"),
        ];
        let text = format_stats(&stats, 3);

        assert!(text.starts_with("📊 Твоя статистика емоцій:"));
        assert!(text.contains("😡 Гнів\n  Записів: 2\n  Середня інтенсивність: 60.0/100"));
        assert!(text.contains("Остання: 2024-01-02 10:00:00"));
        assert!(text.contains("😨 Страх\n  Записів: 1\n  Середня інтенсивність: 30.0/100"));
        assert!(text.ends_with("📝 Всього записів: 3"));
    }

    #[test]
    fn mean_intensity_is_one_decimal() {
        let text = format_stats(&[stat("😊 Щастя", 3, 33.333_333, "x")], 3);
        assert!(text.contains("33.3/100"));
    }

    #[test]
    fn preserves_query_order() {
        let stats = vec![
            stat("❤️ Любов", 5, 90.0, "t1"),
            stat("😳 Сором", 2, 10.0, "t2"),
        ];
        let text = format_stats(&stats, 7);
        let love = text.find("❤️ Любов").unwrap();
        let shame = text.find("😳 Сором").unwrap();
        assert!(love < shame);
    }
}

use serde::Serialize;

use crate::calendar::DateKey;
use crate::models::category::Locale;
use crate::models::daily_log::DailyLog;

const SCORE_COLORS: [&str; 5] = ["#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#2563eb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Mood,
    SleepQuality,
    EnergyLevel,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Mood, Metric::SleepQuality, Metric::EnergyLevel];

    fn score(self, log: &DailyLog) -> i32 {
        match self {
            Metric::Mood => log.mood,
            Metric::SleepQuality => log.sleep_quality,
            Metric::EnergyLevel => log.energy_level,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Metric::Mood, Locale::Zh) => "心情",
            (Metric::Mood, Locale::En) => "Mood",
            (Metric::SleepQuality, Locale::Zh) => "睡眠质量",
            (Metric::SleepQuality, Locale::En) => "Sleep Quality",
            (Metric::EnergyLevel, Locale::Zh) => "精力",
            (Metric::EnergyLevel, Locale::En) => "Energy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricPoint {
    pub logical_date: DateKey,
    pub mood: i32,
    pub sleep_quality: i32,
    pub energy_level: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBucket {
    pub score: i32,
    pub label: String,
    pub color: &'static str,
    pub count: usize,
    /// Share of all logs, 0.0 - 1.0.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub metric: Metric,
    pub label: &'static str,
    pub total: usize,
    pub buckets: Vec<ScoreBucket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trends {
    pub series: Vec<MetricPoint>,
    pub distributions: Vec<Distribution>,
}

/// Logs must already be ascending by key; the series keeps their order.
pub fn summarize(logs: &[DailyLog], locale: Locale) -> Trends {
    let series = logs
        .iter()
        .map(|log| MetricPoint {
            logical_date: log.logical_date.clone(),
            mood: log.mood,
            sleep_quality: log.sleep_quality,
            energy_level: log.energy_level,
        })
        .collect();

    let distributions = Metric::ALL
        .iter()
        .map(|&metric| distribution(metric, logs, locale))
        .collect();

    Trends {
        series,
        distributions,
    }
}

fn distribution(metric: Metric, logs: &[DailyLog], locale: Locale) -> Distribution {
    let mut counts = [0usize; 5];
    for log in logs {
        let score = metric.score(log);
        if (1..=5).contains(&score) {
            counts[(score - 1) as usize] += 1;
        }
    }
    let total = logs.len();
    let divisor = total.max(1) as f64;

    let buckets = counts
        .iter()
        .zip(SCORE_COLORS)
        .enumerate()
        .map(|(i, (&count, color))| {
            let score = i as i32 + 1;
            ScoreBucket {
                score,
                label: match locale {
                    Locale::Zh => format!("{score} 分"),
                    Locale::En => format!("Score {score}"),
                },
                color,
                count,
                percentage: count as f64 / divisor,
            }
        })
        .collect();

    Distribution {
        metric,
        label: metric.label(locale),
        total,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn log(raw: &str, mood: i32, sleep: i32, energy: i32) -> DailyLog {
        let now = Utc::now();
        DailyLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            logical_date: DateKey::parse(raw).unwrap(),
            mood,
            sleep_quality: sleep,
            energy_level: energy,
            primary_activities: vec![],
            mental_world_activities: vec![],
            daily_life_activities: vec![],
            notes: None,
            news_entries: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_distribution_counts() {
        let logs = [
            log("2024-06-01", 5, 3, 1),
            log("2024-06-02", 5, 2, 1),
            log("2024-06-03", 1, 3, 4),
            log("2024-06-04", 3, 3, 4),
        ];
        let trends = summarize(&logs, Locale::En);
        assert_eq!(trends.series.len(), 4);

        let mood = &trends.distributions[0];
        assert_eq!(mood.metric, Metric::Mood);
        let counts: Vec<usize> = mood.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0, 2]);
        assert!((mood.buckets[4].percentage - 0.5).abs() < 1e-9);
        assert_eq!(mood.buckets[4].label, "Score 5");
        assert_eq!(mood.total, 4);
    }

    #[test]
    fn test_empty_logs() {
        let trends = summarize(&[], Locale::Zh);
        assert!(trends.series.is_empty());
        for d in &trends.distributions {
            assert_eq!(d.total, 0);
            assert!(d.buckets.iter().all(|b| b.count == 0 && b.percentage == 0.0));
        }
        assert_eq!(trends.distributions[1].label, "睡眠质量");
    }
}

//! Sample month shown to visitors who are not signed in.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{DateKey, MonthWindow};
use crate::models::category::{CategoryDefinition, DAILY_LIFE, MENTAL_WORLD, PRIMARY_ACTIVITIES};
use crate::models::daily_log::{DailyLog, MentalWorldEntry};
use crate::models::news::{NewsArticle, NewsJournalEntry, NewsLanguage};

const NOTE_PREFIXES: [&str; 20] = [
    "清晨阳台晒太阳时",
    "早餐后的空档里",
    "午后咖啡馆里",
    "地铁通勤的路上",
    "傍晚散步途中",
    "夜跑结束后",
    "练瑜伽的间隙",
    "听播客的同时",
    "阅读角落里",
    "整理房间时",
    "做饭的间隙",
    "学习休息时",
    "写日记前",
    "练琴结束后",
    "准备睡觉前",
    "查看待办清单时",
    "给朋友发消息后",
    "望着窗外的雨时",
    "看完纪录片后",
    "给自己泡茶时",
];

const NOTE_OBSERVATIONS: [&str; 20] = [
    "忽然觉得身体轻了一点",
    "冒出一个新的灵感",
    "意识到需要慢下来",
    "决定给自己放个小假",
    "对今天的收获挺满意",
    "感觉情绪比昨天稳定",
    "决定早点关掉手机",
    "突然想去郊外走走",
    "计划周末尝试新菜谱",
    "想把快乐分享给别人",
    "给自己写了张小卡片",
    "把旧书整理得整整齐齐",
    "发现坚持真的有效果",
    "想尝试新的晨间习惯",
    "决定补充一些维生素",
    "想约朋友一起运动",
    "给家人打了个电话",
    "感受到充足的安全感",
    "决定延续这个节奏",
    "在心里默默感谢今天",
];

const NOTE_CLOSERS: [&str; 20] = [
    "，希望明天也延续这样的节奏。",
    "，准备把它写进下一周的计划里。",
    "，于是决定晚上早点休息。",
    "，今晚给自己奖励一份甜品。",
    "，记录下来提醒自己保持耐心。",
    "，准备周末再回顾一次。",
    "，要记得继续关注身体的反馈。",
    "，决定在下一次会议上试试看。",
    "，也许可以写成一篇博客。",
    "，瞬间觉得整个人都被点亮了。",
    "，让今天的努力变得更有意义。",
    "，想把这种心情拍成照片留住。",
    "，准备明天早起继续体验。",
    "，感觉这正是我需要的节奏。",
    "，决定把好状态分享给身边人。",
    "，也提醒自己要保持弹性。",
    "，很想就这样多待一会儿。",
    "，默默对自己说辛苦啦。",
    "，于是给自己安排了一个小惊喜。",
    "，让人对接下来充满期待。",
];

fn mental_details(value: &str) -> &'static [&'static str] {
    match value {
        "MOVIE" => &["沙丘2", "奥本海默", "瞬息全宇宙", "头脑特工队2"],
        "GAME" => &["塞尔达传说", "霍格沃茨之遗", "动物森友会", "暗黑破坏神4", "英雄联盟"],
        "TRAVEL" => &["杭州西湖", "苏州古城", "京都嵯峨野", "故宫博物院"],
        "BOOK" => &["原则", "人类简史", "三体", "小王子"],
        "DRAMA" => &["漫长的季节", "权力的游戏", "请回答1988", "TBBT", "甄嬛传"],
        "MUSIC" => &[
            "Taylor Swift - Lover",
            "陈粒 - 小半",
            "Doja Cat - Kiss Me More",
            "Sabrina Carpenter - Espresso",
            "Lexie Liu - RRR",
        ],
        "STUDY" => &[
            "React 19 新特性",
            "Rust 并发编程",
            "机器学习导论",
            "日语 N3 词汇",
            "Python 基础教程",
        ],
        _ => &[],
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoMonth {
    pub window: MonthWindow,
    pub selected_date: DateKey,
    pub logs: Vec<DailyLog>,
    pub logged_dates: Vec<DateKey>,
    /// The selected day's log, or the last one of the month.
    pub initial_log: Option<DailyLog>,
}

/// Note text is derived from the date alone so a day reads the same on reload.
pub fn demo_note(seed: u32) -> String {
    let seed = seed as usize;
    let prefix = NOTE_PREFIXES[seed % NOTE_PREFIXES.len()];
    let observation = NOTE_OBSERVATIONS[(seed * 3 + 7) % NOTE_OBSERVATIONS.len()];
    let closer = NOTE_CLOSERS[(seed * 5 + 11) % NOTE_CLOSERS.len()];
    let joiner = if prefix.ends_with('时') || prefix.ends_with('后') {
        " "
    } else {
        "，"
    };
    format!("{prefix}{joiner}{observation}{closer}")
}

/// Up to `max` distinct values, in random order.
fn random_subset<R: Rng + ?Sized>(rng: &mut R, values: &[&'static str], max: usize) -> Vec<String> {
    let count = rng.gen_range(0..=max).min(values.len());
    values
        .choose_multiple(rng, count)
        .map(|v| v.to_string())
        .collect()
}

fn values(palette: &[CategoryDefinition]) -> Vec<&'static str> {
    palette.iter().map(|c| c.value).collect()
}

/// Fill every day of the month containing `selected` with random entries.
pub fn generate_month<R: Rng + ?Sized>(
    rng: &mut R,
    selected: &DateKey,
    now: DateTime<Utc>,
) -> DemoMonth {
    let window = MonthWindow::containing(selected);
    let primary = values(PRIMARY_ACTIVITIES);
    let mental = values(MENTAL_WORLD);
    let daily = values(DAILY_LIFE);

    let logs: Vec<DailyLog> = window
        .keys()
        .into_iter()
        .map(|key| {
            let mental_world_activities = random_subset(rng, &mental, 2)
                .into_iter()
                .map(|value| {
                    let detail = mental_details(&value)
                        .choose(rng)
                        .copied()
                        .unwrap_or_default()
                        .to_string();
                    MentalWorldEntry { value, detail }
                })
                .collect();
            let seed = key.as_str().replace('-', "").parse::<u32>().unwrap_or_default();

            DailyLog {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                mood: rng.gen_range(1..=5),
                sleep_quality: rng.gen_range(1..=5),
                energy_level: rng.gen_range(1..=5),
                primary_activities: random_subset(rng, &primary, 2),
                mental_world_activities,
                daily_life_activities: random_subset(rng, &daily, 3),
                notes: Some(demo_note(seed)),
                news_entries: Vec::new(),
                logical_date: key,
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    let logged_dates = logs.iter().map(|l| l.logical_date.clone()).collect();
    let initial_log = logs
        .iter()
        .find(|l| &l.logical_date == selected)
        .or(logs.last())
        .cloned();

    DemoMonth {
        window,
        selected_date: selected.clone(),
        logs,
        logged_dates,
        initial_log,
    }
}

/// Two rated articles for the demo news journal, recorded 15 minutes apart
/// from 08:00 UTC on `day`.
pub fn demo_news_entries(day: &DateKey, now: DateTime<Utc>) -> Vec<NewsJournalEntry> {
    let base = [
        (
            "demo-zh-green-energy",
            "国家推进新能源基础设施建设，释放绿色发展动能",
            "https://news.example.com/cn/green-energy",
            "澎湃新闻",
            NewsLanguage::Zh,
            6,
            4,
            "绿色能源势头很好，希望政策能持续推进。",
        ),
        (
            "demo-en-market",
            "Global markets rally as inflation shows signs of cooling",
            "https://news.example.com/en/markets-rally",
            "Sample Daily",
            NewsLanguage::En,
            12,
            3,
            "市场回暖让人安心，但仍然要谨慎。",
        ),
    ];
    let morning = day
        .logical_date()
        .date()
        .and_hms_opt(8, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);

    base.into_iter()
        .enumerate()
        .map(
            |(i, (id, title, url, source, language, hours_ago, rating, comment))| NewsJournalEntry {
                article: NewsArticle {
                    id: id.to_string(),
                    title: title.to_string(),
                    url: url.to_string(),
                    source: source.to_string(),
                    language,
                    published_at: Some((now - Duration::hours(hours_ago)).to_rfc3339()),
                },
                rating,
                comment: comment.to_string(),
                recorded_at: morning + Duration::minutes(15 * i as i64),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Palette;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    #[test]
    fn test_month_is_fully_populated() {
        let mut rng = StdRng::seed_from_u64(7);
        let demo = generate_month(&mut rng, &key("2024-02-10"), Utc::now());

        assert_eq!(demo.logs.len(), 29);
        assert_eq!(demo.logged_dates.first().unwrap().as_str(), "2024-02-01");
        assert_eq!(demo.logged_dates.last().unwrap().as_str(), "2024-02-29");
        assert_eq!(demo.initial_log.unwrap().logical_date.as_str(), "2024-02-10");

        for log in &demo.logs {
            assert!((1..=5).contains(&log.mood));
            assert!(log.primary_activities.len() <= 2);
            assert!(log.daily_life_activities.len() <= 3);
            assert!(log.mental_world_activities.len() <= 2);
            assert!(log.primary_activities.iter().all(|v| Palette::PrimaryActivity.contains(v)));
            assert!(log.daily_life_activities.iter().all(|v| Palette::DailyLife.contains(v)));
            assert!(log.mental_world_activities.iter().all(|e| !e.detail.is_empty()));
        }
    }

    #[test]
    fn test_same_seed_same_month() {
        let now = Utc::now();
        let a = generate_month(&mut StdRng::seed_from_u64(1), &key("2024-06-01"), now);
        let b = generate_month(&mut StdRng::seed_from_u64(1), &key("2024-06-01"), now);
        let moods = |d: &DemoMonth| d.logs.iter().map(|l| l.mood).collect::<Vec<_>>();
        assert_eq!(moods(&a), moods(&b));
    }

    #[test]
    fn test_note_is_stable() {
        assert_eq!(demo_note(20240601), demo_note(20240601));
        // "清晨阳台晒太阳时" ends with 时 and is joined by a space.
        assert!(demo_note(0).starts_with("清晨阳台晒太阳时 "));
        assert!(demo_note(1).starts_with("早餐后的空档里，"));
    }

    #[test]
    fn test_demo_news_entries() {
        let entries = demo_news_entries(&key("2024-06-01"), Utc::now());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].recorded_at.to_rfc3339(), "2024-06-01T08:00:00+00:00");
        assert_eq!(entries[1].recorded_at.to_rfc3339(), "2024-06-01T08:15:00+00:00");
    }
}

//! Calendar heatmap aggregation.
//!
//! Turns the tags of each logged day into a week-aligned grid (Sunday first)
//! of display-ready cells, plus a legend and month labels. Everything here is
//! pure; handlers load records and pass the result straight to the client.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::Serialize;

use crate::calendar::DateKey;
use crate::models::category::{CategoryDefinition, Locale, Palette};
use crate::models::daily_log::DailyLog;

/// About ten years of rows. Older days fall off the left edge.
pub const MAX_WEEKS: u64 = 522;

const BASE_INTENSITY: f64 = 0.35;
const INTENSITY_STEP: f64 = 0.18;

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One tag on one day, with the free text some palettes carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceTag {
    pub value: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub key: DateKey,
    pub tags: Vec<OccurrenceTag>,
}

pub struct HeatmapInput<'a> {
    pub occurrences: &'a [Occurrence],
    pub catalog: &'a [CategoryDefinition],
    /// Category values to show. Empty shows everything.
    pub filter: &'a [String],
    /// Keys of every logged day, so days without tags still widen the grid.
    pub timeline: &'a [DateKey],
    pub today: &'a DateKey,
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub weeks: Vec<Vec<HeatmapCell>>,
    pub month_labels: Vec<MonthLabel>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    pub key: DateKey,
    pub categories: Vec<CellCategory>,
    pub intensity: f64,
    pub fill: CellFill,
    /// CSS `background` value for `fill`.
    pub background: String,
    /// `label` or `label: detail`, one per displayed category.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellCategory {
    pub value: String,
    pub label: &'static str,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellFill {
    Empty,
    Solid { color: &'static str },
    Radial { slices: Vec<Slice> },
}

/// A slice of a radial fill, in percent of the full turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub color: &'static str,
    pub start: f64,
    pub end: f64,
}

impl CellFill {
    fn from_colors(colors: &[&'static str]) -> Self {
        match colors {
            [] => CellFill::Empty,
            [color] => CellFill::Solid { color },
            _ => {
                let step = 100.0 / colors.len() as f64;
                let slices = colors
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| Slice {
                        color,
                        start: i as f64 * step,
                        end: (i + 1) as f64 * step,
                    })
                    .collect();
                CellFill::Radial { slices }
            }
        }
    }

    pub fn css(&self) -> String {
        match self {
            CellFill::Empty => "transparent".to_string(),
            CellFill::Solid { color } => color.to_string(),
            CellFill::Radial { slices } => {
                let stops: Vec<String> = slices
                    .iter()
                    .map(|s| format!("{} {:.2}% {:.2}%", s.color, s.start, s.end))
                    .collect();
                format!("conic-gradient({})", stops.join(", "))
            }
        }
    }
}

/// Placed on the first row holding one of days 1-7 of a month, once per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub week_index: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub active: bool,
}

pub fn intensity(displayed: usize) -> f64 {
    (BASE_INTENSITY + INTENSITY_STEP * displayed as f64).min(1.0)
}

/// Extract one palette's tags from stored logs. Days without tags in the
/// palette are skipped; the timeline still carries them.
pub fn occurrences_for(palette: Palette, logs: &[DailyLog]) -> Vec<Occurrence> {
    logs.iter()
        .filter_map(|log| {
            let tags: Vec<OccurrenceTag> = match palette {
                Palette::PrimaryActivity => plain_tags(&log.primary_activities),
                Palette::DailyLife => plain_tags(&log.daily_life_activities),
                Palette::MentalWorld => log
                    .mental_world_activities
                    .iter()
                    .map(|e| OccurrenceTag {
                        value: e.value.clone(),
                        detail: Some(e.detail.clone()),
                    })
                    .collect(),
            };
            (!tags.is_empty()).then(|| Occurrence {
                key: log.logical_date.clone(),
                tags,
            })
        })
        .collect()
}

fn plain_tags(values: &[String]) -> Vec<OccurrenceTag> {
    values
        .iter()
        .map(|v| OccurrenceTag {
            value: v.clone(),
            detail: None,
        })
        .collect()
}

pub fn aggregate(input: HeatmapInput<'_>) -> Heatmap {
    let find = |value: &str| input.catalog.iter().find(|c| c.value == value);
    let shown = |value: &str| input.filter.is_empty() || input.filter.iter().any(|f| f == value);

    let legend = input
        .catalog
        .iter()
        .map(|c| LegendEntry {
            value: c.value,
            label: c.label(input.locale),
            color: c.color,
            active: shown(c.value),
        })
        .collect();

    // Unknown tags are dropped here; a day whose tags were all unknown still
    // counts as a logged day for the window.
    let mut by_key: BTreeMap<&DateKey, Vec<&OccurrenceTag>> = BTreeMap::new();
    for occurrence in input.occurrences {
        by_key
            .entry(&occurrence.key)
            .or_default()
            .extend(occurrence.tags.iter().filter(|t| find(t.value.as_str()).is_some()));
    }

    let known: BTreeSet<&DateKey> = by_key.keys().copied().chain(input.timeline).collect();
    let (Some(&earliest), Some(&latest)) = (known.first(), known.last()) else {
        return Heatmap {
            weeks: Vec::new(),
            month_labels: Vec::new(),
            legend,
        };
    };

    let last_day = latest.max(input.today).logical_date().week_end();
    let oldest_row = last_day.week_start().sub_days(7 * (MAX_WEEKS - 1));
    let first_day = earliest.logical_date().week_start().max(oldest_row);

    let mut weeks: Vec<Vec<HeatmapCell>> = Vec::new();
    let mut month_labels: Vec<MonthLabel> = Vec::new();
    let mut labelled: BTreeSet<(i32, u32)> = BTreeSet::new();
    let mut day = first_day;
    let mut done = false;
    while !done {
        let mut week = Vec::with_capacity(7);
        let mut label_month = None;
        // The last row is short only when it ends at 9999-12-31.
        while week.len() < 7 && !done {
            let key = day.key();
            let date = day.date();
            if date.day() <= 7 && label_month.is_none() {
                label_month = Some((date.year(), date.month()));
            }

            let tags = by_key.get(&key).map(Vec::as_slice).unwrap_or_default();
            week.push(cell(key, tags, &find, &shown, input.locale));
            done = day >= last_day;
            day = day.add_days(1);
        }

        // A month can own days 1-7 in two rows; only the first gets the label.
        if let Some((year, month)) = label_month {
            if labelled.insert((year, month)) {
                month_labels.push(MonthLabel {
                    week_index: weeks.len(),
                    label: month_label(month, input.locale),
                });
            }
        }
        weeks.push(week);
    }

    Heatmap {
        weeks,
        month_labels,
        legend,
    }
}

fn cell<'c>(
    key: DateKey,
    tags: &[&OccurrenceTag],
    find: &impl Fn(&str) -> Option<&'c CategoryDefinition>,
    shown: &impl Fn(&str) -> bool,
    locale: Locale,
) -> HeatmapCell {
    let categories: Vec<CellCategory> = tags
        .iter()
        .filter(|t| shown(t.value.as_str()))
        .filter_map(|t| {
            let def = find(t.value.as_str())?;
            Some(CellCategory {
                value: t.value.clone(),
                label: def.label(locale),
                color: def.color,
                detail: t.detail.clone(),
            })
        })
        .collect();

    let colors: Vec<&'static str> = categories.iter().map(|c| c.color).collect();
    let fill = CellFill::from_colors(&colors);
    let details = categories
        .iter()
        .map(|c| match &c.detail {
            Some(detail) => format!("{}: {}", c.label, detail),
            None => c.label.to_string(),
        })
        .collect();

    HeatmapCell {
        key,
        intensity: intensity(categories.len()),
        background: fill.css(),
        fill,
        categories,
        details,
    }
}

fn month_label(month: u32, locale: Locale) -> String {
    match locale {
        Locale::Zh => format!("{month}月"),
        Locale::En => MONTHS_EN[(month as usize).saturating_sub(1) % 12].to_string(),
    }
}

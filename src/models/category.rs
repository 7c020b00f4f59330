use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

/// One entry of a fixed category palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub value: &'static str,
    pub label_zh: &'static str,
    pub label_en: &'static str,
    pub color: &'static str,
}

impl Locale {
    /// Query-string form; anything other than `en` reads as Chinese.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("en") => Locale::En,
            _ => Locale::Zh,
        }
    }
}

impl CategoryDefinition {
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Zh => self.label_zh,
            Locale::En => self.label_en,
        }
    }
}

const fn def(
    value: &'static str,
    label_zh: &'static str,
    label_en: &'static str,
    color: &'static str,
) -> CategoryDefinition {
    CategoryDefinition {
        value,
        label_zh,
        label_en,
        color,
    }
}

pub const PRIMARY_ACTIVITIES: &[CategoryDefinition] = &[
    def("WORK", "工作", "Work", "#ef4444"),
    def("STUDY", "学习", "Study", "#6366f1"),
    def("FITNESS", "健身", "Fitness", "#10b981"),
    def("REST", "休息", "Rest", "#fbbf24"),
    def("SOCIAL", "社交", "Social", "#38bdf8"),
    def("CREATIVE", "创作", "Creative", "#f472b6"),
];

pub const MENTAL_WORLD: &[CategoryDefinition] = &[
    def("MOVIE", "电影", "Movies", "#60a5fa"),
    def("GAME", "游戏", "Games", "#38bdf8"),
    def("TRAVEL", "旅游", "Travel", "#34d399"),
    def("BOOK", "读书", "Books", "#a855f7"),
    def("DRAMA", "看剧", "TV Shows", "#fb7185"),
    def("MUSIC", "音乐", "Music", "#facc15"),
    def("STUDY", "学习", "Study", "#f97316"),
];

pub const DAILY_LIFE: &[CategoryDefinition] = &[
    def("DINING_OUT", "外食", "Dining Out", "#f97316"),
    def("SHOWER", "洗澡", "Shower", "#60a5fa"),
    def("LAUNDRY", "洗衣服", "Laundry", "#a855f7"),
    def("HOSPITAL", "看病", "Medical Visit", "#f87171"),
    def("GROCERIES", "去超市", "Groceries", "#34d399"),
    def("WALK", "散步", "Walk", "#38bdf8"),
];

/// The three independent palettes a day can be tagged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    PrimaryActivity,
    MentalWorld,
    DailyLife,
}

impl Palette {
    pub const ALL: [Palette; 3] = [
        Palette::PrimaryActivity,
        Palette::MentalWorld,
        Palette::DailyLife,
    ];

    pub fn catalog(self) -> &'static [CategoryDefinition] {
        match self {
            Palette::PrimaryActivity => PRIMARY_ACTIVITIES,
            Palette::MentalWorld => MENTAL_WORLD,
            Palette::DailyLife => DAILY_LIFE,
        }
    }

    pub fn find(self, value: &str) -> Option<&'static CategoryDefinition> {
        self.catalog().iter().find(|c| c.value == value)
    }

    pub fn contains(self, value: &str) -> bool {
        self.find(value).is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Palette::PrimaryActivity => "primary_activity",
            Palette::MentalWorld => "mental_world",
            Palette::DailyLife => "daily_life",
        }
    }

    /// Accepts the snake_case name and the short path forms used by the API.
    pub fn from_path(raw: &str) -> Option<Self> {
        match raw {
            "primary" | "primary_activity" | "primary-activity" => Some(Palette::PrimaryActivity),
            "mental" | "mental_world" | "mental-world" => Some(Palette::MentalWorld),
            "daily" | "daily_life" | "daily-life" => Some(Palette::DailyLife),
            _ => None,
        }
    }
}

/// Catalog entry as sent to clients, labelled for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

impl CategoryView {
    pub fn new(def: &CategoryDefinition, locale: Locale) -> Self {
        Self {
            value: def.value,
            label: def.label(locale),
            color: def.color,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub locale: Locale,
    pub primary_activity: Vec<CategoryView>,
    pub mental_world: Vec<CategoryView>,
    pub daily_life: Vec<CategoryView>,
}

impl CatalogResponse {
    pub fn for_locale(locale: Locale) -> Self {
        let view = |palette: Palette| {
            palette
                .catalog()
                .iter()
                .map(|d| CategoryView::new(d, locale))
                .collect()
        };
        Self {
            locale,
            primary_activity: view(Palette::PrimaryActivity),
            mental_world: view(Palette::MentalWorld),
            daily_life: view(Palette::DailyLife),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_palette_values_are_unique() {
        for palette in Palette::ALL {
            let values: HashSet<_> = palette.catalog().iter().map(|c| c.value).collect();
            assert_eq!(values.len(), palette.catalog().len(), "{palette:?}");
        }
    }

    #[test]
    fn test_palettes_are_independent() {
        // STUDY exists in two palettes with different colors.
        let primary = Palette::PrimaryActivity.find("STUDY").unwrap();
        let mental = Palette::MentalWorld.find("STUDY").unwrap();
        assert_ne!(primary.color, mental.color);
        assert!(!Palette::DailyLife.contains("STUDY"));
        assert!(!Palette::PrimaryActivity.contains("BOOK"));
    }

    #[test]
    fn test_labels_follow_locale() {
        let walk = Palette::DailyLife.find("WALK").unwrap();
        assert_eq!(walk.label(Locale::En), "Walk");
        assert_eq!(walk.label(Locale::Zh), "散步");
    }

    #[test]
    fn test_locale_param() {
        assert_eq!(Locale::from_param(Some("EN")), Locale::En);
        assert_eq!(Locale::from_param(Some("fr")), Locale::Zh);
        assert_eq!(Locale::from_param(None), Locale::Zh);
    }

    #[test]
    fn test_palette_path_names() {
        assert_eq!(Palette::from_path("mental"), Some(Palette::MentalWorld));
        assert_eq!(Palette::from_path("daily-life"), Some(Palette::DailyLife));
        assert_eq!(Palette::from_path("nope"), None);
    }
}

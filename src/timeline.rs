use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Work,
    Education,
    ExternalRepo,
    ModelHub,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Education,
        Category::ExternalRepo,
        Category::ModelHub,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Education => "education",
            Self::ExternalRepo => "externalRepo",
            Self::ModelHub => "modelHub",
        }
    }

    pub fn from_token(value: &str) -> Option<Self> {
        match value {
            "work" => Some(Self::Work),
            "education" => Some(Self::Education),
            "externalRepo" => Some(Self::ExternalRepo),
            "modelHub" => Some(Self::ModelHub),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Education => "Education",
            Self::ExternalRepo => "Open Source",
            Self::ModelHub => "Model Hub",
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub category: Category,
    pub title: String,
    pub organization: String,
    pub period: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

impl TimelineEntry {
    pub fn short_summary(&self) -> &str {
        short_summary(&self.summary)
    }

    pub fn has_external_link(&self) -> bool {
        self.external_link
            .as_deref()
            .is_some_and(|link| !link.is_empty())
    }
}

pub fn short_summary(summary: &str) -> &str {
    match summary.find('.') {
        Some(position) => &summary[..=position],
        None => summary,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn accepts(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }
}

pub fn filtered(entries: &[TimelineEntry], filter: CategoryFilter) -> Vec<&TimelineEntry> {
    entries
        .iter()
        .filter(|entry| filter.accepts(entry.category))
        .collect()
}

#[derive(Clone, PartialEq)]
pub struct TimelineModel {
    entries: Vec<TimelineEntry>,
    filter: CategoryFilter,
    expanded: Option<usize>,
}

impl TimelineModel {
    pub fn new(entries: Vec<TimelineEntry>) -> Self {
        Self {
            entries,
            filter: CategoryFilter::All,
            expanded: None,
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        if self.filter == filter {
            return;
        }

        self.filter = filter;
        self.expanded = None;
    }

    pub fn set_expanded(&mut self, expanded: Option<usize>) {
        self.expanded = expanded;
    }

    pub fn visible_entries(&self) -> Vec<&TimelineEntry> {
        filtered(&self.entries, self.filter)
    }

    pub fn is_expanded(&self, position: usize) -> bool {
        self.expanded == Some(position)
    }

    pub fn summary_for(&self, position: usize) -> String {
        let Some(entry) = self.visible_entries().get(position).copied() else {
            return String::new();
        };

        if self.is_expanded(position) {
            entry.summary.clone()
        } else {
            entry.short_summary().to_string()
        }
    }

    pub fn shows_external_link(&self, position: usize) -> bool {
        self.is_expanded(position)
            && self
                .visible_entries()
                .get(position)
                .is_some_and(|entry| entry.has_external_link())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: Category, title: &str, summary: &str, link: Option<&str>) -> TimelineEntry {
        TimelineEntry {
            category,
            title: title.to_string(),
            organization: "Test Org".to_string(),
            period: "2024".to_string(),
            summary: summary.to_string(),
            tags: Vec::new(),
            external_link: link.map(ToString::to_string),
        }
    }

    fn sample_entries() -> Vec<TimelineEntry> {
        vec![
            entry(Category::Work, "first", "Led X. Did Y.", None),
            entry(Category::Education, "second", "Studied Z", None),
            entry(Category::ExternalRepo, "third", "Built a tool. Shipped it.", Some("https://example.com/tool")),
            entry(Category::Work, "fourth", "Ran ops. Scaled systems.", None),
        ]
    }

    #[test]
    fn all_filter_returns_full_list_in_order() {
        let model = TimelineModel::new(sample_entries());

        let titles: Vec<&str> = model
            .visible_entries()
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn category_filter_returns_matching_subset_in_order() {
        let mut model = TimelineModel::new(sample_entries());
        model.set_filter(CategoryFilter::Only(Category::Work));

        let titles: Vec<&str> = model
            .visible_entries()
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "fourth"]);
    }

    #[test]
    fn education_filter_selects_single_entry_without_truncation() {
        let mut model = TimelineModel::new(vec![
            entry(Category::Work, "a", "Led X. Did Y.", None),
            entry(Category::Education, "b", "Studied Z", None),
        ]);
        model.set_filter(CategoryFilter::Only(Category::Education));

        let visible = model.visible_entries();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].summary, "Studied Z");
        assert_eq!(visible[0].short_summary(), "Studied Z");
    }

    #[test]
    fn short_summary_stops_after_first_period() {
        assert_eq!(short_summary("Led X. Did Y."), "Led X.");
    }

    #[test]
    fn short_summary_without_period_is_whole_string() {
        assert_eq!(short_summary("Studied Z"), "Studied Z");
    }

    #[test]
    fn short_summary_of_empty_string_is_empty() {
        assert_eq!(short_summary(""), "");
    }

    #[test]
    fn expanded_position_renders_full_summary_others_short() {
        let mut model = TimelineModel::new(sample_entries());
        model.set_expanded(Some(0));

        assert_eq!(model.summary_for(0), "Led X. Did Y.");
        assert_eq!(model.summary_for(2), "Built a tool.");
    }

    #[test]
    fn summary_for_out_of_range_position_is_empty() {
        let model = TimelineModel::new(sample_entries());

        assert_eq!(model.summary_for(99), "");
    }

    #[test]
    fn external_link_shown_only_when_expanded_and_present() {
        let mut model = TimelineModel::new(sample_entries());

        assert!(!model.shows_external_link(2));
        model.set_expanded(Some(2));
        assert!(model.shows_external_link(2));

        model.set_expanded(Some(0));
        assert!(!model.shows_external_link(0), "entry without a link never shows the control");
    }

    #[test]
    fn empty_external_link_counts_as_absent() {
        let mut model = TimelineModel::new(vec![entry(Category::Work, "a", "Did a thing.", Some(""))]);
        model.set_expanded(Some(0));

        assert!(!model.shows_external_link(0));
    }

    #[test]
    fn changing_filter_clears_expansion() {
        let mut model = TimelineModel::new(sample_entries());
        model.set_expanded(Some(1));

        model.set_filter(CategoryFilter::Only(Category::Work));
        assert_eq!(model.expanded(), None);
    }

    #[test]
    fn reselecting_active_filter_keeps_expansion() {
        let mut model = TimelineModel::new(sample_entries());
        model.set_filter(CategoryFilter::Only(Category::Work));
        model.set_expanded(Some(0));

        model.set_filter(CategoryFilter::Only(Category::Work));
        assert_eq!(model.expanded(), Some(0));
    }

    #[test]
    fn expansion_index_is_relative_to_filtered_list() {
        let mut model = TimelineModel::new(sample_entries());
        model.set_filter(CategoryFilter::Only(Category::Work));
        model.set_expanded(Some(1));

        assert_eq!(model.visible_entries()[1].title, "fourth");
        assert_eq!(model.summary_for(1), "Ran ops. Scaled systems.");
    }

    #[test]
    fn category_tokens_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_token(category.token()), Some(category));
        }
        assert_eq!(Category::from_token("unknown"), None);
    }

    #[test]
    fn entry_serializes_camel_case_and_skips_empty_fields() {
        let serialized = serde_json::to_value(entry(
            Category::ExternalRepo,
            "tool",
            "Built it.",
            Some("https://example.com"),
        ))
        .expect("entry serializes");

        assert_eq!(serialized["category"], "externalRepo");
        assert_eq!(serialized["externalLink"], "https://example.com");
        assert!(serialized.get("tags").is_none());

        let bare = serde_json::to_value(entry(Category::Work, "job", "Did work.", None))
            .expect("entry serializes");
        assert!(bare.get("externalLink").is_none());
    }
}

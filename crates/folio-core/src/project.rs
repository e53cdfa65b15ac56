use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ALL_FILTER, ALL_FILTER_LABEL, DEFAULT_EMPTY_IMAGE, DEFAULT_PROJECT_IMAGE, LINK_PLACEHOLDER,
    UNTITLED_PROJECT,
};

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n)+").unwrap());

/// Record badges. Declaration order is display priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Featured,
    New,
}

impl Badge {
    pub fn key(self) -> &'static str {
        match self {
            Badge::Featured => "featured",
            Badge::New => "new",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Badge::Featured => "Featured",
            Badge::New => "New",
        }
    }
}

/// A filterable project category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    /// The synthetic category matching every record.
    pub fn all() -> Self {
        Self::new(ALL_FILTER, ALL_FILTER_LABEL)
    }
}

/// Description paragraphs. Data files may give either a list of
/// paragraphs or one string with line breaks between paragraphs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DescriptionWire", into = "Vec<String>")]
pub struct Description(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptionWire {
    Paragraphs(Vec<String>),
    Text(String),
}

impl From<DescriptionWire> for Description {
    fn from(wire: DescriptionWire) -> Self {
        match wire {
            DescriptionWire::Paragraphs(list) => Self::from_paragraphs(list),
            DescriptionWire::Text(text) => Self::from_text(&text),
        }
    }
}

impl From<Description> for Vec<String> {
    fn from(description: Description) -> Self {
        description.0
    }
}

impl Description {
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            paragraphs
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_paragraphs(LINE_BREAKS.split(text.trim()))
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fallback image references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaults {
    /// Substituted for missing or broken project covers and gallery images.
    pub project: String,
    /// Illustration for the empty-state card.
    pub empty: String,
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT_IMAGE.to_string(),
            empty: DEFAULT_EMPTY_IMAGE.to_string(),
        }
    }
}

/// One portfolio project. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub live: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl ProjectRecord {
    pub fn new(id: &str, title: &str, categories: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: Description::default(),
            cover: None,
            images: Vec::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            tags: Vec::new(),
            live: None,
            repo: None,
            badges: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.images = images.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_badges(mut self, badges: &[Badge]) -> Self {
        self.badges = badges.to_vec();
        self
    }

    pub fn with_links(mut self, live: Option<&str>, repo: Option<&str>) -> Self {
        self.live = live.map(str::to_string);
        self.repo = repo.map(str::to_string);
        self
    }

    pub fn with_cover(mut self, cover: &str) -> Self {
        self.cover = Some(cover.to_string());
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = description;
        self
    }

    /// Whether the record matches a filter key. `all` matches everything.
    pub fn matches_filter(&self, key: &str) -> bool {
        key == ALL_FILTER || self.categories.iter().any(|c| c == key)
    }

    /// Title for display; blank titles fall back to a placeholder.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            UNTITLED_PROJECT
        } else {
            title
        }
    }

    /// Badges deduplicated and ordered by priority.
    pub fn badges(&self) -> Vec<Badge> {
        let mut badges = self.badges.clone();
        badges.sort();
        badges.dedup();
        badges
    }

    pub fn live_link(&self) -> Option<&str> {
        present_link(self.live.as_deref())
    }

    pub fn repo_link(&self) -> Option<&str> {
        present_link(self.repo.as_deref())
    }

    fn cover_ref(&self) -> Option<&str> {
        self.cover.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Card cover, or the project default when the record has none.
    pub fn cover_or_default<'a>(&'a self, defaults: &'a ImageDefaults) -> &'a str {
        self.cover_ref().unwrap_or(&defaults.project)
    }

    pub fn cover_alt(&self) -> String {
        match self.cover_ref() {
            Some(_) => format!("{} cover image", self.display_title()),
            None => format!("Preview unavailable for {}", self.display_title()),
        }
    }

    /// Gallery images: blanks dropped, duplicates removed keeping the first
    /// occurrence, and a single default when nothing usable remains.
    pub fn gallery_images(&self, defaults: &ImageDefaults) -> Vec<String> {
        let mut images: Vec<String> = Vec::with_capacity(self.images.len());
        for src in &self.images {
            if src.trim().is_empty() || images.iter().any(|seen| seen == src) {
                continue;
            }
            images.push(src.clone());
        }
        if images.is_empty() {
            images.push(defaults.project.clone());
        }
        images
    }
}

/// A link is present unless it is missing, blank, or the `#` placeholder.
pub fn present_link(href: Option<&str>) -> Option<&str> {
    href.filter(|h| {
        let h = h.trim();
        !h.is_empty() && h != LINK_PLACEHOLDER
    })
}

/// The static data bundle a catalog and gallery operate on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCatalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub defaults: ImageDefaults,
    pub projects: Vec<ProjectRecord>,
}

impl ProjectCatalog {
    pub fn new(categories: Vec<Category>, projects: Vec<ProjectRecord>) -> Self {
        Self {
            categories,
            defaults: ImageDefaults::default(),
            projects,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn find(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Filter entries: the synthetic `all` first, then configured categories.
    pub fn filters(&self) -> Vec<Category> {
        std::iter::once(Category::all())
            .chain(self.categories.iter().cloned())
            .collect()
    }

    /// Whether a key names `all` or a configured category.
    pub fn is_known_filter(&self, key: &str) -> bool {
        key == ALL_FILTER || self.categories.iter().any(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_sentinel_is_absent() {
        assert_eq!(present_link(None), None);
        assert_eq!(present_link(Some("")), None);
        assert_eq!(present_link(Some("  ")), None);
        assert_eq!(present_link(Some("#")), None);
        assert_eq!(
            present_link(Some("https://example.com")),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_badges_follow_enum_priority() {
        let p = ProjectRecord::new("p", "P", &["frontend"]).with_badges(&[
            Badge::New,
            Badge::Featured,
            Badge::New,
        ]);
        assert_eq!(p.badges(), vec![Badge::Featured, Badge::New]);
    }

    #[test]
    fn test_gallery_images_sanitized() {
        let defaults = ImageDefaults::default();
        let p = ProjectRecord::new("p", "P", &["frontend"]).with_images(&["a", "", "b", "a", " "]);
        assert_eq!(p.gallery_images(&defaults), vec!["a", "b"]);
        assert_eq!(p.images.len(), 5, "source record must not change");
    }

    #[test]
    fn test_gallery_images_fallback() {
        let defaults = ImageDefaults::default();
        let p = ProjectRecord::new("p", "P", &["frontend"]).with_images(&["", "  "]);
        assert_eq!(p.gallery_images(&defaults), vec![DEFAULT_PROJECT_IMAGE]);
    }

    #[test]
    fn test_cover_resolution() {
        let defaults = ImageDefaults::default();
        let bare = ProjectRecord::new("p", "Site", &["frontend"]);
        assert_eq!(bare.cover_or_default(&defaults), DEFAULT_PROJECT_IMAGE);
        assert_eq!(bare.cover_alt(), "Preview unavailable for Site");

        let covered = bare.clone().with_cover("c.png");
        assert_eq!(covered.cover_or_default(&defaults), "c.png");
        assert_eq!(covered.cover_alt(), "Site cover image");
    }

    #[test]
    fn test_matches_filter() {
        let p = ProjectRecord::new("p", "P", &["ai", "frontend"]);
        assert!(p.matches_filter("all"));
        assert!(p.matches_filter("ai"));
        assert!(!p.matches_filter("backend"));
    }

    #[test]
    fn test_display_title() {
        assert_eq!(ProjectRecord::new("p", "  ", &["x"]).display_title(), UNTITLED_PROJECT);
        assert_eq!(ProjectRecord::new("p", " Site ", &["x"]).display_title(), "Site");
    }

    #[test]
    fn test_description_accepts_list_or_text() {
        let list: Description = serde_json::from_str(r#"["one", " ", "two"]"#).unwrap();
        assert_eq!(list.paragraphs(), ["one", "two"]);

        let text: Description = serde_json::from_str(r#""one\n\ntwo\nthree""#).unwrap();
        assert_eq!(text.paragraphs(), ["one", "two", "three"]);

        assert!(Description::from_text("   ").is_empty());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r##"{
            "categories": [{"key": "frontend", "label": "Frontend"}],
            "projects": [{
                "id": "site",
                "title": "Site",
                "categories": ["frontend"],
                "images": ["a.png"],
                "live": "#",
                "badges": ["new", "featured"]
            }]
        }"##;
        let catalog = ProjectCatalog::from_json(json).unwrap();
        assert_eq!(catalog.defaults, ImageDefaults::default());
        let site = catalog.find("site").unwrap();
        assert_eq!(site.live_link(), None);
        assert_eq!(site.badges(), vec![Badge::Featured, Badge::New]);

        let keys: Vec<_> = catalog.filters().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["all", "frontend"]);
        assert!(catalog.is_known_filter("all"));
        assert!(!catalog.is_known_filter("game"));
    }

    #[test]
    fn test_unknown_badge_rejected() {
        let json = r#"{"id": "x", "title": "X", "categories": ["a"], "badges": ["hot"]}"#;
        assert!(serde_json::from_str::<ProjectRecord>(json).is_err());
    }
}

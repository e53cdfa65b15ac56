use std::collections::HashSet;
use std::path::Path;

use folio_core::ProjectCatalog;

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Pure validation
// ---------------------------------------------------------------------------

/// Reject catalogs the engine cannot address unambiguously.
///
/// Records tagged with a category that has no filter button are kept; they
/// still show under `all`.
pub fn validate(catalog: &ProjectCatalog) -> Result<()> {
    let mut keys = HashSet::new();
    for category in &catalog.categories {
        if category.key.trim().is_empty() {
            return Err(StoreError::InvalidData("category with empty key".into()));
        }
        if !keys.insert(category.key.as_str()) {
            return Err(StoreError::InvalidData(format!(
                "duplicate category key: {}",
                category.key
            )));
        }
    }

    let mut ids = HashSet::new();
    for (i, record) in catalog.projects.iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(StoreError::InvalidData(format!(
                "project #{i} has an empty id"
            )));
        }
        if !ids.insert(record.id.as_str()) {
            return Err(StoreError::InvalidData(format!(
                "duplicate project id: {}",
                record.id
            )));
        }
        if record.categories.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "project {} has no categories",
                record.id
            )));
        }
        for key in &record.categories {
            if !catalog.is_known_filter(key) {
                tracing::warn!(project = %record.id, category = %key, "category has no filter");
            }
        }
    }
    Ok(())
}

pub fn parse_catalog(json: &str) -> Result<ProjectCatalog> {
    let catalog = ProjectCatalog::from_json(json)?;
    validate(&catalog)?;
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// I/O wrappers
// ---------------------------------------------------------------------------

pub fn load_catalog(path: &Path) -> Result<ProjectCatalog> {
    let json = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&json)?;
    tracing::info!(
        path = %path.display(),
        projects = catalog.projects.len(),
        categories = catalog.categories.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Badge;

    const SAMPLE: &str = r##"{
        "categories": [
            {"key": "frontend", "label": "Frontend"},
            {"key": "backend", "label": "Backend"}
        ],
        "projects": [
            {
                "id": "portfolio",
                "title": "Portfolio Website",
                "description": "First paragraph.\n\nSecond paragraph.",
                "images": ["a.png", "b.png"],
                "categories": ["frontend"],
                "tags": ["HTML", "CSS"],
                "live": "#",
                "repo": "https://github.com/x/portfolio",
                "badges": ["new", "featured"]
            },
            {
                "id": "api",
                "title": "Task API",
                "categories": ["backend"]
            }
        ]
    }"##;

    #[test]
    fn test_parse_sample() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.projects.len(), 2);
        let portfolio = catalog.find("portfolio").unwrap();
        assert_eq!(
            portfolio.description.paragraphs(),
            ["First paragraph.", "Second paragraph."]
        );
        assert_eq!(portfolio.live_link(), None);
        assert_eq!(portfolio.badges(), vec![Badge::Featured, Badge::New]);
        let api = catalog.find("api").unwrap();
        assert!(api.description.is_empty());
        assert!(api.images.is_empty());
        assert_eq!(catalog.defaults.project, folio_core::ImageDefaults::default().project);
    }

    #[test]
    fn test_unknown_badge_rejected() {
        let json = r#"{"projects": [{"id": "a", "title": "A", "categories": ["x"], "badges": ["hot"]}]}"#;
        assert!(matches!(parse_catalog(json), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"{"projects": [
            {"id": "a", "title": "A", "categories": ["x"]},
            {"id": "a", "title": "B", "categories": ["y"]}
        ]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("duplicate project id: a"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let json = r#"{"projects": [{"id": " ", "title": "A", "categories": ["x"]}]}"#;
        assert!(matches!(parse_catalog(json), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_uncategorized_rejected() {
        let json = r#"{"projects": [{"id": "a", "title": "A", "categories": []}]}"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("no categories"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let json = r#"{
            "categories": [{"key": "ai", "label": "AI"}, {"key": "ai", "label": "ML"}],
            "projects": []
        }"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("duplicate category key: ai"));
    }

    #[test]
    fn test_unlisted_category_kept() {
        let json = r#"{"projects": [{"id": "a", "title": "A", "categories": ["mystery"]}]}"#;
        let catalog = parse_catalog(json).unwrap();
        assert_eq!(catalog.projects.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("data.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.filters().len(), 3);
    }
}

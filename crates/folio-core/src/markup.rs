//! Fixed-markup adapter: paints render descriptions into mount points.
//!
//! State lives in the catalog and gallery; this module only turns their
//! plain-data output into HTML fragments. A paint needs every mount it
//! writes to. When one is missing the paint is abandoned and nothing in
//! the document changes.

use std::collections::BTreeMap;
use std::fmt::Write;

use tracing::debug;

use crate::catalog::{CatalogRender, FilterButton, GridState, PaginationDescriptor};
use crate::gallery::GalleryView;
use crate::project::{Badge, ImageDefaults, ProjectRecord};

/// Named mount points of the host page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mount {
    Filters,
    Grid,
    Pagination,
    Modal,
}

impl Mount {
    pub const ALL: [Mount; 4] = [Mount::Filters, Mount::Grid, Mount::Pagination, Mount::Modal];

    pub fn name(self) -> &'static str {
        match self {
            Mount::Filters => "filters",
            Mount::Grid => "grid",
            Mount::Pagination => "pagination",
            Mount::Modal => "modal",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MountSlot {
    pub html: String,
    pub hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Painted,
    Abandoned,
}

/// In-memory stand-in for the host page's mount elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    mounts: BTreeMap<Mount, MountSlot>,
    focused_filter: Option<String>,
}

impl Document {
    /// A document with every mount point present.
    pub fn new() -> Self {
        Self::with_mounts(&Mount::ALL)
    }

    pub fn with_mounts(mounts: &[Mount]) -> Self {
        Self {
            mounts: mounts.iter().map(|m| (*m, MountSlot::default())).collect(),
            focused_filter: None,
        }
    }

    /// Filter button most recently given focus by a catalog paint.
    pub fn focused_filter(&self) -> Option<&str> {
        self.focused_filter.as_deref()
    }

    pub fn slot(&self, mount: Mount) -> Option<&MountSlot> {
        self.mounts.get(&mount)
    }

    pub fn html(&self, mount: Mount) -> Option<&str> {
        self.mounts.get(&mount).map(|s| s.html.as_str())
    }

    fn has_all(&self, mounts: &[Mount]) -> bool {
        mounts.iter().all(|m| self.mounts.contains_key(m))
    }

    fn write(&mut self, mount: Mount, html: String, hidden: bool) {
        if let Some(slot) = self.mounts.get_mut(&mount) {
            slot.html = html;
            slot.hidden = hidden;
        }
    }
}

/// Paint filters, grid and pagination.
pub fn paint_catalog(
    doc: &mut Document,
    render: &CatalogRender<'_>,
    defaults: &ImageDefaults,
) -> Paint {
    if !doc.has_all(&[Mount::Filters, Mount::Grid, Mount::Pagination]) {
        debug!("catalog mounts missing, render abandoned");
        return Paint::Abandoned;
    }
    doc.write(Mount::Filters, filters_html(&render.filters), false);
    doc.write(Mount::Grid, grid_html(&render.grid, defaults), false);
    let pagination = &render.pagination;
    doc.write(
        Mount::Pagination,
        pagination_html(pagination),
        pagination.is_hidden(),
    );
    if let Some(key) = render.focus_filter {
        doc.focused_filter = Some(key.to_string());
    }
    Paint::Painted
}

/// Paint the modal contents, or hide the modal when `view` is `None`.
pub fn paint_gallery(doc: &mut Document, view: Option<&GalleryView>) -> Paint {
    if !doc.has_all(&[Mount::Modal]) {
        debug!("modal mount missing, render abandoned");
        return Paint::Abandoned;
    }
    match view {
        Some(view) => doc.write(Mount::Modal, gallery_html(view), false),
        None => doc.write(Mount::Modal, String::new(), true),
    }
    Paint::Painted
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn filters_html(filters: &[FilterButton]) -> String {
    let mut html = String::new();
    for f in filters {
        let _ = write!(
            html,
            r#"<button class="btn btn-filter" type="button" data-filter="{}" aria-controls="projects-grid" aria-pressed="{}">{}</button>"#,
            escape(&f.key),
            f.pressed,
            escape(&f.label),
        );
    }
    html
}

pub fn grid_html(grid: &GridState<'_>, defaults: &ImageDefaults) -> String {
    match grid {
        GridState::Empty => empty_card_html(defaults),
        GridState::Cards(records) => records.iter().map(|r| card_html(r, defaults)).collect(),
    }
}

fn empty_card_html(defaults: &ImageDefaults) -> String {
    let empty = escape(&defaults.empty);
    format!(
        r#"<article class="card card-empty" role="status" aria-live="polite"><div class="card-media" aria-hidden="true"><img src="{empty}" alt="This category has no projects" loading="lazy" decoding="async" onerror="this.onerror=null;this.src='{empty}'"></div><div class="card-content"><h3 class="card-title">No Projects</h3><p class="card-empty-text">This category has no projects.</p></div></article>"#
    )
}

/// Badge positions: one badge sits top-right; with both, `featured` takes
/// top-right and `new` top-left.
fn badge_positions(badges: &[Badge]) -> Vec<(Badge, &'static str)> {
    match badges {
        [] => Vec::new(),
        [only] => vec![(*only, "top-right")],
        [first, second, ..] => vec![(*first, "top-right"), (*second, "top-left")],
    }
}

fn card_html(record: &ProjectRecord, defaults: &ImageDefaults) -> String {
    let title = escape(record.display_title());
    let fallback = escape(&defaults.project);

    let mut badges = String::new();
    for (badge, position) in badge_positions(&record.badges()) {
        let _ = write!(
            badges,
            r#"<span class="badge badge-{} badge-{position}">{}</span>"#,
            badge.key(),
            badge.label(),
        );
    }

    let mut links = String::new();
    if let Some(live) = record.live_link() {
        let _ = write!(
            links,
            r#"<a class="icon icon-demo" href="{}" target="_blank" rel="noopener noreferrer" aria-label="Open Live Demo"><i class="fa-solid fa-up-right-from-square" aria-hidden="true"></i></a>"#,
            escape(live),
        );
    }
    if let Some(repo) = record.repo_link() {
        let _ = write!(
            links,
            r#"<a class="icon icon-github" href="{}" target="_blank" rel="noopener noreferrer" aria-label="Open GitHub Repo"><i class="fab fa-github" aria-hidden="true"></i></a>"#,
            escape(repo),
        );
    }

    let tags: String = record
        .tags
        .iter()
        .map(|t| format!(r#"<span class="chip chip-primary">{}</span>"#, escape(t)))
        .collect();

    format!(
        r#"<article class="card" data-id="{id}" tabindex="0"><div class="card-media"><img src="{cover}" alt="{alt}" loading="lazy" decoding="async" onerror="this.onerror=null;this.src='{fallback}'"><div class="card-badges">{badges}</div><div class="card-overlay"><button class="icon icon-eye" type="button" aria-label="View details"><i class="fa-regular fa-eye"></i></button>{links}</div></div><div class="card-content"><h3 class="card-title">{title}</h3><div class="card-tags" aria-label="Project tags">{tags}</div></div></article>"#,
        id = escape(&record.id),
        cover = escape(record.cover_or_default(defaults)),
        alt = escape(&record.cover_alt()),
    )
}

pub fn pagination_html(pagination: &PaginationDescriptor) -> String {
    if pagination.is_hidden() {
        return String::new();
    }
    let disabled = |off: bool| {
        if off {
            r#" disabled aria-disabled="true""#
        } else {
            ""
        }
    };
    let mut html = format!(
        r#"<button class="pagination-btn" type="button" data-page="prev"{} aria-label="Previous page"><i class="fas fa-chevron-left" aria-hidden="true"></i></button>"#,
        disabled(!pagination.has_prev),
    );
    for button in pagination.page_buttons() {
        let current = if button.current {
            r#" aria-current="page""#
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<button class="pagination-btn" type="button" data-page="{n}"{current}>{n}</button>"#,
            n = button.number,
        );
    }
    let _ = write!(
        html,
        r#"<button class="pagination-btn" type="button" data-page="next"{} aria-label="Next page"><i class="fas fa-chevron-right" aria-hidden="true"></i></button>"#,
        disabled(!pagination.has_next),
    );
    html
}

pub fn gallery_html(view: &GalleryView) -> String {
    let title = escape(&view.title);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<button class="modal-close" type="button" aria-label="Close"><i class="fas fa-xmark" aria-hidden="true"></i></button><div class="modal-gallery-main"><img src="{}" alt="{}">"#,
        escape(&view.image_src),
        escape(&view.image_alt),
    );
    if view.show_nav {
        html.push_str(
            r#"<button class="modal-gallery-nav-prev" type="button" aria-label="Previous image"></button><button class="modal-gallery-nav-next" type="button" aria-label="Next image"></button>"#,
        );
    }
    html.push_str(r#"</div><div class="modal-gallery-thumbs" role="tablist">"#);
    for thumb in &view.thumbs {
        let active = if thumb.selected { " modal-thumb-active" } else { "" };
        let _ = write!(
            html,
            r#"<button class="modal-thumb{active}" role="tab" data-index="{}" aria-selected="{}" tabindex="{}"><img src="{}" alt="{}" loading="lazy" decoding="async"></button>"#,
            thumb.index,
            thumb.selected,
            if thumb.tabbable { 0 } else { -1 },
            escape(&thumb.src),
            escape(&thumb.alt),
        );
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<div class="modal-details"><h2 class="modal-title">{title}</h2><div class="modal-description">"#
    );
    for paragraph in &view.paragraphs {
        let _ = write!(html, "<p>{}</p>", escape(paragraph));
    }
    html.push_str(r#"</div><div class="modal-tags">"#);
    for tag in &view.tags {
        let _ = write!(html, r#"<span class="chip chip-primary">{}</span>"#, escape(tag));
    }
    html.push_str("</div>");
    if let Some(live) = &view.live {
        let _ = write!(
            html,
            r#"<a class="btn btn-primary" href="{}" target="_blank" rel="noopener noreferrer">Live Demo</a>"#,
            escape(live),
        );
    }
    if let Some(repo) = &view.repo {
        let _ = write!(
            html,
            r#"<a class="btn btn-secondary" href="{}" target="_blank" rel="noopener noreferrer">Source Code</a>"#,
            escape(repo),
        );
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::catalog::CatalogController;
    use crate::gallery::{GalleryConfig, GalleryModal};
    use crate::project::{Category, ProjectCatalog};
    use crate::scheduler::VirtualScheduler;

    fn catalog() -> Rc<ProjectCatalog> {
        Rc::new(ProjectCatalog::new(
            vec![
                Category::new("frontend", "Frontend"),
                Category::new("game", "Game"),
            ],
            vec![
                ProjectRecord::new("site", "Site <v2>", &["frontend"])
                    .with_badges(&[Badge::New, Badge::Featured])
                    .with_links(Some("https://site.dev"), Some("#"))
                    .with_tags(&["HTML", "CSS"]),
                ProjectRecord::new("shop", "Shop", &["frontend"]).with_badges(&[Badge::New]),
            ],
        ))
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_badge_positions() {
        assert_eq!(
            badge_positions(&[Badge::Featured, Badge::New]),
            vec![(Badge::Featured, "top-right"), (Badge::New, "top-left")]
        );
        assert_eq!(badge_positions(&[Badge::New]), vec![(Badge::New, "top-right")]);
        assert!(badge_positions(&[]).is_empty());
    }

    #[test]
    fn test_paint_catalog_cards() {
        let catalog = catalog();
        let mut controller = CatalogController::with_page_size(catalog.clone(), 1);
        let mut doc = Document::new();
        let render = controller.render();
        assert_eq!(paint_catalog(&mut doc, &render, &catalog.defaults), Paint::Painted);

        let grid = doc.html(Mount::Grid).unwrap();
        assert!(grid.contains(r#"data-id="site""#));
        assert!(grid.contains("Site &lt;v2&gt;"));
        assert!(grid.contains("badge-featured badge-top-right"));
        assert!(grid.contains("badge-new badge-top-left"));
        assert!(grid.contains("icon-demo"));
        assert!(!grid.contains("icon-github"), "placeholder repo link hidden");
        assert!(grid.contains("Preview unavailable for Site &lt;v2&gt;"));

        let filters = doc.html(Mount::Filters).unwrap();
        assert!(
            filters.contains(r#"data-filter="all" aria-controls="projects-grid" aria-pressed="true""#)
        );

        let pager = doc.slot(Mount::Pagination).unwrap();
        assert!(!pager.hidden);
        assert!(pager.html.contains(r#"data-page="1" aria-current="page""#));
        assert!(pager.html.contains(r#"data-page="prev" disabled"#));
    }

    #[test]
    fn test_paint_empty_state() {
        let catalog = catalog();
        let mut controller = CatalogController::new(catalog.clone());
        controller.set_filter("game");
        let mut doc = Document::new();
        paint_catalog(&mut doc, &controller.render(), &catalog.defaults);
        let grid = doc.html(Mount::Grid).unwrap();
        assert!(grid.contains("card-empty"));
        assert!(grid.contains("No Projects"));
        let pager = doc.slot(Mount::Pagination).unwrap();
        assert!(pager.hidden);
        assert!(pager.html.is_empty());
    }

    #[test]
    fn test_missing_mount_abandons_paint() {
        let catalog = catalog();
        let mut controller = CatalogController::new(catalog.clone());
        let mut doc = Document::with_mounts(&[Mount::Filters, Mount::Grid]);
        let before = doc.clone();
        let outcome = paint_catalog(&mut doc, &controller.render(), &catalog.defaults);
        assert_eq!(outcome, Paint::Abandoned);
        assert_eq!(doc, before);

        let mut bare = Document::with_mounts(&[]);
        assert_eq!(paint_gallery(&mut bare, None), Paint::Abandoned);
    }

    #[test]
    fn test_filter_focus_survives_repaint() {
        let catalog = catalog();
        let mut controller = CatalogController::new(catalog.clone());
        let mut doc = Document::new();
        paint_catalog(&mut doc, &controller.render(), &catalog.defaults);
        assert_eq!(doc.focused_filter(), None);

        controller.set_filter("game");
        paint_catalog(&mut doc, &controller.render_focused(true), &catalog.defaults);
        assert_eq!(doc.focused_filter(), Some("game"));

        // Focus elsewhere: the paint leaves it alone.
        controller.set_filter("frontend");
        paint_catalog(&mut doc, &controller.render(), &catalog.defaults);
        assert_eq!(doc.focused_filter(), Some("game"));
    }

    #[test]
    fn test_paint_gallery() {
        let catalog = catalog();
        let mut gallery =
            GalleryModal::new(catalog, VirtualScheduler::new(), GalleryConfig::default());
        gallery.open_by_id("site", None);
        let mut doc = Document::new();
        paint_gallery(&mut doc, gallery.view().as_ref());
        let modal = doc.slot(Mount::Modal).unwrap();
        assert!(!modal.hidden);
        assert!(modal.html.contains("Site &lt;v2&gt; - Image 1 of 1"));
        assert!(modal.html.contains("No description available."));
        assert!(modal.html.contains("btn-primary"));
        assert!(!modal.html.contains("btn-secondary"));
        assert!(!modal.html.contains("modal-gallery-nav-next"));

        gallery.close();
        paint_gallery(&mut doc, gallery.view().as_ref());
        assert!(doc.slot(Mount::Modal).unwrap().hidden);
    }
}

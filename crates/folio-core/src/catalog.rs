//! Filter and pagination state over the static project list.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use crate::constants::{ALL_FILTER, DEFAULT_PAGE_SIZE};
use crate::input::Key;
use crate::project::{ProjectCatalog, ProjectRecord};

/// Target of a pagination button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTarget {
    Number(usize),
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePageTargetError(String);

impl fmt::Display for ParsePageTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid page target: {:?}", self.0)
    }
}

impl std::error::Error for ParsePageTargetError {}

/// Parses pagination button values: `prev`, `next`, or a page number.
impl FromStr for PageTarget {
    type Err = ParsePageTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prev" | "previous" => Ok(PageTarget::Previous),
            "next" => Ok(PageTarget::Next),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => digits
                .parse()
                .map(PageTarget::Number)
                .map_err(|_| ParsePageTargetError(s.to_string())),
            _ => Err(ParsePageTargetError(s.to_string())),
        }
    }
}

/// Result of a state change request. `Updated` is the "page or filter
/// changed" notification hosts use to scroll the section into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Updated,
    Unchanged,
}

impl Change {
    pub fn is_updated(self) -> bool {
        self == Change::Updated
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationDescriptor {
    pub current_page: usize,
    pub page_count: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageButton {
    pub number: usize,
    pub current: bool,
}

impl PaginationDescriptor {
    /// A single page needs no pagination controls.
    pub fn is_hidden(&self) -> bool {
        self.page_count <= 1
    }

    pub fn page_buttons(&self) -> Vec<PageButton> {
        (1..=self.page_count)
            .map(|number| PageButton {
                number,
                current: number == self.current_page,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterButton {
    pub key: String,
    pub label: String,
    pub pressed: bool,
}

/// Grid contents. `Empty` is an explicit state, never an empty card list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridState<'a> {
    Cards(Vec<&'a ProjectRecord>),
    Empty,
}

impl GridState<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridState::Empty)
    }
}

/// Declarative description of the catalog section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogRender<'a> {
    pub active_filter: &'a str,
    pub filters: Vec<FilterButton>,
    pub grid: GridState<'a>,
    pub pagination: PaginationDescriptor,
    /// Filter button that takes focus after the repaint. Set only when
    /// focus was inside the filter bar before it.
    pub focus_filter: Option<&'a str>,
}

/// Where a grid gesture landed, resolved from the event target outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardTarget<'a> {
    /// Card body, or anything inside it that is not a link or the view button.
    Card(&'a str),
    /// The eye button in the card overlay.
    ViewButton(&'a str),
    /// A live-demo or repository link inside the card.
    Link(&'a str),
    EmptyCard,
    /// Grid background between cards.
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridGesture {
    Click,
    Key(Key),
}

/// Record id a grid gesture opens, if any.
///
/// Clicks and Enter/Space open a card. Links keep their own navigation and
/// the empty-state card opens nothing.
pub fn card_activation(target: CardTarget<'_>, gesture: GridGesture) -> Option<&str> {
    if let GridGesture::Key(key) = gesture
        && !matches!(key, Key::Enter | Key::Space)
    {
        return None;
    }
    match target {
        CardTarget::Card(id) | CardTarget::ViewButton(id) if !id.is_empty() => Some(id),
        _ => None,
    }
}

pub struct CatalogController {
    catalog: Rc<ProjectCatalog>,
    active_filter: String,
    current_page: usize,
    page_size: usize,
}

impl CatalogController {
    pub fn new(catalog: Rc<ProjectCatalog>) -> Self {
        Self::with_page_size(catalog, DEFAULT_PAGE_SIZE)
    }

    /// `page_size` of zero is treated as one.
    pub fn with_page_size(catalog: Rc<ProjectCatalog>, page_size: usize) -> Self {
        Self {
            catalog,
            active_filter: ALL_FILTER.to_string(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn catalog(&self) -> &Rc<ProjectCatalog> {
        &self.catalog
    }

    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Switch filters. Unknown keys are accepted and match nothing.
    pub fn set_filter(&mut self, key: &str) -> Change {
        if key == self.active_filter {
            return Change::Unchanged;
        }
        if !self.catalog.is_known_filter(key) {
            debug!(key, "filter has no configured category");
        }
        self.active_filter = key.to_string();
        self.current_page = 1;
        self.recompute();
        debug!(filter = %self.active_filter, "filter changed");
        Change::Updated
    }

    pub fn set_page(&mut self, target: PageTarget) -> Change {
        let pages = self.page_count();
        let requested = match target {
            PageTarget::Previous if self.current_page > 1 => self.current_page - 1,
            PageTarget::Next if self.current_page < pages => self.current_page + 1,
            PageTarget::Previous | PageTarget::Next => return Change::Unchanged,
            PageTarget::Number(n) => n,
        };
        let page = requested.clamp(1, pages);
        if page == self.current_page {
            return Change::Unchanged;
        }
        self.current_page = page;
        debug!(page, pages, "page changed");
        Change::Updated
    }

    /// Arrow keys on the pagination bar step pages.
    pub fn handle_pagination_key(&mut self, key: Key) -> Change {
        match key {
            Key::ArrowLeft => self.set_page(PageTarget::Previous),
            Key::ArrowRight => self.set_page(PageTarget::Next),
            _ => Change::Unchanged,
        }
    }

    /// Records matching the active filter, in source order.
    pub fn filtered_records(&self) -> Vec<&ProjectRecord> {
        self.catalog
            .projects
            .iter()
            .filter(|p| p.matches_filter(&self.active_filter))
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.catalog
            .projects
            .iter()
            .filter(|p| p.matches_filter(&self.active_filter))
            .count()
    }

    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size).max(1)
    }

    pub fn page_records(&self) -> Vec<&ProjectRecord> {
        let start = (self.current_page - 1) * self.page_size;
        self.catalog
            .projects
            .iter()
            .filter(|p| p.matches_filter(&self.active_filter))
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    /// Pagination state. A single page reports hidden and pins the
    /// current page to 1.
    pub fn pagination(&mut self) -> PaginationDescriptor {
        let page_count = self.page_count();
        if page_count <= 1 {
            self.current_page = 1;
        } else {
            self.current_page = self.current_page.min(page_count);
        }
        PaginationDescriptor {
            current_page: self.current_page,
            page_count,
            has_prev: self.current_page > 1,
            has_next: self.current_page < page_count,
        }
    }

    pub fn filter_buttons(&self) -> Vec<FilterButton> {
        self.catalog
            .filters()
            .into_iter()
            .map(|c| FilterButton {
                pressed: c.key == self.active_filter,
                key: c.key,
                label: c.label,
            })
            .collect()
    }

    /// Resolve a grid gesture to the record it opens. Only cards on the
    /// current page can be activated.
    pub fn activate_card(
        &self,
        target: CardTarget<'_>,
        gesture: GridGesture,
    ) -> Option<&ProjectRecord> {
        let id = card_activation(target, gesture)?;
        let record = self.page_records().into_iter().find(|r| r.id == id);
        if record.is_none() {
            debug!(id, "activated card is not on the current page");
        }
        record
    }

    /// Full description of the section for the renderer.
    pub fn render(&mut self) -> CatalogRender<'_> {
        self.render_focused(false)
    }

    /// Like [`render`](Self::render), moving focus back to the active
    /// filter button when it sat in the filter bar before the repaint.
    pub fn render_focused(&mut self, focus_in_filters: bool) -> CatalogRender<'_> {
        let pagination = self.pagination();
        let this: &Self = self;
        let records = this.page_records();
        let grid = if records.is_empty() {
            GridState::Empty
        } else {
            GridState::Cards(records)
        };
        let filters = this.filter_buttons();
        let focus_filter = (focus_in_filters && filters.iter().any(|f| f.pressed))
            .then_some(this.active_filter.as_str());
        CatalogRender {
            active_filter: &this.active_filter,
            filters,
            grid,
            pagination,
            focus_filter,
        }
    }

    fn recompute(&mut self) {
        self.current_page = self.current_page.clamp(1, self.page_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Category;

    fn records(n: usize) -> Vec<ProjectRecord> {
        (0..n)
            .map(|i| {
                let cat = if i % 2 == 0 { "frontend" } else { "backend" };
                ProjectRecord::new(&format!("p{i}"), &format!("Project {i}"), &[cat])
            })
            .collect()
    }

    fn controller(n: usize, page_size: usize) -> CatalogController {
        let catalog = ProjectCatalog::new(
            vec![
                Category::new("frontend", "Frontend"),
                Category::new("backend", "Backend"),
                Category::new("game", "Game"),
            ],
            records(n),
        );
        CatalogController::with_page_size(Rc::new(catalog), page_size)
    }

    fn ids(records: &[&ProjectRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let c = controller(10, 6);
        assert_eq!(c.active_filter(), "all");
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.page_records().len(), 6);
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut c = controller(7, 6);
        assert_eq!(c.set_filter("backend"), Change::Updated);
        assert_eq!(ids(&c.filtered_records()), vec!["p1", "p3", "p5"]);
    }

    #[test]
    fn test_set_filter_same_key_keeps_page() {
        let mut c = controller(20, 3);
        c.set_page(PageTarget::Number(3));
        assert_eq!(c.set_filter("all"), Change::Unchanged);
        assert_eq!(c.current_page(), 3);
    }

    #[test]
    fn test_set_filter_resets_page() {
        let mut c = controller(20, 3);
        c.set_page(PageTarget::Number(3));
        c.set_filter("frontend");
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_unknown_filter_yields_empty_state() {
        let mut c = controller(5, 2);
        assert_eq!(c.set_filter("quantum"), Change::Updated);
        assert!(c.filtered_records().is_empty());
        assert!(c.page_records().is_empty());
        let render = c.render();
        assert!(render.grid.is_empty());
        assert!(render.pagination.is_hidden());
        assert!(render.filters.iter().all(|f| !f.pressed));
    }

    #[test]
    fn test_category_without_records_is_empty() {
        let mut c = controller(5, 2);
        c.set_filter("game");
        assert_eq!(c.render().grid, GridState::Empty);
    }

    #[test]
    fn test_page_clamping() {
        let mut c = controller(10, 3);
        assert_eq!(c.set_page(PageTarget::Number(99)), Change::Updated);
        assert_eq!(c.current_page(), 4);
        assert_eq!(c.set_page(PageTarget::Number(0)), Change::Updated);
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_prev_next_bounds() {
        let mut c = controller(10, 5);
        assert_eq!(c.set_page(PageTarget::Previous), Change::Unchanged);
        assert_eq!(c.set_page(PageTarget::Next), Change::Updated);
        assert_eq!(c.current_page(), 2);
        assert_eq!(c.set_page(PageTarget::Next), Change::Unchanged);
        assert_eq!(c.handle_pagination_key(Key::ArrowLeft), Change::Updated);
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.handle_pagination_key(Key::Enter), Change::Unchanged);
    }

    #[test]
    fn test_page_slice() {
        let mut c = controller(8, 3);
        c.set_page(PageTarget::Number(3));
        assert_eq!(ids(&c.page_records()), vec!["p6", "p7"]);
    }

    #[test]
    fn test_pagination_descriptor() {
        let mut c = controller(8, 3);
        c.set_page(PageTarget::Next);
        let d = c.pagination();
        assert_eq!(
            d,
            PaginationDescriptor {
                current_page: 2,
                page_count: 3,
                has_prev: true,
                has_next: true,
            }
        );
        assert!(!d.is_hidden());
        let current: Vec<_> = d.page_buttons().iter().map(|b| b.current).collect();
        assert_eq!(current, vec![false, true, false]);
    }

    #[test]
    fn test_two_record_scenario() {
        let catalog = ProjectCatalog::new(
            vec![],
            vec![
                ProjectRecord::new("a", "A", &["frontend"]),
                ProjectRecord::new("b", "B", &["backend"]),
            ],
        );
        let mut c = CatalogController::with_page_size(Rc::new(catalog), 1);
        assert_eq!(c.page_count(), 2);
        c.set_filter("frontend");
        assert_eq!(ids(&c.filtered_records()), vec!["a"]);
        let d = c.pagination();
        assert_eq!(d.page_count, 1);
        assert!(d.is_hidden());
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let c = controller(3, 0);
        assert_eq!(c.page_size(), 1);
        assert_eq!(c.page_count(), 3);
    }

    #[test]
    fn test_filter_buttons_mark_active() {
        let mut c = controller(3, 3);
        c.set_filter("backend");
        let pressed: Vec<_> = c
            .filter_buttons()
            .into_iter()
            .filter(|f| f.pressed)
            .map(|f| f.key)
            .collect();
        assert_eq!(pressed, vec!["backend"]);
        assert_eq!(c.filter_buttons()[0].label, "All");
    }

    #[test]
    fn test_card_click_opens() {
        assert_eq!(
            card_activation(CardTarget::Card("p1"), GridGesture::Click),
            Some("p1")
        );
        assert_eq!(
            card_activation(CardTarget::ViewButton("p1"), GridGesture::Click),
            Some("p1")
        );
    }

    #[test]
    fn test_card_keys_open() {
        for key in [Key::Enter, Key::Space] {
            assert_eq!(
                card_activation(CardTarget::Card("p2"), GridGesture::Key(key)),
                Some("p2")
            );
        }
        for key in [Key::Tab, Key::ArrowRight, Key::Escape, Key::Other] {
            assert_eq!(
                card_activation(CardTarget::Card("p2"), GridGesture::Key(key)),
                None
            );
        }
    }

    #[test]
    fn test_links_do_not_open() {
        assert_eq!(
            card_activation(CardTarget::Link("p1"), GridGesture::Click),
            None
        );
        assert_eq!(
            card_activation(CardTarget::Link("p1"), GridGesture::Key(Key::Enter)),
            None
        );
    }

    #[test]
    fn test_empty_card_and_background_do_not_open() {
        assert_eq!(card_activation(CardTarget::EmptyCard, GridGesture::Click), None);
        assert_eq!(
            card_activation(CardTarget::EmptyCard, GridGesture::Key(Key::Space)),
            None
        );
        assert_eq!(card_activation(CardTarget::Outside, GridGesture::Click), None);
        assert_eq!(card_activation(CardTarget::Card(""), GridGesture::Click), None);
    }

    #[test]
    fn test_activate_card_limited_to_current_page() {
        let mut c = controller(10, 6);
        let opened = c.activate_card(CardTarget::Card("p3"), GridGesture::Click);
        assert_eq!(opened.map(|r| r.id.as_str()), Some("p3"));
        assert!(c.activate_card(CardTarget::Card("p8"), GridGesture::Click).is_none());

        c.set_page(PageTarget::Next);
        let opened = c.activate_card(CardTarget::ViewButton("p8"), GridGesture::Click);
        assert_eq!(opened.map(|r| r.id.as_str()), Some("p8"));
        assert!(c.activate_card(CardTarget::Card("ghost"), GridGesture::Click).is_none());
    }

    #[test]
    fn test_filter_focus_follows_active_button() {
        let mut c = controller(4, 6);
        c.set_filter("backend");
        assert_eq!(c.render_focused(true).focus_filter, Some("backend"));
        assert_eq!(c.render_focused(false).focus_filter, None);
        assert_eq!(c.render().focus_filter, None);

        c.set_filter("unlisted");
        assert_eq!(c.render_focused(true).focus_filter, None);
    }

    #[test]
    fn test_parse_page_target() {
        assert_eq!("prev".parse::<PageTarget>().unwrap(), PageTarget::Previous);
        assert_eq!("next".parse::<PageTarget>().unwrap(), PageTarget::Next);
        assert_eq!("12".parse::<PageTarget>().unwrap(), PageTarget::Number(12));
        assert!("-1".parse::<PageTarget>().is_err());
        assert!("".parse::<PageTarget>().is_err());
        assert!("two".parse::<PageTarget>().is_err());
    }
}

//! Project detail modal with an autoplaying image carousel.
//!
//! One [`GalleryModal`] serves every record. It is either closed or open
//! on a single record; opening again re-initializes all state. While open,
//! an autoplay interval advances the carousel unless reduced motion is
//! requested, the user is interacting, the page is hidden, or there is
//! only one image. Manual navigation pauses autoplay and re-arms it after
//! a quiet period.
//!
//! Timers go through the injected [`Scheduler`]; at most one timer
//! (autoplay interval or quiet-period restart) is live at any moment.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::constants::{AUTOPLAY_INTERVAL_MS, NO_DESCRIPTION, RESTART_DELAY_MS};
use crate::input::{Key, KeyPress, Pointer, Visibility};
use crate::project::{ProjectCatalog, ProjectRecord};
use crate::scheduler::{Scheduler, TimerId, VirtualScheduler};

/// Opaque handle to a host element outside the modal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where keyboard focus sits, as far as the modal is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    Close,
    Prev,
    Next,
    Thumb(usize),
    Live,
    Repo,
    Outside(ElementId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// An image position whose reference can fail to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Main,
    Thumb(usize),
}

/// Whether the host should suppress the key's default action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryConfig {
    pub autoplay_interval_ms: u64,
    pub restart_delay_ms: u64,
    pub reduced_motion: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: AUTOPLAY_INTERVAL_MS,
            restart_delay_ms: RESTART_DELAY_MS,
            reduced_motion: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThumbView {
    pub index: usize,
    pub src: String,
    pub alt: String,
    pub selected: bool,
    /// Roving tabindex: only the selected thumbnail is in the tab order.
    pub tabbable: bool,
}

/// Everything the renderer needs to paint the open modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryView {
    pub record_id: String,
    pub title: String,
    pub paragraphs: Vec<String>,
    pub tags: Vec<String>,
    pub live: Option<String>,
    pub repo: Option<String>,
    pub image_src: String,
    pub image_alt: String,
    pub position: usize,
    pub total: usize,
    pub thumbs: Vec<ThumbView>,
    pub show_nav: bool,
    pub autoplay_active: bool,
}

pub struct GalleryModal<S: Scheduler> {
    catalog: Rc<ProjectCatalog>,
    scheduler: S,
    config: GalleryConfig,
    is_open: bool,
    record: Option<ProjectRecord>,
    images: Vec<String>,
    current_index: usize,
    interacting: bool,
    page_hidden: bool,
    autoplay_timer: Option<TimerId>,
    restart_timer: Option<TimerId>,
    last_focused: Option<ElementId>,
    focus: Option<FocusTarget>,
    main_fallback_used: bool,
    thumb_fallback_used: Vec<bool>,
}

impl<S: Scheduler> GalleryModal<S> {
    pub fn new(catalog: Rc<ProjectCatalog>, scheduler: S, config: GalleryConfig) -> Self {
        Self {
            catalog,
            scheduler,
            config,
            is_open: false,
            record: None,
            images: Vec::new(),
            current_index: 0,
            interacting: false,
            page_hidden: false,
            autoplay_timer: None,
            restart_timer: None,
            last_focused: None,
            focus: None,
            main_fallback_used: false,
            thumb_fallback_used: Vec::new(),
        }
    }

    // --- Queries ---

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn active_record(&self) -> Option<&ProjectRecord> {
        self.record.as_ref()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay_timer.is_some()
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn focused(&self) -> Option<&FocusTarget> {
        self.focus.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Reduced-motion preference changed at runtime.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.config.reduced_motion = reduced;
        if reduced {
            self.stop_autoplay();
        } else if self.is_open {
            self.start_autoplay();
        }
    }

    // --- Open / close ---

    /// Open the record with `id`. Unknown ids leave the modal untouched.
    pub fn open_by_id(&mut self, id: &str, active_element: Option<ElementId>) -> bool {
        let Some(record) = self.catalog.find(id).cloned() else {
            debug!(id, "open ignored: no such project");
            return false;
        };
        self.open(record, active_element);
        true
    }

    /// Open on `record`, remembering `active_element` for focus restore.
    pub fn open(&mut self, record: ProjectRecord, active_element: Option<ElementId>) {
        if self.is_open {
            self.stop_autoplay();
            // Focus is inside the modal; keep the element that opened it.
            if active_element.is_some() {
                self.last_focused = active_element;
            }
        } else {
            self.last_focused = active_element;
        }

        self.images = record.gallery_images(&self.catalog.defaults);
        self.thumb_fallback_used = vec![false; self.images.len()];
        self.main_fallback_used = false;
        self.current_index = 0;
        self.interacting = false;
        debug!(
            id = %record.id,
            images = self.images.len(),
            "gallery opened"
        );
        self.record = Some(record);
        self.is_open = true;
        self.focus = Some(FocusTarget::Close);
        self.start_autoplay();
    }

    /// Close the modal and return the element focus goes back to.
    /// Closing a closed modal does nothing.
    pub fn close(&mut self) -> Option<ElementId> {
        if !self.is_open {
            return None;
        }
        self.stop_autoplay();
        self.interacting = false;
        self.is_open = false;
        self.record = None;
        self.images.clear();
        self.thumb_fallback_used.clear();
        self.current_index = 0;
        let restored = self.last_focused.take();
        self.focus = restored.clone().map(FocusTarget::Outside);
        debug!(restored = ?restored, "gallery closed");
        restored
    }

    // --- Navigation ---

    /// Manual step to the neighbouring image, wrapping at both ends.
    pub fn navigate(&mut self, direction: Direction) {
        if !self.is_open {
            return;
        }
        self.set_main_image(self.current_index as isize + direction.offset());
        self.restart_autoplay();
    }

    /// Manual jump to `index`, wrapped into range.
    pub fn go_to(&mut self, index: usize) {
        if !self.is_open {
            return;
        }
        self.set_main_image(index as isize);
        self.restart_autoplay();
    }

    /// Thumbnail click: jump there and focus the thumbnail.
    pub fn activate_thumb(&mut self, index: usize) {
        if !self.is_open || index >= self.images.len() {
            return;
        }
        self.go_to(index);
        self.focus = Some(FocusTarget::Thumb(index));
    }

    fn set_main_image(&mut self, index: isize) {
        if self.images.is_empty() {
            return;
        }
        let len = self.images.len() as isize;
        self.current_index = index.rem_euclid(len) as usize;
        self.main_fallback_used = false;
        trace!(index = self.current_index, "main image set");
    }

    // --- Autoplay ---

    fn autoplay_eligible(&self) -> bool {
        self.is_open
            && self.images.len() > 1
            && !self.config.reduced_motion
            && !self.interacting
            && !self.page_hidden
    }

    fn start_autoplay(&mut self) {
        self.stop_autoplay();
        if !self.autoplay_eligible() {
            return;
        }
        let id = self.scheduler.start_interval(self.config.autoplay_interval_ms);
        trace!(%id, "autoplay started");
        self.autoplay_timer = Some(id);
    }

    fn stop_autoplay(&mut self) {
        if let Some(id) = self.autoplay_timer.take() {
            self.scheduler.cancel(id);
            trace!(%id, "autoplay stopped");
        }
        if let Some(id) = self.restart_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Pause now and try again after the quiet period.
    fn restart_autoplay(&mut self) {
        if self.config.reduced_motion {
            return;
        }
        self.stop_autoplay();
        if !self.is_open {
            return;
        }
        self.restart_timer = Some(self.scheduler.start_timeout(self.config.restart_delay_ms));
    }

    /// Dispatch a fired timer. Stale ids are ignored.
    pub fn handle_timer(&mut self, id: TimerId) {
        if self.autoplay_timer == Some(id) {
            self.set_main_image(self.current_index as isize + 1);
        } else if self.restart_timer == Some(id) {
            self.restart_timer = None;
            self.start_autoplay();
        } else {
            trace!(%id, "stale timer ignored");
        }
    }

    // --- Pointer / visibility ---

    pub fn pointer_down(&mut self, pointer: Pointer) {
        if !self.is_open || self.config.reduced_motion || !pointer.is_primary() {
            return;
        }
        self.interacting = true;
        self.stop_autoplay();
    }

    pub fn pointer_up(&mut self) {
        if !self.interacting {
            return;
        }
        self.interacting = false;
        if self.is_open {
            self.restart_autoplay();
        }
    }

    /// Leaving the gallery area ends a press like a release does.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                self.page_hidden = true;
                self.stop_autoplay();
            }
            Visibility::Visible => {
                self.page_hidden = false;
                if self.is_open {
                    self.restart_autoplay();
                }
            }
        }
    }

    // --- Keyboard and focus ---

    /// Host reports that focus moved (click, programmatic focus).
    pub fn focus(&mut self, target: FocusTarget) {
        self.focus = match target {
            FocusTarget::Thumb(i) if i >= self.images.len() => return,
            other => Some(other),
        };
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyOutcome {
        if !self.is_open {
            return KeyOutcome::Ignored;
        }

        if let Some(FocusTarget::Thumb(focused)) = self.focus
            && matches!(
                press.key,
                Key::ArrowLeft | Key::ArrowRight | Key::Home | Key::End | Key::Enter | Key::Space
            )
        {
            self.handle_thumb_key(focused, press.key);
            return KeyOutcome::Handled;
        }

        match press.key {
            Key::Escape => {
                self.close();
                KeyOutcome::Handled
            }
            Key::Tab => {
                self.trap_focus(press.modifiers.shift);
                KeyOutcome::Handled
            }
            _ if press.modifiers.has_command() => KeyOutcome::Ignored,
            Key::ArrowLeft => {
                self.navigate(Direction::Previous);
                KeyOutcome::Handled
            }
            Key::ArrowRight => {
                self.navigate(Direction::Next);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn handle_thumb_key(&mut self, focused: usize, key: Key) {
        let n = self.images.len();
        if n == 0 {
            return;
        }
        let next = match key {
            Key::ArrowRight => (focused + 1) % n,
            Key::ArrowLeft => (focused + n - 1) % n,
            Key::Home => 0,
            Key::End => n - 1,
            _ => {
                self.go_to(focused);
                focused
            }
        };
        self.focus = Some(FocusTarget::Thumb(next));
    }

    /// Modal controls in tab order.
    pub fn focusables(&self) -> Vec<FocusTarget> {
        let mut order = Vec::new();
        if !self.is_open {
            return order;
        }
        order.push(FocusTarget::Close);
        if self.images.len() > 1 {
            order.push(FocusTarget::Prev);
            order.push(FocusTarget::Next);
        }
        if !self.images.is_empty() {
            order.push(FocusTarget::Thumb(self.current_index));
        }
        if let Some(record) = &self.record {
            if record.live_link().is_some() {
                order.push(FocusTarget::Live);
            }
            if record.repo_link().is_some() {
                order.push(FocusTarget::Repo);
            }
        }
        order
    }

    fn trap_focus(&mut self, backwards: bool) {
        let order = self.focusables();
        if order.is_empty() {
            return;
        }
        let position = match &self.focus {
            // Any thumbnail stands in for the strip's single tab stop.
            Some(FocusTarget::Thumb(_)) => order
                .iter()
                .position(|t| matches!(t, FocusTarget::Thumb(_))),
            Some(target) => order.iter().position(|t| t == target),
            None => None,
        };
        let last = order.len() - 1;
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => last,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => i.checked_sub(1).unwrap_or(last),
        };
        self.focus = Some(order[next].clone());
    }

    // --- Images ---

    /// A displayed image failed to load. Returns the substitute reference
    /// the first time per slot, `None` afterwards.
    pub fn report_image_error(&mut self, slot: ImageSlot) -> Option<String> {
        if !self.is_open {
            return None;
        }
        let used = match slot {
            ImageSlot::Main => &mut self.main_fallback_used,
            ImageSlot::Thumb(i) => self.thumb_fallback_used.get_mut(i)?,
        };
        if *used {
            return None;
        }
        *used = true;
        debug!(?slot, "image fallback substituted");
        Some(self.catalog.defaults.project.clone())
    }

    pub fn view(&self) -> Option<GalleryView> {
        let record = self.record.as_ref().filter(|_| self.is_open)?;
        let defaults = &self.catalog.defaults;
        let title = record.display_title().to_string();
        let total = self.images.len();

        let paragraphs = if record.description.is_empty() {
            vec![NO_DESCRIPTION.to_string()]
        } else {
            record.description.paragraphs().to_vec()
        };

        let image_src = if self.main_fallback_used {
            defaults.project.clone()
        } else {
            self.images[self.current_index].clone()
        };

        let thumbs = self
            .images
            .iter()
            .enumerate()
            .map(|(index, src)| {
                let failed = self.thumb_fallback_used.get(index).copied().unwrap_or(false);
                ThumbView {
                    index,
                    src: if failed { defaults.project.clone() } else { src.clone() },
                    alt: format!("Thumbnail {}", index + 1),
                    selected: index == self.current_index,
                    tabbable: index == self.current_index,
                }
            })
            .collect();

        Some(GalleryView {
            record_id: record.id.clone(),
            image_alt: format!("{title} - Image {} of {total}", self.current_index + 1),
            title,
            paragraphs,
            tags: record.tags.clone(),
            live: record.live_link().map(str::to_string),
            repo: record.repo_link().map(str::to_string),
            image_src,
            position: self.current_index + 1,
            total,
            thumbs,
            show_nav: total > 1,
            autoplay_active: self.autoplay_active(),
        })
    }
}

impl GalleryModal<VirtualScheduler> {
    /// Advance virtual time by `ms`, dispatching due timers in order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms().saturating_add(ms);
        while let Some(id) = self.scheduler.pop_due(until) {
            self.handle_timer(id);
        }
        self.scheduler.settle(until);
    }
}

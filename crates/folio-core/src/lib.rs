//! Project catalog interaction engine.
//!
//! Two cooperating state machines driven by discrete UI events:
//! a catalog controller (category filter + pagination over a static
//! project list) and a gallery modal (image carousel with autoplay,
//! keyboard navigation and focus trapping). Timers are an injected
//! capability, so every transition is deterministic and testable.
//!
//! Zero I/O. The `markup` module paints plain-data render descriptions
//! into HTML fragments; nothing here touches a DOM or a clock.

pub mod catalog;
pub mod constants;
pub mod gallery;
pub mod input;
pub mod markup;
pub mod project;
pub mod scheduler;

pub use catalog::{
    CardTarget, CatalogController, CatalogRender, Change, FilterButton, GridGesture, GridState,
    PageButton, PageTarget, PaginationDescriptor, card_activation,
};
pub use constants::{ALL_FILTER, AUTOPLAY_INTERVAL_MS, DEFAULT_PAGE_SIZE, RESTART_DELAY_MS};
pub use gallery::{
    Direction, ElementId, FocusTarget, GalleryConfig, GalleryModal, GalleryView, ImageSlot,
    KeyOutcome, ThumbView,
};
pub use input::{Key, KeyPress, Modifiers, MouseButton, Pointer, Visibility};
pub use markup::{Document, Mount, Paint, paint_catalog, paint_gallery};
pub use project::{Badge, Category, Description, ImageDefaults, ProjectCatalog, ProjectRecord};
pub use scheduler::{Scheduler, TimerEvent, TimerId, TimerKind, VirtualScheduler};

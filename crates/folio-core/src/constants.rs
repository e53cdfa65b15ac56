/// Key of the synthetic category that matches every record.
pub const ALL_FILTER: &str = "all";

/// Label shown on the synthetic "all" filter button.
pub const ALL_FILTER_LABEL: &str = "All";

/// Records per catalog page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Placeholder href that marks a link as absent.
pub const LINK_PLACEHOLDER: &str = "#";

/// Autoplay tick period (ms).
pub const AUTOPLAY_INTERVAL_MS: u64 = 3500;

/// Quiet period after manual interaction before autoplay resumes (ms).
pub const RESTART_DELAY_MS: u64 = 1000;

/// Fallback for project covers and gallery images.
pub const DEFAULT_PROJECT_IMAGE: &str = "images/projects/defaults/project-default.png";

/// Illustration shown by the empty-state card.
pub const DEFAULT_EMPTY_IMAGE: &str = "images/projects/defaults/empty-default.png";

/// Shown when a record has a blank title.
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Shown when a record has no description paragraphs.
pub const NO_DESCRIPTION: &str = "No description available.";

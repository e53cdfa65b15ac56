//! Scripted gallery sessions replayed against virtual time.
//!
//! A script is a whitespace-separated list of steps:
//! `next prev goto:2 wait:3500 press release leave hide show key:shift+tab close open`.

use std::fmt;
use std::str::FromStr;

use folio_core::{
    Direction, ElementId, FocusTarget, GalleryModal, KeyPress, MouseButton, Pointer,
    VirtualScheduler, Visibility,
};

/// Longest single `wait:` step (one day of virtual time).
pub const MAX_WAIT_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
    GoTo(usize),
    Wait(u64),
    Press,
    Release,
    Leave,
    Hide,
    Show,
    Key(KeyPress),
    Close,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStepError(String);

impl fmt::Display for ParseStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid script step: {:?}", self.0)
    }
}

impl std::error::Error for ParseStepError {}

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStepError(s.to_string());
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let step = match (name.to_ascii_lowercase().as_str(), arg) {
            ("next", None) => Step::Next,
            ("prev" | "previous", None) => Step::Prev,
            ("goto", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Step::GoTo(n),
                _ => return Err(err()),
            },
            ("wait", Some(ms)) => match ms.parse::<u64>() {
                Ok(ms) if ms <= MAX_WAIT_MS => Step::Wait(ms),
                _ => return Err(err()),
            },
            ("press", None) => Step::Press,
            ("release", None) => Step::Release,
            ("leave", None) => Step::Leave,
            ("hide", None) => Step::Hide,
            ("show", None) => Step::Show,
            ("key", Some(key)) => Step::Key(key.parse().map_err(|_| err())?),
            ("close", None) => Step::Close,
            ("open", None) => Step::Open,
            _ => return Err(err()),
        };
        Ok(step)
    }
}

/// Split every argument on whitespace and parse each step.
pub fn parse_script<S: AsRef<str>>(parts: &[S]) -> Result<Vec<(String, Step)>, ParseStepError> {
    parts
        .iter()
        .flat_map(|part| part.as_ref().split_whitespace())
        .map(|token| token.parse().map(|step| (token.to_string(), step)))
        .collect()
}

fn describe_focus(focus: Option<&FocusTarget>) -> String {
    match focus {
        None => "none".to_string(),
        Some(FocusTarget::Close) => "close".to_string(),
        Some(FocusTarget::Prev) => "prev".to_string(),
        Some(FocusTarget::Next) => "next".to_string(),
        Some(FocusTarget::Thumb(i)) => format!("thumb:{}", i + 1),
        Some(FocusTarget::Live) => "live".to_string(),
        Some(FocusTarget::Repo) => "repo".to_string(),
        Some(FocusTarget::Outside(el)) => format!("outside:{el}"),
    }
}

/// One status line: virtual time, the step that ran, and the modal state.
pub fn status_line(modal: &GalleryModal<VirtualScheduler>, label: &str) -> String {
    let now = modal.scheduler().now_ms();
    let focus = describe_focus(modal.focused());
    if modal.is_open() {
        format!(
            "{now:>7}ms  {label:<14} image {}/{}  autoplay {}  focus {focus}",
            modal.current_index() + 1,
            modal.images().len(),
            if modal.autoplay_active() { "on" } else { "off" },
        )
    } else {
        format!("{now:>7}ms  {label:<14} closed  focus {focus}")
    }
}

/// Open `id`, run `steps`, and return one status line per step plus a
/// timer summary.
pub fn replay(
    modal: &mut GalleryModal<VirtualScheduler>,
    id: &str,
    steps: &[(String, Step)],
) -> Vec<String> {
    let opener = ElementId::new(format!("card-{id}"));
    let mut lines = Vec::with_capacity(steps.len() + 2);

    modal.open_by_id(id, Some(opener.clone()));
    lines.push(status_line(modal, "open"));

    for (label, step) in steps {
        match *step {
            Step::Next => modal.navigate(Direction::Next),
            Step::Prev => modal.navigate(Direction::Previous),
            Step::GoTo(n) => modal.go_to(n - 1),
            Step::Wait(ms) => modal.advance(ms),
            Step::Press => modal.pointer_down(Pointer::Mouse(MouseButton::Primary)),
            Step::Release => modal.pointer_up(),
            Step::Leave => modal.pointer_leave(),
            Step::Hide => modal.set_visibility(Visibility::Hidden),
            Step::Show => modal.set_visibility(Visibility::Visible),
            Step::Key(press) => {
                modal.handle_key(press);
            }
            Step::Close => {
                modal.close();
            }
            Step::Open => {
                modal.open_by_id(id, Some(opener.clone()));
            }
        }
        tracing::debug!(step = %label, "replayed");
        lines.push(status_line(modal, label));
    }

    let scheduler = modal.scheduler();
    lines.push(format!(
        "timers: started={} cancelled={} live={} peak={}",
        scheduler.starts(),
        scheduler.cancels(),
        scheduler.live(),
        scheduler.peak_live(),
    ));
    lines
}

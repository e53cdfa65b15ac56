//! Timer capability injected into the gallery.
//!
//! The gallery never touches a clock. It asks a [`Scheduler`] to arm and
//! cancel timers and is told which timer fired through
//! `GalleryModal::handle_timer`. Hosts back this with their event loop;
//! tests and scripted replays use [`VirtualScheduler`].

use std::fmt;

/// Handle to an armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a host timer handle (e.g. a `setInterval` id).
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

pub trait Scheduler {
    /// Arm a repeating timer firing every `period_ms`.
    fn start_interval(&mut self, period_ms: u64) -> TimerId;

    /// Arm a one-shot timer firing once after `delay_ms`.
    fn start_timeout(&mut self, delay_ms: u64) -> TimerId;

    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Interval,
    Timeout,
}

/// Timer lifecycle record kept by [`VirtualScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Started {
        id: TimerId,
        kind: TimerKind,
        at_ms: u64,
    },
    Cancelled {
        id: TimerId,
        at_ms: u64,
    },
    Fired {
        id: TimerId,
        at_ms: u64,
    },
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    id: TimerId,
    kind: TimerKind,
    deadline_ms: u64,
    period_ms: u64,
}

/// Deterministic scheduler over a virtual millisecond clock.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTimer>,
    log: Vec<TimerEvent>,
    peak_live: usize,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Timers armed and not yet cancelled (one-shots also leave on firing).
    pub fn live(&self) -> usize {
        self.pending.len()
    }

    pub fn live_intervals(&self) -> usize {
        self.pending
            .iter()
            .filter(|t| t.kind == TimerKind::Interval)
            .count()
    }

    /// Highest number of simultaneously live timers ever observed.
    pub fn peak_live(&self) -> usize {
        self.peak_live
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn log(&self) -> &[TimerEvent] {
        &self.log
    }

    pub fn starts(&self) -> usize {
        self.log
            .iter()
            .filter(|e| matches!(e, TimerEvent::Started { .. }))
            .count()
    }

    pub fn interval_starts(&self) -> usize {
        self.log
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    TimerEvent::Started {
                        kind: TimerKind::Interval,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn cancels(&self) -> usize {
        self.log
            .iter()
            .filter(|e| matches!(e, TimerEvent::Cancelled { .. }))
            .count()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock
    /// to its deadline. Ties fire in arming order. Intervals are re-armed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= until_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.id))
            .map(|(i, _)| i)?;

        let timer = self.pending[idx];
        self.now_ms = self.now_ms.max(timer.deadline_ms);
        match timer.kind {
            TimerKind::Interval => match timer.deadline_ms.checked_add(timer.period_ms) {
                Some(next) => self.pending[idx].deadline_ms = next,
                // Next deadline is past the end of the clock; it can never fire again.
                None => {
                    self.pending.remove(idx);
                }
            },
            TimerKind::Timeout => {
                self.pending.remove(idx);
            }
        }
        self.log.push(TimerEvent::Fired {
            id: timer.id,
            at_ms: self.now_ms,
        });
        Some(timer.id)
    }

    /// Move the clock forward to `until_ms` once every due timer was popped.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn arm(&mut self, kind: TimerKind, delay_ms: u64) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        // A zero period would spin forever inside one advance.
        let period_ms = delay_ms.max(1);
        self.pending.push(PendingTimer {
            id,
            kind,
            deadline_ms: self.now_ms.saturating_add(period_ms),
            period_ms,
        });
        self.peak_live = self.peak_live.max(self.pending.len());
        self.log.push(TimerEvent::Started {
            id,
            kind,
            at_ms: self.now_ms,
        });
        id
    }
}

impl Scheduler for VirtualScheduler {
    fn start_interval(&mut self, period_ms: u64) -> TimerId {
        self.arm(TimerKind::Interval, period_ms)
    }

    fn start_timeout(&mut self, delay_ms: u64) -> TimerId {
        self.arm(TimerKind::Timeout, delay_ms)
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(idx) = self.pending.iter().position(|t| t.id == id) {
            self.pending.remove(idx);
            self.log.push(TimerEvent::Cancelled {
                id,
                at_ms: self.now_ms,
            });
        }
    }
}

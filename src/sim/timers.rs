//! Wall-clock interval timers for spawning and difficulty
//!
//! Timers are not tied to frames. Every arm hands out a fresh token, and every
//! cancel bumps the session, so a handle captured before a restart or a re-arm
//! can be recognised as stale and ignored.

use serde::Serialize;

use crate::consts::MAX_TIMER_CATCHUP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TimerKind {
    Difficulty,
    ObstacleSpawn,
    PlatformSpawn,
}

/// Identifies one arming of one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerHandle {
    pub kind: TimerKind,
    pub session: u64,
    pub token: u64,
}

/// A timer occurrence that is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub handle: TimerHandle,
    pub due_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    period_ms: u64,
    next_due_ms: u64,
}

/// All live timers of the current session
#[derive(Debug, Clone, Default)]
pub struct Timers {
    session: u64,
    next_token: u64,
    timers: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// (Re)arm `kind` to fire every `period_ms` starting from `now_ms`.
    ///
    /// Any previous arming of the same kind is replaced and its handle goes stale.
    pub fn arm(&mut self, kind: TimerKind, period_ms: u64, now_ms: u64) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.next_token += 1;
        let handle = TimerHandle {
            kind,
            session: self.session,
            token: self.next_token,
        };
        let timer = Timer {
            handle,
            period_ms,
            next_due_ms: now_ms + period_ms,
        };

        match self.timers.iter_mut().find(|t| t.handle.kind == kind) {
            Some(existing) => *existing = timer,
            None => self.timers.push(timer),
        }
        handle
    }

    /// Drop every timer and invalidate all outstanding handles
    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.session += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// The handle still refers to the current arming of its timer
    pub fn is_live(&self, handle: &TimerHandle) -> bool {
        handle.session == self.session && self.timers.iter().any(|t| t.handle == *handle)
    }

    pub fn handles(&self) -> Vec<TimerHandle> {
        self.timers.iter().map(|t| t.handle).collect()
    }

    pub fn period(&self, kind: TimerKind) -> Option<u64> {
        self.timers
            .iter()
            .find(|t| t.handle.kind == kind)
            .map(|t| t.period_ms)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.next_due_ms).min()
    }

    /// Pop the earliest occurrence due at or before `now_ms`.
    ///
    /// Ties are broken by [`TimerKind`] order so difficulty changes land before
    /// spawns scheduled for the same instant. A timer that fell far behind skips
    /// ahead so that at most [`MAX_TIMER_CATCHUP`] occurrences are replayed.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Firing> {
        if self.next_due()? > now_ms {
            return None;
        }
        for timer in &mut self.timers {
            if timer.next_due_ms <= now_ms {
                let behind = (now_ms - timer.next_due_ms) / timer.period_ms;
                if behind >= MAX_TIMER_CATCHUP {
                    let skipped = behind - MAX_TIMER_CATCHUP + 1;
                    log::warn!("{:?} timer skipped {} firings", timer.handle.kind, skipped);
                    timer.next_due_ms += skipped * timer.period_ms;
                }
            }
        }

        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due_ms <= now_ms)
            .min_by_key(|t| (t.next_due_ms, t.handle.kind))?;

        let firing = Firing {
            handle: timer.handle,
            due_ms: timer.next_due_ms,
        };
        timer.next_due_ms += timer.period_ms;
        Some(firing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_period() {
        let mut timers = Timers::new();
        let h = timers.arm(TimerKind::ObstacleSpawn, 100, 0);

        assert_eq!(timers.pop_due(99), None);
        assert_eq!(
            timers.pop_due(100),
            Some(Firing {
                handle: h,
                due_ms: 100
            })
        );
        assert_eq!(timers.pop_due(150), None);
        assert_eq!(timers.pop_due(250).map(|f| f.due_ms), Some(200));
        assert_eq!(timers.pop_due(250), None);
    }

    #[test]
    fn test_firings_come_out_in_time_order() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::ObstacleSpawn, 30, 0);
        timers.arm(TimerKind::PlatformSpawn, 50, 0);
        timers.arm(TimerKind::Difficulty, 60, 0);

        let mut order = Vec::new();
        while let Some(f) = timers.pop_due(60) {
            order.push((f.due_ms, f.handle.kind));
        }
        assert_eq!(
            order,
            vec![
                (30, TimerKind::ObstacleSpawn),
                (50, TimerKind::PlatformSpawn),
                (60, TimerKind::Difficulty),
                (60, TimerKind::ObstacleSpawn),
            ]
        );
    }

    #[test]
    fn test_rearm_makes_old_handle_stale() {
        let mut timers = Timers::new();
        let old = timers.arm(TimerKind::PlatformSpawn, 100, 0);
        let new = timers.arm(TimerKind::PlatformSpawn, 80, 50);
        assert!(!timers.is_live(&old));
        assert!(timers.is_live(&new));
        assert_eq!(timers.period(TimerKind::PlatformSpawn), Some(80));
        assert_eq!(timers.handles().len(), 1);
        assert_eq!(timers.next_due(), Some(130));
    }

    #[test]
    fn test_cancel_all_invalidates_session() {
        let mut timers = Timers::new();
        let h = timers.arm(TimerKind::Difficulty, 20_000, 0);
        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(!timers.is_live(&h));

        // re-arming after cancel yields a handle from the new session
        let again = timers.arm(TimerKind::Difficulty, 20_000, 0);
        assert_ne!(again.session, h.session);
        assert!(!timers.is_live(&h));
        assert!(timers.is_live(&again));
    }

    #[test]
    fn test_catchup_is_bounded() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::ObstacleSpawn, 10, 0);
        let mut count = 0;
        while timers.pop_due(10_000).is_some() {
            count += 1;
        }
        assert_eq!(count, MAX_TIMER_CATCHUP);
    }
}

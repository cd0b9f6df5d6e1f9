//! Animation-frame and timer queues driven by an external clock.

use std::time::Duration;

/// Handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// Handle for a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    payload: T,
}

/// Frame callbacks run once, on the next frame after they were requested.
/// Timers fire once their due time has passed, earliest first.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    frames: Vec<(FrameId, T)>,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn request_frame(&mut self, payload: T) -> FrameId {
        let id = FrameId(self.next());
        self.frames.push((id, payload));
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(f, _)| *f != id);
        self.frames.len() != before
    }

    /// Take every frame requested so far, in request order.
    pub fn take_frames(&mut self) -> Vec<(FrameId, T)> {
        std::mem::take(&mut self.frames)
    }

    pub fn has_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn set_timeout(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next());
        self.timers.push(Timer {
            id,
            due: now + delay,
            payload,
        });
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Remove and return the earliest timer due at `now`, if any.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        Some((timer.id, timer.payload))
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

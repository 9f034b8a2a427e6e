// src/audio/visualizer/scheduler.rs
//! Per-display-frame callback scheduling.

use std::time::{Duration, Instant};

/// Identifies one scheduled frame so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Something that can call back once on the next display frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancelling an unknown or already delivered handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame source driven by the UI loop at a fixed frame rate.
///
/// Holds at most one pending request. A frame that runs long simply pushes the
/// next one back; nothing is skipped or queued up.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameHandle, Instant)>,
    last_delivered: Option<Instant>,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / frame_rate.max(1),
            next_id: 0,
            pending: None,
            last_delivered: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending.map(|(handle, _)| handle)
    }

    /// When the pending frame becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, due)| due)
    }

    /// Hand out the pending frame if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, due)) if now >= due => {
                self.pending = None;
                self.last_delivered = Some(now);
                Some(handle)
            }
            _ => None,
        }
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        let now = Instant::now();
        let due = self
            .last_delivered
            .map(|last| (last + self.interval).max(now))
            .unwrap_or(now);
        self.pending = Some((handle, due));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending() == Some(handle) {
            self.pending = None;
        }
    }
}

use std::time::{Duration, Instant};

/// Loop health over one reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub avg_frame_ms: f32,
    pub worst_frame_ms: f32,
    /// Frames whose wall-clock delta exceeded the loop's frame clamp.
    pub clamped_frames: u32,
    pub dropped_backlog_ms: u64,
}

#[derive(Debug, Default)]
struct WindowCounters {
    frames: u32,
    ticks: u32,
    clamped_frames: u32,
    frame_time_total: Duration,
    worst_frame: Duration,
    dropped_backlog: Duration,
}

impl WindowCounters {
    fn into_snapshot(self, elapsed: Duration) -> LoopMetricsSnapshot {
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let avg_frame_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_total.as_secs_f32() * 1000.0 / frames as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            avg_frame_ms,
            worst_frame_ms: self.worst_frame.as_secs_f32() * 1000.0,
            clamped_frames: self.clamped_frames,
            dropped_backlog_ms: u64::try_from(self.dropped_backlog.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Collects per-frame and per-tick counters and hands back a snapshot once
/// `interval` has elapsed, then starts a fresh window.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    window_start: Instant,
    counters: WindowCounters,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            window_start: now,
            counters: WindowCounters::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, clamped: bool) {
        let counters = &mut self.counters;
        counters.frames = counters.frames.saturating_add(1);
        counters.frame_time_total = counters.frame_time_total.saturating_add(frame_dt);
        counters.worst_frame = counters.worst_frame.max(frame_dt);
        if clamped {
            counters.clamped_frames = counters.clamped_frames.saturating_add(1);
        }
    }

    pub(crate) fn record_tick(&mut self) {
        self.counters.ticks = self.counters.ticks.saturating_add(1);
    }

    pub(crate) fn record_dropped_backlog(&mut self, dropped: Duration) {
        self.counters.dropped_backlog = self.counters.dropped_backlog.saturating_add(dropped);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        self.window_start = now;
        Some(std::mem::take(&mut self.counters).into_snapshot(elapsed))
    }
}

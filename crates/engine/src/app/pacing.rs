use std::env;
use std::time::{Duration, Instant};

use tracing::warn;

use super::loop_runner::{LoopConfig, SLOW_FRAME_ENV_VAR};

const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// What one presented frame is allowed to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameBudget {
    pub(crate) ticks: u32,
    /// Wall-clock time since the previous frame, before clamping.
    pub(crate) raw_dt: Duration,
    pub(crate) clamped: bool,
    /// Simulation time discarded because the tick cap was hit.
    pub(crate) dropped_backlog: Duration,
}

/// Fixed-step accumulator plus the optional render cap.
///
/// Each frame adds the clamped wall-clock delta to a backlog, spends it in
/// whole ticks up to `max_ticks_per_frame`, and drops whatever is left over a
/// full tick so a stall never turns into a burst of catch-up ticks.
#[derive(Debug)]
pub(crate) struct FramePacer {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    render_interval: Option<Duration>,
    backlog: Duration,
    last_frame: Instant,
    last_present: Instant,
}

impl FramePacer {
    pub(crate) fn new(config: &LoopConfig, now: Instant) -> Self {
        let tps = config.target_tps.max(1);
        let max_frame_delta = if config.max_frame_delta.is_zero() {
            DEFAULT_MAX_FRAME_DELTA
        } else {
            config.max_frame_delta
        };
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / f64::from(tps)),
            max_frame_delta,
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            render_interval: config
                .max_render_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps))),
            backlog: Duration::ZERO,
            last_frame: now,
            last_present: now,
        }
    }

    pub(crate) fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub(crate) fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub(crate) fn max_ticks_per_frame(&self) -> u32 {
        self.max_ticks_per_frame
    }

    pub(crate) fn render_cap_label(&self) -> String {
        match self.render_interval {
            Some(interval) => format!("{:.0}", interval.as_secs_f64().recip()),
            None => "off".to_string(),
        }
    }

    pub(crate) fn begin_frame(&mut self, now: Instant) -> FrameBudget {
        let raw_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let clamped = raw_dt > self.max_frame_delta;
        self.backlog = self
            .backlog
            .saturating_add(raw_dt.min(self.max_frame_delta));

        let mut ticks = 0;
        while self.backlog >= self.fixed_dt && ticks < self.max_ticks_per_frame {
            self.backlog -= self.fixed_dt;
            ticks += 1;
        }
        let dropped_backlog = if self.backlog >= self.fixed_dt {
            std::mem::take(&mut self.backlog)
        } else {
            Duration::ZERO
        };

        FrameBudget {
            ticks,
            raw_dt,
            clamped,
            dropped_backlog,
        }
    }

    /// Sleep needed before presenting so frames respect the render cap.
    pub(crate) fn present_delay(&self, now: Instant) -> Duration {
        let Some(interval) = self.render_interval else {
            return Duration::ZERO;
        };
        interval.saturating_sub(now.saturating_duration_since(self.last_present))
    }

    pub(crate) fn mark_presented(&mut self, now: Instant) {
        self.last_present = now;
    }
}

/// Debug-only delay injected before every frame; `EXPLORER_SLOW_FRAME_MS`
/// overrides the configured value.
pub(crate) fn slow_frame_delay(configured_ms: u64) -> Duration {
    slow_frame_delay_from(env::var(SLOW_FRAME_ENV_VAR), configured_ms)
}

fn slow_frame_delay_from(raw: Result<String, env::VarError>, configured_ms: u64) -> Duration {
    let fallback = Duration::from_millis(configured_ms);
    match raw {
        Ok(value) => value.trim().parse::<u64>().map_or_else(
            |_| {
                warn!(var = SLOW_FRAME_ENV_VAR, value = %value, "slow_frame_override_invalid");
                fallback
            },
            Duration::from_millis,
        ),
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(var = SLOW_FRAME_ENV_VAR, error = %err, "slow_frame_override_unreadable");
            fallback
        }
    }
}

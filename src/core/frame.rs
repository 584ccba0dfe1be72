use std::time::{Duration, Instant};

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Timing for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub number: u64,
    /// Seconds since the clock started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

/// Frame clock measuring elapsed time from the first tick
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    number: u64,
    fps: FpsCounter,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            number: 0,
            fps: FpsCounter::default(),
        }
    }

    pub fn tick(&mut self) -> Frame {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Frame {
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.number += 1;

        if let Some(fps) = self.fps.record(delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        Frame {
            number: self.number,
            elapsed: now.duration_since(self.start).as_secs_f32(),
            delta,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn fps(&self) -> f32 {
        self.fps.current
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame rate over one-second windows
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    timer: f32,
    current: f32,
}

impl FpsCounter {
    /// Returns the new rate whenever a window completes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.timer += delta;

        if self.timer >= FPS_UPDATE_INTERVAL {
            self.current = self.frames as f32 / self.timer;
            self.frames = 0;
            self.timer = 0.0;
            Some(self.current)
        } else {
            None
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_reports_once_per_window() {
        let mut counter = FpsCounter::default();
        let mut frames = 0;
        let mut reported = None;
        while reported.is_none() && frames < 100 {
            frames += 1;
            reported = counter.record(1.0 / 60.0);
        }
        assert!((60..=61).contains(&frames));
        let fps = reported.unwrap();
        assert!((fps - 60.0).abs() < 1.0);
        assert_eq!(counter.current(), fps);
    }

    #[test]
    fn test_clock_elapsed_is_absolute() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let first = clock.tick_at(start + Duration::from_millis(500));
        let second = clock.tick_at(start + Duration::from_millis(750));

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
        assert!((first.elapsed - 0.5).abs() < 1e-6);
        assert!((second.elapsed - 0.75).abs() < 1e-6);
        assert!((second.delta - 0.25).abs() < 1e-6);
    }
}

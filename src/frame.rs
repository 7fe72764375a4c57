use std::time::Instant;

/// Frame metadata - carries frame number and timing info in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time_ms: f64,
    pub delta_ms: f64,
}

impl FrameInfo {
    pub fn new(number: u64, time_ms: f64, delta_ms: f64) -> Self {
        Self {
            number,
            time_ms,
            delta_ms,
        }
    }

    pub fn delta_secs(&self) -> f32 {
        (self.delta_ms / 1000.0) as f32
    }
}

/// Infinite iterator over wall-clock frames
/// Use this in a loop: `for frame in frames { ... }`
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f64() * 1000.0;
        let time = now.duration_since(self.start_time).as_secs_f64() * 1000.0;

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        Some(info)
    }
}

/// Frames spaced a fixed interval apart, independent of wall-clock time
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: f64,
    frame_number: u64,
}

impl FixedStep {
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            frame_number: 0,
        }
    }

    /// Sixty frames per second
    pub fn sixty_hz() -> Self {
        Self::new(1000.0 / 60.0)
    }
}

impl Iterator for FixedStep {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let number = self.frame_number;
        let delta = if number == 0 { 0.0 } else { self.step_ms };
        self.frame_number += 1;
        Some(FrameInfo::new(number, number as f64 * self.step_ms, delta))
    }
}

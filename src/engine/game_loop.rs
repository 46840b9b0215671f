/// Frame timing statistics
///
/// The scene advances one simulation step per rendered frame, so there is no
/// fixed timestep here. The clock only measures how often frames arrive.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// How often the FPS figure is recomputed, in frames
const FPS_UPDATE_INTERVAL: u64 = 10;

/// Timing state for a running scene
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Time of last frame
    last_frame_time: Instant,

    /// Time when the clock started
    start_time: Instant,

    /// Frame timing history for FPS calculation
    frame_times: VecDeque<Duration>,

    /// Frames recorded so far
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,

    /// Time between the last two frames, in seconds
    delta_time: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            start_time: now,
            frame_times: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
            delta_time: 0.0,
        }
    }

    /// Record that a frame was rendered
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.record(now.duration_since(self.last_frame_time));
        self.last_frame_time = now;
    }

    /// Record a frame that took `frame_time`
    pub fn record(&mut self, frame_time: Duration) {
        self.frame_count += 1;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.pop_front();
        }

        if self.frame_count % FPS_UPDATE_INTERVAL == 0 {
            self.update_fps();
        }

        self.delta_time = frame_time.as_secs_f32();
    }

    /// Forget all history, as if just created
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Seconds between the last two frames
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total elapsed time since start
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

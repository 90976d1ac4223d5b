//! Rendering system: tracks frame pacing for the draw stage.
//!
//! Submission to the graphics backend belongs to the host; this system
//! keeps the per-frame bookkeeping a renderer needs (frame index, smoothed
//! frame time).

use system_api::{export_system, System};

/// Weight of the newest sample in the frame-time moving average.
const SMOOTHING: f64 = 0.1;

#[derive(Debug, Default)]
pub struct RenderingSystem {
    ready: bool,
    frame_index: u64,
    average_frame_time: f64,
}

impl RenderingSystem {
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Smoothed seconds per frame; zero until the first non-zero tick.
    pub fn average_frame_time(&self) -> f64 {
        self.average_frame_time
    }

    pub fn frames_per_second(&self) -> f64 {
        if self.average_frame_time > 0.0 {
            1.0 / self.average_frame_time
        } else {
            0.0
        }
    }
}

impl System for RenderingSystem {
    fn name(&self) -> &str {
        "RenderingSystem"
    }

    fn initialize(&mut self) -> bool {
        self.ready = true;
        self.frame_index = 0;
        self.average_frame_time = 0.0;
        true
    }

    fn update(&mut self, delta_time: f64) {
        if !self.ready {
            return;
        }

        self.frame_index += 1;
        if delta_time > 0.0 {
            self.average_frame_time = if self.average_frame_time == 0.0 {
                delta_time
            } else {
                self.average_frame_time + SMOOTHING * (delta_time - self.average_frame_time)
            };
        }
    }

    fn shutdown(&mut self) {
        self.ready = false;
    }
}

export_system!(RenderingSystem);

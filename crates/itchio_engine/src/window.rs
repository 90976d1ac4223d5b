//! Headless window.
//!
//! Stands in for a platform window: it has a title and a client size, and
//! "closes" either when asked to or after a configured number of frames.

use tracing::{debug, info};

#[derive(Debug)]
pub struct Window {
    title: String,
    width: u32,
    height: u32,
    /// 0 means no frame limit.
    max_frames: u64,
    frames_pumped: u64,
    open: bool,
}

impl Window {
    /// Opens a window.
    ///
    /// # Arguments
    ///
    /// * `title` - Window title
    /// * `width`, `height` - Client area size in pixels
    /// * `max_frames` - Frames to pump before closing; 0 for no limit
    pub fn open(title: &str, width: u32, height: u32, max_frames: u64) -> Self {
        info!("🪟 Opened window '{}' ({}x{})", title, width, height);
        Self {
            title: title.to_string(),
            width,
            height,
            max_frames,
            frames_pumped: 0,
            open: true,
        }
    }

    /// Processes pending window events. Returns whether the window is still
    /// open.
    pub fn pump_events(&mut self) -> bool {
        if !self.open {
            return false;
        }

        self.frames_pumped += 1;
        if self.max_frames != 0 && self.frames_pumped > self.max_frames {
            debug!("Frame limit of {} reached", self.max_frames);
            self.close();
        }

        self.open
    }

    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            info!("🪟 Closed window '{}'", self.title);
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

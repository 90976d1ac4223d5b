//! Graphics backend selection and frame presentation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::window::Window;

/// Rendering API requested in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    None,
    DirectX11,
    DirectX12,
    OpenGl,
}

impl std::fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GraphicsApi::None => "none",
            GraphicsApi::DirectX11 => "DirectX 11",
            GraphicsApi::DirectX12 => "DirectX 12",
            GraphicsApi::OpenGl => "OpenGL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("no graphics API selected")]
    NoApi,
    #[error("window is closed")]
    WindowClosed,
}

#[derive(Debug)]
pub struct Graphics {
    api: GraphicsApi,
    active: bool,
    in_frame: bool,
    clear_color: [f32; 4],
    frames_presented: u64,
}

impl Graphics {
    /// Creates a renderer for `window` using `api`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::NoApi`] when `api` is [`GraphicsApi::None`] and
    /// [`GraphicsError::WindowClosed`] when the window is no longer open.
    pub fn initialize(api: GraphicsApi, window: &Window) -> Result<Self, GraphicsError> {
        if api == GraphicsApi::None {
            return Err(GraphicsError::NoApi);
        }
        if !window.is_open() {
            return Err(GraphicsError::WindowClosed);
        }

        let (width, height) = window.size();
        info!("🎨 Initialized {} renderer ({}x{})", api, width, height);

        Ok(Self {
            api,
            active: true,
            in_frame: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frames_presented: 0,
        })
    }

    /// Starts recording a frame. Ignored after shutdown.
    pub fn begin_frame(&mut self) {
        if self.active {
            self.in_frame = true;
        }
    }

    /// Clears the frame being recorded to `rgba`.
    pub fn clear(&mut self, rgba: [f32; 4]) {
        if self.in_frame {
            self.clear_color = rgba;
        }
    }

    /// Presents the current frame. Does nothing outside `begin_frame`.
    pub fn end_frame(&mut self) {
        if self.in_frame {
            self.in_frame = false;
            self.frames_presented += 1;
        }
    }

    /// Releases the renderer. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        if self.in_frame {
            warn!("Graphics shut down mid-frame");
            self.in_frame = false;
        }
        self.active = false;
        info!(
            "🎨 {} renderer shut down after {} frames",
            self.api, self.frames_presented
        );
    }

    pub fn api(&self) -> GraphicsApi {
        self.api
    }

    /// Frames completed with [`Graphics::end_frame`].
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

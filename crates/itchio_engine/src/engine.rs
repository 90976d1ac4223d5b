//! The engine: owns the window, renderer, asset cache and system registry,
//! and drives the loaded systems on a fixed timestep.

use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use system_runtime::SystemRegistry;

use crate::assets::AssetCache;
use crate::config::AppConfig;
use crate::graphics::Graphics;
use crate::signals::{self, ShutdownSignal};
use crate::window::Window;

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.15, 1.0];

/// Totals for a run of the frame loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Sum of the timesteps handed to the systems.
    pub simulated_seconds: f64,
}

/// Why [`Engine::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The window closed, either on request or at the frame limit.
    WindowClosed,
    /// The process received a stop signal.
    Signal(ShutdownSignal),
}

pub struct Engine {
    config: AppConfig,
    // Dropped before the renderer and window.
    registry: SystemRegistry,
    assets: AssetCache,
    graphics: Graphics,
    window: Window,
    stats: FrameStats,
    shut_down: bool,
}

impl Engine {
    /// Brings up the window, renderer and assets for the configured game
    /// type, then loads and initializes its systems.
    ///
    /// If any system fails to initialize, everything started so far is torn
    /// down and the error is returned.
    pub fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        info!(
            "🚀 Initializing engine for game type '{}'",
            config.engine.game_type
        );

        let window = Window::open(
            &config.engine.window_title,
            config.engine.window_width,
            config.engine.window_height,
            config.engine.max_frames,
        );
        let graphics = Graphics::initialize(config.engine.graphics_api, &window)?;

        let mut engine = Self {
            registry: SystemRegistry::new(),
            assets: AssetCache::new(),
            graphics,
            window,
            stats: FrameStats::default(),
            shut_down: false,
            config,
        };

        engine.assets.set_directory(engine.config.assets_dir());
        engine
            .assets
            .load_manifest(&engine.config.asset_manifest())?;

        if engine.config.systems.auto_load {
            let systems_dir = engine.config.systems_dir();
            info!("🔌 Loading systems from {}", systems_dir.display());
            let loaded = engine
                .registry
                .load_systems_from_directory(&systems_dir, &engine.config.systems.whitelist)?;
            info!("🔌 {} systems loaded", loaded);
        } else {
            info!("🔌 System auto-load disabled");
        }

        if let Err(e) = engine.registry.try_initialize_all() {
            error!("❌ {}", e);
            engine.shutdown();
            return Err(e.into());
        }

        info!("✅ Engine initialized with systems {:?}", engine.registry.system_names());
        Ok(engine)
    }

    /// Runs the frame loop until the window closes or a shutdown signal
    /// arrives.
    ///
    /// Frame totals accumulate across calls and are available from
    /// [`Engine::stats`].
    pub async fn run(&mut self) -> anyhow::Result<StopReason> {
        let timestep = self.config.engine.timestep();
        let delta_time = timestep.as_secs_f64();
        let mut ticker = tokio::time::interval(timestep);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = signals::shutdown_signal();
        tokio::pin!(shutdown);
        let mut signals_armed = true;

        info!(
            "🎮 Running at {} ticks/s (dt = {:.4}s)",
            self.config.engine.tick_rate, delta_time
        );

        let reason = loop {
            tokio::select! {
                result = &mut shutdown, if signals_armed => {
                    match result {
                        Ok(signal) => {
                            info!("🛑 Received {} signal, stopping frame loop", signal);
                            break StopReason::Signal(signal);
                        }
                        Err(e) => {
                            warn!("⚠️ Signal handling unavailable: {}", e);
                            signals_armed = false;
                        }
                    }
                }
                _ = ticker.tick() => {
                    if !self.tick(delta_time) {
                        info!("🪟 Window closed, stopping frame loop");
                        break StopReason::WindowClosed;
                    }
                }
            }
        };

        info!(
            "📊 Ran {} frames ({:.3}s simulated)",
            self.stats.frames, self.stats.simulated_seconds
        );
        Ok(reason)
    }

    /// One frame: events, system update, render. Returns `false` once the
    /// window has closed.
    fn tick(&mut self, delta_time: f64) -> bool {
        if !self.window.pump_events() {
            return false;
        }

        self.registry.update_all(delta_time);
        self.render();

        self.stats.frames += 1;
        self.stats.simulated_seconds += delta_time;
        true
    }

    fn render(&mut self) {
        self.graphics.begin_frame();
        self.graphics.clear(CLEAR_COLOR);
        self.graphics.end_frame();
    }

    /// Shuts down and unloads every system, then releases assets, the
    /// renderer and the window. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        info!("🛑 Shutting down engine");
        self.registry.shutdown_all();
        self.registry.unload_all();
        self.assets.unload_all();
        self.graphics.shutdown();
        self.window.close();
        info!("✅ Engine shutdown complete");
    }

    /// Systems loaded for the current game type.
    pub fn registry(&self) -> &SystemRegistry {
        &self.registry
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    /// Totals across every [`Engine::run`] so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("game_type", &self.config.engine.game_type)
            .field("registry", &self.registry)
            .field("stats", &self.stats)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::GraphicsApi;
    use tempfile::TempDir;

    fn test_config(data: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.engine.game_data_path = data.path().to_string_lossy().into_owned();
        config.engine.tick_rate = 1000;
        config.engine.max_frames = 3;
        config
    }

    fn write_manifest(config: &AppConfig) {
        let assets = config.assets_dir();
        std::fs::create_dir_all(assets.join("Config")).unwrap();
        std::fs::write(assets.join("logo.png"), b"logo").unwrap();
        std::fs::write(
            config.asset_manifest(),
            r#"{ "assets": [ { "name": "logo", "path": "logo.png", "kind": "texture" } ] }"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_runs_until_frame_limit() {
        let data = TempDir::new().unwrap();
        let config = test_config(&data);
        std::fs::create_dir_all(config.systems_dir()).unwrap();

        let mut engine = Engine::initialize(config).unwrap();
        assert!(engine.registry().is_empty());

        let reason = engine.run().await.unwrap();
        let stats = engine.stats();

        assert_eq!(reason, StopReason::WindowClosed);
        assert_eq!(stats.frames, 3);
        assert!((stats.simulated_seconds - 0.003).abs() < 1e-9);
        assert_eq!(engine.graphics().frames_presented(), 3);
    }

    #[test]
    fn test_missing_game_type_directories_are_tolerated() {
        let data = TempDir::new().unwrap();
        let engine = Engine::initialize(test_config(&data)).unwrap();

        assert!(engine.registry().is_empty());
        assert!(engine.assets().is_empty());
    }

    #[test]
    fn test_manifest_assets_are_preloaded_and_released() {
        let data = TempDir::new().unwrap();
        let config = test_config(&data);
        write_manifest(&config);

        let mut engine = Engine::initialize(config).unwrap();
        assert_eq!(engine.assets().get("logo").unwrap().bytes, b"logo");

        engine.shutdown();
        assert!(engine.assets().is_empty());
        assert!(!engine.graphics().is_active());

        // Second call is a no-op.
        engine.shutdown();
    }

    #[test]
    fn test_tick_stops_after_window_closes() {
        let data = TempDir::new().unwrap();
        let mut engine = Engine::initialize(test_config(&data)).unwrap();

        assert!(engine.tick(0.5));
        assert!(engine.tick(0.5));
        assert!(engine.tick(0.5));
        assert!(!engine.tick(0.5));
        assert_eq!(
            engine.stats(),
            FrameStats {
                frames: 3,
                simulated_seconds: 1.5
            }
        );
    }

    #[test]
    fn test_no_graphics_api_fails_initialization() {
        let data = TempDir::new().unwrap();
        let mut config = test_config(&data);
        config.engine.graphics_api = GraphicsApi::None;

        let err = Engine::initialize(config).unwrap_err();
        assert!(err.to_string().contains("no graphics API"));
    }

    #[test]
    fn test_auto_load_disabled_skips_systems_directory() {
        let data = TempDir::new().unwrap();
        let mut config = test_config(&data);
        config.systems.auto_load = false;
        // Not a directory: would fail to list if auto-load ran.
        std::fs::create_dir_all(config.game_type_dir()).unwrap();
        std::fs::write(config.systems_dir(), b"").unwrap();

        let engine = Engine::initialize(config).unwrap();
        assert!(engine.registry().is_empty());
    }
}

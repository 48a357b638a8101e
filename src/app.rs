//! Application core: scene, session state and the frame loop
//!
//! [`App::frame`] is the whole per-frame procedure. [`run`] drives it from a
//! tokio interval at the display rate and folds in config reloads and
//! shutdown.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigWatcher};
use crate::control::{reset_on_squeeze, AppliedAction, ResetOutcome, TransformMapper};
use crate::error::InputError;
use crate::input::SessionState;
use crate::scene::{spawn_load, LoadState, ModelLoader, Scene, Transform};
use crate::xr::XrPlatform;

/// What happened during one frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub presenting: bool,
    /// Input sources were reclassified instead of mapped
    pub classified: bool,
    pub resets: Vec<ResetOutcome>,
    pub actions: Vec<AppliedAction>,
    pub input_error: Option<InputError>,
}

impl FrameReport {
    /// Whether any action reached the model this frame
    pub fn mutated_model(&self) -> bool {
        self.resets.contains(&ResetOutcome::Reset)
            || self
                .actions
                .iter()
                .any(|a| a.reached_model && !a.action.is_noop())
    }
}

/// Owns everything the controller mutates
pub struct App {
    config: AppConfig,
    scene: Scene,
    session: SessionState,
    mapper: TransformMapper,
    presenting: bool,
    frames: u64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let scene = Scene::build(&config);
        info!("Scene ready: {}", scene.describe());
        let session = SessionState::new(config.timing.classify_interval());
        let mapper = TransformMapper::new(&config.controls);
        Self {
            config,
            scene,
            session,
            mapper,
            presenting: false,
            frames: 0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Initial placement of the model, also the reset target
    pub fn initial_transform(&self) -> Transform {
        Transform::new(self.config.model.position, self.config.model.scale)
    }

    /// Start loading the configured model in the background
    pub fn start_model_load(&self, loader: Arc<dyn ModelLoader>) -> JoinHandle<()> {
        info!("Loading model: {}", self.config.model.url);
        spawn_load(
            loader,
            self.config.model.url.clone(),
            self.scene.model.clone(),
            self.initial_transform(),
        )
    }

    /// Swap in reloaded configuration, keeping the model where it is
    pub fn apply_config(&mut self, config: AppConfig) {
        self.scene.apply_config(&config);
        debug!("Scene updated: {}", self.scene.describe());
        self.session.set_interval(config.timing.classify_interval());
        self.mapper.set_gains(&config.controls);
        self.config = config;
    }

    /// Run one frame against the platform's current input state
    pub fn frame(&mut self, dt: f32, platform: &mut dyn XrPlatform) -> FrameReport {
        platform.begin_frame();
        self.frames += 1;

        let mut report = FrameReport::default();

        // Squeeze events arrive between frames and are handled before mapping
        for hand in platform.take_squeeze_events() {
            report
                .resets
                .push(reset_on_squeeze(hand, &self.config.model, &self.scene.model));
        }

        let presenting = platform.is_presenting();
        if presenting != self.presenting {
            if presenting {
                info!("🥽 XR session presenting");
                self.session.restart();
            } else {
                info!("XR session no longer presenting");
            }
            self.presenting = presenting;
        }
        report.presenting = presenting;
        if !presenting {
            return report;
        }

        let sources = platform.input_sources();
        self.session.tick(dt);

        if self.session.rescan_pending() {
            let snapshot = self.session.classify(sources);
            debug!(
                "Classified {} input source(s): {:?}",
                snapshot.source_count, snapshot.mode
            );
            report.classified = true;
        } else if let Some(layout) = self.session.mode.active_layout() {
            match self.mapper.map_frame(sources, layout, &mut self.scene) {
                Ok(actions) => report.actions = actions,
                Err(e) => {
                    warn!("Skipping remaining input this frame: {}", e);
                    report.input_error = Some(e);
                }
            }
        }

        report
    }

    /// Log the final state of the scene
    pub fn log_summary(&self) {
        info!("Frames run: {}", self.frames);
        match self.scene.model.state() {
            LoadState::Loaded(model) => {
                let (axis, angle) = model.transform.rotation.to_axis_angle();
                info!(
                    "Model '{}': position {:?}, scale {:.3}, rotation {:.1}° about {:?}",
                    model.info.url,
                    model.transform.position,
                    model.transform.scale,
                    angle.to_degrees(),
                    axis
                );
            }
            LoadState::Pending => info!("Model still loading"),
            LoadState::Failed(reason) => info!("Model failed to load: {}", reason),
        }
        for marker in [&self.scene.right_marker, &self.scene.left_marker] {
            info!(
                "{} marker at {:?} ({:?}, #{:06x})",
                marker.hand,
                marker.position,
                marker.material,
                self.scene.palette.color(marker.material)
            );
        }
    }
}

/// Drive `app` at the configured frame rate until shutdown
///
/// Stops when `shutdown` resolves, when the platform reports it is finished,
/// or after `max_frames` frames.
pub async fn run(
    mut app: App,
    platform: &mut dyn XrPlatform,
    mut config_watcher: Option<ConfigWatcher>,
    max_frames: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> Result<App> {
    let mut period = app.config().timing.frame_period();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame: Option<Instant> = None;

    tokio::pin!(shutdown);

    info!(
        "Starting frame loop at {} Hz",
        app.config().timing.frame_rate_hz
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = last_frame
                    .map(|last| now.duration_since(last).as_secs_f32())
                    .unwrap_or(period.as_secs_f32());
                last_frame = Some(now);

                let report = app.frame(dt, platform);
                if report.mutated_model() {
                    debug!("Frame {}: model updated", app.frames());
                }

                if platform.finished() {
                    info!("Input script finished after {} frames", app.frames());
                    break;
                }
                if max_frames.is_some_and(|max| app.frames() >= max) {
                    info!("Reached frame limit ({})", app.frames());
                    break;
                }
            }

            Some(new_config) = next_config(&mut config_watcher) => {
                info!("📝 Configuration file changed, applying...");
                let new_period = new_config.timing.frame_period();
                app.apply_config(new_config);
                if new_period != period {
                    period = new_period;
                    ticker = interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    info!("Frame rate changed to {} Hz", app.config().timing.frame_rate_hz);
                }
                info!("✅ Configuration applied");
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping frame loop");
                break;
            }
        }
    }

    Ok(app)
}

async fn next_config(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}

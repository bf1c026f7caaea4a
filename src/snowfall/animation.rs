use super::field::{SnowField, Viewport};
use super::surface::{Rgba, Surface};
use crate::config::SnowfallConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Starts snowfall animations. Each `start` builds a fresh field.
#[derive(Debug, Clone, Default)]
pub struct Snowfall {
    config: SnowfallConfig,
    seed: Option<u64>,
}

impl Snowfall {
    pub fn new(config: SnowfallConfig) -> Self {
        Self { config, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Spawns the frame loop on the current tokio runtime.
    ///
    /// The loop follows `viewport` for resizes and owns `surface` until the
    /// returned handle is stopped or dropped.
    pub fn start<S>(&self, mut surface: S, mut viewport: watch::Receiver<Viewport>) -> SnowfallHandle<S>
    where
        S: Surface + 'static,
    {
        let initial = *viewport.borrow_and_update();
        surface.resize(initial.width as u32, initial.height as u32);

        let field = match self.seed {
            Some(seed) => SnowField::seeded(initial, self.config.flake_count, seed),
            None => SnowField::new(initial, self.config.flake_count),
        }
        .with_fill(Rgba::from_array(self.config.fill));

        log::debug!(
            "❄️  Snowfall started: {} flakes in {}x{}",
            self.config.flake_count,
            initial.width,
            initial.height
        );

        let (stop_tx, stop_rx) = oneshot::channel();
        let frames = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(
            field,
            surface,
            viewport,
            stop_rx,
            self.config.frame_interval(),
            Arc::clone(&frames),
        ));

        SnowfallHandle {
            stop: Some(stop_tx),
            task: Some(task),
            frames,
        }
    }
}

async fn run<S: Surface>(
    mut field: SnowField,
    mut surface: S,
    mut viewport: watch::Receiver<Viewport>,
    mut stop: oneshot::Receiver<()>,
    frame_interval: std::time::Duration,
    frames: Arc<AtomicU64>,
) -> S {
    let mut ticker = tokio::time::interval(frame_interval);
    // A stalled loop resumes at the next tick instead of replaying missed frames.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut follow_resizes = true;

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit stop and when the handle is dropped.
            _ = &mut stop => break,

            changed = viewport.changed(), if follow_resizes => match changed {
                Ok(()) => {
                    let size = *viewport.borrow_and_update();
                    field.resize(size);
                    surface.resize(size.width as u32, size.height as u32);
                    log::trace!("Snowfall resized to {}x{}", size.width, size.height);
                }
                Err(_) => follow_resizes = false,
            },

            _ = ticker.tick() => {
                field.frame(&mut surface);
                surface.present();
                frames.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    log::debug!(
        "❄️  Snowfall stopped after {} frames",
        frames.load(Ordering::Relaxed)
    );
    surface
}

/// Running animation. Stopping cancels the next frame and releases the
/// viewport subscription; dropping the handle does the same.
pub struct SnowfallHandle<S> {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<S>>,
    frames: Arc<AtomicU64>,
}

impl<S> SnowfallHandle<S> {
    pub fn frames_rendered(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the loop and hands the surface back.
    pub async fn stop(mut self) -> Option<S> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl<S> Drop for SnowfallHandle<S> {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

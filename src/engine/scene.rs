// Scenes: ordered layers sharing one frame loop

use std::collections::VecDeque;

use image::RgbaImage;
use log::{debug, info};

use super::assets::AssetManager;
use super::config::EngineConfig;
use super::game_loop::FrameClock;
use super::input::{InputConfigManager, InputEvent, TargetId};
use super::layer::Layer;

/// Token for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's "call me on the next frame" primitive.
///
/// A scheduled frame fires once; the scene asks again after each frame.
pub trait FrameScheduler {
    fn schedule(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Scheduler that fires frames only when told to
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    queue: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles due now, in scheduling order
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        self.queue.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Fire every due frame on `scene`; returns how many rendered
    pub fn advance(&mut self, scene: &mut Scene) -> usize {
        let mut rendered = 0;
        for handle in self.take_due() {
            if scene.on_frame(handle, self) {
                rendered += 1;
            }
        }
        rendered
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.queue.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
    }
}

/// An ordered group of layers and the loop that renders them.
///
/// Layers render in ascending priority. The loop is cooperative: `start`
/// schedules one frame, every frame reschedules the next, and `stop`
/// cancels whichever frame is pending.
pub struct Scene {
    layers: Vec<Layer>,
    pending: Option<FrameHandle>,
    clock: FrameClock,
    bindings: InputConfigManager,
    config: EngineConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            layers: Vec::new(),
            pending: None,
            clock: FrameClock::new(),
            bindings: InputConfigManager::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn add_layer(&mut self, layer: Layer) {
        debug!("Scene: adding layer '{}'", layer.name());
        self.layers.push(layer);
        self.sort();
    }

    pub fn add_layers(&mut self, layers: impl IntoIterator<Item = Layer>) {
        for layer in layers {
            debug!("Scene: adding layer '{}'", layer.name());
            self.layers.push(layer);
        }
        self.sort();
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.name() == name)?;
        Some(self.layers.remove(index))
    }

    /// Layers in render order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    fn sort(&mut self) {
        self.layers.sort_by_key(Layer::priority);
    }

    /// Render every layer once
    pub fn render(&mut self) {
        for layer in &mut self.layers {
            layer.render();
        }
        self.clock.tick();
    }

    /// Clear every layer so the next frame redraws from scratch
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Start the frame loop; does nothing if it is already running
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_some() {
            return;
        }
        info!("Scene started with {} layer(s)", self.layers.len());
        self.clock.reset();
        self.pending = Some(scheduler.schedule());
    }

    /// Cancel the pending frame; safe to call when not running
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
            info!(
                "Scene stopped after {} frame(s)",
                self.clock.frame_count()
            );
        }
    }

    /// Handle a fired frame. Frames that are no longer pending are ignored.
    /// Returns whether a frame was rendered.
    pub fn on_frame(&mut self, handle: FrameHandle, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.render();
        self.pending = Some(scheduler.schedule());
        true
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn bindings(&self) -> &InputConfigManager {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputConfigManager {
        &mut self.bindings
    }

    /// Route an input event to every layer; returns how many entities consumed it
    pub fn dispatch(&mut self, target: TargetId, event: &InputEvent) -> usize {
        let bindings = &self.bindings;
        self.layers
            .iter_mut()
            .map(|layer| layer.dispatch(target, event, bindings))
            .sum()
    }

    /// Complete pending sprite loads in every layer
    pub fn resolve_sprites(&mut self, assets: &mut AssetManager) -> usize {
        self.layers
            .iter_mut()
            .map(|layer| layer.resolve_sprites(assets))
            .sum()
    }

    /// Stack the active layers' pixels in render order
    pub fn composite(&self) -> Option<RgbaImage> {
        let snapshots: Vec<RgbaImage> = self
            .layers
            .iter()
            .filter(|l| l.is_active())
            .filter_map(Layer::snapshot)
            .collect();

        let width = snapshots.iter().map(RgbaImage::width).max()?;
        let height = snapshots.iter().map(RgbaImage::height).max()?;

        let mut canvas = RgbaImage::new(width, height);
        for snapshot in &snapshots {
            image::imageops::overlay(&mut canvas, snapshot, 0, 0);
        }
        Some(canvas)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

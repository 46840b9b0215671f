use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use scene2d::core::Vector2;
use scene2d::engine::input::{InputEvent, TargetId};
use scene2d::engine::renderer::{PresentError, Presenter};
use scene2d::engine::{EngineConfig, FrameHandle, FrameScheduler};
use scene2d::game::Pong;

/// Frames are driven by the window's redraw requests
struct WindowScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameHandle>,
}

impl WindowScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }
}

impl FrameScheduler for WindowScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

fn save_screenshot(pong: &Pong) -> Result<PathBuf> {
    let image = pong
        .scene
        .composite()
        .context("scene has no pixel layers to capture")?;
    let path = PathBuf::from(format!(
        "screenshot-{}.png",
        pong.scene.clock().frame_count()
    ));
    image
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting scene2d pong...");

    let config = EngineConfig::default();
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("scene2d pong")
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.layer_width,
            config.layer_height,
        ))
        .with_resizable(false)
        .build(&event_loop)?;
    let window = Arc::new(window);
    let mut presenter = pollster::block_on(Presenter::new(window.clone()))
        .context("failed to set up the window presenter")?;

    let target = TargetId::from(window.id());
    let mut scheduler = WindowScheduler::new(window);
    let mut pong = Pong::new(config, target)?;
    let mut cursor = Vector2::ZERO;
    let mut shown_score = (0, 0);

    pong.scene.start(&mut scheduler);

    event_loop
        .run(move |event, elwt| {
            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            let target = TargetId::from(window_id);

            match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    pong.scene.stop(&mut scheduler);
                    elwt.exit();
                }
                WindowEvent::RedrawRequested => {
                    let Some(handle) = scheduler.pending.take() else {
                        return;
                    };
                    pong.scene.on_frame(handle, &mut scheduler);

                    if let Some(frame) = pong.scene.composite() {
                        match presenter.present(&frame) {
                            Ok(()) => {}
                            Err(PresentError::Surface(
                                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                            )) => presenter.reconfigure(),
                            Err(PresentError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                                error!("Out of GPU memory, shutting down...");
                                pong.scene.stop(&mut scheduler);
                                elwt.exit();
                            }
                            Err(e) => warn!("Present failed: {}", e),
                        }
                    }

                    let score = (pong.score.left(), pong.score.right());
                    if score != shown_score {
                        shown_score = score;
                        scheduler
                            .window
                            .set_title(&format!("scene2d pong  {} : {}", score.0, score.1));
                    }
                }
                WindowEvent::Resized(size) => presenter.resize(size),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::F12),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => match save_screenshot(&pong) {
                    Ok(path) => info!("Saved screenshot to {}", path.display()),
                    Err(e) => warn!("Screenshot failed: {:#}", e),
                },
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(input) = InputEvent::from_key_event(&event) {
                        pong.scene.dispatch(target, &input);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Vector2::new(position.x as f32, position.y as f32);
                    pong.scene
                        .dispatch(target, &InputEvent::MouseMove { position: cursor });
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    pong.scene.dispatch(
                        target,
                        &InputEvent::from_mouse_button(button, state, cursor),
                    );
                    if state == ElementState::Released {
                        pong.scene.dispatch(
                            target,
                            &InputEvent::Click {
                                button,
                                position: cursor,
                            },
                        );
                    }
                }
                WindowEvent::Touch(touch) => {
                    let position = Vector2::new(touch.location.x as f32, touch.location.y as f32);
                    pong.scene.dispatch(
                        target,
                        &InputEvent::from_touch(touch.id, touch.phase, position),
                    );
                }
                _ => {}
            }
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

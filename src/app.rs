use std::sync::Arc;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::SceneConfig;
use crate::game::{DragonGame, GameConfig};
use crate::geometry::Container;
use crate::overlay::{GameSnapshot, Overlay, OverlayActions, PropRow, SceneSnapshot};
use crate::render::instance::SpriteInstance;
use crate::render::GpuState;
use crate::scene::{BootStatus, Scene};

const WINDOW_TITLE: &str = "Mushroom Meadow";
const INITIAL_SIZE: (u32, u32) = (960, 600);

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    scene: Scene,
    game: DragonGame,
    /// Entered before the window had a size; retried on the next resize.
    boot_pending: bool,

    // Game RNG; the scene owns its own.
    rng: fastrand::Rng,

    // Scene timestamps are ms since this instant.
    started: Instant,
    last_frame_time: Option<Instant>,

    screen_w: u32,
    screen_h: u32,

    // Reusable instance buffer (avoid per-frame allocation)
    instance_buf: Vec<SpriteInstance>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            overlay: None,
            scene: Scene::new(SceneConfig::default(), fastrand::Rng::new()),
            game: DragonGame::new(GameConfig::default()),
            boot_pending: false,
            rng: fastrand::Rng::new(),
            started: Instant::now(),
            last_frame_time: None,
            screen_w: 0,
            screen_h: 0,
            instance_buf: Vec::new(),
        }
    }

    fn container(&self) -> Container {
        Container::new(self.screen_w as f32, self.screen_h as f32)
    }

    /// Ready signal: plant the meadow at the current window size.
    fn enter(&mut self) {
        let status = self.scene.boot(self.container());
        self.boot_pending = status == BootStatus::Deferred;
        match status {
            BootStatus::Started => {}
            BootStatus::AlreadyRunning => log::debug!("meadow already running"),
            BootStatus::Deferred => log::info!("window has no size yet, waiting for a resize"),
        }
    }

    fn apply_actions(&mut self, actions: OverlayActions) {
        if actions.enter {
            self.enter();
        }
        if let Some(dragon) = actions.pick_dragon {
            self.game.select_dragon(dragon);
        }
        if let Some(treat) = actions.pick_treat {
            self.game.select_treat(treat, &mut self.rng);
        }
        if actions.ride && self.game.ride().is_none() {
            log::debug!("nothing to ride yet");
        }
        if actions.reset {
            self.game.reset();
        }
        if actions.stop {
            self.scene.stop();
        }
    }

    /// Props first so cats walk in front of the mushrooms.
    fn build_instances(&mut self) {
        self.instance_buf.clear();
        self.instance_buf
            .extend(self.scene.props().iter().map(SpriteInstance::from_prop));

        let sprite_width = self.scene.config().agents.sprite_width;
        self.instance_buf.extend(
            self.scene
                .agent_views()
                .map(|view| SpriteInstance::from_agent(&view, sprite_width)),
        );
    }

    fn scene_snapshot(&self) -> SceneSnapshot {
        let container = self.scene.container();
        SceneSnapshot {
            running: self.scene.is_running(),
            width: container.width,
            height: container.height,
            props: self
                .scene
                .props()
                .iter()
                .map(|p| PropRow {
                    asset: p.asset.key(),
                    x: p.pos.x,
                    y: p.pos.y,
                    width: p.width,
                    overlap_fallback: p.overlap_fallback,
                })
                .collect(),
            agents: self.scene.agent_views().collect(),
            chase: self.scene.chase_pair(),
            clock: self.scene.clock(),
            frames: self.scene.frame_count(),
            builds: self.scene.build_count(),
        }
    }

    fn game_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            step: self.game.step(),
            dragon: self.game.dragon(),
            result: self.game.result(),
            ride_text: self.game.ride_text(),
        }
    }

    fn redraw(&mut self) {
        // --- Timing ---
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt = now.duration_since(last).as_secs_f64();
            if let Some(overlay) = &mut self.overlay {
                overlay.record_frame(dt);
            }
        }
        self.last_frame_time = Some(now);

        let timestamp = now.duration_since(self.started).as_secs_f64() * 1000.0;
        self.scene.on_frame(timestamp);

        self.build_instances();

        let scene = self.scene_snapshot();
        let game = self.game_snapshot();
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        let egui_frame = overlay.run_frame(window, self.screen_w, self.screen_h, &scene, &game);
        gpu.render(&self.instance_buf, |device, queue, encoder, view| {
            overlay.paint(device, queue, encoder, view, &egui_frame)
        });
        overlay.free_textures(&egui_frame);

        self.apply_actions(egui_frame.actions);
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.logical_key {
            Key::Named(NamedKey::Escape) => {
                log::info!("ESC pressed, exiting");
                event_loop.exit();
            }
            Key::Named(NamedKey::Enter) if !self.scene.is_running() => self.enter(),
            Key::Named(NamedKey::F1) => {
                if let Some(overlay) = &mut self.overlay {
                    overlay.inspector_visible = !overlay.inspector_visible;
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(INITIAL_SIZE.0, INITIAL_SIZE.1));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.screen_w = size.width;
        self.screen_h = size.height;
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = match GpuState::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU setup failed: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!("wgpu + sprite pipeline initialized");

        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);

        // Continuous frame loop
        event_loop.set_control_flow(ControlFlow::Poll);

        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.screen_w = new_size.width;
                self.screen_h = new_size.height;
                if self.boot_pending {
                    self.enter();
                } else if self.scene.resize(self.container()) {
                    log::info!("Meadow replanted at {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                self.on_key(event_loop, &event);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Entry point: create the event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}

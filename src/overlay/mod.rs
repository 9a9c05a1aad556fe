pub mod history;

use winit::window::Window;

use self::history::{FrameHistory, FrameSummary, FRAME_HISTORY_LEN};
use crate::game::{Dragon, ResultView, Step, Treat};
use crate::render::GpuState;
use crate::scene::agent::{AgentKind, AgentView};

/// Frame budget drawn as a line across the histogram (seconds).
const TARGET_FRAME: f64 = 1.0 / 60.0;

/// Scene state the inspector shows, copied out once per frame.
pub struct SceneSnapshot {
    pub running: bool,
    pub width: f32,
    pub height: f32,
    pub props: Vec<PropRow>,
    pub agents: Vec<AgentView>,
    /// (chaser, quarry) while a chase is running.
    pub chase: Option<(AgentKind, AgentKind)>,
    pub clock: f64,
    pub frames: u64,
    pub builds: u64,
}

/// One planted mushroom as the inspector lists it.
pub struct PropRow {
    /// Catalog asset identifier.
    pub asset: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub overlap_fallback: bool,
}

/// Game state the dragon window shows.
pub struct GameSnapshot {
    pub step: Step,
    pub dragon: Option<Dragon>,
    pub result: Option<ResultView>,
    pub ride_text: Option<&'static str>,
}

/// What the user clicked this frame. The app applies these after the egui pass.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OverlayActions {
    pub enter: bool,
    pub pick_dragon: Option<Dragon>,
    pub pick_treat: Option<Treat>,
    pub reset: bool,
    pub ride: bool,
    pub stop: bool,
}

/// Paint output of one egui frame.
pub struct EguiFrame {
    pub primitives: Vec<egui::epaint::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
    pub actions: OverlayActions,
}

/// egui layer on top of the meadow: entry gate, dragon game, inspector.
pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    /// Toggled with F1.
    pub inspector_visible: bool,
    pub history: FrameHistory,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format(),
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            inspector_visible: false,
            history: FrameHistory::new(FRAME_HISTORY_LEN),
        }
    }

    /// Record a frame time (seconds).
    pub fn record_frame(&mut self, dt: f64) {
        self.history.record(dt);
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Run the egui frame and produce paint output plus the clicked actions.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        scene: &SceneSnapshot,
        game: &GameSnapshot,
    ) -> EguiFrame {
        let raw_input = self.egui_state.take_egui_input(window);

        let stats = StatsSnapshot {
            visible: self.inspector_visible,
            summary: self.history.summary(),
            frame_times: self.history.iter().collect(),
        };

        let mut actions = OverlayActions::default();
        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            draw_ui(ctx, scene, game, &stats, &mut actions);
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        EguiFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [screen_w, screen_h],
                pixels_per_point,
            },
            actions,
        }
    }

    /// Upload egui buffers and draw them over `view`, keeping what the
    /// sprite pass left there.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &EguiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let cmd_bufs = self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &frame.screen_descriptor,
        );

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            })
            .forget_lifetime();
        self.egui_renderer
            .render(&mut pass, &frame.primitives, &frame.screen_descriptor);

        cmd_bufs
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, frame: &EguiFrame) {
        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

// ---------------------------------------------------------------------------
// UI snapshot + free-function draw (keeps egui_ctx.run from borrowing self)
// ---------------------------------------------------------------------------

struct StatsSnapshot {
    visible: bool,
    summary: FrameSummary,
    frame_times: Vec<f64>,
}

fn panel_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(24, 18, 36, 225))
        .corner_radius(6.0)
        .inner_margin(10.0)
}

fn draw_ui(
    ctx: &egui::Context,
    scene: &SceneSnapshot,
    game: &GameSnapshot,
    stats: &StatsSnapshot,
    actions: &mut OverlayActions,
) {
    if !scene.running {
        draw_gate(ctx, actions);
    }
    draw_game(ctx, game, actions);
    if stats.visible {
        draw_inspector(ctx, scene, stats, actions);
    }
}

fn draw_gate(ctx: &egui::Context, actions: &mut OverlayActions) {
    egui::Window::new("Mushroom Meadow")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.label("The cats are waiting under the mushrooms.");
            ui.add_space(6.0);
            if ui.button("Enter the meadow").clicked() {
                actions.enter = true;
            }
            ui.small("(or press Enter)");
        });
}

fn draw_game(ctx: &egui::Context, game: &GameSnapshot, actions: &mut OverlayActions) {
    egui::Window::new("Dragon treats")
        .default_pos([16.0, 16.0])
        .default_width(280.0)
        .resizable(false)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(225));

            match game.step {
                Step::ChoosingDragon => {
                    ui.label("Pick a dragon.");
                    ui.horizontal(|ui| {
                        for dragon in Dragon::ALL {
                            if ui.button(dragon.key().to_uppercase()).clicked() {
                                actions.pick_dragon = Some(dragon);
                            }
                        }
                    });
                }
                Step::ChoosingTreat => {
                    if let Some(dragon) = game.dragon {
                        ui.label(format!("{} is hungry.", dragon.key().to_uppercase()));
                        ui.small(dragon.asset());
                    }
                    ui.label("Pick a treat.");
                    ui.horizontal(|ui| {
                        for treat in Treat::ALL {
                            if ui.button(treat.label()).clicked() {
                                actions.pick_treat = Some(treat);
                            }
                        }
                    });
                }
                Step::ShowingResult => {
                    if let Some(result) = &game.result {
                        ui.strong(result.headline());
                        ui.small(result.asset());
                        ui.label(format!("{} → {}", result.treat.label(), result.outcome.tag()));
                        ui.label(result.message());
                        if result.show_ride && ui.button("Ride").clicked() {
                            actions.ride = true;
                        }
                    }
                    if let Some(text) = game.ride_text {
                        ui.colored_label(egui::Color32::from_rgb(255, 220, 120), text);
                    }
                }
            }

            ui.separator();
            if ui.button("Reset").clicked() {
                actions.reset = true;
            }
        });
}

fn draw_inspector(
    ctx: &egui::Context,
    scene: &SceneSnapshot,
    stats: &StatsSnapshot,
    actions: &mut OverlayActions,
) {
    egui::Window::new("Inspector")
        .default_pos([16.0, 260.0])
        .default_width(320.0)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));

            let s = &stats.summary;
            ui.heading("Performance");
            ui.label(format!("FPS: {:.1}", s.fps));
            ui.label(format!(
                "Frame: {:.2}ms avg | {:.2} min | {:.2} max",
                s.avg * 1000.0,
                s.min * 1000.0,
                s.max * 1000.0,
            ));
            draw_histogram(ui, &stats.frame_times);
            ui.add_space(4.0);

            ui.heading("Scene");
            ui.label(format!(
                "{} | {:.0}x{:.0} | builds: {}",
                if scene.running { "running" } else { "stopped" },
                scene.width,
                scene.height,
                scene.builds,
            ));
            ui.label(format!(
                "clock: {:.1}s | frames: {} | mushrooms: {}",
                scene.clock / 1000.0,
                scene.frames,
                scene.props.len(),
            ));
            match scene.chase {
                Some((chaser, quarry)) => {
                    ui.label(format!("{} chasing {}", chaser.label(), quarry.label()))
                }
                None => ui.label("no chase"),
            };

            egui::Grid::new("agents").striped(true).show(ui, |ui| {
                for view in &scene.agents {
                    ui.label(view.kind.label());
                    ui.label(view.mode.label());
                    ui.label(view.sprite);
                    ui.label(format!("x {:.0}", view.pos.x));
                    ui.label(if view.hopping { "hop" } else { "" });
                    ui.end_row();
                }
            });

            ui.collapsing("Mushrooms", |ui| {
                egui::Grid::new("props").striped(true).show(ui, |ui| {
                    for prop in &scene.props {
                        ui.label(prop.asset);
                        ui.label(format!("{:.0},{:.0}", prop.x, prop.y));
                        ui.label(format!("w {:.0}", prop.width));
                        ui.label(if prop.overlap_fallback { "overlap" } else { "" });
                        ui.end_row();
                    }
                });
            });

            ui.add_space(4.0);
            if scene.running && ui.button("Stop").clicked() {
                actions.stop = true;
            }
        });
}

fn draw_histogram(ui: &mut egui::Ui, frame_times: &[f64]) {
    if frame_times.is_empty() {
        return;
    }
    let max_time = frame_times.iter().copied().fold(0.0f64, f64::max).max(0.020);

    let (response, painter) = ui.allocate_painter(egui::vec2(300.0, 50.0), egui::Sense::hover());
    let rect = response.rect;
    let bar_width = rect.width() / frame_times.len() as f32;

    for (i, &t) in frame_times.iter().enumerate() {
        let h = (t / max_time) as f32 * rect.height();
        let x = rect.left() + i as f32 * bar_width;
        let color = if t > TARGET_FRAME {
            egui::Color32::from_rgb(255, 110, 90)
        } else {
            egui::Color32::from_rgb(120, 210, 140)
        };
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - h),
                egui::pos2(x + bar_width.max(1.0), rect.bottom()),
            ),
            0.0,
            color,
        );
    }

    let target_y = rect.bottom() - (TARGET_FRAME / max_time) as f32 * rect.height();
    painter.line_segment(
        [egui::pos2(rect.left(), target_y), egui::pos2(rect.right(), target_y)],
        egui::Stroke::new(1.0, egui::Color32::from_rgb(255, 240, 120)),
    );
}

//! Window, event loop and frame driver shared by every sandbox binary

use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

use anyhow::Context;
use common::{Camera2D, GraphicsContext, WindowOptions};
use glam::Vec2;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    platform::run_on_demand::EventLoopExtRunOnDemand,
};

use crate::config::SandboxConfig;
use crate::entity::{EntityDesc, Material, Rgba, ShapeParams};
use crate::hud::Hud;
use crate::interaction::{
    global_command, Command, Controller, DragController, InputEvent, Key, NudgeController,
    PointerButton,
};
use crate::presentation::{draw_scene, hud_text};
use crate::renderer::{Renderer, ShapeBatch};
use crate::scheduler::FrameScheduler;
use crate::world::World;

/// Where the status line sits, in world pixels
const HUD_ANCHOR: Vec2 = Vec2::new(50.0, 50.0);

/// Keyboard mapping shared by all variants
pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::KeyR => Key::Reset,
        KeyCode::KeyP | KeyCode::Equal | KeyCode::NumpadAdd => Key::IncreaseBatch,
        KeyCode::KeyM | KeyCode::Minus | KeyCode::NumpadSubtract => Key::DecreaseBatch,
        KeyCode::Space => Key::Pause,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        _ => Key::Other,
    }
}

pub fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn scroll_amount(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
    }
}

/// The box dropped by the falling-box variant
pub fn falling_box_desc(config: &SandboxConfig) -> EntityDesc {
    let size = config.world_size();
    EntityDesc::new(
        ShapeParams::Box {
            width: 50.0,
            height: 100.0,
        },
        1.0,
        Vec2::new(size.x / 2.0, size.y / 4.0),
        Rgba::MAGENTA,
    )
    .with_angle(FRAC_PI_2)
    .with_material(Material {
        friction: 0.5,
        elasticity: 0.0,
    })
}

/// Ball sandbox: left click spawns, right click drags
pub fn run_balls(config: SandboxConfig) -> anyhow::Result<()> {
    let controller = DragController::new(config.spawn, config.world_size());
    run(config, controller)
}

/// One box on a ledge: click teleports, arrows push, wheel turns
pub fn run_falling_box(config: SandboxConfig) -> anyhow::Result<()> {
    let controller = NudgeController::new(falling_box_desc(&config));
    run(config, controller)
}

struct App<C: Controller> {
    ctx: GraphicsContext,
    renderer: Renderer,
    batch: ShapeBatch,
    hud: Option<Hud>,
    camera: Camera2D,
    world: World,
    controller: C,
    scheduler: FrameScheduler,
    config: SandboxConfig,
    /// Last cursor position in world pixels; button events carry none
    cursor: Vec2,
    fatal: Option<anyhow::Error>,
}

impl<C: Controller> App<C> {
    fn new(ctx: GraphicsContext, config: SandboxConfig, mut controller: C) -> Self {
        let viewport = Vec2::new(ctx.size.width as f32, ctx.size.height as f32);
        let camera = Camera2D::new(config.world_size(), viewport);
        let renderer = Renderer::new(&ctx, &camera, config.background);
        let hud = config.show_hud.then(|| Hud::new(&ctx));

        let mut world = World::new(config.gravity, &config.boundary(), config.wall_material);
        controller.setup(&mut world);

        Self {
            ctx,
            renderer,
            batch: ShapeBatch::default(),
            hud,
            camera,
            world,
            controller,
            scheduler: FrameScheduler::new(config.target_fps, Instant::now()),
            config,
            cursor: Vec2::ZERO,
            fatal: None,
        }
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(size);
        self.camera
            .update_viewport(Vec2::new(size.width as f32, size.height as f32));
        self.renderer.update_camera(&self.ctx.queue, &self.camera);
    }

    /// Translate a window event into at most one input event
    fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => Some(InputEvent::KeyDown(map_key(*code))),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self
                    .camera
                    .screen_to_world(Vec2::new(position.x as f32, position.y as f32));
                Some(InputEvent::PointerMove {
                    position: self.cursor,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button)?;
                let position = self.cursor;
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerDown { button, position },
                    ElementState::Released => InputEvent::PointerUp { button, position },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                delta: scroll_amount(*delta),
            }),
            _ => None,
        }
    }

    fn dispatch(&mut self, event: InputEvent, elwt: &EventLoopWindowTarget<()>) {
        match global_command(&event).unwrap_or(Command::Continue) {
            Command::Quit => elwt.exit(),
            Command::TogglePause => self.scheduler.toggle_pause(Instant::now()),
            Command::Continue => self.controller.handle(&mut self.world, &event),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.batch.clear();
        draw_scene(
            &mut self.batch,
            &self.world,
            self.controller.drag(),
            self.controller.pointer(),
            self.config.style,
        );
        self.renderer
            .upload(&self.ctx.device, &self.ctx.queue, &self.batch);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        if let Some(hud) = &mut self.hud {
            let text = hud_text(self.world.len(), self.scheduler.fps(Instant::now()));
            let anchor = self.camera.world_to_screen(HUD_ANCHOR);
            hud.render(&self.ctx, &mut encoder, &view, anchor, &text);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Render, step, then sleep off the rest of the frame budget
    fn frame(&mut self, elwt: &EventLoopWindowTarget<()>) {
        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Timeout) => log::warn!("surface timeout, frame skipped"),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fatal = Some(anyhow::anyhow!("GPU out of memory"));
                elwt.exit();
                return;
            }
            // Lost or Outdated
            Err(err) => {
                log::warn!("surface error {:?}, reconfiguring", err);
                self.ctx.reconfigure();
            }
        }

        if self.scheduler.should_step() {
            self.world.step(self.scheduler.nominal_step());
        }

        if let Some(rest) = self.scheduler.end_frame(Instant::now()) {
            std::thread::sleep(rest);
        }
    }

    /// Drop the drag joint, then every world object
    fn shutdown(mut self) -> anyhow::Result<()> {
        self.controller.release(&mut self.world);
        log::info!(
            "shutting down after {} frames with {} entities",
            self.scheduler.frames(),
            self.world.len()
        );
        self.world.shutdown();
        match self.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Open the window described by `config` and run until quit
pub fn run<C: Controller>(config: SandboxConfig, controller: C) -> anyhow::Result<()> {
    let options = WindowOptions {
        title: &config.title,
        width: config.width,
        height: config.height,
        fullscreen: config.fullscreen,
    };
    let (ctx, mut event_loop) = pollster::block_on(GraphicsContext::new(&options))?;

    log::info!(
        "{}: {}x{} world, {} Hz, gravity ({}, {})",
        config.title,
        config.width,
        config.height,
        config.target_fps,
        config.gravity.x,
        config.gravity.y
    );

    let mut app = App::new(ctx, config, controller);

    event_loop
        .run_on_demand(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                // Input for this frame is delivered between here and the redraw
                Event::NewEvents(_) => app.scheduler.begin_frame(Instant::now()),
                Event::WindowEvent { ref event, .. } => {
                    if let Some(hud) = &mut app.hud {
                        hud.on_window_event(&app.ctx, event);
                    }

                    match event {
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::RedrawRequested => app.frame(elwt),
                        _ => {
                            if let Some(input) = app.translate(event) {
                                app.dispatch(input, elwt);
                            }
                        }
                    }
                }
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                _ => {}
            }
        })
        .context("event loop error")?;

    app.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keys_have_aliases() {
        for code in [KeyCode::KeyP, KeyCode::Equal, KeyCode::NumpadAdd] {
            assert_eq!(map_key(code), Key::IncreaseBatch);
        }
        for code in [KeyCode::KeyM, KeyCode::Minus, KeyCode::NumpadSubtract] {
            assert_eq!(map_key(code), Key::DecreaseBatch);
        }
        assert_eq!(map_key(KeyCode::KeyQ), Key::Other);
    }

    #[test]
    fn right_button_drags() {
        assert_eq!(map_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(map_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(map_button(MouseButton::Back), None);
    }

    #[test]
    fn falling_box_starts_quarter_down_the_window() {
        let desc = falling_box_desc(&SandboxConfig::falling_box());
        assert_eq!(desc.position, Vec2::new(400.0, 150.0));
        assert_eq!(desc.material.elasticity, 0.0);
        assert!((desc.angle - FRAC_PI_2).abs() < 1e-6);
    }
}

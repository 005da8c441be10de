//! Interactive rigid-body sandbox
//!
//! Balls (and a box) fall under gravity, bounce off static walls and can be
//! grabbed with the mouse. Every binary in this crate is the same fixed-step
//! loop in `app` with a different `SandboxConfig` and `Controller`:
//!
//! - `world` owns the rapier2d context, the walls and the live entities
//! - `interaction` maps input to world mutations (spawn, drag, nudge)
//! - `scheduler` paces frames and measures the frame rate
//! - `presentation` turns poses into `Canvas` draw calls, which `renderer`
//!   tessellates for wgpu and `hud` overlays with egui

pub mod app;
pub mod config;
pub mod entity;
pub mod hud;
pub mod interaction;
pub mod presentation;
pub mod renderer;
pub mod scheduler;
pub mod world;

pub use config::SandboxConfig;
pub use world::World;

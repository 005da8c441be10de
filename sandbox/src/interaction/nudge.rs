//! Single-box controller: teleport, spin and push one box around

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{Controller, InputEvent, Key};
use crate::entity::{EntityDesc, EntityHandle, ShapeParams};
use crate::world::World;

/// Horizontal speed set by the arrow keys
pub const NUDGE_SPEED: f32 = 5.0;

pub struct NudgeController {
    desc: EntityDesc,
    target: Option<EntityHandle>,
    pointer: Vec2,
}

impl NudgeController {
    /// `desc` is the box spawned at setup
    pub fn new(desc: EntityDesc) -> Self {
        Self {
            desc,
            target: None,
            pointer: Vec2::ZERO,
        }
    }

    pub fn target(&self) -> Option<EntityHandle> {
        self.target
    }

    fn half_extents(&self) -> Vec2 {
        match self.desc.shape {
            ShapeParams::Box { width, height } => Vec2::new(width, height) / 2.0,
            ShapeParams::Circle { radius } => Vec2::splat(radius),
        }
    }

    fn push(&self, world: &mut World, handle: EntityHandle, vx: f32) {
        let vy = world.velocity(handle).map(|v| v.y).unwrap_or_default();
        world.set_velocity(handle, Vec2::new(vx, vy));
    }
}

impl Controller for NudgeController {
    fn setup(&mut self, world: &mut World) {
        self.target = Some(world.spawn(&self.desc));
    }

    fn handle(&mut self, world: &mut World, event: &InputEvent) {
        let Some(handle) = self.target else {
            return;
        };
        match *event {
            InputEvent::KeyDown(Key::Left) => self.push(world, handle, -NUDGE_SPEED),
            InputEvent::KeyDown(Key::Right) => self.push(world, handle, NUDGE_SPEED),
            InputEvent::PointerDown { position, .. } => {
                self.pointer = position;
                world.teleport(handle, position - self.half_extents());
            }
            InputEvent::PointerUp { position, .. } | InputEvent::PointerMove { position } => {
                self.pointer = position;
            }
            InputEvent::Wheel { .. } => world.rotate_by(handle, FRAC_PI_2),
            _ => {}
        }
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

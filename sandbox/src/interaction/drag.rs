//! Spawn-and-drag controller used by the ball sandboxes

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Controller, InputEvent, Key, PointerButton};
use crate::config::SpawnTemplate;
use crate::entity::{EntityHandle, Rgba, ShapeParams};
use crate::world::{DragJoint, World};

/// How much one key press changes the spawn batch size
pub const BATCH_STEP: u32 = 10;

/// Whether an entity is currently held
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragJoint),
}

/// First entity, in insertion order, whose pick radius contains `point`
pub fn pick_entity(world: &World, point: Vec2) -> Option<EntityHandle> {
    world.handles().find(|&handle| {
        match (world.entity(handle), world.pose(handle)) {
            (Some(entity), Some(pose)) => {
                pose.position.distance(point) <= entity.shape().pick_radius()
            }
            _ => false,
        }
    })
}

pub struct DragController {
    state: DragState,
    batch: u32,
    pointer: Vec2,
    template: SpawnTemplate,
    viewport: Vec2,
    rng: StdRng,
}

impl DragController {
    pub fn new(template: SpawnTemplate, viewport: Vec2) -> Self {
        Self::with_rng(template, viewport, StdRng::from_entropy())
    }

    pub fn with_rng(template: SpawnTemplate, viewport: Vec2, rng: StdRng) -> Self {
        Self {
            state: DragState::Idle,
            batch: 1,
            pointer: Vec2::ZERO,
            template,
            viewport,
            rng,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn batch_size(&self) -> u32 {
        self.batch
    }

    /// Release any drag, then clear the world
    pub fn reset(&mut self, world: &mut World) {
        self.release_drag(world);
        world.clear();
        log::info!("world reset");
    }

    fn release_drag(&mut self, world: &mut World) {
        if let DragState::Dragging(drag) = std::mem::take(&mut self.state) {
            world.unpin(drag);
        }
    }

    fn grab(&mut self, world: &mut World, at: Vec2) {
        let Some(handle) = pick_entity(world, at) else {
            return;
        };
        let mass = world.entity(handle).map(|e| e.mass()).unwrap_or_default();
        if let Some(drag) = world.pin(handle, at) {
            log::debug!(
                "grabbed entity {} (mass {}) at ({:.0}, {:.0})",
                handle.index(),
                mass,
                at.x,
                at.y
            );
            self.state = DragState::Dragging(drag);
        }
    }

    fn spawn_batch(&mut self, world: &mut World, at: Vec2) {
        let radius = self.template.radius;
        let shape = ShapeParams::Circle { radius };

        for _ in 0..self.batch {
            let position = if self.batch == 1 {
                at
            } else {
                self.random_position(radius)
            };
            let color = Rgba::rgb(self.rng.gen(), self.rng.gen(), self.rng.gen());
            world.spawn_entity(shape, self.template.mass, position, color);
        }

        log::info!(
            "{} {} added at ({:.0}, {:.0})",
            self.batch,
            if self.batch == 1 { "ball" } else { "balls" },
            at.x,
            at.y
        );
    }

    fn random_position(&mut self, margin: f32) -> Vec2 {
        let axis = |rng: &mut StdRng, extent: f32| {
            if extent > 2.0 * margin {
                rng.gen_range(margin..extent - margin)
            } else {
                extent / 2.0
            }
        };
        let x = axis(&mut self.rng, self.viewport.x);
        let y = axis(&mut self.rng, self.viewport.y);
        Vec2::new(x, y)
    }

    fn adjust_batch(&mut self, increase: bool) {
        self.batch = if increase {
            self.batch.saturating_add(BATCH_STEP)
        } else {
            self.batch.saturating_sub(BATCH_STEP).max(1)
        };
        log::info!("spawn batch size set to {}", self.batch);
    }
}

impl Controller for DragController {
    fn handle(&mut self, world: &mut World, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(Key::Reset) => self.reset(world),
            InputEvent::KeyDown(Key::IncreaseBatch) => self.adjust_batch(true),
            InputEvent::KeyDown(Key::DecreaseBatch) => self.adjust_batch(false),
            InputEvent::PointerDown { button, position } => {
                self.pointer = position;
                // A held entity blocks both spawning and a second grab
                if self.is_dragging() {
                    return;
                }
                match button {
                    PointerButton::Primary => self.spawn_batch(world, position),
                    PointerButton::Secondary => self.grab(world, position),
                    PointerButton::Middle => {}
                }
            }
            InputEvent::PointerUp { position, .. } => {
                self.pointer = position;
                self.release_drag(world);
            }
            InputEvent::PointerMove { position } => {
                self.pointer = position;
                if let DragState::Dragging(drag) = &mut self.state {
                    world.retarget(drag, position);
                }
            }
            _ => {}
        }
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }

    fn drag(&self) -> Option<&DragJoint> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    fn release(&mut self, world: &mut World) {
        self.release_drag(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Material;
    use crate::world::Segment;

    fn world() -> World {
        World::new(
            Vec2::new(0.0, 1000.0),
            &[Segment::new(Vec2::new(0.0, 1070.0), Vec2::new(1920.0, 1070.0))],
            Material::default(),
        )
    }

    fn controller() -> DragController {
        DragController::with_rng(
            SpawnTemplate::default(),
            Vec2::new(1920.0, 1080.0),
            StdRng::seed_from_u64(7),
        )
    }

    fn down(button: PointerButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            button,
            position: Vec2::new(x, y),
        }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp {
            button: PointerButton::Secondary,
            position: Vec2::new(x, y),
        }
    }

    #[test]
    fn single_spawn_lands_at_pointer() {
        let mut world = world();
        let mut ctl = controller();
        ctl.handle(&mut world, &down(PointerButton::Primary, 400.0, 300.0));

        assert_eq!(world.len(), 1);
        let handle = world.handles().next().expect("one entity");
        assert_eq!(world.pose(handle).map(|p| p.position), Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn batch_spawns_inside_viewport() {
        let mut world = world();
        let mut ctl = controller();
        ctl.handle(&mut world, &InputEvent::KeyDown(Key::IncreaseBatch));
        assert_eq!(ctl.batch_size(), 11);

        ctl.handle(&mut world, &down(PointerButton::Primary, 10.0, 10.0));
        assert_eq!(world.len(), 11);
        for handle in world.handles() {
            let p = world.pose(handle).expect("pose").position;
            assert!(p.x >= 30.0 && p.x <= 1890.0, "x out of range: {}", p.x);
            assert!(p.y >= 30.0 && p.y <= 1050.0, "y out of range: {}", p.y);
        }
    }

    #[test]
    fn batch_size_has_a_floor_of_one() {
        let mut world = world();
        let mut ctl = controller();
        ctl.handle(&mut world, &InputEvent::KeyDown(Key::DecreaseBatch));
        assert_eq!(ctl.batch_size(), 1);

        ctl.handle(&mut world, &InputEvent::KeyDown(Key::IncreaseBatch));
        ctl.handle(&mut world, &InputEvent::KeyDown(Key::IncreaseBatch));
        assert_eq!(ctl.batch_size(), 21);
        ctl.handle(&mut world, &InputEvent::KeyDown(Key::DecreaseBatch));
        assert_eq!(ctl.batch_size(), 11);
    }

    #[test]
    fn grab_picks_first_inserted_overlap() {
        let mut world = world();
        let shape = ShapeParams::Circle { radius: 30.0 };
        let a = world.spawn_entity(shape, 5.0, Vec2::new(500.0, 500.0), Rgba::RED);
        let _b = world.spawn_entity(shape, 5.0, Vec2::new(520.0, 500.0), Rgba::BLUE);

        let mut ctl = controller();
        // Closer to B's center, but A was inserted first
        ctl.handle(&mut world, &down(PointerButton::Secondary, 518.0, 500.0));

        assert_eq!(ctl.drag().map(|d| d.entity()), Some(a));
    }

    #[test]
    fn grab_outside_every_radius_does_nothing() {
        let mut world = world();
        world.spawn_entity(
            ShapeParams::Circle { radius: 30.0 },
            5.0,
            Vec2::new(500.0, 500.0),
            Rgba::RED,
        );
        let mut ctl = controller();
        ctl.handle(&mut world, &down(PointerButton::Secondary, 600.0, 500.0));
        assert!(!ctl.is_dragging());
        assert_eq!(world.engine_stats().joints, 0);
    }

    #[test]
    fn second_grab_while_dragging_is_ignored() {
        let mut world = world();
        let shape = ShapeParams::Circle { radius: 30.0 };
        world.spawn_entity(shape, 5.0, Vec2::new(500.0, 500.0), Rgba::RED);
        world.spawn_entity(shape, 5.0, Vec2::new(800.0, 500.0), Rgba::BLUE);

        let mut ctl = controller();
        ctl.handle(&mut world, &down(PointerButton::Secondary, 500.0, 500.0));
        ctl.handle(&mut world, &down(PointerButton::Secondary, 800.0, 500.0));
        ctl.handle(&mut world, &down(PointerButton::Primary, 800.0, 800.0));

        assert_eq!(world.engine_stats().joints, 1);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn pointer_up_without_drag_is_a_no_op() {
        let mut world = world();
        world.spawn_entity(
            ShapeParams::Circle { radius: 30.0 },
            5.0,
            Vec2::new(500.0, 500.0),
            Rgba::RED,
        );
        let before = world.engine_stats();

        let mut ctl = controller();
        ctl.handle(&mut world, &up(500.0, 500.0));

        assert_eq!(world.engine_stats(), before);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn pointer_move_retargets_and_release_detaches() {
        let mut world = world();
        world.spawn_entity(
            ShapeParams::Circle { radius: 30.0 },
            5.0,
            Vec2::new(500.0, 500.0),
            Rgba::RED,
        );
        let mut ctl = controller();
        ctl.handle(&mut world, &down(PointerButton::Secondary, 500.0, 500.0));
        ctl.handle(
            &mut world,
            &InputEvent::PointerMove {
                position: Vec2::new(650.0, 420.0),
            },
        );
        assert_eq!(ctl.drag().map(|d| d.anchor()), Some(Vec2::new(650.0, 420.0)));
        assert_eq!(ctl.pointer(), Vec2::new(650.0, 420.0));

        ctl.handle(&mut world, &up(650.0, 420.0));
        assert!(!ctl.is_dragging());
        assert_eq!(world.engine_stats().joints, 0);
    }

    #[test]
    fn reset_releases_drag_and_clears() {
        let mut world = world();
        let mut ctl = controller();
        for i in 0..5 {
            ctl.handle(
                &mut world,
                &down(PointerButton::Primary, 200.0 + 100.0 * i as f32, 300.0),
            );
        }
        ctl.handle(&mut world, &down(PointerButton::Secondary, 200.0, 300.0));
        assert!(ctl.is_dragging());

        ctl.handle(&mut world, &InputEvent::KeyDown(Key::Reset));

        assert!(world.is_empty());
        assert!(!ctl.is_dragging());
        assert_eq!(world.engine_stats().joints, 0);
    }
}

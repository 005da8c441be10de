//! The physics world: engine context, static boundary and the live entities
//!
//! All rapier state lives here. Entities are only ever added one at a time and
//! removed all at once, and every body leaves the engine through the same
//! release path (collider first, then body).

use glam::Vec2;
use rapier2d::prelude::*;

use crate::entity::{EngineBody, Entity, EntityDesc, EntityHandle, Material, Rgba, ShapeParams};

/// Friction of the boundary walls
pub const WALL_FRICTION: f32 = 0.5;

fn to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn from_na(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// A static boundary segment in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// Position and orientation of a body, read back from the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

/// Object counts registered in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub bodies: usize,
    pub colliders: usize,
    pub joints: usize,
}

/// The pin joint holding an entity at the pointer.
///
/// Created and destroyed only through `World::pin` / `World::unpin`.
#[derive(Debug)]
pub struct DragJoint {
    entity: EntityHandle,
    joint: ImpulseJointHandle,
    anchor: Vec2,
}

impl DragJoint {
    pub fn entity(&self) -> EntityHandle {
        self.entity
    }

    /// Current world-space anchor (the pointer)
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }
}

/// Rapier pipeline and object sets
struct Engine {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl Engine {
    fn new(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Tolerances are tuned for meters; the sandbox works in pixels.
        integration_parameters.length_unit = 100.0;

        Self {
            gravity: to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    fn insert(&mut self, desc: &EntityDesc) -> EngineBody {
        let inertia = desc.shape.moment_of_inertia(desc.mass);

        let rb = RigidBodyBuilder::dynamic()
            .translation(to_na(desc.position))
            .rotation(desc.angle)
            .build();
        let body = self.bodies.insert(rb);

        let builder = match desc.shape {
            ShapeParams::Circle { radius } => ColliderBuilder::ball(radius),
            ShapeParams::Box { width, height } => ColliderBuilder::cuboid(width / 2.0, height / 2.0),
        };
        let collider = builder
            .mass_properties(MassProperties::new(nalgebra::Point2::origin(), desc.mass, inertia))
            .friction(desc.material.friction)
            .restitution(desc.material.elasticity)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        EngineBody { body, collider }
    }

    fn release(&mut self, engine: EngineBody) {
        self.colliders.remove(
            engine.collider,
            &mut self.island_manager,
            &mut self.bodies,
            false,
        );
        self.bodies.remove(
            engine.body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

/// Physics context, static boundary and the ordered collection of live entities
pub struct World {
    engine: Engine,
    /// Fixed body at the origin that walls and drag anchors attach to
    static_body: RigidBodyHandle,
    walls: Vec<ColliderHandle>,
    boundary: Vec<Segment>,
    entities: Vec<Entity>,
}

impl World {
    /// Create the engine context, set gravity and register the boundary walls.
    pub fn new(gravity: Vec2, boundary: &[Segment], wall_material: Material) -> Self {
        let mut engine = Engine::new(gravity);
        let static_body = engine.bodies.insert(RigidBodyBuilder::fixed().build());

        let walls = boundary
            .iter()
            .map(|segment| {
                let collider = ColliderBuilder::segment(to_point(segment.a), to_point(segment.b))
                    .friction(wall_material.friction)
                    .restitution(wall_material.elasticity)
                    .friction_combine_rule(CoefficientCombineRule::Multiply)
                    .restitution_combine_rule(CoefficientCombineRule::Multiply)
                    .build();
                engine
                    .colliders
                    .insert_with_parent(collider, static_body, &mut engine.bodies)
            })
            .collect();

        log::debug!("world created with {} boundary segments", boundary.len());

        Self {
            engine,
            static_body,
            walls,
            boundary: boundary.to_vec(),
            entities: Vec::new(),
        }
    }

    /// Spawn an entity with the default material (friction 0.7, elasticity 1.0).
    pub fn spawn_entity(
        &mut self,
        shape: ShapeParams,
        mass: f32,
        position: Vec2,
        color: Rgba,
    ) -> EntityHandle {
        self.spawn(&EntityDesc::new(shape, mass, position, color))
    }

    /// Spawn an entity from a full description.
    pub fn spawn(&mut self, desc: &EntityDesc) -> EntityHandle {
        let engine = self.engine.insert(desc);
        let handle = EntityHandle(self.entities.len());
        self.entities.push(Entity::new(desc, engine));
        log::debug!(
            "spawned {:?} at ({:.0}, {:.0})",
            desc.shape,
            desc.position.x,
            desc.position.y
        );
        handle
    }

    /// Remove every entity from the engine and empty the collection.
    ///
    /// Any drag joint must have been released first.
    pub fn clear(&mut self) {
        debug_assert_eq!(
            self.engine.impulse_joints.len(),
            0,
            "drag joint still attached while clearing the world"
        );
        for entity in self.entities.drain(..) {
            self.engine.release(entity.engine);
        }
    }

    /// Advance the simulation by exactly `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.engine.step(dt);
    }

    /// Release the entities, then the walls, then the engine context.
    pub fn shutdown(mut self) {
        self.clear();
        for wall in self.walls.drain(..) {
            self.engine.colliders.remove(
                wall,
                &mut self.engine.island_manager,
                &mut self.engine.bodies,
                false,
            );
        }
        self.engine.bodies.remove(
            self.static_body,
            &mut self.engine.island_manager,
            &mut self.engine.colliders,
            &mut self.engine.impulse_joints,
            &mut self.engine.multibody_joints,
            true,
        );
        log::debug!("world shut down");
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    /// Handles of all live entities in insertion order
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        (0..self.entities.len()).map(EntityHandle)
    }

    pub fn boundary(&self) -> &[Segment] {
        &self.boundary
    }

    /// Current pose from the engine
    pub fn pose(&self, handle: EntityHandle) -> Option<Pose> {
        let entity = self.entities.get(handle.0)?;
        let rb = self.engine.bodies.get(entity.engine.body)?;
        Some(Pose {
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
        })
    }

    pub fn velocity(&self, handle: EntityHandle) -> Option<Vec2> {
        let entity = self.entities.get(handle.0)?;
        self.engine
            .bodies
            .get(entity.engine.body)
            .map(|rb| from_na(rb.linvel()))
    }

    pub fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2) {
        if let Some(rb) = self.body_mut(handle) {
            rb.set_linvel(to_na(velocity), true);
        }
    }

    /// Move a body to `position` and stop it
    pub fn teleport(&mut self, handle: EntityHandle, position: Vec2) {
        if let Some(rb) = self.body_mut(handle) {
            rb.set_translation(to_na(position), true);
            rb.set_linvel(nalgebra::Vector2::zeros(), true);
        }
    }

    pub fn rotate_by(&mut self, handle: EntityHandle, delta: f32) {
        if let Some(rb) = self.body_mut(handle) {
            let angle = rb.rotation().angle() + delta;
            rb.set_rotation(nalgebra::UnitComplex::new(angle), true);
        }
    }

    /// Pin `handle` to the static frame at world point `anchor`.
    pub fn pin(&mut self, handle: EntityHandle, anchor: Vec2) -> Option<DragJoint> {
        let body = self.entities.get(handle.0)?.engine.body;
        let rb = self.engine.bodies.get(body)?;
        let local = rb.position().inverse_transform_point(&to_point(anchor));

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(local)
            .local_anchor2(to_point(anchor))
            .build();
        let joint = self
            .engine
            .impulse_joints
            .insert(body, self.static_body, joint, true);

        Some(DragJoint {
            entity: handle,
            joint,
            anchor,
        })
    }

    /// Move the static-frame end of a drag joint.
    pub fn retarget(&mut self, drag: &mut DragJoint, anchor: Vec2) {
        if let Some(joint) = self.engine.impulse_joints.get_mut(drag.joint) {
            joint.data.set_local_anchor2(to_point(anchor));
        }
        if let Some(rb) = self.body_mut(drag.entity) {
            rb.wake_up(true);
        }
        drag.anchor = anchor;
    }

    pub fn unpin(&mut self, drag: DragJoint) {
        self.engine.impulse_joints.remove(drag.joint, true);
    }

    pub fn engine_stats(&self) -> EngineStats {
        EngineStats {
            bodies: self.engine.bodies.len(),
            colliders: self.engine.colliders.len(),
            joints: self.engine.impulse_joints.len(),
        }
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.engine.bodies.contains(handle)
    }

    pub fn contains_collider(&self, handle: ColliderHandle) -> bool {
        self.engine.colliders.contains(handle)
    }

    fn body_mut(&mut self, handle: EntityHandle) -> Option<&mut RigidBody> {
        let body = self.entities.get(handle.0)?.engine.body;
        self.engine.bodies.get_mut(body)
    }
}

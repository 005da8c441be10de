//! Entity records: the static attributes of a ball or box plus its engine handles

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Friction used by spawned entities unless overridden
pub const DEFAULT_FRICTION: f32 = 0.7;
/// Elasticity (coefficient of restitution) used by spawned entities unless overridden
pub const DEFAULT_ELASTICITY: f32 = 1.0;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const RED: Rgba = Rgba::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Rgba = Rgba::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Rgba = Rgba::rgb(0x00, 0x00, 0xFF);
    pub const CYAN: Rgba = Rgba::rgb(0x00, 0xFF, 0xFF);
    pub const MAGENTA: Rgba = Rgba::rgb(0xFF, 0x00, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Same color with alpha scaled to `alpha` (0.0 - 1.0)
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0) as u8,
            ..self
        }
    }

    /// Normalized RGBA for vertex data
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Collision geometry of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParams {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
}

impl ShapeParams {
    /// Moment of inertia about the center for a solid shape of the given mass
    pub fn moment_of_inertia(&self, mass: f32) -> f32 {
        match *self {
            ShapeParams::Circle { radius } => mass * radius * radius / 2.0,
            ShapeParams::Box { width, height } => mass * (width * width + height * height) / 12.0,
        }
    }

    /// Radius of the circle used for pointer picking
    pub fn pick_radius(&self) -> f32 {
        match *self {
            ShapeParams::Circle { radius } => radius,
            ShapeParams::Box { width, height } => 0.5 * (width * width + height * height).sqrt(),
        }
    }
}

/// Surface coefficients of a collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub friction: f32,
    pub elasticity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            elasticity: DEFAULT_ELASTICITY,
        }
    }
}

/// Everything needed to spawn an entity
#[derive(Debug, Clone, Copy)]
pub struct EntityDesc {
    pub shape: ShapeParams,
    pub mass: f32,
    pub position: Vec2,
    pub angle: f32,
    pub color: Rgba,
    pub material: Material,
}

impl EntityDesc {
    pub fn new(shape: ShapeParams, mass: f32, position: Vec2, color: Rgba) -> Self {
        Self {
            shape,
            mass,
            position,
            angle: 0.0,
            color,
            material: Material::default(),
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Index of an entity in the world's live collection.
///
/// Handles are invalidated by `World::clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub(crate) usize);

impl EntityHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The body and its single collider, always created and released together.
///
/// Only `World` can build or release one, so the pair is never observed
/// half-registered.
#[derive(Debug)]
pub(crate) struct EngineBody {
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

/// A live ball or box
#[derive(Debug)]
pub struct Entity {
    shape: ShapeParams,
    mass: f32,
    color: Rgba,
    pub(crate) engine: EngineBody,
}

impl Entity {
    pub(crate) fn new(desc: &EntityDesc, engine: EngineBody) -> Self {
        Self {
            shape: desc.shape,
            mass: desc.mass,
            color: desc.color,
            engine,
        }
    }

    pub fn shape(&self) -> ShapeParams {
        self.shape
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.engine.body
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.engine.collider
    }
}

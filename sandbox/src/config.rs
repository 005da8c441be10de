//! Per-variant settings
//!
//! Every sandbox binary is the same loop with a different `SandboxConfig`.

use glam::Vec2;

use crate::entity::{Material, Rgba};
use crate::world::{Segment, WALL_FRICTION};

/// How entities are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Translucent disc, outline and orientation ticks
    Full,
    /// One point per entity
    Points,
}

/// Static boundary geometry
#[derive(Debug, Clone, PartialEq)]
pub enum WallLayout {
    /// Floor, roof, left and right walls `inset` pixels inside the world edges
    Enclosure { inset: f32 },
    /// Explicit segments
    Segments(Vec<Segment>),
}

/// Template for balls spawned by the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTemplate {
    pub radius: f32,
    pub mass: f32,
}

impl Default for SpawnTemplate {
    fn default() -> Self {
        Self {
            radius: 30.0,
            mass: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub title: String,
    /// World (and requested window) size in pixels
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub target_fps: f32,
    pub gravity: Vec2,
    pub walls: WallLayout,
    pub wall_material: Material,
    pub style: RenderStyle,
    pub show_hud: bool,
    pub spawn: SpawnTemplate,
    pub background: Rgba,
}

impl SandboxConfig {
    /// Fullscreen ball pit with the HUD overlay
    pub fn fullscreen() -> Self {
        Self {
            title: "Rings and rings and rings".to_string(),
            width: 1920,
            height: 1080,
            fullscreen: true,
            target_fps: 60.0,
            gravity: Vec2::new(0.0, 1000.0),
            walls: WallLayout::Enclosure { inset: 10.0 },
            wall_material: Material {
                friction: WALL_FRICTION,
                elasticity: 1.0,
            },
            style: RenderStyle::Full,
            show_hud: true,
            spawn: SpawnTemplate::default(),
            background: Rgba::BLACK,
        }
    }

    pub fn windowed() -> Self {
        Self {
            title: "Sandbox".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            ..Self::fullscreen()
        }
    }

    /// Balls drawn as single points, no overlay
    pub fn points() -> Self {
        Self {
            style: RenderStyle::Points,
            show_hud: false,
            ..Self::fullscreen()
        }
    }

    /// One box falling onto a ledge, stepped at 120 Hz
    pub fn falling_box() -> Self {
        let (w, h) = (800.0, 600.0);
        Self {
            title: "Hello Chipmunk !".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            target_fps: 120.0,
            gravity: Vec2::new(0.0, 500.0),
            walls: WallLayout::Segments(vec![
                Segment::new(Vec2::new(0.0, h / 2.0), Vec2::new(w, h / 2.0)),
                Segment::new(Vec2::new(w / 4.0, 0.0), Vec2::new(w / 4.0, h)),
            ]),
            wall_material: Material {
                friction: WALL_FRICTION,
                elasticity: 0.0,
            },
            style: RenderStyle::Full,
            show_hud: false,
            spawn: SpawnTemplate::default(),
            background: Rgba::BLACK,
        }
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Boundary segments in world pixels
    pub fn boundary(&self) -> Vec<Segment> {
        match &self.walls {
            WallLayout::Enclosure { inset } => {
                let (w, h, i) = (self.width as f32, self.height as f32, *inset);
                vec![
                    // floor, roof, left, right
                    Segment::new(Vec2::new(0.0, h - i), Vec2::new(w, h - i)),
                    Segment::new(Vec2::new(0.0, i), Vec2::new(w, i)),
                    Segment::new(Vec2::new(i, 0.0), Vec2::new(i, h)),
                    Segment::new(Vec2::new(w - i, 0.0), Vec2::new(w - i, h)),
                ]
            }
            WallLayout::Segments(segments) => segments.clone(),
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::fullscreen()
    }
}

//! Turns the current world state into draw calls
//!
//! Nothing here mutates the world. Poses are read from the engine every
//! frame; the only state is what gets passed in.

use glam::Vec2;

use crate::config::RenderStyle;
use crate::entity::{Entity, Rgba, ShapeParams};
use crate::world::{DragJoint, Pose, World};

/// Tick length as a fraction of the radius
const TICK_RATIO: f32 = 0.7;
const DRAG_DOT_RADIUS: f32 = 2.0;

/// The drawing primitives the sandbox needs from a rendering surface
pub trait Canvas {
    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba);
    fn point(&mut self, at: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
}

/// Rotate `point` around `center` by `angle` radians
pub fn rotate_around(point: Vec2, center: Vec2, angle: f32) -> Vec2 {
    center + Vec2::from_angle(angle).rotate(point - center)
}

/// Corners of a `width` x `height` box centered on the pose, clockwise from top-left
pub fn box_corners(pose: Pose, width: f32, height: f32) -> [Vec2; 4] {
    let c = pose.position;
    let (hw, hh) = (width / 2.0, height / 2.0);
    [
        Vec2::new(c.x - hw, c.y - hh),
        Vec2::new(c.x + hw, c.y - hh),
        Vec2::new(c.x + hw, c.y + hh),
        Vec2::new(c.x - hw, c.y + hh),
    ]
    .map(|p| rotate_around(p, c, pose.angle))
}

/// Draw the boundary, every entity and the drag line
pub fn draw_scene(
    canvas: &mut impl Canvas,
    world: &World,
    drag: Option<&DragJoint>,
    pointer: Vec2,
    style: RenderStyle,
) {
    for wall in world.boundary() {
        canvas.line(wall.a, wall.b, Rgba::CYAN);
    }

    for handle in world.handles() {
        if let (Some(entity), Some(pose)) = (world.entity(handle), world.pose(handle)) {
            draw_entity(canvas, entity, pose, style);
        }
    }

    if let Some(drag) = drag {
        if let Some(pose) = world.pose(drag.entity()) {
            draw_drag(canvas, pointer, pose.position);
        }
    }
}

pub fn draw_entity(canvas: &mut impl Canvas, entity: &Entity, pose: Pose, style: RenderStyle) {
    let color = entity.color();
    match (entity.shape(), style) {
        (ShapeParams::Circle { .. }, RenderStyle::Points) => canvas.point(pose.position, color),
        (ShapeParams::Circle { radius }, RenderStyle::Full) => {
            let center = pose.position;
            canvas.fill_circle(center, radius, color.with_alpha(0.5));
            canvas.stroke_circle(center, radius, Rgba::WHITE);

            let up = rotate_around(center - Vec2::new(0.0, radius * TICK_RATIO), center, pose.angle);
            let right = rotate_around(center + Vec2::new(radius * TICK_RATIO, 0.0), center, pose.angle);
            canvas.line(center, up, Rgba::BLUE.with_alpha(0.8));
            canvas.line(center, right, Rgba::RED.with_alpha(0.8));

            canvas.point(center, Rgba::GREEN);
        }
        (ShapeParams::Box { width, height }, _) => {
            let corners = box_corners(pose, width, height);
            canvas.fill_polygon(&corners, color.with_alpha(0.5));
            for i in 0..corners.len() {
                canvas.line(corners[i], corners[(i + 1) % corners.len()], color);
            }
        }
    }
}

fn draw_drag(canvas: &mut impl Canvas, pointer: Vec2, held: Vec2) {
    canvas.line(pointer, held, Rgba::GREEN.with_alpha(0.5));
    canvas.fill_circle(held, DRAG_DOT_RADIUS, Rgba::GREEN);
    canvas.fill_circle(pointer, DRAG_DOT_RADIUS, Rgba::GREEN);
}

/// Status line shown by the HUD
pub fn hud_text(entity_count: usize, fps: f32) -> String {
    format!("Balls count : {} - FPS : {}", entity_count, fps.round() as i64)
}

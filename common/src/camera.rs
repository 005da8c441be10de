//! Screen-space camera for the 2D sandboxes
//!
//! The simulation works in pixels with the origin in the top-left corner and y
//! pointing down. The camera maps that fixed world rectangle onto whatever size
//! the window currently has.

use glam::{Mat4, Vec2};

/// Orthographic camera over a fixed pixel-space world
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Size of the simulated world in pixels
    pub world_size: Vec2,
    /// Current size of the window surface in physical pixels
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(world_size: Vec2, viewport: Vec2) -> Self {
        Self {
            world_size,
            viewport,
        }
    }

    /// Get the view-projection matrix (world pixels to clip space)
    pub fn view_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.world_size.x, self.world_size.y, 0.0, -1.0, 1.0)
    }

    pub fn update_viewport(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
        }
    }

    /// Convert a cursor position in window pixels to world pixels
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return screen;
        }
        screen * self.world_size / self.viewport
    }

    /// Scale from world pixels to window pixels, used to place overlay text
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        if self.world_size.x <= 0.0 || self.world_size.y <= 0.0 {
            return world;
        }
        world * self.viewport / self.world_size
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn corners_map_to_clip_space() {
        let camera = Camera2D::new(Vec2::new(1920.0, 1080.0), Vec2::new(1920.0, 1080.0));
        let vp = camera.view_projection();

        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = vp * Vec4::new(1920.0, 1080.0, 0.0, 1.0);

        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn screen_to_world_scales_with_window() {
        let camera = Camera2D::new(Vec2::new(1920.0, 1080.0), Vec2::new(960.0, 540.0));
        let world = camera.screen_to_world(Vec2::new(480.0, 270.0));
        assert_eq!(world, Vec2::new(960.0, 540.0));
        assert_eq!(camera.world_to_screen(world), Vec2::new(480.0, 270.0));
    }

    #[test]
    fn zero_sized_viewport_is_ignored() {
        let mut camera = Camera2D::new(Vec2::new(800.0, 600.0), Vec2::new(800.0, 600.0));
        camera.update_viewport(Vec2::ZERO);
        assert_eq!(camera.viewport, Vec2::new(800.0, 600.0));
    }
}

use glam::{Vec3, Vec4};

use crate::geometry::{Geometry, GeometryStore};

pub const COLOR_SLIDER_MAX: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub color: Vec4,
    pub active_triangles: u32,
    pub max_triangles: u32,
    pub use_file_colors: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            color: Vec4::ZERO,
            active_triangles: 1,
            max_triangles: 1,
            use_file_colors: false,
        }
    }
}

impl RenderState {
    pub fn vertex_count(&self) -> u32 {
        self.active_triangles * 3
    }
}

pub struct RenderContext {
    geometry: GeometryStore,
    state: RenderState,
}

impl RenderContext {
    pub fn new(initial: Geometry) -> Self {
        let max_triangles = initial.triangle_count() as u32;
        Self {
            geometry: GeometryStore::new(initial),
            state: RenderState {
                max_triangles,
                ..RenderState::default()
            },
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn load_geometry(&mut self, geometry: Geometry) {
        self.geometry.load(geometry);
        self.state.max_triangles = self.geometry.triangle_count() as u32;
        self.state.active_triangles = 1;
    }

    pub fn take_pending_upload(&mut self) -> Option<&Geometry> {
        self.geometry.take_pending_upload()
    }

    pub fn set_active_triangles(&mut self, count: u32) {
        self.state.active_triangles = count.clamp(1, self.state.max_triangles.max(1));
    }

    /// Takes raw 0-255 slider values; alpha is always opaque.
    pub fn set_color_from_sliders(&mut self, rgb: [f32; 3]) {
        let rgb = Vec3::from_array(rgb) / COLOR_SLIDER_MAX;
        self.state.color = rgb.extend(1.0);
    }

    pub fn set_use_file_colors(&mut self, enabled: bool) {
        self.state.use_file_colors = enabled;
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Geometry::default_triangle())
    }
}

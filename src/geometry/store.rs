use crate::geometry::Geometry;

pub struct GeometryStore {
    current: Geometry,
    generation: u64,
    needs_upload: bool,
}

impl GeometryStore {
    pub fn new(initial: Geometry) -> Self {
        Self {
            current: initial,
            generation: 0,
            needs_upload: true,
        }
    }

    pub fn load(&mut self, geometry: Geometry) {
        self.current = geometry;
        self.generation += 1;
        self.needs_upload = true;
    }

    pub fn current(&self) -> &Geometry {
        &self.current
    }

    pub fn triangle_count(&self) -> usize {
        self.current.triangle_count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the geometry once per load so the caller can push it to the device.
    pub fn take_pending_upload(&mut self) -> Option<&Geometry> {
        if self.needs_upload {
            self.needs_upload = false;
            Some(self.current())
        } else {
            None
        }
    }
}

impl Default for GeometryStore {
    fn default() -> Self {
        Self::new(Geometry::default_triangle())
    }
}

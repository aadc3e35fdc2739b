use crate::state::RenderState;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LoopError {
    #[error("frame loop was stopped and cannot be restarted")]
    Stopped,
    #[error("frame loop is already running")]
    AlreadyRunning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub clear: wgpu::Color,
    pub color: [f32; 4],
    pub use_vertex_colors: bool,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl DrawCall {
    pub fn from_state(state: &RenderState) -> Self {
        Self {
            clear: wgpu::Color::BLACK,
            color: state.color.to_array(),
            use_vertex_colors: state.use_file_colors,
            first_vertex: 0,
            vertex_count: state.vertex_count(),
        }
    }

    pub fn vertices(&self) -> std::ops::Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn start(&mut self) -> Result<(), LoopError> {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                log::info!("frame loop started");
                Ok(())
            }
            LoopState::Running => Err(LoopError::AlreadyRunning),
            LoopState::Stopped => Err(LoopError::Stopped),
        }
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::info!("frame loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick(&mut self, state: &RenderState) -> Option<DrawCall> {
        if !self.is_running() {
            return None;
        }
        self.frames += 1;
        Some(DrawCall::from_state(state))
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::state::RenderContext;
    use glam::Vec4;

    fn running() -> FrameLoop {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start().unwrap();
        frame_loop
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn idle_loop_draws_nothing() {
        let mut frame_loop = FrameLoop::new();
        assert!(frame_loop.tick(&RenderState::default()).is_none());
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut frame_loop = running();
        assert_eq!(frame_loop.start(), Err(LoopError::AlreadyRunning));
        assert!(frame_loop.is_running());
    }

    #[test]
    fn stopped_loop_cannot_restart() {
        let mut frame_loop = running();
        frame_loop.stop();
        assert_eq!(frame_loop.start(), Err(LoopError::Stopped));
        assert!(frame_loop.tick(&RenderState::default()).is_none());
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn ticks_are_counted_while_running() {
        let mut frame_loop = running();
        let state = RenderState::default();
        for _ in 0..5 {
            assert!(frame_loop.tick(&state).is_some());
        }
        frame_loop.stop();
        frame_loop.tick(&state);
        assert_eq!(frame_loop.frames(), 5);
    }

    // ── draw calls ────────────────────────────────────────────────────────

    #[test]
    fn default_startup_draws_three_vertices() {
        let mut frame_loop = running();
        let ctx = RenderContext::default();
        let call = frame_loop.tick(ctx.state()).unwrap();
        assert_eq!(call.vertex_count, 3);
        assert_eq!(call.first_vertex, 0);
        assert_eq!(call.color, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(call.clear, wgpu::Color::BLACK);
    }

    #[test]
    fn draw_covers_active_triangles_only() {
        let mut frame_loop = running();
        let mut ctx = RenderContext::default();
        ctx.load_geometry(Geometry::new(vec![0.0; 9 * 6], vec![1.0; 12 * 6]).unwrap());
        for n in 1..=6 {
            ctx.set_active_triangles(n);
            let call = frame_loop.tick(ctx.state()).unwrap();
            assert_eq!(call.vertices(), 0..n * 3);
        }
    }

    #[test]
    fn draw_carries_uniform_color_and_source() {
        let mut frame_loop = running();
        let mut ctx = RenderContext::default();
        ctx.set_color_from_sliders([255.0, 0.0, 255.0]);
        ctx.set_use_file_colors(true);
        let call = frame_loop.tick(ctx.state()).unwrap();
        assert_eq!(call.color, Vec4::new(1.0, 0.0, 1.0, 1.0).to_array());
        assert!(call.use_vertex_colors);
    }
}

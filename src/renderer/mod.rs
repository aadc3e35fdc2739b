pub mod buffers;
pub mod gpu;
pub mod pipeline;
pub mod schedule;

pub use gpu::{GpuState, SurfaceRecovery, surface_recovery};
pub use schedule::FrameLoop;

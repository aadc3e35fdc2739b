pub mod bridge;
pub mod panels;
pub mod state;
pub mod theme;

pub use panels::{PanelStats, UiActions, draw_side_panel};
pub use state::UiState;
pub use theme::apply_theme;

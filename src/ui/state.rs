use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading(PathBuf),
    Loaded { path: PathBuf, triangles: usize },
    Failed { path: PathBuf, message: String },
}

pub struct UiState {
    pub triangle_slider: u32,
    pub triangle_slider_max: u32,
    pub color_sliders: [f32; 3],
    pub use_file_colors: bool,

    pub file_path: String,
    pub load_status: LoadStatus,

    pub vsync_enabled: bool,
    pub show_stats: bool,
}

impl UiState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            triangle_slider: 1,
            triangle_slider_max: 1,
            color_sliders: config.initial_color,
            use_file_colors: false,

            file_path: config
                .initial_geometry
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            load_status: LoadStatus::Idle,

            vsync_enabled: config.vsync,
            show_stats: true,
        }
    }

    pub fn reset_triangle_slider(&mut self, max: u32) {
        self.triangle_slider_max = max.max(1);
        self.triangle_slider = 1;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

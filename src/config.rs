use std::ffi::OsString;
use std::path::PathBuf;

use winit::dpi::PhysicalSize;

use crate::logging::LoggingConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_size: PhysicalSize<u32>,
    pub vsync: bool,
    /// Raw 0-255 values the color sliders start at.
    pub initial_color: [f32; 3],
    pub initial_geometry: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Trigon".to_string(),
            window_size: PhysicalSize::new(1280, 800),
            vsync: true,
            initial_color: [128.0, 128.0, 128.0],
            initial_geometry: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_args(mut args: impl Iterator<Item = OsString>) -> Self {
        Self {
            initial_geometry: args.next().map(PathBuf::from),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_keeps_default_triangle() {
        let config = AppConfig::from_args(std::iter::empty());
        assert!(config.initial_geometry.is_none());
        assert_eq!(config.initial_color, [128.0; 3]);
        assert!(config.vsync);
    }

    #[test]
    fn first_arg_is_initial_geometry() {
        let args = ["scene.json", "ignored"].into_iter().map(OsString::from);
        let config = AppConfig::from_args(args);
        assert_eq!(config.initial_geometry, Some(PathBuf::from("scene.json")));
    }
}

use std::path::PathBuf;

use crate::loader::{FileLoader, LoadResult};
use crate::state::RenderContext;
use crate::ui::panels::UiActions;
use crate::ui::state::{LoadStatus, UiState};

pub fn update_triangles(ctx: &mut RenderContext, ui: &mut UiState) {
    ctx.set_active_triangles(ui.triangle_slider);
    ui.triangle_slider = ctx.state().active_triangles;
}

pub fn update_color(ctx: &mut RenderContext, ui: &UiState) {
    ctx.set_color_from_sliders(ui.color_sliders);
}

pub fn check_box(ctx: &mut RenderContext, ui: &UiState) {
    ctx.set_use_file_colors(ui.use_file_colors);
    log::debug!(
        "color source: {}",
        if ui.use_file_colors { "file" } else { "sliders" }
    );
}

pub fn upload_file(loader: &FileLoader, ui: &mut UiState, path: PathBuf) {
    ui.file_path = path.display().to_string();
    ui.load_status = LoadStatus::Loading(path.clone());
    loader.request(path);
}

/// Applies a finished load. Failures leave the geometry and render state untouched.
pub fn apply_load_result(ctx: &mut RenderContext, ui: &mut UiState, result: LoadResult) {
    match result {
        LoadResult::Loaded { path, geometry } => {
            let triangles = geometry.triangle_count();
            ctx.load_geometry(geometry);
            ui.reset_triangle_slider(ctx.state().max_triangles);
            log::info!("loaded {triangles} triangles from {}", path.display());
            ui.load_status = LoadStatus::Loaded { path, triangles };
        }
        LoadResult::Failed { path, error } => {
            ui.load_status = LoadStatus::Failed {
                path,
                message: error.to_string(),
            };
        }
    }
}

pub fn apply_actions(
    ctx: &mut RenderContext,
    ui: &mut UiState,
    loader: &FileLoader,
    actions: UiActions,
) {
    if actions.update_triangles {
        update_triangles(ctx, ui);
    }

    if actions.update_color {
        update_color(ctx, ui);
    }

    if actions.toggle_color_source {
        check_box(ctx, ui);
    }

    if let Some(path) = actions.load_file {
        upload_file(loader, ui, path);
    }
}

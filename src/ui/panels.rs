use std::path::PathBuf;

use egui::{Color32, Context, RichText, ScrollArea, TextEdit, Ui};

use crate::ui::state::{LoadStatus, UiState};
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub update_triangles: bool,
    pub update_color: bool,
    pub toggle_color_source: bool,
    pub load_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Default)]
pub struct PanelStats {
    pub fps: f32,
    pub frames: u64,
    pub vertices_drawn: u32,
    pub triangles_loaded: u32,
}

pub fn draw_side_panel(ctx: &Context, state: &mut UiState, stats: &PanelStats) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(300.0)
        .max_width(400.0)
        .default_width(320.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Trigon").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Triangle viewer").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "GEOMETRY");
                file_controls(ui, state, &mut actions);
                ui.add_space(16.0);

                section_header(ui, "TRIANGLES");
                ui.horizontal(|ui| {
                    ui.label("Count:");
                    let max = state.triangle_slider_max.max(1);
                    let slider = egui::Slider::new(&mut state.triangle_slider, 1..=max)
                        .suffix(format!(" / {max}"));
                    if ui.add(slider).changed() {
                        actions.update_triangles = true;
                    }
                });
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                section_header(ui, "COLOR");
                for (i, label) in ["R", "G", "B"].iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(*label).color(CHANNEL_COLORS[i]).strong());
                        let slider = egui::Slider::new(&mut state.color_sliders[i], 0.0..=255.0)
                            .step_by(1.0);
                        if ui.add(slider).changed() {
                            actions.update_color = true;
                        }
                    });
                }
                ui.add_space(6.0);
                color_swatch(ui, state.color_sliders);
                ui.add_space(8.0);
                if ui
                    .checkbox(&mut state.use_file_colors, "Use colors from file")
                    .changed()
                {
                    actions.toggle_color_source = true;
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                section_header(ui, "DISPLAY");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.vsync_enabled, "VSync");
                    ui.checkbox(&mut state.show_stats, "Stats");
                });
                ui.add_space(12.0);

                if state.show_stats {
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn file_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    ui.horizontal(|ui| {
        let edit = ui.add(
            TextEdit::singleline(&mut state.file_path)
                .hint_text("path/to/geometry.json")
                .desired_width(ui.available_width() - 60.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add(egui::Button::new(RichText::new("Load").color(BG_PURE_BLACK)).fill(ACCENT_BLUE))
            .clicked();
        if (clicked || submitted) && !state.file_path.trim().is_empty() {
            actions.load_file = Some(PathBuf::from(state.file_path.trim()));
        }
    });
    ui.label(
        RichText::new("or drop a .json file onto the window")
            .color(TEXT_MUTED)
            .size(10.0)
            .italics(),
    );

    let (text, color) = match &state.load_status {
        LoadStatus::Idle => return,
        LoadStatus::Loading(path) => (format!("Loading {}...", file_name(path)), ACCENT_ORANGE),
        LoadStatus::Loaded { path, triangles } => (
            format!("{} - {} triangles", file_name(path), triangles),
            ACCENT_GREEN,
        ),
        LoadStatus::Failed { path, message } => {
            (format!("{}: {}", file_name(path), message), ACCENT_RED)
        }
    };

    ui.add_space(6.0);
    egui::Frame::default()
        .fill(Color32::from_rgb(14, 14, 18))
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).size(11.0));
        });
}

fn color_swatch(ui: &mut Ui, rgb: [f32; 3]) {
    let [r, g, b] = rgb.map(|c| c.clamp(0.0, 255.0).round() as u8);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 18.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 4.0, Color32::from_rgb(r, g, b));
}

fn stats_panel(ui: &mut Ui, stats: &PanelStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            let fps_color = if stats.fps >= 60.0 {
                ACCENT_GREEN
            } else if stats.fps >= 30.0 {
                ACCENT_ORANGE
            } else {
                ACCENT_RED
            };

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("FPS").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color));
                ui.end_row();

                ui.label(RichText::new("Frames").color(TEXT_MUTED));
                ui.label(RichText::new(stats.frames.to_string()).color(TEXT_PRIMARY));
                ui.end_row();

                ui.label(RichText::new("Vertices").color(TEXT_MUTED));
                ui.label(RichText::new(stats.vertices_drawn.to_string()).color(ACCENT_BLUE));
                ui.end_row();

                ui.label(RichText::new("Loaded").color(TEXT_MUTED));
                ui.label(RichText::new(stats.triangles_loaded.to_string()).color(TEXT_PRIMARY));
                ui.end_row();
            });
        });
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

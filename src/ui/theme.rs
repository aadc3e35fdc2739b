use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PURE_BLACK: Color32 = Color32::from_rgb(0, 0, 0);
pub const BG_PANEL: Color32 = Color32::from_rgb(5, 5, 7);
pub const BG_WIDGET: Color32 = Color32::from_rgb(15, 15, 20);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(25, 25, 35);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(35, 35, 50);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(168, 168, 171);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 107, 112);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(220, 220, 225);

pub const ACCENT_GREEN: Color32 = Color32::from_rgb(46, 172, 35);
pub const ACCENT_RED: Color32 = Color32::from_rgb(172, 35, 35);
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(84, 102, 206);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(172, 117, 35);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(50, 51, 113, 77);

pub const CHANNEL_COLORS: [Color32; 3] = [ACCENT_RED, ACCENT_GREEN, ACCENT_BLUE];

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_PURE_BLACK;
    visuals.faint_bg_color = BG_PANEL;
    visuals.error_fg_color = ACCENT_RED;
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.hyperlink_color = ACCENT_BLUE;
    visuals.slider_trailing_fill = true;
    visuals.selection.bg_fill = ACCENT_BLUE.gamma_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_BLUE);

    let widgets = &mut visuals.widgets;
    for (w, fill, text) in [
        (&mut widgets.noninteractive, BG_WIDGET, TEXT_MUTED),
        (&mut widgets.inactive, BG_WIDGET, TEXT_PRIMARY),
        (&mut widgets.hovered, BG_WIDGET_HOVER, TEXT_BRIGHT),
        (&mut widgets.active, BG_WIDGET_ACTIVE, TEXT_BRIGHT),
        (&mut widgets.open, BG_WIDGET_ACTIVE, TEXT_BRIGHT),
    ] {
        w.bg_fill = fill;
        w.weak_bg_fill = fill;
        w.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
        w.fg_stroke = Stroke::new(1.0, text);
        w.rounding = Rounding::same(4.0);
    }
    widgets.active.bg_stroke = Stroke::new(2.0, ACCENT_BLUE);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.slider_width = 200.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}

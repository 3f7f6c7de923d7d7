use std::f32::consts::TAU;

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, RichText, Shape, Stroke, Ui, pos2, vec2};

use super::theme::colors::{ThemeColors, theme_colors};
use super::theme::tokens::*;

/// Large centered section heading with a short accent bar underneath.
pub fn section_heading(ui: &mut Ui, text: &str) {
    let tc = theme_colors(ui.ctx());
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(text)
                .size(HEADING_SIZE)
                .color(tc.text_primary)
                .strong(),
        );
        let (bar, _) = ui.allocate_exact_size(vec2(48.0, 3.0), egui::Sense::hover());
        ui.painter()
            .rect_filled(bar, CornerRadius::same(2), tc.accent);
    });
    ui.add_space(GRID_GAP_SMALL);
}

/// Hairline divider `width` wide, centered in the current layout.
pub fn rule(ui: &mut Ui, width: f32) {
    let tc = theme_colors(ui.ctx());
    let (rect, _) = ui.allocate_exact_size(vec2(width, 1.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, CornerRadius::ZERO, tc.separator);
}

/// Frosted circular play button with a right-pointing triangle.
pub fn play_button(painter: &Painter, center: Pos2, size: f32, hovered: bool, tc: &ThemeColors) {
    let fill = if hovered { tc.play_button_hover } else { tc.play_button };
    let radius = size * 0.5;
    painter.circle_filled(center, radius, fill);

    let half = radius * 0.38;
    // Optical centering: nudge the triangle right.
    let c = center + vec2(half * 0.2, 0.0);
    painter.add(Shape::convex_polygon(
        vec![
            pos2(c.x - half * 0.8, c.y - half),
            pos2(c.x + half, c.y),
            pos2(c.x - half * 0.8, c.y + half),
        ],
        tc.chrome_fg,
        Stroke::NONE,
    ));
}

/// Ring spinner; `time` drives the rotation.
pub fn spinner(painter: &Painter, center: Pos2, radius: f32, time: f64, tc: &ThemeColors) {
    let width = (radius * 0.12).max(2.0);
    painter.circle_stroke(center, radius, Stroke::new(width, tc.spinner_track));

    let start = (time as f32 * TAU) % TAU;
    let sweep = TAU * 0.25;
    let steps = 24;
    let points: Vec<Pos2> = (0..=steps)
        .map(|i| {
            let a = start + sweep * i as f32 / steps as f32;
            center + radius * vec2(a.cos(), a.sin())
        })
        .collect();
    painter.add(Shape::line(points, Stroke::new(width, tc.spinner_head)));
}

/// Rounded translucent pill with white text, anchored at `anchor`. Returns its rect.
pub fn pill(painter: &Painter, anchor: Pos2, align: Align2, text: &str, size: f32, tc: &ThemeColors) -> Rect {
    let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(size), tc.chrome_fg);
    let padding = vec2(size * 0.9, size * 0.45);
    let rect = align.anchor_size(anchor, galley.size() + padding * 2.0);
    painter.rect_filled(rect, CornerRadius::same(255), tc.chrome_bg);
    painter.galley(rect.min + padding, galley, tc.chrome_fg);
    rect
}

/// Expand (or, when `active`, compress) corner glyph inside a dark square button.
pub fn fullscreen_glyph(painter: &Painter, rect: Rect, active: bool, hovered: bool, tc: &ThemeColors) {
    let fill = if hovered { tc.chrome_bg_hover } else { tc.chrome_bg };
    painter.rect_filled(rect, CornerRadius::same(WIDGET_ROUNDING * 2), fill);

    let inner = rect.shrink(rect.width() * 0.3);
    let arm = inner.width() * 0.35;
    let stroke = Stroke::new(1.8, tc.chrome_fg);
    for (corner, dir) in [
        (inner.left_top(), vec2(1.0, 1.0)),
        (inner.right_top(), vec2(-1.0, 1.0)),
        (inner.left_bottom(), vec2(1.0, -1.0)),
        (inner.right_bottom(), vec2(-1.0, -1.0)),
    ] {
        // Compress glyph draws the brackets pointing back toward the corner.
        let (origin, sign) = if active {
            (corner + dir * arm, -1.0)
        } else {
            (corner, 1.0)
        };
        painter.line_segment([origin, origin + vec2(dir.x * arm * sign, 0.0)], stroke);
        painter.line_segment([origin, origin + vec2(0.0, dir.y * arm * sign)], stroke);
    }
}

/// Small gold testimonial marker with a moving highlight.
pub fn badge(
    painter: &Painter,
    center: Pos2,
    label: &str,
    scale: f32,
    opacity: f32,
    shine: f32,
    tc: &ThemeColors,
) {
    if opacity <= 0.0 {
        return;
    }
    let radius = 14.0 * scale;
    painter.circle_filled(center, radius, tc.badge.gamma_multiply(opacity));

    let x = center.x - radius + 2.0 * radius * shine;
    let highlight = Color32::from_white_alpha((90.0 * opacity) as u8);
    painter.line_segment(
        [pos2(x - radius * 0.2, center.y - radius * 0.7), pos2(x + radius * 0.2, center.y + radius * 0.7)],
        Stroke::new(radius * 0.25, highlight),
    );
    painter.circle_stroke(center, radius, Stroke::new(1.0, tc.chrome_bg.gamma_multiply(opacity)));
    painter.text(
        center,
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(BADGE_SIZE * scale),
        Color32::WHITE.gamma_multiply(opacity),
    );
}

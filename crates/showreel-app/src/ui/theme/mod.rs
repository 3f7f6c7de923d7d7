pub mod colors;
pub mod tokens;

use egui::{Color32, CornerRadius, Stroke, Visuals};
use serde::{Deserialize, Serialize};

use colors::ThemeColors;
use tokens::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Follow the desktop preference, falling back to dark.
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => ThemeMode::Light,
            Ok(_) => ThemeMode::Dark,
            Err(e) => {
                log::debug!("System theme detection failed: {e}");
                ThemeMode::Dark
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            ThemeMode::Dark => page_visuals(
                Visuals::dark(),
                DARK_SURFACE,
                DARK_CANVAS,
                DARK_TEXT_PRIMARY,
                DARK_ACCENT,
                DARK_SEPARATOR,
            ),
            ThemeMode::Light => page_visuals(
                Visuals::light(),
                LIGHT_SURFACE,
                LIGHT_CANVAS,
                LIGHT_TEXT_PRIMARY,
                LIGHT_ACCENT,
                LIGHT_SEPARATOR,
            ),
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            ThemeMode::Dark => ThemeColors::dark(),
            ThemeMode::Light => ThemeColors::light(),
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

fn page_visuals(
    mut v: Visuals,
    surface: Color32,
    canvas: Color32,
    text: Color32,
    accent: Color32,
    separator: Color32,
) -> Visuals {
    v.panel_fill = canvas;
    v.window_fill = surface;
    v.extreme_bg_color = canvas;
    v.override_text_color = Some(text);
    v.hyperlink_color = text;
    v.selection.bg_fill = accent.gamma_multiply(0.3);
    v.selection.stroke = Stroke::new(1.0, accent);

    for widget in [
        &mut v.widgets.noninteractive,
        &mut v.widgets.inactive,
        &mut v.widgets.hovered,
        &mut v.widgets.active,
        &mut v.widgets.open,
    ] {
        widget.corner_radius = CornerRadius::same(WIDGET_ROUNDING);
        widget.bg_stroke = Stroke::new(0.5, separator);
    }
    v.widgets.hovered.bg_stroke = Stroke::new(1.0, accent);
    v.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_display_names() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert!(!mode.display_name().is_empty());
        }
    }

    #[test]
    fn theme_mode_toggle() {
        assert_eq!(ThemeMode::Dark.toggle(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
    }

    #[test]
    fn theme_mode_default() {
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }

    #[test]
    fn tile_chrome_is_theme_independent() {
        let dark = ThemeMode::Dark.colors();
        let light = ThemeMode::Light.colors();
        assert_eq!(dark.scrim, light.scrim);
        assert_eq!(dark.chrome_bg, light.chrome_bg);
        assert_ne!(dark.sheet, light.sheet);
    }

    #[test]
    fn visuals_use_page_text_color() {
        assert_eq!(
            ThemeMode::Light.visuals().override_text_color,
            Some(LIGHT_TEXT_PRIMARY)
        );
    }
}

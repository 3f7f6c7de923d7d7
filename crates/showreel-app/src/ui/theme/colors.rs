use egui::Color32;

use super::tokens::*;

/// Runtime color set for the page, stored in egui temp data and read via `theme_colors(ctx)`.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub canvas: Color32,
    pub sheet: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub separator: Color32,
    pub tile_bg: Color32,
    /// Dim layer over an idle tile (bg-black/20).
    pub scrim: Color32,
    /// Extra dim on hover (bg-black/10).
    pub hover_scrim: Color32,
    /// Frosted play button (bg-white/20).
    pub play_button: Color32,
    pub play_button_hover: Color32,
    /// Title pill and fullscreen button (bg-black/50).
    pub chrome_bg: Color32,
    pub chrome_bg_hover: Color32,
    pub chrome_fg: Color32,
    pub spinner_track: Color32,
    pub spinner_head: Color32,
    pub badge: Color32,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            canvas: DARK_CANVAS,
            sheet: DARK_SURFACE,
            text_primary: DARK_TEXT_PRIMARY,
            text_secondary: DARK_TEXT_SECONDARY,
            accent: DARK_ACCENT,
            separator: DARK_SEPARATOR,
            ..Self::tile_chrome()
        }
    }

    pub fn light() -> Self {
        Self {
            canvas: LIGHT_CANVAS,
            sheet: LIGHT_SURFACE,
            text_primary: LIGHT_TEXT_PRIMARY,
            text_secondary: LIGHT_TEXT_SECONDARY,
            accent: LIGHT_ACCENT,
            separator: LIGHT_SEPARATOR,
            ..Self::tile_chrome()
        }
    }

    /// Tile overlays sit on video, so they are the same in every theme.
    fn tile_chrome() -> Self {
        Self {
            canvas: Color32::BLACK,
            sheet: Color32::BLACK,
            text_primary: Color32::WHITE,
            text_secondary: Color32::WHITE,
            accent: Color32::WHITE,
            separator: Color32::BLACK,
            tile_bg: Color32::from_rgb(0x10, 0x10, 0x12),
            scrim: Color32::from_black_alpha(51),
            hover_scrim: Color32::from_black_alpha(26),
            play_button: Color32::from_white_alpha(51),
            play_button_hover: Color32::from_white_alpha(77),
            chrome_bg: Color32::from_black_alpha(128),
            chrome_bg_hover: Color32::from_black_alpha(179),
            chrome_fg: Color32::WHITE,
            spinner_track: Color32::from_white_alpha(51),
            spinner_head: Color32::from_white_alpha(153),
            badge: Color32::from_rgb(0xF5, 0xC5, 0x42),
        }
    }
}

const THEME_COLORS_ID: &str = "showreel_theme_colors";

/// Store theme colors in egui temp data.
pub fn set_theme_colors(ctx: &egui::Context, colors: ThemeColors) {
    ctx.data_mut(|d| d.insert_temp(egui::Id::new(THEME_COLORS_ID), colors));
}

/// Read theme colors from egui temp data (fallback: dark).
pub fn theme_colors(ctx: &egui::Context) -> ThemeColors {
    ctx.data(|d| d.get_temp(egui::Id::new(THEME_COLORS_ID)))
        .unwrap_or_else(ThemeColors::dark)
}

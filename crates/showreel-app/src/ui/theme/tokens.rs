use egui::Color32;

// Dark page palette
pub const DARK_CANVAS: Color32 = Color32::from_rgb(0x0E, 0x0E, 0x10);
pub const DARK_SURFACE: Color32 = Color32::from_rgb(0x18, 0x18, 0x1B);
pub const DARK_TEXT_PRIMARY: Color32 = Color32::from_rgb(0xEC, 0xEC, 0xEC);
pub const DARK_TEXT_SECONDARY: Color32 = Color32::from_rgb(0x9A, 0x9A, 0xA0);
pub const DARK_ACCENT: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
pub const DARK_SEPARATOR: Color32 = Color32::from_rgb(0x2E, 0x2E, 0x33);

// Light page palette (portfolio sheet is white in the light theme)
pub const LIGHT_CANVAS: Color32 = Color32::from_rgb(0xF4, 0xF4, 0xF5);
pub const LIGHT_SURFACE: Color32 = Color32::WHITE;
pub const LIGHT_TEXT_PRIMARY: Color32 = Color32::from_rgb(0x17, 0x17, 0x17);
pub const LIGHT_TEXT_SECONDARY: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
pub const LIGHT_ACCENT: Color32 = Color32::from_rgb(0x25, 0x63, 0xEB);
pub const LIGHT_SEPARATOR: Color32 = Color32::from_rgb(0xD8, 0xD8, 0xDC);

// Layout constants
pub const SHEET_ROUNDING: u8 = 48;
pub const TILE_ROUNDING: u8 = 12;
pub const WIDGET_ROUNDING: u8 = 4;
pub const PAGE_PADDING: f32 = 24.0;
pub const PAGE_MAX_WIDTH: f32 = 1280.0;
pub const SHOWREEL_MAX_WIDTH: f32 = 896.0;
pub const SOCIAL_MAX_WIDTH: f32 = 1024.0;
pub const GRID_GAP: f32 = 24.0;
pub const GRID_GAP_SMALL: f32 = 16.0;
pub const SECTION_SPACING: f32 = 80.0;
/// Windows narrower than this get the compact layout and no hover zoom.
pub const MOBILE_BREAKPOINT: f32 = 768.0;
pub const HOVER_SCALE: f32 = 1.05;

// Tile chrome
pub const PLAY_BUTTON_SIZE: f32 = 64.0;
pub const PLAY_BUTTON_SIZE_VERTICAL: f32 = 48.0;
pub const PLAY_BUTTON_SIZE_FULLSCREEN: f32 = 96.0;
pub const FULLSCREEN_BUTTON_SIZE: f32 = 40.0;
pub const CHROME_INSET: f32 = 16.0;
pub const CHROME_INSET_FULLSCREEN: f32 = 32.0;

// Typography
pub const BODY_SIZE: f32 = 16.0;
pub const DISPLAY_SIZE: f32 = 72.0;
pub const HEADING_SIZE: f32 = 32.0;
pub const BADGE_SIZE: f32 = 13.0;
pub const BADGE_SIZE_FULLSCREEN: f32 = 18.0;

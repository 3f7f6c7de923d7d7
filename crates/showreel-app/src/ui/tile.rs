use std::collections::HashMap;

use egui::{
    Align2, Color32, ColorImage, CornerRadius, Rect, Response, Sense, TextureHandle,
    TextureOptions, Ui, pos2, vec2,
};

use super::theme::colors::theme_colors;
use super::theme::tokens::*;
use super::widgets;
use crate::media::types::DecodedFrame;
use crate::viewport::{AspectRatio, MediaViewport, ViewportId};
use crate::visibility::ProximityObserver;

/// How a frame is scaled into its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Fill the tile, cropping overflow.
    Cover,
    /// Show the whole frame, letterboxed.
    Contain,
}

/// Destination rect and UV rect for drawing a `media_w`×`media_h` frame into `dest`.
pub fn fit_frame(media_w: u32, media_h: u32, dest: Rect, fit: Fit) -> (Rect, Rect) {
    let full_uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    if media_w == 0 || media_h == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
        return (dest, full_uv);
    }

    let media_aspect = media_w as f32 / media_h as f32;
    let dest_aspect = dest.width() / dest.height();

    match fit {
        Fit::Contain => {
            let (scale_x, scale_y) = if media_aspect > dest_aspect {
                (1.0, dest_aspect / media_aspect)
            } else {
                (media_aspect / dest_aspect, 1.0)
            };
            let size = vec2(dest.width() * scale_x, dest.height() * scale_y);
            (Rect::from_center_size(dest.center(), size), full_uv)
        }
        Fit::Cover => {
            let (u, v) = if media_aspect > dest_aspect {
                (dest_aspect / media_aspect, 1.0)
            } else {
                (1.0, media_aspect / dest_aspect)
            };
            (dest, Rect::from_center_size(pos2(0.5, 0.5), vec2(u, v)))
        }
    }
}

/// GPU textures for decoded frames, one per viewport, re-uploaded only on new frames.
#[derive(Default)]
pub struct TileTextures {
    textures: HashMap<ViewportId, (TextureHandle, u64)>,
}

impl TileTextures {
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        id: ViewportId,
        frame: &DecodedFrame,
        generation: u64,
    ) -> &TextureHandle {
        let image = || {
            ColorImage::from_rgba_unmultiplied(
                [frame.width as usize, frame.height as usize],
                &frame.data,
            )
        };
        let entry = self.textures.entry(id).or_insert_with(|| {
            let handle = ctx.load_texture(format!("tile-{}", id.0), image(), TextureOptions::LINEAR);
            (handle, generation)
        });
        if entry.1 != generation {
            entry.0.set(image(), TextureOptions::LINEAR);
            entry.1 = generation;
        }
        &entry.0
    }
}

pub struct TileContext<'a> {
    pub observer: &'a ProximityObserver,
    pub textures: &'a mut TileTextures,
    /// Seconds since start, for animations.
    pub time: f64,
    /// Narrow windows skip hover zoom.
    pub compact: bool,
}

/// Lay out a tile `width` wide in the grid and handle clicks on it.
pub fn show_tile(ui: &mut Ui, viewport: &mut MediaViewport, width: f32, cx: &mut TileContext) -> Response {
    let height = width * viewport.props().aspect_ratio.height_factor();
    let (rect, response) = ui.allocate_exact_size(vec2(width, height), Sense::click());
    cx.observer.track(viewport.id(), rect);
    show_tile_in(ui, viewport, rect, response, false, cx)
}

/// The tile that owns fullscreen, drawn over the whole window.
pub fn show_fullscreen_tile(ui: &mut Ui, viewport: &mut MediaViewport, rect: Rect, cx: &mut TileContext) -> Response {
    let response = ui.allocate_rect(rect, Sense::click());
    show_tile_in(ui, viewport, rect, response, true, cx)
}

fn show_tile_in(
    ui: &mut Ui,
    viewport: &mut MediaViewport,
    rect: Rect,
    response: Response,
    fullscreen: bool,
    cx: &mut TileContext,
) -> Response {
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let tc = theme_colors(ui.ctx());
    let painter = ui.painter_at(rect);
    let pointer_inside = ui.rect_contains_pointer(rect);
    let rounding = if fullscreen {
        CornerRadius::ZERO
    } else {
        CornerRadius::same(TILE_ROUNDING)
    };
    painter.rect_filled(rect, rounding, if fullscreen { Color32::BLACK } else { tc.tile_bg });

    // Video frame
    if let Some((frame, generation)) = viewport.current_frame() {
        let texture = cx.textures.sync(ui.ctx(), viewport.id(), frame, generation);
        let fit = if fullscreen { Fit::Contain } else { Fit::Cover };
        let zoom = if fullscreen || cx.compact {
            1.0
        } else {
            let target = if pointer_inside { HOVER_SCALE } else { 1.0 };
            ui.ctx()
                .animate_value_with_time(response.id.with("zoom"), target, 0.3)
        };
        let dest = Rect::from_center_size(rect.center(), rect.size() * zoom);
        let (dest, uv) = fit_frame(frame.width, frame.height, dest, fit);
        painter.image(texture.id(), dest, uv, Color32::WHITE);
    }

    let state = viewport.state();
    let show_overlay = !state.is_playing() || !state.is_loaded();
    let loading = state.is_loading();
    let errored = state.last_error().is_some() && !loading;
    let is_fullscreen = state.is_fullscreen();

    // Play / spinner overlay
    if show_overlay {
        painter.rect_filled(rect, rounding, tc.scrim);
        if pointer_inside {
            painter.rect_filled(rect, rounding, tc.hover_scrim);
        }
        let size = if fullscreen {
            PLAY_BUTTON_SIZE_FULLSCREEN
        } else if viewport.props().aspect_ratio == AspectRatio::Vertical {
            PLAY_BUTTON_SIZE_VERTICAL
        } else {
            PLAY_BUTTON_SIZE
        };
        if loading {
            widgets::spinner(&painter, rect.center(), size * 0.4, cx.time, &tc);
        } else {
            widgets::play_button(&painter, rect.center(), size, pointer_inside, &tc);
        }
        if errored && pointer_inside {
            widgets::pill(
                &painter,
                rect.center() + vec2(0.0, size * 0.5 + 12.0),
                Align2::CENTER_TOP,
                "Playback failed, click to retry",
                BADGE_SIZE,
                &tc,
            );
        }
    }

    // Chrome: title pill and fullscreen button
    let mut response = response;
    if pointer_inside || is_fullscreen {
        let inset = if fullscreen { CHROME_INSET_FULLSCREEN } else { CHROME_INSET };
        let text_size = if fullscreen { BADGE_SIZE_FULLSCREEN } else { BADGE_SIZE };
        widgets::pill(
            &painter,
            title_anchor(rect, inset),
            Align2::LEFT_BOTTOM,
            &viewport.props().title,
            text_size,
            &tc,
        );

        let button_rect = fullscreen_button_rect(rect, inset);
        // Registered after the tile, so it wins the hit test and the tile never sees the click.
        let button = ui.interact(button_rect, response.id.with("fullscreen"), Sense::click());
        widgets::fullscreen_glyph(&painter, button_rect, is_fullscreen, button.hovered(), &tc);
        if button.clicked() {
            viewport.on_toggle_fullscreen();
        }
        response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
    }

    if response.clicked() {
        viewport.on_activate();
    }
    response
}

/// Title pill sits bottom-left.
fn title_anchor(rect: Rect, inset: f32) -> egui::Pos2 {
    rect.left_bottom() + vec2(inset, -inset)
}

/// Fullscreen button sits top-right.
fn fullscreen_button_rect(rect: Rect, inset: f32) -> Rect {
    Rect::from_min_size(
        pos2(rect.right() - inset - FULLSCREEN_BUTTON_SIZE, rect.top() + inset),
        vec2(FULLSCREEN_BUTTON_SIZE, FULLSCREEN_BUTTON_SIZE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(160.0, 90.0))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn matching_aspect_fills_exactly() {
        for fit in [Fit::Cover, Fit::Contain] {
            let (rect, uv) = fit_frame(1920, 1080, dest(), fit);
            assert_eq!(rect, dest());
            assert!(approx(uv.width(), 1.0) && approx(uv.height(), 1.0));
        }
    }

    #[test]
    fn contain_pillarboxes_vertical_video() {
        let (rect, uv) = fit_frame(1080, 1920, dest(), Fit::Contain);
        assert!(approx(rect.height(), 90.0));
        assert!(approx(rect.width(), 90.0 * 9.0 / 16.0));
        assert!(approx(rect.center().x, 80.0));
        assert!(approx(uv.width(), 1.0));
    }

    #[test]
    fn contain_letterboxes_wide_video() {
        let square = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        let (rect, _) = fit_frame(200, 100, square, Fit::Contain);
        assert!(approx(rect.width(), 100.0));
        assert!(approx(rect.height(), 50.0));
        assert!(approx(rect.top(), 25.0));
    }

    #[test]
    fn cover_crops_uv_not_rect() {
        let (rect, uv) = fit_frame(1080, 1920, dest(), Fit::Cover);
        assert_eq!(rect, dest());
        assert!(approx(uv.width(), 1.0));
        assert!(uv.height() < 1.0);
        assert!(approx(uv.center().y, 0.5));
    }

    #[test]
    fn degenerate_media_uses_whole_rect() {
        let (rect, uv) = fit_frame(0, 0, dest(), Fit::Contain);
        assert_eq!(rect, dest());
        assert!(approx(uv.width(), 1.0));
    }

    #[test]
    fn title_and_button_in_opposite_corners() {
        let tile = dest();
        let title = title_anchor(tile, CHROME_INSET);
        assert!(approx(title.x, CHROME_INSET));
        assert!(approx(title.y, 90.0 - CHROME_INSET));

        let button = fullscreen_button_rect(tile, CHROME_INSET);
        assert!(approx(button.right(), 160.0 - CHROME_INSET));
        assert!(approx(button.top(), CHROME_INSET));
        assert!(button.center().y < title.y);
    }

    #[test]
    fn textures_upload_once_per_generation() {
        let ctx = egui::Context::default();
        let mut textures = TileTextures::default();
        let frame = DecodedFrame {
            data: vec![0; 4 * 2 * 2],
            width: 2,
            height: 2,
        };
        let first = textures.sync(&ctx, ViewportId(1), &frame, 1).id();
        let second = textures.sync(&ctx, ViewportId(1), &frame, 2).id();
        assert_eq!(first, second);
        let other = textures.sync(&ctx, ViewportId(2), &frame, 1).id();
        assert_ne!(first, other);
    }
}

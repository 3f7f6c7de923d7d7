use egui::{Align2, CornerRadius, FontId, Frame, RichText, ScrollArea, Sense, Ui, pos2, vec2};

use super::theme::colors::theme_colors;
use super::theme::tokens::*;
use super::tile::{self, TileContext, TileTextures};
use super::widgets;
use crate::gallery::{
    CONTACT_HEADING, CONTACT_LINKS, CONTACT_SUBHEADING, Catalog, Section, TESTIMONIAL_BADGES,
    columns_for_width,
};
use crate::viewport::{AspectRatio, MediaViewport};
use crate::visibility::ProximityObserver;

const HEADER_HEIGHT: f32 = 420.0;

/// Everything the page needs for one frame. `viewports` follow catalog order.
pub struct Page<'a> {
    pub catalog: &'a Catalog,
    pub viewports: &'a mut [MediaViewport],
    pub observer: &'a ProximityObserver,
    pub textures: &'a mut TileTextures,
    pub time: f64,
}

impl Page<'_> {
    pub fn show(self, ctx: &egui::Context) {
        let tc = theme_colors(ctx);
        let Page {
            catalog,
            viewports,
            observer,
            textures,
            time,
        } = self;

        // A fullscreen tile replaces the page.
        if let Some(viewport) = viewports.iter_mut().find(|v| v.state().is_fullscreen()) {
            egui::CentralPanel::default()
                .frame(Frame::NONE.fill(egui::Color32::BLACK))
                .show(ctx, |ui| {
                    let rect = ui.max_rect();
                    let mut cx = TileContext {
                        observer,
                        textures,
                        time,
                        compact: false,
                    };
                    tile::show_fullscreen_tile(ui, viewport, rect, &mut cx);
                });
            return;
        }

        egui::CentralPanel::default()
            .frame(Frame::NONE.fill(tc.canvas))
            .show(ctx, |ui| {
                let output = ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let width = ui.available_width();
                        let content_width = (width - PAGE_PADDING * 2.0).clamp(1.0, PAGE_MAX_WIDTH);
                        let mut cx = TileContext {
                            observer,
                            textures,
                            time,
                            compact: width < MOBILE_BREAKPOINT,
                        };

                        ui.add_space(PAGE_PADDING);
                        centered(ui, width, content_width, |ui| {
                            header(ui, catalog, content_width, time);
                            ui.add_space(SECTION_SPACING);

                            let mut remaining: &mut [MediaViewport] = viewports;
                            for section in &catalog.sections {
                                let n = section.entries.len().min(remaining.len());
                                let (mine, rest) = std::mem::take(&mut remaining).split_at_mut(n);
                                remaining = rest;
                                section_grid(ui, section, mine, content_width, &mut cx);
                                ui.add_space(SECTION_SPACING);
                            }

                            contact(ui);
                        });
                        ui.add_space(SECTION_SPACING);
                    });
                observer.evaluate(output.inner_rect);
            });
    }
}

/// Run `add` in a column `inner` wide, centered in `outer`.
fn centered(ui: &mut Ui, outer: f32, inner: f32, add: impl FnOnce(&mut Ui)) {
    ui.horizontal(|ui| {
        ui.add_space(((outer - inner) * 0.5).max(0.0));
        ui.vertical(|ui| {
            ui.set_width(inner);
            add(ui);
        });
    });
}

fn header(ui: &mut Ui, catalog: &Catalog, width: f32, time: f64) {
    let tc = theme_colors(ui.ctx());
    let height = if width < MOBILE_BREAKPOINT {
        HEADER_HEIGHT * 0.7
    } else {
        HEADER_HEIGHT
    };
    let (rect, _) = ui.allocate_exact_size(vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, CornerRadius::same(SHEET_ROUNDING), tc.sheet);

    let elapsed = time as f32;
    for badge in TESTIMONIAL_BADGES {
        let center = pos2(
            rect.left() + rect.width() * badge.left,
            rect.top() + rect.height() * badge.top,
        );
        widgets::badge(
            &painter,
            center,
            badge.label,
            badge.scale,
            badge.opacity(elapsed),
            badge.shine_phase(elapsed),
            &tc,
        );
    }

    let display = if width < MOBILE_BREAKPOINT {
        DISPLAY_SIZE * 0.6
    } else {
        DISPLAY_SIZE
    };
    let title_pos = pos2(rect.center().x, rect.top() + rect.height() * 0.68);
    painter.text(
        title_pos,
        Align2::CENTER_CENTER,
        &catalog.title,
        FontId::proportional(display),
        tc.text_primary,
    );
    painter.text(
        title_pos + vec2(0.0, display * 0.6 + BODY_SIZE),
        Align2::CENTER_CENTER,
        &catalog.tagline,
        FontId::proportional(BODY_SIZE),
        tc.text_secondary,
    );
}

fn section_grid(
    ui: &mut Ui,
    section: &Section,
    viewports: &mut [MediaViewport],
    content_width: f32,
    cx: &mut TileContext,
) {
    widgets::section_heading(ui, &section.heading);

    let max_width = if section.columns == 1 {
        SHOWREEL_MAX_WIDTH
    } else if section
        .entries
        .iter()
        .all(|e| e.aspect_ratio == AspectRatio::Vertical)
    {
        SOCIAL_MAX_WIDTH
    } else {
        content_width
    };
    let grid_width = content_width.min(max_width);
    let columns = columns_for_width(section.columns, content_width);
    let gap = if cx.compact { GRID_GAP_SMALL } else { GRID_GAP };
    let tile_width = ((grid_width - gap * (columns - 1) as f32) / columns as f32).max(1.0);

    centered(ui, content_width, grid_width, |ui| {
        for row in viewports.chunks_mut(columns) {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = gap;
                for viewport in row {
                    tile::show_tile(ui, viewport, tile_width, cx);
                }
            });
            ui.add_space(gap);
        }
    });
}

fn contact(ui: &mut Ui) {
    let tc = theme_colors(ui.ctx());
    Frame::NONE
        .fill(tc.sheet)
        .corner_radius(CornerRadius::same(SHEET_ROUNDING))
        .inner_margin(egui::Margin::same(48))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(CONTACT_HEADING)
                        .size(HEADING_SIZE)
                        .color(tc.text_primary)
                        .strong(),
                );
                ui.label(RichText::new(CONTACT_SUBHEADING).color(tc.text_secondary));
                ui.add_space(GRID_GAP);

                let rule_width = (ui.available_width() * 0.5).max(1.0);
                for (i, link) in CONTACT_LINKS.iter().enumerate() {
                    if i > 0 {
                        widgets::rule(ui, rule_width);
                        ui.add_space(GRID_GAP_SMALL);
                    }
                    ui.hyperlink_to(
                        RichText::new(link.label).size(HEADING_SIZE * 0.75).strong(),
                        link.href,
                    );
                    ui.label(
                        RichText::new(link.blurb)
                            .size(BADGE_SIZE)
                            .color(tc.text_secondary),
                    );
                    ui.add_space(GRID_GAP_SMALL);
                }
            });
        });
}


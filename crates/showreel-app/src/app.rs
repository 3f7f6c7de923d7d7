use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::window::{Fullscreen, Window};

use crate::fullscreen::{FullscreenBus, FullscreenError, FullscreenSurface};
use crate::gallery::Catalog;
use crate::gpu::GpuContext;
use crate::media::{FfmpegBackend, MediaBackend};
use crate::settings::SettingsConfig;
use crate::ui::{EguiOverlay, Page, TileTextures};
use crate::viewport::{MediaViewport, ViewportId};
use crate::visibility::ProximityObserver;

/// The window itself is the only thing that can go fullscreen.
struct WindowSurface<'a> {
    window: &'a Window,
}

impl FullscreenSurface for WindowSurface<'_> {
    fn enter(&mut self) -> Result<(), FullscreenError> {
        let monitor = self
            .window
            .current_monitor()
            .ok_or(FullscreenError::NoMonitor)?;
        self.window
            .set_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        Ok(())
    }

    fn exit(&mut self) {
        self.window.set_fullscreen(None);
    }
}

pub struct App {
    pub gpu: GpuContext,
    pub overlay: EguiOverlay,
    pub window: Arc<Window>,
    pub settings: SettingsConfig,
    pub catalog: Catalog,
    pub observer: ProximityObserver,
    pub fullscreen: FullscreenBus,
    pub viewports: Vec<MediaViewport>,
    pub textures: TileTextures,
    pub start_time: Instant,
    pub quit_requested: bool,
    /// Set once the window has actually reported fullscreen, so a slow
    /// compositor is not mistaken for the user leaving it.
    window_was_fullscreen: bool,
}

impl App {
    pub fn new(window: Arc<Window>, settings: SettingsConfig, catalog: Catalog) -> Result<Self> {
        let gpu = GpuContext::new(window.clone())?;
        let overlay = EguiOverlay::new(&gpu.device, gpu.format, &window, settings.theme);

        let observer =
            ProximityObserver::new(settings.proximity_margin, settings.visibility_threshold);
        let fullscreen = FullscreenBus::new(settings.allow_fullscreen);
        let backend: Rc<dyn MediaBackend> = Rc::new(FfmpegBackend::new(settings.max_decode_width));

        let viewports: Vec<MediaViewport> = catalog
            .sections
            .iter()
            .flat_map(|section| section.entries.iter())
            .zip(0u32..)
            .map(|(props, i)| {
                MediaViewport::new(
                    ViewportId(i),
                    props.clone(),
                    &observer,
                    &fullscreen,
                    backend.clone(),
                )
            })
            .collect();
        log::info!(
            "Catalog \"{}\": {} sections, {} videos",
            catalog.title,
            catalog.sections.len(),
            catalog.entry_count()
        );

        Ok(Self {
            gpu,
            overlay,
            window,
            settings,
            catalog,
            observer,
            fullscreen,
            viewports,
            textures: TileTextures::default(),
            start_time: Instant::now(),
            quit_requested: false,
            window_was_fullscreen: false,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.overlay
            .resize(width, height, self.window.scale_factor() as f32);
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        for viewport in &mut self.viewports {
            viewport.tick(now);
        }
        self.sync_fullscreen();
    }

    /// Apply pending fullscreen requests, notice platform-initiated exits and
    /// deliver the resulting changes to every viewport.
    pub fn sync_fullscreen(&mut self) {
        if self.fullscreen.has_pending() {
            let mut surface = WindowSurface {
                window: &self.window,
            };
            self.fullscreen.settle(&mut surface);
        }

        let window_fullscreen = self.window.fullscreen().is_some();
        if self.fullscreen.element().is_some() {
            if window_fullscreen {
                self.window_was_fullscreen = true;
            } else if self.window_was_fullscreen {
                self.window_was_fullscreen = false;
                self.fullscreen.platform_exited();
            }
        } else {
            self.window_was_fullscreen = false;
        }

        for viewport in &mut self.viewports {
            viewport.pump();
        }
    }

    /// Escape: leave fullscreen if a tile owns it. Returns whether it did.
    pub fn exit_fullscreen(&mut self) -> bool {
        if self.fullscreen.element().is_none() {
            return false;
        }
        self.fullscreen.exit();
        self.sync_fullscreen();
        true
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggle();
        self.overlay.set_theme(self.settings.theme);
        self.settings.save();
        log::info!("Theme: {}", self.settings.theme.display_name());
    }

    pub fn draw_ui(&mut self) {
        self.overlay.begin_frame(&self.window);
        let ctx = self.overlay.context();
        Page {
            catalog: &self.catalog,
            viewports: &mut self.viewports,
            observer: &self.observer,
            textures: &mut self.textures,
            time: self.start_time.elapsed().as_secs_f64(),
        }
        .show(&ctx);
        self.overlay.end_frame(&self.window);

        // Clicks and proximity hits from this frame.
        self.sync_fullscreen();
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("showreel-encoder"),
                });

        self.overlay
            .render(&self.gpu.device, &self.gpu.queue, &mut encoder, &surface_view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Drop every viewport (stopping decoders and releasing fullscreen) before the window goes.
    pub fn shutdown(&mut self) {
        let mounted = self.viewports.iter().filter(|v| v.is_mounted()).count();
        let count = self.viewports.len();
        self.viewports.clear();
        self.sync_fullscreen();
        log::info!("Released {count} viewports ({mounted} had loaded media)");
    }
}

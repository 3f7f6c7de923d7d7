mod app;
mod fullscreen;
mod gallery;
mod gpu;
mod media;
mod settings;
mod ui;
mod viewport;
mod visibility;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use app::App;
use gallery::Catalog;
use settings::SettingsConfig;

struct ShowreelApp {
    app: Option<App>,
    catalog_path: Option<PathBuf>,
}

impl ShowreelApp {
    fn new(catalog_path: Option<PathBuf>) -> Self {
        Self {
            app: None,
            catalog_path,
        }
    }

    fn load_catalog(&self) -> Catalog {
        let Some(path) = &self.catalog_path else {
            return Catalog::builtin();
        };
        match Catalog::load(path) {
            Ok(catalog) => {
                log::info!("Loaded catalog {}", path.display());
                catalog
            }
            Err(e) => {
                log::error!("{e:#}; using built-in catalog");
                Catalog::builtin()
            }
        }
    }
}

impl ApplicationHandler for ShowreelApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let catalog = self.load_catalog();
        let attrs = WindowAttributes::default()
            .with_title(format!("{} | Showreel", catalog.title))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800))
            .with_min_inner_size(winit::dpi::LogicalSize::new(360, 480));

        let window: Arc<Window> = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Center window on primary monitor
        if let Some(monitor) = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        {
            let monitor_size = monitor.size();
            let window_size = window.outer_size();
            let monitor_pos = monitor.position();
            let x = (monitor_size.width.saturating_sub(window_size.width)) / 2;
            let y = (monitor_size.height.saturating_sub(window_size.height)) / 2;
            window.set_outer_position(winit::dpi::PhysicalPosition::new(
                monitor_pos.x + x as i32,
                monitor_pos.y + y as i32,
            ));
        }

        match App::new(window, SettingsConfig::load(), catalog) {
            Ok(app) => {
                self.app = Some(app);
                log::info!("Showreel initialized");
            }
            Err(e) => {
                log::error!("Failed to initialize app: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        // Let egui handle events first
        let egui_consumed = app.overlay.handle_event(&app.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                app.quit_requested = true;
            }
            WindowEvent::Resized(size) => {
                app.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !egui_consumed || !app.overlay.wants_keyboard() => match key {
                KeyCode::Escape => {
                    app.exit_fullscreen();
                }
                KeyCode::KeyQ => {
                    app.quit_requested = true;
                }
                KeyCode::KeyT => {
                    app.toggle_theme();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                app.update();
                app.draw_ui();

                match app.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let w = app.gpu.surface_config.width;
                        let h = app.gpu.surface_config.height;
                        app.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        app.quit_requested = true;
                    }
                    Err(e) => {
                        log::warn!("Surface error: {e}");
                    }
                }

                app.window.request_redraw();
            }
            _ => {}
        }

        if app.quit_requested {
            app.shutdown();
            self.app = None;
            event_loop.exit();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let catalog_path = std::env::args_os().nth(1).map(PathBuf::from);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = ShowreelApp::new(catalog_path);
    event_loop.run_app(&mut app)?;

    Ok(())
}

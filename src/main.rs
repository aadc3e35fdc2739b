use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod config;
mod geometry;
mod loader;
mod logging;
mod renderer;
mod state;
mod ui;

use config::AppConfig;
use loader::FileLoader;
use renderer::{FrameLoop, GpuState, SurfaceRecovery, surface_recovery};
use state::RenderContext;
use ui::{PanelStats, UiActions, UiState, apply_theme, bridge, draw_side_panel};

struct App {
    config: AppConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    render_ctx: RenderContext,
    ui_state: UiState,
    loader: FileLoader,
    frame_loop: FrameLoop,

    frame_count: u32,
    fps_timer: Instant,
    fps: f32,

    last_vsync_state: bool,
    fatal: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let ui_state = UiState::new(&config);
        let last_vsync_state = config.vsync;

        Self {
            config,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            render_ctx: RenderContext::default(),
            ui_state,
            loader: FileLoader::new(),
            frame_loop: FrameLoop::new(),

            frame_count: 0,
            fps_timer: Instant::now(),
            fps: 0.0,

            last_vsync_state,
            fatal: false,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.vsync))?;

        self.upload_pending(&mut gpu)
            .context("failed to upload initial geometry")?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        bridge::update_color(&mut self.render_ctx, &self.ui_state);

        if let Some(path) = self.config.initial_geometry.clone() {
            bridge::upload_file(&self.loader, &mut self.ui_state, path);
        }

        self.frame_loop.start()?;
        Ok(())
    }

    fn upload_pending(&mut self, gpu: &mut GpuState) -> anyhow::Result<()> {
        let generation = self.render_ctx.geometry().generation();
        if let Some(geometry) = self.render_ctx.take_pending_upload() {
            gpu.upload(geometry, generation)?;
            if let Some(buffers) = &gpu.geometry {
                log::debug!(
                    "geometry generation {} on device ({} vertices)",
                    buffers.generation(),
                    buffers.vertex_count()
                );
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer.elapsed().as_secs_f32();
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        while let Some(result) = self.loader.try_recv_result() {
            bridge::apply_load_result(&mut self.render_ctx, &mut self.ui_state, result);
        }

        if let Some(mut gpu) = self.gpu.take() {
            if let Err(err) = self.upload_pending(&mut gpu) {
                log::error!("geometry upload failed: {err:#}");
                self.frame_loop.stop();
                self.fatal = true;
            }
            self.gpu = Some(gpu);
        }
    }

    fn render(&mut self) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let stats = PanelStats {
            fps: self.fps,
            frames: self.frame_loop.frames(),
            vertices_drawn: self.render_ctx.state().vertex_count(),
            triangles_loaded: self.render_ctx.state().max_triangles,
        };

        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &stats);
        });

        bridge::apply_actions(
            &mut self.render_ctx,
            &mut self.ui_state,
            &self.loader,
            ui_actions,
        );

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        // Texture deltas are one-shot; apply them even if this frame is skipped.
        for (id, delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => Some(t),
            Err(err) => {
                match surface_recovery(&err) {
                    SurfaceRecovery::Reconfigure => gpu.resize(gpu.size),
                    SurfaceRecovery::Skip => {}
                    SurfaceRecovery::Fatal => {
                        log::error!("surface error: {err}");
                        self.frame_loop.stop();
                        self.fatal = true;
                    }
                }
                None
            }
        };
        let Some(output) = output else {
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
            return;
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        if let Some(call) = self.frame_loop.tick(self.render_ctx.state()) {
            gpu.render_frame(&view, &mut encoder, &call);
        }

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        log::debug!("shutting down, frame loop {:?}", self.frame_loop.state());
        self.frame_loop.stop();
        self.loader.stop();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(self.config.window_size);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.init_gpu(window) {
            log::error!("initialization aborted: {err:#}");
            self.shutdown(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::DroppedFile(path) = &event {
            bridge::upload_file(&self.loader, &mut self.ui_state, path.clone());
            return;
        }

        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
                if self.fatal {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_args(std::env::args_os().skip(1));
    logging::init_logging(config.logging.clone());

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("event loop terminated abnormally")?;
    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    background::{self, DrawBackground},
    camera, controls, instance, page, pipeline,
    sphere::{self, DrawSphere, Vertex},
    starfield, system,
    texture::{self, SetTextureContainer},
    tour,
};

/// Scrollable span of the modeled page, comfortably past the end threshold.
const PAGE_SPAN: f32 = 8000.0;

const WINDOW_TITLE: &str = "Solar System Tour";
const FREE_ROAM_TITLE: &str = "Solar System Tour (free roam: drag to pan)";

/// Process-lifetime configuration resolved from the CLI.
#[derive(Clone)]
pub struct LaunchOptions {
    pub tuning: tour::TourTuning,
    pub quality: String,
    pub seed: u64,
}

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    is_surface_configured: bool,
    render_pipeline: wgpu::RenderPipeline,
    body_texture_container: texture::TextureContainer,
    camera_container: camera::CameraContainer,
    depth_texture: texture::Texture,
    sphere: sphere::Sphere,
    background: Option<background::Background>,
    solar_system: system::SolarSystem,
    body_instance_buffer: wgpu::Buffer,
    star_instance_buffer: wgpu::Buffer,
    star_count: u32,
    page: page::Page,
    tour: tour::TourController,
    controls: controls::OrbitControls,
    rng: ChaCha8Rng,
    window: Arc<Window>,
}

impl State {
    async fn new(window: Arc<Window>, options: &LaunchOptions) -> Result<Self> {
        let size = window.inner_size();

        // Handle to GPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptionsBase {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let body_names: Vec<&str> = system::BODY_TABLE.iter().map(|&(name, _)| name).collect();
        let body_texture_container = texture::TextureContainer::body_array(
            &device,
            &queue,
            &options.quality,
            &body_names,
        );

        let camera_container =
            camera::CameraContainer::new(tour::REST_EYE, config.width, config.height, &device);

        let solar_system = system::SolarSystem::new();
        let body_instance_data = solar_system.instance_data();
        let body_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body_instance_buffer"),
            contents: bytemuck::cast_slice(&body_instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let starfield =
            starfield::Starfield::generate(options.seed, options.tuning.starfield_spread);
        let star_instance_data = starfield.instance_data();
        let star_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_instance_buffer"),
            contents: bytemuck::cast_slice(&star_instance_data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture =
            texture::Texture::create_depth_texture(&device, &config, "depth_texture");

        let background = background::Background::load(&device, &queue, &config);

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[
                    &body_texture_container.bind_group_layout,
                    &camera_container.camera_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });
        let shader = wgpu::include_wgsl!("../shaders/body.wgsl");
        let render_pipeline = pipeline::create_render_pipeline(
            &device,
            &render_pipeline_layout,
            config.format,
            Some(texture::Texture::DEPTH_FORMAT),
            &[sphere::SphereVertex::desc(), instance::InstanceRaw::desc()],
            wgpu::PrimitiveTopology::TriangleList,
            shader,
            Some("render_pipeline_bodies"),
        );

        let sphere = sphere::Sphere::new(&device);

        Ok(State {
            surface,
            device,
            queue,
            config,
            is_surface_configured: false,
            render_pipeline,
            body_texture_container,
            camera_container,
            depth_texture,
            sphere,
            background,
            solar_system,
            body_instance_buffer,
            star_instance_buffer,
            star_count: starfield.stars().len() as u32,
            page: page::Page::new(PAGE_SPAN),
            tour: tour::TourController::new(options.tuning),
            controls: controls::OrbitControls::new(),
            rng: ChaCha8Rng::seed_from_u64(options.seed),
            window,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.is_surface_configured = true;
            self.depth_texture =
                texture::Texture::create_depth_texture(&self.device, &self.config, "depth_texture");
            self.camera_container.resize(width, height);
        }
    }

    fn handle_key(
        &mut self,
        event_loop: &ActiveEventLoop,
        code: KeyCode,
        element_state: ElementState,
    ) {
        if code == KeyCode::Escape && element_state.is_pressed() {
            event_loop.exit();
        }
    }

    /// The scroll handler: the wheel event moves the page, and while the
    /// handler is attached the new offset drives the tour.
    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        if !self.page.on_wheel(delta) {
            return;
        }
        let entered_free_roam = self.tour.on_scroll(
            self.page.scroll_top(),
            &mut self.solar_system,
            &mut self.camera_container.camera,
            &mut self.controls,
        );
        if entered_free_roam {
            self.window.set_title(FREE_ROAM_TITLE);
        }
    }

    fn update(&mut self) {
        self.tour.tick(
            &mut self.page,
            &mut self.solar_system,
            &mut self.camera_container.camera,
            &mut self.controls,
            &mut self.rng,
        );
        self.controls.update(&mut self.camera_container.camera);
        self.camera_container.update(&self.queue);

        let body_instance_data = self.solar_system.instance_data();
        self.queue.write_buffer(
            &self.body_instance_buffer,
            0,
            bytemuck::cast_slice(&body_instance_data),
        );
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // The loop never terminates on its own; every frame requests the next.
        self.window.request_redraw();

        // Cannot render to not configured surface
        if !self.is_surface_configured {
            return Ok(());
        }

        self.update();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.01,
                        g: 0.01,
                        b: 0.01,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(background) = &self.background {
            render_pass.draw_background(background);
        }

        // Render the bodies
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_texture_container(&self.body_texture_container);
        render_pass.set_vertex_buffer(1, self.body_instance_buffer.slice(..));
        render_pass.draw_sphere_instanced(
            &self.sphere,
            0..self.solar_system.bodies().len() as _,
            &self.camera_container.camera_bind_group,
        );

        // Render the starfield
        render_pass.set_vertex_buffer(1, self.star_instance_buffer.slice(..));
        render_pass.draw_sphere_instanced(
            &self.sphere,
            0..self.star_count,
            &self.camera_container.camera_bind_group,
        );

        // `render_pass` mutably borrows encoder, so it must be dropped before using encoder again
        drop(render_pass);

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

pub struct App {
    options: LaunchOptions,
    /// We store state behind `Option` as `State` needs `Window`, but we get window only when
    /// app gets to `Resumed` state (look at [`ApplicationHandler`] implementation for [`App`])
    state: Option<State>,
}

impl App {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            options,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title(WINDOW_TITLE);
        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
        self.state = Some(pollster::block_on(State::new(window, &self.options)).unwrap());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.render() {
                    match e {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            let size = state.window.inner_size();
                            state.resize(size.width, size.height);
                        }
                        _ => {
                            log::error!("Unable to render: {e}");
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => state.handle_wheel(delta),
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                state.controls.on_mouse_button(button, button_state)
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => state.handle_key(event_loop, code, key_state),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if let DeviceEvent::MouseMotion { delta } = event {
            state.controls.on_mouse_motion(delta.0, delta.1)
        }
    }
}

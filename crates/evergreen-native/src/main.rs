use instant::Instant;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use evergreen_core::gpu::SceneRenderer;
use evergreen_core::{Camera, GestureCommand, PhotoContent, Scene, SceneConfig};

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    width: u32,
    height: u32,
    last_frame: Instant,
    scene: Scene,
    synthetic_photos: usize,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, scene: Scene) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let renderer = SceneRenderer::new(&device, &queue, format)?;

        Ok(Self {
            window,
            surface,
            device,
            config,
            renderer,
            width: size.width.max(1),
            height: size.height.max(1),
            last_frame: Instant::now(),
            scene,
            synthetic_photos: 0,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn handle_key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Space) => self.scene.toggle(),
            Key::Character(c) => match c.as_str() {
                "o" | "O" => {
                    self.scene.apply_gesture(GestureCommand::Scatter);
                }
                "f" | "F" => {
                    self.scene.apply_gesture(GestureCommand::Gather);
                }
                "p" | "P" => {
                    self.synthetic_photos += 1;
                    let aspect = if self.synthetic_photos % 2 == 0 { 0.75 } else { 1.5 };
                    self.scene.add_photos([PhotoContent::new(
                        format!("synthetic://photo/{}", self.synthetic_photos),
                        aspect,
                    )]);
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        let morph = self
            .scene
            .tick(dt.as_secs_f32(), self.renderer.buffers_mut());

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let aspect = self.width as f32 / self.height as f32;
        self.renderer
            .set_camera(&Camera::for_progress(morph.progress, aspect));
        self.renderer.draw(
            &view,
            wgpu::Color {
                r: 0.01,
                g: 0.02,
                b: 0.04,
                a: 1.0,
            },
        );
        frame.present();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = Scene::new(&SceneConfig::default())?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Evergreen (native) - Space: toggle, O/F: scatter/gather, P: add photo")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, scene))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => state.handle_key(&logical_key),
        Event::AboutToWait => match state.render() {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("surface error: {e:?}"),
        },
        _ => {}
    })?;
    Ok(())
}

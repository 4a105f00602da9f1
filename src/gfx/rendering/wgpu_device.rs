//! WGPU-backed render device
//!
//! Draws the graph into a window surface: opaque objects first, translucent
//! ones (including the hover outline) blended on top, then an optional
//! overlay such as the status UI.

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;

use crate::{
    config::{DeviceOptions, EngineOptions},
    error::{Error, Result},
    gfx::{
        camera::CameraUniform,
        device::{DeviceFactory, RenderDevice},
        resources::{GlobalBindings, GlobalUBO, GlobalUniform, ObjectBindings, ObjectUniform, TextureResource},
        scene::{Graph, Mesh, ObjectId},
        surface::{SurfaceSize, WindowSurface},
    },
};

use super::pipeline::{create_pipeline, PipelineConfig};

const MSAA_SAMPLES: u32 = 4;

/// Something drawn on top of the finished scene each frame
pub trait FrameOverlay {
    /// Called whenever the drawing buffer changes size
    fn resize(&mut self, _size: SurfaceSize) {}

    /// Offers a window event to the overlay; true if it consumed the input
    fn handle_event(&mut self, _event: &winit::event::WindowEvent) -> bool {
        false
    }

    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    );
}

struct GpuMesh {
    source: Arc<Mesh>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, name: &str, mesh: &Arc<Mesh>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            source: mesh.clone(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }
}

/// Render device drawing into a window surface
pub struct WgpuDevice {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_bindings: ObjectBindings,
    meshes: HashMap<ObjectId, GpuMesh>,
    overlay: Option<Box<dyn FrameOverlay>>,
    disposed: bool,
}

impl WgpuDevice {
    /// Creates a device rendering into `window`
    ///
    /// # Errors
    /// Fails if the surface, adapter or device cannot be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        options: &EngineOptions,
        buffer_size: SurfaceSize,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: options.device.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::AdapterUnavailable(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: options.device.max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| Error::DeviceRequest(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| Error::SurfaceCreation("surface reports no formats".to_string()))?;

        let sample_count = if options.antialias
            && adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            if options.antialias {
                log::warn!("{MSAA_SAMPLES}x MSAA not supported for {format:?}, rendering without");
            }
            1
        };

        let size = SurfaceSize::new(buffer_size.width.max(1), buffer_size.height.max(1));
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: present_mode(&options.device, &surface_capabilities.present_modes),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, size, sample_count, "depth_texture");
        let msaa_target = (sample_count > 1)
            .then(|| TextureResource::create_msaa_target(&device, size, sample_count, format));

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_bindings = ObjectBindings::new(&device, 16);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                global_bindings.bind_group_layout(),
                object_bindings.bind_group_layout(),
            ],
            push_constant_ranges: &[],
        });

        let opaque = PipelineConfig::new("Opaque", format).with_sample_count(sample_count);
        let translucent = opaque.clone().translucent();
        let opaque_pipeline = create_pipeline(&device, &layout, &shader, &opaque);
        let translucent_pipeline = create_pipeline(
            &device,
            &layout,
            &shader,
            &PipelineConfig {
                label: "Translucent".to_string(),
                ..translucent
            },
        );

        log::info!(
            "wgpu device ready: {} ({:?}), {}x{}, {} sample(s)",
            adapter.get_info().name,
            adapter.get_info().backend,
            size.width,
            size.height,
            sample_count
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            depth_texture,
            msaa_target,
            opaque_pipeline,
            translucent_pipeline,
            global_ubo,
            global_bindings,
            object_bindings,
            meshes: HashMap::new(),
            overlay: None,
            disposed: false,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Installs the overlay drawn after the scene each frame
    pub fn set_overlay(&mut self, mut overlay: Box<dyn FrameOverlay>) {
        overlay.resize(self.drawing_buffer_size());
        self.overlay = Some(overlay);
    }

    pub fn overlay_mut(&mut self) -> Option<&mut (dyn FrameOverlay + 'static)> {
        self.overlay.as_deref_mut()
    }

    /// Switches vertical synchronisation on or off
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = if enable {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.config);
    }

    /// Uploads meshes that are new or changed and drops those no longer in the graph
    fn sync_meshes(&mut self, graph: &Graph) {
        self.meshes
            .retain(|id, _| graph.object(*id).is_some_and(|object| object.visible));

        for object in graph.objects().iter().filter(|object| object.visible) {
            let stale = self
                .meshes
                .get(&object.id())
                .map_or(true, |gpu| !Arc::ptr_eq(&gpu.source, object.mesh()));
            if stale {
                self.meshes
                    .insert(object.id(), GpuMesh::upload(&self.device, &object.name, object.mesh()));
            }
        }
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| Error::SurfaceTexture(e.to_string()))
            }
            Err(e) => Err(Error::SurfaceTexture(e.to_string())),
        }
    }
}

fn present_mode(options: &DeviceOptions, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if options.vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| supported.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

impl RenderDevice for WgpuDevice {
    fn resize(&mut self, size: SurfaceSize) {
        if self.disposed || size.is_empty() {
            return;
        }
        if size.width == self.config.width && size.height == self.config.height {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, size, self.sample_count, "depth_texture");
        if self.sample_count > 1 {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                size,
                self.sample_count,
                self.config.format,
            ));
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.resize(size);
        }
    }

    fn drawing_buffer_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    fn render(&mut self, graph: &Graph) -> Result<()> {
        if self.disposed {
            return Err(Error::DeviceDisposed);
        }
        let camera = graph.active_camera().ok_or(Error::NoActiveCamera)?;
        let aspect = self.drawing_buffer_size().aspect();

        let options = graph.options();
        self.global_ubo.update_content(
            &self.queue,
            GlobalUniform::new(
                CameraUniform::from_camera(camera, aspect),
                options.ambient_color,
                graph.lights(),
            ),
        );

        self.sync_meshes(graph);

        // opaque first so translucent draws blend over finished depth
        let mut draws: Vec<(ObjectId, ObjectUniform)> = graph
            .objects()
            .iter()
            .filter(|object| object.visible)
            .map(|object| (object.id(), ObjectUniform::from_object(object)))
            .collect();
        draws.sort_by_key(|(_, uniform)| uniform.is_translucent());
        let uniforms: Vec<ObjectUniform> = draws.iter().map(|(_, uniform)| *uniform).collect();
        self.object_bindings.upload(&self.device, &self.queue, &uniforms);

        let frame = self.acquire_frame()?;
        let frame_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (view, resolve_target) = match self.msaa_target.as_ref() {
                Some(msaa) => (&msaa.view, Some(&frame_view)),
                None => (&frame_view, None),
            };
            let [r, g, b, a] = options.clear_color;

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
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

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (index, (id, uniform)) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(id) else {
                    continue;
                };
                render_pass.set_pipeline(if uniform.is_translucent() {
                    &self.translucent_pipeline
                } else {
                    &self.opaque_pipeline
                });
                render_pass.set_bind_group(
                    1,
                    self.object_bindings.bind_group(),
                    &[self.object_bindings.offset_of(index)],
                );
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.draw(&self.device, &self.queue, &mut encoder, &frame_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.overlay = None;
        self.meshes.clear();
        self.msaa_target = None;
        self.device.destroy();
        log::debug!("wgpu device disposed");
    }
}

/// Creates [`WgpuDevice`]s for window surfaces
#[derive(Debug, Default, Clone, Copy)]
pub struct WgpuDeviceFactory;

impl DeviceFactory<WindowSurface> for WgpuDeviceFactory {
    type Device = WgpuDevice;

    fn create_device(
        &self,
        surface: &WindowSurface,
        options: &EngineOptions,
        buffer_size: SurfaceSize,
    ) -> Result<Self::Device> {
        let window = surface.window().clone();
        pollster::block_on(WgpuDevice::new(window, options, buffer_size))
    }
}

mod pipelines;

use ambient_core::{
    BackendError, Material, MeshDesc, MeshId, Primitive, RenderBackend, SceneFrame, Vertex,
    Viewport,
};
use fnv::FnvHashMap;
use pipelines::{FrameUniforms, MeshUniforms, Pipelines};
use web_sys as web;
use wgpu;

use crate::dom;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    primitive: Primitive,
    material: Material,
    capacity: usize,
    len: usize,
}

impl GpuMesh {
    fn uniforms(&self) -> MeshUniforms {
        MeshUniforms {
            opacity: self.material.opacity,
            point_size: self.material.point_size,
            _pad: [0.0; 2],
        }
    }
}

/// WebGPU implementation of the scene renderer, drawing straight into the
/// page canvas with a transparent clear.
pub struct GpuBackend {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    mesh_bgl: wgpu::BindGroupLayout,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: FnvHashMap<MeshId, GpuMesh>,
    // draw order follows creation order
    order: Vec<MeshId>,
    next_id: u32,
    alive: bool,
}

impl GpuBackend {
    pub async fn new(canvas: web::HtmlCanvasElement, viewport: Viewport) -> anyhow::Result<Self> {
        dom::apply_backing_size(&canvas, viewport);
        let (width, height) = viewport.physical_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("ambient_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let frame_bgl =
            pipelines::uniform_layout(&device, "frame_bgl", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let mesh_bgl =
            pipelines::uniform_layout(&device, "mesh_bgl", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let pipelines = Pipelines::new(&device, &frame_bgl, &mesh_bgl, format);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        log::info!("[gpu] ready: {width}x{height} format={format:?} alpha={alpha_mode:?}");
        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            pipelines,
            mesh_bgl,
            frame_buffer,
            frame_bind_group,
            meshes: FnvHashMap::default(),
            order: Vec::new(),
            next_id: 0,
            alive: true,
        })
    }

    fn write_mesh_uniforms(&self, mesh: &GpuMesh) {
        self.queue
            .write_buffer(&mesh.uniform_buffer, 0, bytemuck::bytes_of(&mesh.uniforms()));
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl RenderBackend for GpuBackend {
    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<MeshId, BackendError> {
        if !self.alive {
            return Err(BackendError::Unavailable("renderer shut down".into()));
        }
        let capacity = desc.capacity.max(1);
        let vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: (capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_uniforms"),
            size: std::mem::size_of::<MeshUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bg"),
            layout: &self.mesh_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let mesh = GpuMesh {
            vertex_buffer,
            uniform_buffer,
            bind_group,
            primitive: desc.primitive,
            material: desc.material,
            capacity,
            len: 0,
        };
        self.write_mesh_uniforms(&mesh);

        let id = MeshId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.meshes.insert(id, mesh);
        self.order.push(id);
        Ok(id)
    }

    fn update_mesh(&mut self, mesh: MeshId, vertices: &[Vertex]) -> Result<(), BackendError> {
        let entry = self
            .meshes
            .get_mut(&mesh)
            .ok_or(BackendError::UnknownMesh(mesh))?;
        let count = vertices.len().min(entry.capacity);
        if count > 0 {
            self.queue.write_buffer(
                &entry.vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices[..count]),
            );
        }
        entry.len = count;
        Ok(())
    }

    fn set_opacity(&mut self, mesh: MeshId, opacity: f32) -> Result<(), BackendError> {
        let entry = self
            .meshes
            .get_mut(&mesh)
            .ok_or(BackendError::UnknownMesh(mesh))?;
        entry.material.opacity = opacity;
        let uniforms = entry.uniforms();
        self.queue
            .write_buffer(&entry.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        dom::apply_backing_size(&self.canvas, viewport);
        let (width, height) = viewport.physical_size();
        if !self.alive || (width == self.config.width && height == self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        log::debug!("[gpu] resized to {width}x{height}");
    }

    fn draw(&mut self, frame: &SceneFrame) -> Result<(), BackendError> {
        if !self.alive {
            return Err(BackendError::Unavailable("renderer shut down".into()));
        }
        let fog = frame.fog.color.to_array();
        let uniforms = FrameUniforms {
            proj: frame.projection.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            fog: [fog[0], fog[1], fog[2], frame.fog.density],
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));

        let surface_tex = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return Err(BackendError::Draw("surface lost, reconfigured".into()));
            }
            Err(e) => return Err(BackendError::Draw(format!("{e:?}"))),
        };
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            for id in &self.order {
                let Some(mesh) = self.meshes.get(id) else {
                    continue;
                };
                if mesh.len == 0 {
                    continue;
                }
                rpass.set_pipeline(self.pipelines.get(mesh.primitive, mesh.material.blend));
                rpass.set_bind_group(1, &mesh.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                match mesh.primitive {
                    Primitive::LineStrip => rpass.draw(0..mesh.len as u32, 0..1),
                    Primitive::Points => rpass.draw(0..6, 0..mesh.len as u32),
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        if let Some(entry) = self.meshes.remove(&mesh) {
            entry.vertex_buffer.destroy();
            entry.uniform_buffer.destroy();
            self.order.retain(|id| *id != mesh);
        }
    }

    fn shutdown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        for (_, entry) in self.meshes.drain() {
            entry.vertex_buffer.destroy();
            entry.uniform_buffer.destroy();
        }
        self.order.clear();
        self.frame_buffer.destroy();
        self.device.destroy();
        log::info!("[gpu] shut down");
    }
}

//! wgpu renderer: a forward pass with MSAA plus a directional shadow pass
//!
//! The renderer owns the canvas-bound surface and all GPU resources. It draws
//! whatever model the session currently holds; with no model uploaded it
//! clears to the background color, so rendering proceeds before (or without)
//! a successful asset load.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;
use wgpu::util::DeviceExt;

use orbitview_core::lights::SHADOW_MAP_SIZE;
use orbitview_core::viewer::BACKGROUND;
use orbitview_core::{Model, ViewerSession};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// 4x MSAA: the renderer's antialiasing half of the contract
const SAMPLE_COUNT: u32 = 4;

/// Half-extent of the directional light's orthographic frustum
const SUN_EXTENT: f32 = 10.0;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    sun_view_proj: [[f32; 4]; 4],
    ambient_color: [f32; 4],
    sun_dir: [f32; 4],
    sun_color: [f32; 4],
    spot_pos: [f32; 4],
    spot_dir: [f32; 4],
    spot_color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct NodeUniforms {
    base_color: [f32; 4],
    flags: [f32; 4],
}

struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    cast_shadow: bool,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    canvas: HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    frame_buf: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    node_layout: wgpu::BindGroupLayout,
    shadow_texture: wgpu::Texture,
    shadow_view: wgpu::TextureView,
    msaa_texture: wgpu::Texture,
    msaa_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    meshes: Vec<GpuMesh>,
}

impl Renderer {
    pub async fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| JsValue::from_str("no suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("orbitview device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(js_err)?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        // Favor an alpha-compositing mode so the canvas can blend with the
        // page behind it
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| {
                matches!(
                    mode,
                    wgpu::CompositeAlphaMode::PreMultiplied
                        | wgpu::CompositeAlphaMode::PostMultiplied
                )
            })
            .unwrap_or(caps.alpha_modes[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: orbitview_core::viewer::MAX_RENDER_SIZE,
            height: orbitview_core::viewer::MAX_RENDER_SIZE,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("viewer shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let frame_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // PCF happens in the shader; the comparison sampler with linear
        // filtering is what makes the map "soft"
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("node layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow bind group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene bind group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRS,
        };

        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shadow pipeline layout"),
                bind_group_layouts: &[&frame_layout],
                push_constant_ranges: &[],
            });
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_shadow",
                buffers: &[vertex_layout.clone()],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&scene_layout, &node_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh pipeline"),
            layout: Some(&mesh_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Garments are open surfaces, render both sides
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: SAMPLE_COUNT,
                ..Default::default()
            },
            multiview: None,
        });

        let (msaa_texture, msaa_view, depth_texture, depth_view) =
            create_frame_targets(&device, &config);

        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            shadow_pipeline,
            frame_buf,
            scene_bind_group,
            shadow_bind_group,
            node_layout,
            shadow_texture,
            shadow_view,
            msaa_texture,
            msaa_view,
            depth_texture,
            depth_view,
            meshes: Vec::new(),
        })
    }

    /// Resize the canvas and swapchain to a square of `css_size` logical
    /// pixels, scaled by the (capped) device pixel ratio.
    pub fn resize(&mut self, css_size: u32, pixel_ratio: f64) {
        let physical = ((css_size as f64) * pixel_ratio).round().max(1.0) as u32;
        self.canvas.set_width(physical);
        self.canvas.set_height(physical);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_size}px"));
        let _ = style.set_property("height", &format!("{css_size}px"));

        self.config.width = physical;
        self.config.height = physical;
        self.surface.configure(&self.device, &self.config);
        let (msaa_texture, msaa_view, depth_texture, depth_view) =
            create_frame_targets(&self.device, &self.config);
        self.msaa_texture.destroy();
        self.depth_texture.destroy();
        self.msaa_texture = msaa_texture;
        self.msaa_view = msaa_view;
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Upload a decoded model's geometry; called once after a successful load
    pub fn upload_model(&mut self, model: &Model) {
        self.meshes = model
            .nodes
            .iter()
            .map(|node| {
                let vertices: Vec<GpuVertex> = node
                    .vertices
                    .iter()
                    .map(|v| GpuVertex {
                        position: v.position.coords.into(),
                        normal: v.normal.into(),
                    })
                    .collect();
                let vertex_buf = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: node.name.as_deref(),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let index_buf = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: node.name.as_deref(),
                        contents: bytemuck::cast_slice(&node.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                let node_buf = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("node uniforms"),
                        contents: bytemuck::bytes_of(&NodeUniforms {
                            base_color: node.base_color,
                            flags: [node.receive_shadow as u32 as f32, 0.0, 0.0, 0.0],
                        }),
                        usage: wgpu::BufferUsages::UNIFORM,
                    });
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("node bind group"),
                    layout: &self.node_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: node_buf.as_entire_binding(),
                    }],
                });
                GpuMesh {
                    vertex_buf,
                    index_buf,
                    index_count: node.indices.len() as u32,
                    cast_shadow: node.cast_shadow,
                    bind_group,
                }
            })
            .collect();
    }

    /// Draw one frame of the session's scene
    pub fn render(&mut self, session: &ViewerSession) {
        self.write_frame_uniforms(session);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err:?}");
                return;
            }
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);
            for mesh in self.meshes.iter().filter(|m| m.cast_shadow) {
                pass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                pass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_view,
                    resolve_target: Some(&frame_view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for mesh in &self.meshes {
                pass.set_bind_group(1, &mesh.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                pass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    /// Release GPU resources. Valid to call once; rendering stops afterwards.
    pub fn dispose(&mut self) {
        for mesh in self.meshes.drain(..) {
            mesh.vertex_buf.destroy();
            mesh.index_buf.destroy();
        }
        self.frame_buf.destroy();
        self.shadow_texture.destroy();
        self.msaa_texture.destroy();
        self.depth_texture.destroy();
    }

    fn write_frame_uniforms(&self, session: &ViewerSession) {
        let correction = depth_correction();
        let view_proj = correction * session.camera.view_projection();
        let model_matrix = session
            .model()
            .map(Model::model_matrix)
            .unwrap_or_else(Matrix4::identity);

        let rig = &session.lights;
        let sun_view = Matrix4::look_at_rh(&rig.directional.position, &Point3::origin(), &Vector3::y());
        let sun_proj = Matrix4::new_orthographic(
            -SUN_EXTENT,
            SUN_EXTENT,
            -SUN_EXTENT,
            SUN_EXTENT,
            0.1,
            40.0,
        );
        let sun_view_proj = correction * sun_proj * sun_view;
        let sun_dir = (Point3::origin() - rig.directional.position).normalize();
        let spot_dir = (rig.spot.target - rig.spot.position).normalize();

        let uniforms = FrameUniforms {
            view_proj: view_proj.into(),
            model: model_matrix.into(),
            sun_view_proj: sun_view_proj.into(),
            ambient_color: scaled(rig.ambient.color, rig.ambient.intensity),
            sun_dir: [sun_dir.x, sun_dir.y, sun_dir.z, 0.0],
            sun_color: scaled(rig.directional.color, rig.directional.intensity),
            spot_pos: [
                rig.spot.position.x,
                rig.spot.position.y,
                rig.spot.position.z,
                0.0,
            ],
            spot_dir: [spot_dir.x, spot_dir.y, spot_dir.z, rig.spot.angle.cos()],
            spot_color: scaled(rig.spot.color, rig.spot.intensity),
        };
        self.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&uniforms));
    }

    fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = BACKGROUND;
        if self.config.format.is_srgb() {
            wgpu::Color {
                r: r.powf(2.2),
                g: g.powf(2.2),
                b: b.powf(2.2),
                a,
            }
        } else {
            wgpu::Color { r, g, b, a }
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_frame_targets(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> (wgpu::Texture, wgpu::TextureView, wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: config.width,
        height: config.height,
        depth_or_array_layers: 1,
    };
    let msaa_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa color"),
        size,
        mip_level_count: 1,
        sample_count: SAMPLE_COUNT,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let msaa_view = msaa_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size,
        mip_level_count: 1,
        sample_count: SAMPLE_COUNT,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (msaa_texture, msaa_view, depth_texture, depth_view)
}

/// GL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1])
#[rustfmt::skip]
fn depth_correction() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [
        color[0] * intensity,
        color[1] * intensity,
        color[2] * intensity,
        1.0,
    ]
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

use std::collections::{BTreeMap, HashMap};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use hamlet_config::QualityPreset;
use hamlet_render::RenderView;
use hamlet_scene::{Light, Renderable, SceneGraph, Shading};
use wgpu::util::DeviceExt;

use crate::mesh::{MeshKey, Vertex, tessellate};
use crate::shaders;

/// Point lights the shader can take; the quality preset may use fewer.
pub const MAX_POINT_LIGHTS: usize = 8;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PointLightRaw {
    position_range: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    fog_color: [f32; 4],
    fog_params: [f32; 4],
    ambient: [f32; 4],
    sun_dir: [f32; 4],
    sun_color: [f32; 4],
    light_count: [u32; 4],
    point_lights: [PointLightRaw; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl InstanceData {
    fn new(renderable: &Renderable, model: Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        let material = &renderable.material;
        let [r, g, b] = material.color.to_linear_rgb();
        let [er, eg, eb] = material.emissive.to_linear_rgb();
        let k = material.emissive_intensity;
        let lit = match material.shading {
            Shading::Lit => 1.0,
            Shading::Unlit => 0.0,
        };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: [r, g, b, material.opacity],
            emissive: [er * k, eg * k, eb * k, lit],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Contiguous run of instances sharing one mesh.
struct Batch {
    mesh: MeshKey,
    range: std::ops::Range<u32>,
}

/// wgpu renderer for a `SceneGraph`.
pub struct WgpuRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: HashMap<MeshKey, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    depth_texture: wgpu::TextureView,
    msaa_texture: Option<wgpu::TextureView>,
    sample_count: u32,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        antialiasing: bool,
    ) -> Self {
        let sample_count = if antialiasing { MSAA_SAMPLES } else { 1 };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let opaque_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            sample_count,
            false,
        );
        let translucent_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            sample_count,
            true,
        );

        let instance_capacity = 1024u32;
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);

        let depth_texture = Self::create_depth_texture(device, width, height, sample_count);
        let msaa_texture = (sample_count > 1).then(|| {
            Self::create_msaa_texture(device, surface_format, width, height, sample_count)
        });

        tracing::debug!(sample_count, "wgpu renderer created");

        Self {
            opaque_pipeline,
            translucent_pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes: HashMap::new(),
            instance_buffer,
            instance_capacity,
            depth_texture,
            msaa_texture,
            sample_count,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height, self.sample_count);
        if self.sample_count > 1 {
            self.msaa_texture = Some(Self::create_msaa_texture(
                device,
                self.surface_format,
                width,
                height,
                self.sample_count,
            ));
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of the scene into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &SceneGraph,
        view: &RenderView,
        quality: &QualityPreset,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Self::uniforms(scene, view, quality)),
        );

        let mut opaque: BTreeMap<MeshKey, Vec<InstanceData>> = BTreeMap::new();
        let mut translucent: BTreeMap<MeshKey, Vec<InstanceData>> = BTreeMap::new();
        for (_, renderable, model) in scene.renderables() {
            let key = MeshKey::of(&renderable.primitive);
            if !self.meshes.contains_key(&key) {
                self.meshes
                    .insert(key, Self::upload_mesh(device, &renderable.primitive));
            }
            let bucket = if renderable.material.is_translucent() {
                &mut translucent
            } else {
                &mut opaque
            };
            bucket
                .entry(key)
                .or_default()
                .push(InstanceData::new(renderable, model));
        }

        let mut instances: Vec<InstanceData> = Vec::new();
        let mut flatten = |groups: BTreeMap<MeshKey, Vec<InstanceData>>| -> Vec<Batch> {
            groups
                .into_iter()
                .map(|(mesh, group)| {
                    let start = instances.len() as u32;
                    instances.extend(group);
                    Batch {
                        mesh,
                        range: start..instances.len() as u32,
                    }
                })
                .collect()
        };
        let opaque_batches = flatten(opaque);
        let translucent_batches = flatten(translucent);

        if instances.len() as u32 > self.instance_capacity {
            self.instance_capacity = (instances.len() as u32).next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "instance buffer grown");
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let [r, g, b] = scene.background().to_linear_rgb();
        let (color_view, resolve_target) = match &self.msaa_texture {
            Some(msaa) => (msaa, Some(target)),
            None => (target, None),
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (pipeline, batches) in [
                (&self.opaque_pipeline, &opaque_batches),
                (&self.translucent_pipeline, &translucent_batches),
            ] {
                pass.set_pipeline(pipeline);
                for batch in batches {
                    let Some(mesh) = self.meshes.get(&batch.mesh) else {
                        continue;
                    };
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, batch.range.clone());
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn uniforms(scene: &SceneGraph, view: &RenderView, quality: &QualityPreset) -> Uniforms {
        let mut uniforms = Uniforms::zeroed();
        uniforms.view_proj = view.view_projection().to_cols_array_2d();
        uniforms.camera_pos = view.eye.extend(1.0).to_array();
        if let Some(fog) = scene.fog() {
            let [r, g, b] = fog.color.to_linear_rgb();
            uniforms.fog_color = [r, g, b, 1.0];
            uniforms.fog_params = [fog.near, fog.far, quality.fog_density, 0.0];
        }

        let max_points = (quality.max_lights as usize).min(MAX_POINT_LIGHTS);
        let mut points = 0usize;
        let mut ambient = Vec3::ZERO;
        for light in scene.lights() {
            match *light {
                Light::Ambient { color, intensity } => {
                    ambient += Vec3::from_array(color.to_linear_rgb()) * intensity;
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    ..
                } => {
                    let dir = position.normalize_or_zero();
                    let c = Vec3::from_array(color.to_linear_rgb()) * intensity;
                    uniforms.sun_dir = dir.extend(0.0).to_array();
                    uniforms.sun_color = c.extend(1.0).to_array();
                }
                Light::Point {
                    color,
                    intensity,
                    range,
                    position,
                } if points < max_points => {
                    let c = Vec3::from_array(color.to_linear_rgb()) * intensity;
                    uniforms.point_lights[points] = PointLightRaw {
                        position_range: position.extend(range).to_array(),
                        color: c.extend(1.0).to_array(),
                    };
                    points += 1;
                }
                Light::Point { .. } => {}
            }
        }
        uniforms.ambient = ambient.extend(1.0).to_array();
        uniforms.light_count = [points as u32, 0, 0, 0];
        uniforms
    }

    fn upload_mesh(device: &wgpu::Device, primitive: &hamlet_scene::Primitive) -> GpuMesh {
        let data = tessellate(primitive);
        tracing::trace!(
            kind = primitive.kind(),
            vertices = data.vertices.len(),
            "mesh uploaded"
        );
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        translucent: bool,
    ) -> wgpu::RenderPipeline {
        let (label, blend) = if translucent {
            ("translucent_pipeline", wgpu::BlendState::ALPHA_BLENDING)
        } else {
            ("opaque_pipeline", wgpu::BlendState::REPLACE)
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // No culling: the sky is seen from inside and planes from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: !translucent,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_msaa_texture(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_common::{Color, Transform};
    use hamlet_config::{CameraConfig, GraphicsConfig, QualityTier};
    use hamlet_scene::{Fog, Material, Primitive, SceneSink};

    fn scene_with_lights(points: usize) -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 0.6,
        });
        scene.add_light(Light::Directional {
            color: Color::WHITE,
            intensity: 0.8,
            position: Vec3::new(50.0, 50.0, 50.0),
            shadow_map_size: 2048,
        });
        for i in 0..points {
            scene.add_light(Light::Point {
                color: Color::from_hex(0xffaa00),
                intensity: 0.5,
                range: 10.0,
                position: Vec3::new(i as f32, 2.0, 0.0),
            });
        }
        scene
    }

    #[test]
    fn uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<PointLightRaw>(), 32);
        assert_eq!(std::mem::size_of::<InstanceData>(), 96);
    }

    #[test]
    fn quality_limits_point_lights() {
        let graphics = GraphicsConfig::default();
        let view = RenderView::new(&CameraConfig::default());
        let scene = scene_with_lights(5);

        let low = WgpuRenderer::uniforms(&scene, &view, &graphics.preset(QualityTier::Low));
        assert_eq!(low.light_count[0], 2);
        let high = WgpuRenderer::uniforms(&scene, &view, &graphics.preset(QualityTier::High));
        assert_eq!(high.light_count[0], 5);
    }

    #[test]
    fn sun_direction_points_at_the_sun() {
        let view = RenderView::new(&CameraConfig::default());
        let u = WgpuRenderer::uniforms(
            &scene_with_lights(0),
            &view,
            &GraphicsConfig::default().medium,
        );
        let dir = Vec3::new(u.sun_dir[0], u.sun_dir[1], u.sun_dir[2]);
        assert!((dir - Vec3::ONE.normalize()).length() < 1e-5);
        assert!(u.ambient[0] > 0.0);
    }

    #[test]
    fn fog_flag_follows_scene() {
        let view = RenderView::new(&CameraConfig::default());
        let preset = GraphicsConfig::default().medium;
        let mut scene = SceneGraph::new();
        assert_eq!(WgpuRenderer::uniforms(&scene, &view, &preset).fog_color[3], 0.0);
        scene.set_fog(Some(Fog {
            color: Color::from_hex(0x87ceeb),
            near: 0.0,
            far: 750.0,
        }));
        let u = WgpuRenderer::uniforms(&scene, &view, &preset);
        assert_eq!(u.fog_color[3], 1.0);
        assert_eq!(u.fog_params[1], 750.0);
        assert_eq!(u.fog_params[2], 0.001);
    }

    #[test]
    fn instance_carries_material() {
        let renderable = hamlet_scene::Renderable::new(
            Primitive::Cuboid { size: Vec3::ONE },
            Material::unlit(Color::WHITE).with_opacity(0.3),
        );
        let model = Transform::from_xyz(1.0, 2.0, 3.0).matrix();
        let data = InstanceData::new(&renderable, model);
        assert_eq!(data.color[3], 0.3);
        assert_eq!(data.emissive[3], 0.0);
        assert_eq!(data.model_3, [1.0, 2.0, 3.0, 1.0]);
    }
}

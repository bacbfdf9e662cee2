//! Instanced circle renderer over a letterboxed, y-down world.

use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::scene::{InstanceData, MAX_INSTANCES};

static CIRCLES_WGSL: &str = include_str!("circles.wgsl");

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.043,
    g: 0.071,
    b: 0.125,
    a: 1.0,
};

/// Unit square drawn as a triangle strip.
const CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [-0.5, 0.5], [0.5, 0.5]];

const CORNER_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const DOT_ATTRS: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32, 3 => Float32, 4 => Float32x4];

fn circle_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("circles"),
        source: wgpu::ShaderSource::Wgsl(CIRCLES_WGSL.into()),
    });
    let buffers = [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &CORNER_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &DOT_ATTRS,
        },
    ];
    // Layout is derived from the shader; the camera sits in group 0.
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("circles"),
        layout: None,
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// Maps the world rectangle into a pixel viewport, preserving aspect ratio.
#[derive(Clone, Copy, Debug)]
pub struct Letterbox {
    pub viewport: Vec2,
    pub world: Vec2,
}

impl Letterbox {
    fn scale(&self) -> f32 {
        (self.viewport.x / self.world.x).min(self.viewport.y / self.world.y)
    }

    fn origin(&self) -> Vec2 {
        (self.viewport - self.world * self.scale()) * 0.5
    }

    pub fn to_world(&self, px: Vec2) -> Vec2 {
        (px - self.origin()) / self.scale()
    }

    /// Orthographic camera covering the whole viewport; bars sit outside the world.
    pub fn camera(&self) -> Mat4 {
        let s = self.scale();
        let top_left = -self.origin() / s;
        let bottom_right = top_left + self.viewport / s;
        Mat4::orthographic_rh(top_left.x, bottom_right.x, bottom_right.y, top_left.y, -1.0, 1.0)
    }
}

pub struct Renderer<'w> {
    pub window: &'w Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    camera: wgpu::Buffer,
    camera_group: wgpu::BindGroup,
    corners: wgpu::Buffer,
    dots: wgpu::Buffer,
    pub view: Letterbox,
    pub instances: Vec<InstanceData>,
}

impl<'w> Renderer<'w> {
    pub async fn new(window: &'w Window, world: Vec2) -> anyhow::Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let (width, height) = (width.max(1), height.max(1));

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no adapter can present to this window"))?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;
        let surface_config = surface
            .get_default_config(&adapter, width, height)
            .ok_or_else(|| anyhow::anyhow!("surface is not supported by the adapter"))?;
        surface.configure(&device, &surface_config);

        let pipeline = circle_pipeline(&device, surface_config.format);
        let view = Letterbox {
            viewport: Vec2::new(width as f32, height as f32),
            world,
        };
        let camera = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera"),
            contents: bytemuck::cast_slice(&view.camera().to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            }],
        });
        let corners = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("corners"),
            contents: bytemuck::cast_slice(&CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let dots = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dots"),
            size: (std::mem::size_of::<InstanceData>() * MAX_INSTANCES) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            pipeline,
            camera,
            camera_group,
            corners,
            dots,
            view,
            instances: Vec::with_capacity(MAX_INSTANCES),
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.view.viewport = Vec2::new(size.width as f32, size.height as f32);
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let target = self.surface.get_current_texture()?;
        let target_view = target.texture.create_view(&Default::default());

        self.queue.write_buffer(
            &self.camera,
            0,
            bytemuck::cast_slice(&self.view.camera().to_cols_array()),
        );
        let shown = &self.instances[..self.instances.len().min(MAX_INSTANCES)];
        if !shown.is_empty() {
            self.queue.write_buffer(&self.dots, 0, bytemuck::cast_slice(shown));
        }

        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            if !shown.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.camera_group, &[]);
                pass.set_vertex_buffer(0, self.corners.slice(..));
                pass.set_vertex_buffer(1, self.dots.slice(..));
                pass.draw(0..CORNERS.len() as u32, 0..shown.len() as u32);
            }
        }
        self.queue.submit([encoder.finish()]);
        target.present();
        Ok(())
    }
}

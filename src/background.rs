use crate::{pipeline, texture};

/// The fixed backdrop image behind the whole scene.
pub const BACKGROUND_ASSET: &str = "assets/space1.jpg";

/// Fullscreen background image pass, a single vertexless triangle stretched
/// to the viewport and drawn at the far plane before everything else.
pub struct Background {
    texture_container: texture::TextureContainer,
    render_pipeline: wgpu::RenderPipeline,
}

impl Background {
    /// Best-effort load. A missing or undecodable image logs a warning and
    /// returns `None`; the clear color shows instead.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
    ) -> Option<Self> {
        let texture = std::fs::read(BACKGROUND_ASSET)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| texture::Texture::from_bytes(device, queue, &bytes, "background"));
        let texture = match texture {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("background {BACKGROUND_ASSET} unavailable: {e}");
                return None;
            }
        };

        let texture_container =
            texture::TextureContainer::for_texture_2d(device, texture, "background_bind_group");

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Background Pipeline Layout"),
                bind_group_layouts: &[&texture_container.bind_group_layout],
                push_constant_ranges: &[],
            });
        let shader = wgpu::include_wgsl!("../shaders/background.wgsl");
        let render_pipeline = pipeline::create_render_pipeline(
            device,
            &render_pipeline_layout,
            config.format,
            Some(texture::Texture::DEPTH_FORMAT),
            &[],
            wgpu::PrimitiveTopology::TriangleList,
            shader,
            Some("render_pipeline_background"),
        );

        Some(Background {
            texture_container,
            render_pipeline,
        })
    }
}

pub trait DrawBackground<'a> {
    fn draw_background(&mut self, background: &'a Background);
}

impl<'a, 'b> DrawBackground<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_background(&mut self, background: &'b Background) {
        self.set_pipeline(&background.render_pipeline);
        self.set_bind_group(0, &background.texture_container.bind_group, &[]);
        self.draw(0..3, 0..1);
    }
}

pub mod chart;
pub mod colors;
pub mod scene;
pub mod stats;
pub mod text;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use vello::wgpu;
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::window::Window;

/// Swapchain formats vello's surface blit can write to.
const BLIT_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Rgba8Unorm,
    wgpu::TextureFormat::Bgra8Unorm,
];

/// GPU state for presenting vello scenes in the viewer window.
pub struct RenderState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl RenderState {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let mut instance_desc = wgpu::InstanceDescriptor::default();
        #[cfg(windows)]
        {
            instance_desc.backends = wgpu::Backends::DX12;
        }
        let instance = wgpu::Instance::new(instance_desc);
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No GPU adapter can present to this window"))?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats).ok_or_else(|| {
            anyhow!("Surface offers none of {:?} (got {:?})", BLIT_FORMATS, caps.formats)
        })?;
        let size = window.inner_size();
        let surface_config = surface_config(format, size.width, size.height);
        surface.configure(&device, &surface_config);

        // With a surface format set, vello builds its own blit pipeline for render_to_surface.
        let renderer = Renderer::new(
            &device,
            RendererOptions {
                surface_format: Some(format),
                use_cpu: false,
                antialiasing_support: AaSupport::all(),
                num_init_threads: None,
            },
        )
        .map_err(|e| anyhow!("Failed to create vello renderer: {e}"))?;

        let info = adapter.get_info();
        tracing::info!(
            "GPU ready: {} ({:?}), surface {}x{} {:?}",
            info.name,
            info.backend,
            surface_config.width,
            surface_config.height,
            format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Render a scene straight to the window surface and present it.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let frame = self.surface.get_current_texture()?;
        let params = render_params(self.surface_config.width, self.surface_config.height);

        self.renderer
            .render_to_surface(&self.device, &self.queue, scene, &frame, &params)
            .map_err(|e| anyhow!("Scene render failed: {e}"))?;

        frame.present();
        Ok(())
    }
}

/// First surface format vello can blit into, in `BLIT_FORMATS` preference order.
pub fn choose_surface_format(available: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    BLIT_FORMATS
        .iter()
        .copied()
        .find(|format| available.contains(format))
}

pub fn surface_config(
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// White base so areas the scene leaves uncovered match the canvas paper.
pub fn render_params(width: u32, height: u32) -> RenderParams {
    RenderParams {
        base_color: vello::peniko::Color::WHITE,
        width,
        height,
        antialiasing_method: AaConfig::Msaa16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vello::wgpu::TextureFormat;

    #[test]
    fn prefers_rgba_then_bgra_and_rejects_srgb_only_surfaces() {
        let both = [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8Unorm];
        assert_eq!(choose_surface_format(&both), Some(TextureFormat::Rgba8Unorm));
        assert_eq!(
            choose_surface_format(&[TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm]),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(choose_surface_format(&[TextureFormat::Bgra8UnormSrgb]), None);
    }

    #[test]
    fn zero_sized_window_still_configures_a_surface() {
        let config = surface_config(TextureFormat::Rgba8Unorm, 0, 0);
        assert_eq!((config.width, config.height), (1, 1));
        assert!(config.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT));

        let params = render_params(900, 650);
        assert_eq!((params.width, params.height), (900, 650));
    }
}

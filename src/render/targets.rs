use super::helpers::{self, HDR_FORMAT};
use crate::constants::BLOOM_DOWNSAMPLE;

/// Offscreen color targets.
///
/// - `hdr_*` holds the additive sprite pass in Rgba16Float.
/// - `bloom_*` are downsampled ping-pong buffers for the bright pass and blur.
pub(crate) struct RenderTargets {
    _hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    _bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    _bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) bloom_size: [u32; 2],
}

pub(crate) fn bloom_size(width: u32, height: u32) -> [u32; 2] {
    [
        (width.max(1) / BLOOM_DOWNSAMPLE).max(1),
        (height.max(1) / BLOOM_DOWNSAMPLE).max(1),
    ]
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) =
            helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT);
        let [bw, bh] = bloom_size(width, height);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT);
        Self {
            _hdr_tex: hdr_tex,
            hdr_view,
            _bloom_a: bloom_a,
            bloom_a_view,
            _bloom_b: bloom_b,
            bloom_b_view,
            bloom_size: [bw, bh],
        }
    }
}

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use log::debug;

use crate::traits::SurfaceGeometry;
use crate::types::{Error, ImageSource, Rect, RenderedSurface, SurfaceNode};

/// white, the background every export requests
pub const WHITE: [u8; 3] = [0xff, 0xff, 0xff];

const BORDER: [u8; 3] = [0xe5, 0xe7, 0xeb];
const ACCENT: [u8; 3] = [0x2f, 0x7d, 0xff];
const TEXT_TONE: [u8; 3] = [0x1f, 0x29, 0x37];
const MUTED_TONE: [u8; 3] = [0x9c, 0xa3, 0xaf];
const CODE_FILL: [u8; 3] = [0xf3, 0xf4, 0xf6];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Jpeg,
    Png,
}

/// options for one raster capture
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub format: CaptureFormat,
    /// JPEG quality in 0.0..=1.0; ignored for PNG
    pub quality: Option<f32>,
    /// substituted wherever the surface is transparent
    pub background: [u8; 3],
    /// positive resolution multiplier; scales output pixels, never the
    /// surface's logical size
    pub pixel_density: f32,
}

impl CaptureOptions {
    pub fn jpeg(quality: f32) -> Self {
        CaptureOptions {
            format: CaptureFormat::Jpeg,
            quality: Some(quality),
            background: WHITE,
            pixel_density: 1.0,
        }
    }

    pub fn png() -> Self {
        CaptureOptions {
            format: CaptureFormat::Png,
            quality: None,
            background: WHITE,
            pixel_density: 1.0,
        }
    }

    /// builder function setting the resolution multiplier
    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.pixel_density = density;
        self
    }

    /// builder function setting the background substitution color
    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }
}

/// one finished capture: encoded bytes plus the raw pixels the paginated
/// export re-embeds without a decode round trip
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// intrinsic pixel dimensions (logical size times density)
    pub width: u32,
    pub height: u32,
    /// packed RGB8, `width * height * 3` bytes
    pub rgb: Vec<u8>,
}

impl CapturedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Rasterizes the surface as currently laid out. Text runs are painted as
/// tone blocks at their measured rects (there is no font stack here), the
/// embedded image is blitted from its resolved bytes, and the background
/// color replaces all transparency. An unresolved embedded resource fails
/// the whole capture; no partial image is produced.
pub fn capture(surface: &RenderedSurface, options: &CaptureOptions) -> Result<CapturedImage, Error> {
    let bounds = surface.bounding_rect();
    let density = options.pixel_density;

    if !(density.is_finite() && density > 0.0) {
        return Err(Error::EmptySurface);
    }

    let width = (bounds.width * density).round() as u32;
    let height = (bounds.height * density).round() as u32;
    if width == 0 || height == 0 {
        return Err(Error::EmptySurface);
    }

    let mut canvas = RgbImage::from_pixel(width, height, image::Rgb(options.background));

    // panel border, one logical pixel
    stroke_rect(&mut canvas, &bounds, density, BORDER);

    for node in surface.nodes() {
        paint_node(&mut canvas, node, density)?;
    }

    debug!(
        "captured {}x{} raster at density {density}",
        width, height
    );

    let rgb = canvas.as_raw().clone();
    let (bytes, mime) = encode(canvas, options)?;

    Ok(CapturedImage {
        bytes,
        mime,
        width,
        height,
        rgb,
    })
}

fn paint_node(canvas: &mut RgbImage, node: &SurfaceNode, density: f32) -> Result<(), Error> {
    match node {
        SurfaceNode::Heading { rect, .. } => fill_rect(canvas, rect, density, ACCENT),
        SurfaceNode::Paragraph { rect, muted, .. } => {
            let tone = if *muted { MUTED_TONE } else { TEXT_TONE };
            fill_rect(canvas, rect, density, tone);
        }
        SurfaceNode::KeyValue { rect, code, .. } => {
            let label = Rect::new(rect.left, rect.top, 120.0, rect.height);
            fill_rect(canvas, &label, density, MUTED_TONE);

            let value = Rect::new(rect.left + 130.0, rect.top, rect.width - 130.0, rect.height);
            let tone = if *code { CODE_FILL } else { TEXT_TONE };
            fill_rect(canvas, &value, density, tone);
            if *code {
                stroke_rect(canvas, &value, density, BORDER);
            }
        }
        SurfaceNode::ListItem { rect, .. } => fill_rect(canvas, rect, density, TEXT_TONE),
        SurfaceNode::Link { rect, .. } => fill_rect(canvas, rect, density, ACCENT),
        SurfaceNode::Divider { rect } => fill_rect(canvas, rect, density, BORDER),
        SurfaceNode::Image { rect, source, .. } => match source {
            ImageSource::Embedded(png) => {
                let decoded = image::load_from_memory(png)?.to_rgb8();
                blit(canvas, &decoded, rect, density);
            }
            ImageSource::Remote(url) => {
                // the cross-origin case: nothing was resolved, abort
                return Err(Error::UnresolvedResource(url.clone()));
            }
        },
    }

    Ok(())
}

fn device_bounds(rect: &Rect, density: f32, canvas: &RgbImage) -> (u32, u32, u32, u32) {
    let x0 = ((rect.left * density).max(0.0) as u32).min(canvas.width());
    let y0 = ((rect.top * density).max(0.0) as u32).min(canvas.height());
    let x1 = ((rect.right() * density).max(0.0) as u32).min(canvas.width());
    let y1 = ((rect.bottom() * density).max(0.0) as u32).min(canvas.height());
    (x0, y0, x1, y1)
}

fn fill_rect(canvas: &mut RgbImage, rect: &Rect, density: f32, color: [u8; 3]) {
    let (x0, y0, x1, y1) = device_bounds(rect, density, canvas);
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, image::Rgb(color));
        }
    }
}

fn stroke_rect(canvas: &mut RgbImage, rect: &Rect, density: f32, color: [u8; 3]) {
    let (x0, y0, x1, y1) = device_bounds(rect, density, canvas);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let stroke = (density.ceil() as u32).max(1);

    for y in y0..y1 {
        for x in x0..x1 {
            let edge = x < x0 + stroke || x >= x1 - stroke || y < y0 + stroke || y >= y1 - stroke;
            if edge {
                canvas.put_pixel(x, y, image::Rgb(color));
            }
        }
    }
}

/// nearest-neighbour blit of a decoded image into its display rect
fn blit(canvas: &mut RgbImage, source: &RgbImage, rect: &Rect, density: f32) {
    let (x0, y0, x1, y1) = device_bounds(rect, density, canvas);
    let (dst_w, dst_h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    if dst_w == 0 || dst_h == 0 || source.width() == 0 || source.height() == 0 {
        return;
    }

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = (dx as u64 * source.width() as u64 / dst_w as u64) as u32;
            let sy = (dy as u64 * source.height() as u64 / dst_h as u64) as u32;
            canvas.put_pixel(x0 + dx, y0 + dy, *source.get_pixel(sx, sy));
        }
    }
}

fn encode(canvas: RgbImage, options: &CaptureOptions) -> Result<(Vec<u8>, &'static str), Error> {
    let mut out = Cursor::new(Vec::new());

    match options.format {
        CaptureFormat::Jpeg => {
            let quality = options.quality.unwrap_or(0.92).clamp(0.01, 1.0);
            let encoder = JpegEncoder::new_with_quality(&mut out, (quality * 100.0) as u8);
            canvas.write_with_encoder(encoder)?;
            Ok((out.into_inner(), "image/jpeg"))
        }
        CaptureFormat::Png => {
            DynamicImage::ImageRgb8(canvas).write_to(&mut out, ImageFormat::Png)?;
            Ok((out.into_inner(), "image/png"))
        }
    }
}

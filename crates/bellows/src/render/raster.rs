#![forbid(unsafe_code)]

//! PNG / JPEG / PDF output for rendered joints.
//!
//! Every SVG this crate produces carries explicit `width`/`height`, so the raster size is that
//! size times `scale`.

use crate::render::HeadlessError;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),
    #[error("raster size {width}x{height} is not representable")]
    Size { width: f32, height: f32 },
    #[error("unrecognized background color: {0:?}")]
    Background(String),
    #[error("JPG output needs an opaque background, got {0:?}")]
    TranslucentBackground(String),
    #[error("failed to encode PNG")]
    Png,
    #[error("failed to encode JPG")]
    Jpeg(#[source] image::ImageError),
    #[error("failed to convert SVG to PDF: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Pixels per canvas unit.
    pub scale: f32,
    /// CSS-ish color painted under the drawing; `None` keeps PNG output transparent.
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

/// Background fill accepted by the raster outputs: a few names or `#rgb`, `#rrggbb`,
/// `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Background(tiny_skia::Color);

impl Background {
    /// JPG output falls back to this when no background is given.
    const JPEG_DEFAULT: &'static str = "white";

    fn parse(text: &str) -> Result<Self> {
        Self::parse_color(text)
            .map(Self)
            .ok_or_else(|| RasterError::Background(text.to_string()))
    }

    fn parse_color(text: &str) -> Option<tiny_skia::Color> {
        let s = text.trim().to_ascii_lowercase();
        let rgba = match s.as_str() {
            "transparent" | "none" => 0x0000_0000,
            "white" => 0xffff_ffff,
            "black" => 0x0000_00ff,
            _ => {
                let hex = s.strip_prefix('#')?;
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                let v = u32::from_str_radix(hex, 16).ok()?;
                match hex.len() {
                    3 => {
                        let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
                        (r * 0x11) << 24 | (g * 0x11) << 16 | (b * 0x11) << 8 | 0xff
                    }
                    6 => v << 8 | 0xff,
                    8 => v,
                    _ => return None,
                }
            }
        };
        let [r, g, b, a] = u32::to_be_bytes(rgba);
        Some(tiny_skia::Color::from_rgba8(r, g, b, a))
    }

    fn is_opaque(self) -> bool {
        self.0.is_opaque()
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let background = options
        .background
        .as_deref()
        .map(Background::parse)
        .transpose()?;
    rasterize(svg, options.scale, background)?
        .encode_png()
        .map_err(|_| RasterError::Png)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let text = options
        .background
        .as_deref()
        .unwrap_or(Background::JPEG_DEFAULT);
    let background = Background::parse(text)?;
    if !background.is_opaque() {
        return Err(RasterError::TranslucentBackground(text.to_string()));
    }

    let pixmap = rasterize(svg, options.scale, Some(background))?;
    let (width, height) = (pixmap.width(), pixmap.height());
    // Opaque pixels: premultiplied and straight RGBA coincide.
    let rgba = image::RgbaImage::from_raw(width, height, pixmap.take()).ok_or(
        RasterError::Size {
            width: width as f32,
            height: height as f32,
        },
    )?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();

    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
        .encode_image(&rgb)
        .map_err(RasterError::Jpeg)?;
    Ok(out)
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|e| RasterError::Pdf(e.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| RasterError::Pdf(e.to_string()))
}

fn rasterize(svg: &str, scale: f32, background: Option<Background>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    // The flow label asks for `monospace`; whatever the system maps it to is fine.
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt)?;

    let size = tree.size();
    let (width, height) = (size.width() * scale, size.height() * scale);
    let mut pixmap = (width.is_finite() && height.is_finite())
        .then(|| tiny_skia::Pixmap::new(width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32))
        .flatten()
        .ok_or(RasterError::Size { width, height })?;

    if let Some(Background(color)) = background {
        pixmap.fill(color);
    }
    tracing::debug!(width = pixmap.width(), height = pixmap.height(), "rasterizing");
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Visualizer;
    use bellows_core::{DeformationState, JointTopology};

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn rendered_joint_rasterizes_at_canvas_scale() {
        let v = Visualizer::new();
        let state = DeformationState::new(0.0, 0.0, 15.0).with_cross_section(false);
        let opts = RasterOptions {
            scale: 0.5,
            ..RasterOptions::default()
        };
        let bytes = v.render_png(JointTopology::Hinged, &state, &opts).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let svg = v.render_svg(JointTopology::Hinged, &state).unwrap();
        let pixmap = rasterize(&svg, 0.5, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (400, 250));
    }

    #[test]
    fn jpeg_requires_an_opaque_background() {
        let opts = RasterOptions {
            background: Some("#ffffff80".to_string()),
            ..RasterOptions::default()
        };
        assert!(matches!(
            svg_to_jpeg(SQUARE, &opts),
            Err(RasterError::TranslucentBackground(_))
        ));
        let bytes = svg_to_jpeg(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn unknown_background_is_an_error() {
        let opts = RasterOptions {
            background: Some("teal".to_string()),
            ..RasterOptions::default()
        };
        assert!(matches!(
            svg_to_png(SQUARE, &opts),
            Err(RasterError::Background(name)) if name == "teal"
        ));
    }

    #[test]
    fn svg_to_pdf_produces_pdf_signature() {
        let bytes = svg_to_pdf(SQUARE).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn background_colors_parse() {
        assert_eq!(
            Background::parse_color("#0f172a").unwrap(),
            tiny_skia::Color::from_rgba8(0x0f, 0x17, 0x2a, 0xff)
        );
        assert_eq!(
            Background::parse_color("#fff").unwrap(),
            tiny_skia::Color::WHITE
        );
        assert!(!Background::parse("transparent").unwrap().is_opaque());
        assert!(Background::parse_color("#12345").is_none());
        assert!(Background::parse_color("#+12").is_none());
    }
}

use crate::types::Error;

/// axis-aligned rectangle in display pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Rect { left, top, width, height }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// true when every component is a finite number; a rect that fails this
    /// cannot be mapped and is treated as a per-link measurement failure
    pub fn is_measurable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// one hyperlink discovered in the rendered tree: its on-screen rectangle
/// and where it points
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRegion {
    pub rect: Rect,
    pub url: String,
}

/// Maps a link rectangle from surface display space onto page space.
///
/// `scale = page_width / surface.width`; the link origin is taken relative
/// to the surface origin before scaling. The result keeps the top-left
/// origin of display space; any flip into a bottom-left page coordinate
/// system happens at serialization time, not here.
///
/// A zero-area link maps to a zero-area rectangle, which is harmless.
pub fn map_to_page(link: &Rect, surface: &Rect, page_width: f32) -> Result<Rect, Error> {
    if !surface.is_measurable() || surface.width <= 0.0 {
        return Err(Error::AnnotationMeasurement(format!(
            "surface rect is not measurable: {surface:?}"
        )));
    }

    if !link.is_measurable() {
        return Err(Error::AnnotationMeasurement(format!(
            "link rect is not measurable: {link:?}"
        )));
    }

    let scale = page_width / surface.width;

    Ok(Rect {
        left: (link.left - surface.left) * scale,
        top: (link.top - surface.top) * scale,
        width: link.width * scale,
        height: link.height * scale,
    })
}

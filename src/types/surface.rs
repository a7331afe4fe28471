use crate::traits::SurfaceGeometry;
use crate::types::{LinkRegion, Rect};

/// where an embedded image's pixels come from at capture time
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// PNG bytes the embedder resolved before rendering
    Embedded(Vec<u8>),
    /// a remote resource that was never fetched; raster capture cannot
    /// read it and fails the whole capture
    Remote(String),
}

/// One measured element of the rendered tree. Every node carries its
/// absolute rectangle in display pixels plus the utility classes the
/// word-processor export maps to literal styles.
#[derive(Debug, Clone)]
pub enum SurfaceNode {
    Heading {
        rect: Rect,
        text: String,
        /// 1 for the sheet title, 2 for section headings
        level: u8,
    },
    Paragraph {
        rect: Rect,
        text: String,
        muted: bool,
    },
    /// one row of a label/value grid; `code` values render in the pill style
    KeyValue {
        rect: Rect,
        label: String,
        value: String,
        code: bool,
    },
    ListItem {
        rect: Rect,
        text: String,
        /// optional bold lead-in, e.g. "Zoom:"
        lead: Option<String>,
    },
    Link {
        rect: Rect,
        text: String,
        url: String,
    },
    Image {
        rect: Rect,
        alt: String,
        source: ImageSource,
    },
    /// horizontal rule between the header, body and footer regions
    Divider {
        rect: Rect,
    },
}

impl SurfaceNode {
    pub fn rect(&self) -> Rect {
        match self {
            SurfaceNode::Heading { rect, .. }
            | SurfaceNode::Paragraph { rect, .. }
            | SurfaceNode::KeyValue { rect, .. }
            | SurfaceNode::ListItem { rect, .. }
            | SurfaceNode::Link { rect, .. }
            | SurfaceNode::Image { rect, .. }
            | SurfaceNode::Divider { rect } => *rect,
        }
    }
}

/// The rendered cheat sheet as currently displayed: a flat list of
/// absolutely positioned nodes produced by one synchronous layout pass.
///
/// The tree is immutable once built, so raster capture and link
/// measurement always observe the same geometry; the export pipeline
/// borrows it and never mutates it.
#[derive(Debug, Clone)]
pub struct RenderedSurface {
    bounds: Rect,
    nodes: Vec<SurfaceNode>,
}

impl RenderedSurface {
    pub fn new(bounds: Rect, nodes: Vec<SurfaceNode>) -> Self {
        debug_assert!(bounds.width > 0.0);
        debug_assert!(bounds.height > 0.0);

        RenderedSurface { bounds, nodes }
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }
}

impl SurfaceGeometry for RenderedSurface {
    fn bounding_rect(&self) -> Rect {
        self.bounds
    }

    /// hyperlinks in traversal order; zero-area links are reported as-is
    /// and left for the mapping step to carry through harmlessly
    fn link_regions(&self) -> Vec<LinkRegion> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                SurfaceNode::Link { rect, url, .. } => Some(LinkRegion {
                    rect: *rect,
                    url: url.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(left: f32, top: f32, url: &str) -> SurfaceNode {
        SurfaceNode::Link {
            rect: Rect::new(left, top, 80.0, 16.0),
            text: url.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn link_regions_follow_traversal_order() {
        let surface = RenderedSurface::new(
            Rect::new(0.0, 0.0, 1000.0, 1400.0),
            vec![
                link(10.0, 400.0, "https://zoom.us/download"),
                SurfaceNode::Divider {
                    rect: Rect::new(0.0, 500.0, 1000.0, 1.0),
                },
                link(10.0, 40.0, "https://outlook.office365.com/"),
            ],
        );

        let regions = surface.link_regions();
        assert_eq!(regions.len(), 2);
        // traversal order, not top-to-bottom order
        assert_eq!(regions[0].url, "https://zoom.us/download");
        assert_eq!(regions[1].url, "https://outlook.office365.com/");
    }

    #[test]
    fn non_link_nodes_are_not_regions() {
        let surface = RenderedSurface::new(
            Rect::new(0.0, 0.0, 1000.0, 100.0),
            vec![SurfaceNode::Heading {
                rect: Rect::new(22.0, 22.0, 400.0, 30.0),
                text: "Quick Start".to_string(),
                level: 1,
            }],
        );

        assert!(surface.link_regions().is_empty());
    }
}

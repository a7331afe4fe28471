use crate::types::{LinkRegion, Rect};

/// The measurement capability the export pipeline needs from a rendered
/// tree, independent of the rendering technology behind it. The paginated
/// export reads geometry exclusively through this trait, so annotation
/// coordinates always come from the live layout and never from a raster.
pub trait SurfaceGeometry {
    /// overall bounding rectangle of the surface in display pixels
    fn bounding_rect(&self) -> Rect;

    /// every hyperlink region in traversal order, each with its own
    /// bounding rectangle and target URL
    fn link_regions(&self) -> Vec<LinkRegion>;
}

mod save_target;
mod surface_geometry;

pub use save_target::SaveTarget;
pub use surface_geometry::SurfaceGeometry;

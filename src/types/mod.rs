pub mod capture;
mod download;
mod error;
mod exporter;
mod geometry;
pub mod markup;
mod record;
mod renderer;
mod session;
pub mod style_map;
mod surface;

pub use capture::{capture, CaptureFormat, CaptureOptions, CapturedImage};
pub use download::{DiskTarget, MemoryTarget};
pub use error::Error;
pub use exporter::{
    collect_annotations, placed_height, user_notice, ExportKind, Exporter, PAGE_HEIGHT, PAGE_WIDTH,
};
pub use geometry::{map_to_page, LinkRegion, Rect};
pub use record::{CaseRecord, Category, FILENAME_PREFIX, MAIL_DOMAIN, OFFICES};
pub use renderer::{Renderer, QR_URL, SHEET_WIDTH};
pub use session::{Session, ViewState};
pub use surface::{ImageSource, RenderedSurface, SurfaceNode};

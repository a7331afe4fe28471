use core::fmt;
use derive_more::From;

/// Export pipeline error taxonomy. Every failure is terminal for the export
/// attempt that raised it; nothing in the pipeline retries.
#[derive(Debug, From)]
pub enum Error {
    /// raster generation failed because an embedded resource was never
    /// resolved to bytes (the cross-origin case)
    UnresolvedResource(String),
    /// raster generation failed inside the image codec
    #[from]
    ImageCodec(image::ImageError),
    /// the surface has no drawable area at the requested pixel density
    EmptySurface,
    /// a single link's geometry could not be read; recovered per-link,
    /// never aborts a whole export
    AnnotationMeasurement(String),
    /// the download trigger could not write the artifact
    #[from]
    Save(std::io::Error),
    /// export was requested while no surface is mounted
    NoSurface,
    /// unanticipated fault while serializing an output document
    Serialization(String),
}

impl Error {
    /// capture-class errors abort the export before any bytes are produced
    pub fn is_capture(&self) -> bool {
        matches!(
            self,
            Error::UnresolvedResource(_) | Error::ImageCodec(_) | Error::EmptySurface
        )
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

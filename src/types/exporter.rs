use std::io::Write as _;
use std::path::PathBuf;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{error, warn};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, Str};

use crate::traits::{SaveTarget, SurfaceGeometry};
use crate::types::{
    capture, markup, CaptureOptions, CaseRecord, Error, Rect, RenderedSurface,
};

/// A4 portrait with the page unit set to pixels (CSS 96 dpi)
pub const PAGE_WIDTH: f32 = 794.0;
pub const PAGE_HEIGHT: f32 = 1123.0;

/// JPEG quality every image export requests
const IMAGE_QUALITY: f32 = 0.95;
/// density multiplier for the raster embedded in the paginated document
const PDF_CAPTURE_DENSITY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Image,
    Paginated,
    Word,
}

impl ExportKind {
    fn label(&self) -> &'static str {
        match self {
            ExportKind::Image => "image",
            ExportKind::Paginated => "PDF",
            ExportKind::Word => "word",
        }
    }
}

/// blocking notice shown when an export attempt fails; the user has to
/// re-trigger the export, nothing retries on its own
pub fn user_notice(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Image => "Could not generate image. Please try again.",
        ExportKind::Paginated => "Could not generate PDF. Please try again.",
        ExportKind::Word => "Could not generate document. Please try again.",
    }
}

/// uniform scale-to-page-width placement: the image's placed height for an
/// intrinsic `iw` x `ih` raster; deliberately never clamped to the page, an
/// overly tall surface crops at the page boundary at render time
pub fn placed_height(intrinsic_width: u32, intrinsic_height: u32, page_width: f32) -> f32 {
    intrinsic_height as f32 * (page_width / intrinsic_width as f32)
}

/// Maps every link region of the live surface into page space, in traversal
/// order. A region whose geometry cannot be read is skipped with a warning;
/// a zero-area region maps to a zero-area annotation and is kept.
pub fn collect_annotations<S: SurfaceGeometry>(surface: &S, page_width: f32) -> Vec<(Rect, String)> {
    let surface_rect = surface.bounding_rect();
    let mut out = Vec::new();

    for region in surface.link_regions() {
        match crate::types::map_to_page(&region.rect, &surface_rect, page_width) {
            Ok(rect) => out.push((rect, region.url)),
            Err(err) => warn!("skipping link annotation for {}: {err}", region.url),
        }
    }

    out
}

/// The export pipeline. Borrows the mounted surface (never mutates it) and
/// the record it was rendered from, and produces one downloadable artifact
/// per call. Failures are logged here, at the pipeline boundary, and no
/// partial artifact ever reaches the save target.
pub struct Exporter<'a> {
    record: &'a CaseRecord,
    surface: &'a RenderedSurface,
}

impl<'a> Exporter<'a> {
    pub fn new(record: &'a CaseRecord, surface: &'a RenderedSurface) -> Self {
        Exporter { record, surface }
    }

    pub fn export(&self, kind: ExportKind, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        let result = match kind {
            ExportKind::Image => self.image(target),
            ExportKind::Paginated => self.paginated(target),
            ExportKind::Word => self.word(target),
        };

        if let Err(err) = &result {
            error!("{} export failed: {err}", kind.label());
        }

        result
    }

    pub fn export_image(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        self.export(ExportKind::Image, target)
    }

    pub fn export_paginated(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        self.export(ExportKind::Paginated, target)
    }

    pub fn export_word(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        self.export(ExportKind::Word, target)
    }

    /// JPEG at quality 0.95 on a white background, default density
    fn image(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        let captured = capture::capture(self.surface, &CaptureOptions::jpeg(IMAGE_QUALITY))?;
        let filename = format!("{}.jpg", self.record.base_filename());

        target.save(&filename, &captured.bytes)
    }

    /// Single-page document: a 2x PNG capture scaled to the page width,
    /// overlaid with invisible link annotations mapped from the live
    /// surface geometry (never from the raster).
    fn paginated(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        // fail fast before any document object is written
        let options = CaptureOptions::png().with_pixel_density(PDF_CAPTURE_DENSITY);
        let captured = capture::capture(self.surface, &options)?;

        let image_height = placed_height(captured.width, captured.height, PAGE_WIDTH);
        let annotations = collect_annotations(self.surface, PAGE_WIDTH);

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        let image_id = alloc.bump();
        let image_name = Name(b"Im0");

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id).kids([page_id]).count(1);

        // raster goes in as a flate-compressed RGB8 XObject
        let compressed = deflate(&captured.rgb)?;
        let mut image = pdf.image_xobject(image_id, &compressed);
        image.filter(Filter::FlateDecode);
        image.width(captured.width as i32);
        image.height(captured.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();

        // page space is bottom-left origin: the image sits at the top-left
        // corner, overflowing past the bottom edge when taller than a page
        let mut content = Content::new();
        content.save_state();
        content.transform([
            PAGE_WIDTH,
            0.0,
            0.0,
            image_height,
            0.0,
            PAGE_HEIGHT - image_height,
        ]);
        content.x_object(image_name);
        content.restore_state();
        pdf.stream(content_id, &content.finish());

        let mut page = pdf.page(page_id);
        page.media_box(PdfRect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(image_name, image_id);

        let mut annots = page.annotations();
        for (rect, url) in &annotations {
            let mut annotation = annots.push();
            annotation.subtype(AnnotationType::Link);
            // flip the top-left rect into page coordinates here, and only here
            annotation.rect(PdfRect::new(
                rect.left,
                PAGE_HEIGHT - rect.top - rect.height,
                rect.left + rect.width,
                PAGE_HEIGHT - rect.top,
            ));
            annotation.border(0.0, 0.0, 0.0, None);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(url.as_bytes()));
            annotation.finish();
        }
        annots.finish();
        page.finish();

        let filename = format!("{}.pdf", self.record.base_filename());
        target.save(&filename, &pdf.finish())
    }

    /// serializes the live markup; performs no capture, so it cannot fail
    /// for capture reasons and always produces output
    fn word(&self, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        let document = markup::document_markup(self.surface);

        // byte-order mark keeps legacy word processors on UTF-8
        let mut bytes = Vec::with_capacity(document.len() + 3);
        bytes.extend_from_slice("\u{feff}".as_bytes());
        bytes.extend_from_slice(document.as_bytes());

        let filename = format!("{}.doc", self.record.base_filename());
        target.save(&filename, &bytes)
    }
}

/// a compression fault is a serialization failure, not a save failure; the
/// artifact never reached the save target
fn deflate(data: &[u8]) -> Result<Vec<u8>, Error> {
    deflate_into(Vec::new(), data)
}

fn deflate_into<W: std::io::Write>(sink: W, data: &[u8]) -> Result<W, Error> {
    let mut encoder = ZlibEncoder::new(sink, Compression::default());
    encoder
        .write_all(data)
        .map_err(|err| Error::Serialization(err.to_string()))?;
    encoder
        .finish()
        .map_err(|err| Error::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LinkRegion, MemoryTarget, Renderer};

    /// stub geometry source, enough to exercise the mapping step in
    /// isolation from any real renderer
    struct StubSurface {
        bounds: Rect,
        links: Vec<LinkRegion>,
    }

    impl SurfaceGeometry for StubSurface {
        fn bounding_rect(&self) -> Rect {
            self.bounds
        }

        fn link_regions(&self) -> Vec<LinkRegion> {
            self.links.clone()
        }
    }

    fn qr_png() -> Vec<u8> {
        use image::{DynamicImage, ImageFormat, RgbImage};
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn record() -> CaseRecord {
        CaseRecord {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            ..CaseRecord::default()
        }
    }

    fn rendered(record: &CaseRecord) -> RenderedSurface {
        init_logs();
        Renderer::new().with_qr_image(qr_png()).render(record)
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// write sink that refuses every byte, standing in for a compression
    /// stage whose output cannot be produced
    struct BrokenSink;

    impl std::io::Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "sink is closed",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn image_export_saves_a_jpeg_under_the_derived_name() {
        let record = record();
        let surface = rendered(&record);
        let mut target = MemoryTarget::new();

        Exporter::new(&record, &surface)
            .export_image(&mut target)
            .unwrap();

        let (name, bytes) = &target.artifacts[0];
        assert_eq!(name, "USABC-Onboarding-Jane-Doe.jpg");
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn whitespace_in_names_collapses_in_the_filename() {
        let record = CaseRecord {
            given_name: "Mary Ann".to_string(),
            family_name: "Lee".to_string(),
            ..CaseRecord::default()
        };
        let surface = rendered(&record);
        let mut target = MemoryTarget::new();

        Exporter::new(&record, &surface)
            .export_image(&mut target)
            .unwrap();

        assert_eq!(target.artifacts[0].0, "USABC-Onboarding-Mary-Ann-Lee.jpg");
    }

    #[test]
    fn capture_failure_saves_nothing() {
        let record = record();
        // no QR bytes supplied: the image node stays remote
        let surface = Renderer::new().render(&record);
        let mut target = MemoryTarget::new();
        let exporter = Exporter::new(&record, &surface);

        assert!(exporter.export_image(&mut target).is_err());
        assert!(exporter.export_paginated(&mut target).is_err());
        assert!(target.artifacts.is_empty(), "partial artifact was saved");
    }

    #[test]
    fn word_export_never_captures_and_always_produces_output() {
        let record = record();
        // same unresolved-image surface that fails the other two exports
        let surface = Renderer::new().render(&record);
        let mut target = MemoryTarget::new();

        Exporter::new(&record, &surface)
            .export_word(&mut target)
            .unwrap();

        let (name, bytes) = &target.artifacts[0];
        assert_eq!(name, "USABC-Onboarding-Jane-Doe.doc");
        // UTF-8 byte-order mark, then the banner before everything else
        assert_eq!(&bytes[..3], &[0xef, 0xbb, 0xbf]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains(markup::FIDELITY_NOTICE));
    }

    #[test]
    fn paginated_export_writes_a_pdf_with_link_annotations() {
        let record = record();
        let surface = rendered(&record);
        let mut target = MemoryTarget::new();

        Exporter::new(&record, &surface)
            .export_paginated(&mut target)
            .unwrap();

        let (name, bytes) = &target.artifacts[0];
        assert_eq!(name, "USABC-Onboarding-Jane-Doe.pdf");
        assert!(bytes.starts_with(b"%PDF-"));

        let haystack = String::from_utf8_lossy(bytes);
        assert!(haystack.contains("/Annots"));
        assert!(haystack.contains("https://zoom.us/download"));
        assert!(haystack.contains("/FlateDecode"));
    }

    #[test]
    fn placed_height_scales_uniformly_and_is_never_clamped() {
        // 2x capture of a 1000px surface onto a 794px page
        assert!((placed_height(2000, 2800, PAGE_WIDTH) - 2800.0 * (794.0 / 2000.0)).abs() < 1e-3);

        // far taller than one page: stays unclamped
        let tall = placed_height(1000, 10_000, PAGE_WIDTH);
        assert!(tall > PAGE_HEIGHT);
        assert!((tall - 7940.0).abs() < 1e-2);
    }

    #[test]
    fn annotations_map_through_the_documented_formula() {
        let stub = StubSurface {
            bounds: Rect::new(20.0, 10.0, 1000.0, 1400.0),
            links: vec![LinkRegion {
                rect: Rect::new(100.0, 50.0, 40.0, 20.0),
                url: "https://example.org/".to_string(),
            }],
        };

        let annotations = collect_annotations(&stub, 600.0);

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].0, Rect::new(48.0, 24.0, 24.0, 12.0));
        assert_eq!(annotations[0].1, "https://example.org/");
    }

    #[test]
    fn zero_area_links_are_kept_unmeasurable_ones_skipped() {
        init_logs();
        let stub = StubSurface {
            bounds: Rect::new(0.0, 0.0, 1000.0, 1400.0),
            links: vec![
                LinkRegion {
                    rect: Rect::new(50.0, 60.0, 0.0, 0.0),
                    url: "https://zero.example/".to_string(),
                },
                LinkRegion {
                    rect: Rect::new(f32::NAN, 0.0, 10.0, 10.0),
                    url: "https://broken.example/".to_string(),
                },
            ],
        };

        let annotations = collect_annotations(&stub, 600.0);

        // zero-area survives as a harmless zero-area annotation, the
        // unmeasurable one is dropped without aborting
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].1, "https://zero.example/");
        assert_eq!(annotations[0].0.area(), 0.0);
    }

    #[test]
    fn compression_faults_report_as_serialization_not_save() {
        let result = deflate_into(BrokenSink, &[0u8; 4096]);

        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn deflate_round_trips_through_the_decoder() {
        let data = b"onboarding cheat sheet pixels".repeat(64);
        let compressed = deflate(&data).unwrap();

        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut out = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn every_export_kind_has_a_distinct_notice() {
        let notices = [
            user_notice(ExportKind::Image),
            user_notice(ExportKind::Paginated),
            user_notice(ExportKind::Word),
        ];

        assert!(notices.iter().all(|n| !n.is_empty()));
        assert_ne!(notices[0], notices[1]);
        assert_ne!(notices[1], notices[2]);
    }

    #[test]
    fn annotation_order_follows_traversal_order() {
        let record = record();
        let surface = rendered(&record);
        let regions = surface.link_regions();
        let annotations = collect_annotations(&surface, PAGE_WIDTH);

        assert_eq!(annotations.len(), regions.len());
        for (annotation, region) in annotations.iter().zip(&regions) {
            assert_eq!(annotation.1, region.url);
        }
    }
}

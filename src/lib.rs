//! # Introduction
//!
//! Onepager renders a single onboarding record into a styled, fixed-width
//! cheat sheet and exports that sheet to three downloadable formats: a JPEG
//! image, a single-page PDF with clickable link overlays, and a
//! word-processor-compatible `.doc` file. Built on top of pdf_writer
//! (Typst) and the image crate, this is a no frills library: there is no
//! server, no persistence and no background work, just the export pipeline
//! that a form front end drives.
//!
//! Feature Road Map:
//! - [X] JPEG export (0.95 quality, white background)
//! - [X] Single-page PDF with link annotations mapped from live geometry
//! - [X] High-density (2x) raster embed for the PDF
//! - [X] Word-compatible export with embedded style sheet and BOM
//! - [X] Whitespace-free filename derivation
//! - [X] Save-target completion signal
//! - [ ] Glyph-accurate raster capture (text runs paint as tone blocks)
//! - [ ] Multi-page PDF output for surfaces taller than one page
//!
//! ## Links
//! PDF Writer:
//!
//! - <https://github.com/typst/pdf-writer>
//!
//! # Basic Usage
//! The main entry point is the [`types::Session`] controller, which owns the
//! current record and view state. Submit a [`types::CaseRecord`] to mount the
//! rendered surface, then run exports against a [`traits::SaveTarget`].
//!
//! ```no_run
//! use onepager::types::{CaseRecord, DiskTarget, ExportKind, Renderer, Session};
//!
//! let mut session = Session::new(Renderer::new());
//!
//! // take the submitted form payload...
//! let record: CaseRecord = serde_json::from_str(
//!     r#"{"givenName": "Jane", "familyName": "Doe", "category": "primary"}"#,
//! )
//! .unwrap();
//!
//! // ...mount the generated view and export it
//! session.submit(record);
//! let mut downloads = DiskTarget::new("./out");
//! session.export(ExportKind::Paginated, &mut downloads).unwrap();
//! ```
//!
//! The PDF export needs the footer QR image resolved to bytes up front
//! (fetching is the embedder's job); build the renderer with
//! `Renderer::new().with_qr_image(png_bytes)` for that.

pub mod traits;
pub mod types;

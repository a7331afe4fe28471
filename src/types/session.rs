use std::path::PathBuf;

use crate::traits::SaveTarget;
use crate::types::{CaseRecord, Error, ExportKind, Exporter, RenderedSurface, Renderer};

/// which of the two views is mounted
#[derive(Debug)]
pub enum ViewState {
    /// the entry form, holding whatever was last submitted
    Editing(CaseRecord),
    /// the generated cheat sheet; the surface lives exactly as long as
    /// this view
    Generated {
        record: CaseRecord,
        surface: RenderedSurface,
    },
}

/// The single owner of session state: the current record and view mode.
/// Transitions are wholesale replacements, never in-place mutation; the
/// rendered surface is created on submission and discarded on back-to-edit.
pub struct Session {
    renderer: Renderer,
    state: ViewState,
}

impl Session {
    pub fn new(renderer: Renderer) -> Self {
        Session {
            renderer,
            state: ViewState::Editing(CaseRecord::default()),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn record(&self) -> &CaseRecord {
        match &self.state {
            ViewState::Editing(record) => record,
            ViewState::Generated { record, .. } => record,
        }
    }

    /// form submission: replaces the record wholesale and mounts a freshly
    /// rendered surface
    pub fn submit(&mut self, record: CaseRecord) {
        let surface = self.renderer.render(&record);
        self.state = ViewState::Generated { record, surface };
    }

    /// discards the generated view, keeping the record for re-editing
    pub fn back_to_edit(&mut self) {
        if let ViewState::Generated { record, .. } = &self.state {
            self.state = ViewState::Editing(record.clone());
        }
    }

    /// Runs one export against the mounted surface. Only valid while the
    /// generated view is up; the export borrows the surface for the length
    /// of the call and owns nothing shared, so overlapping invocations
    /// would each produce an independent artifact.
    pub fn export(&self, kind: ExportKind, target: &mut dyn SaveTarget) -> Result<PathBuf, Error> {
        match &self.state {
            ViewState::Generated { record, surface } => {
                Exporter::new(record, surface).export(kind, target)
            }
            ViewState::Editing(_) => Err(Error::NoSurface),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Renderer::new())
    }
}

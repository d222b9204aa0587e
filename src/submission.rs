//! Handles a form submission end to end: status, preview surface, layout,
//! rendering and the download.

use anyhow::Context;
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

use crate::content;
use crate::download::DownloadTarget;
use crate::error::Result;
use crate::fields::FieldSnapshot;
use crate::layout;
use crate::pdf_writer::DocumentRenderer;
use crate::preview::{CommittedPreview, PreviewSurface};
use crate::selection::SelectionState;
use crate::status::StatusIndicator;
use crate::OUTPUT_FILE_NAME;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Downloaded(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    pub pages: usize,
    /// What the preview surface showed while the document was generated.
    pub preview: String,
}

pub struct SubmissionHandler<R, T> {
    renderer: R,
    target: T,
    file_name: String,
}

impl<R: DocumentRenderer, T: DownloadTarget> SubmissionHandler<R, T> {
    pub fn new(renderer: R, target: T) -> Self {
        Self {
            renderer,
            target,
            file_name: OUTPUT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Generates and offers the document. Only a submission made while another
    /// is in flight is an `Err`; generation failures are reported through the
    /// status indicator and [`SubmitOutcome::Failed`].
    pub fn submit<I, K, V>(
        &mut self,
        form: I,
        selection: &SelectionState,
        status: &mut StatusIndicator,
    ) -> Result<Submission>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        status.begin()?;

        let fields = FieldSnapshot::from_entries(form);
        info!(
            "Generating document with {} field(s) and {} photo(s)",
            fields.len(),
            selection.images().len()
        );

        let mut surface = PreviewSurface::open(content::assemble(&fields, selection));
        let generated = {
            let committed = surface.commit();
            self.generate(&committed)
        };
        let preview = surface.render_text();
        surface.close();

        match generated {
            Ok((path, pages)) => {
                status.succeed(Instant::now());
                Ok(Submission {
                    outcome: SubmitOutcome::Downloaded(path),
                    pages,
                    preview,
                })
            }
            Err(e) => {
                error!("PDF generation error: {:?}", e);
                status.fail();
                Ok(Submission {
                    outcome: SubmitOutcome::Failed(format!("{:#}", e)),
                    pages: 0,
                    preview,
                })
            }
        }
    }

    fn generate(&mut self, committed: &CommittedPreview) -> anyhow::Result<(PathBuf, usize)> {
        let content = committed.content();
        let plan = layout::plan(content);
        let bytes = self
            .renderer
            .render(&plan, content)
            .context("Failed to render document")?;
        let path = self
            .target
            .offer(&self.file_name, &bytes)
            .context("Failed to offer document for download")?;
        Ok((path, plan.page_count()))
    }
}

//! On-screen previews.
//!
//! [`PreviewPane`] mirrors the current file selection as files finish
//! decoding. [`PreviewSurface`] is the transient view of the document being
//! generated; it exists only for the duration of one submission.

use crate::content::DocumentContent;
use crate::PHOTOS_PER_ROW;
use itertools::Itertools;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewKind {
    Image { width: u32, height: u32 },
    Video { bytes: usize },
    /// Shown in place of a file that could not be read.
    Unreadable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub name: String,
    pub kind: PreviewKind,
}

/// Preview elements for one file input, in the order decodes completed.
#[derive(Debug, Clone, Default)]
pub struct PreviewPane {
    items: Vec<PreviewItem>,
}

impl PreviewPane {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, name: impl Into<String>, kind: PreviewKind) {
        self.items.push(PreviewItem {
            name: name.into(),
            kind,
        });
    }

    pub fn items(&self) -> &[PreviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match &item.kind {
                PreviewKind::Image { width, height } => {
                    format!("[image] {} ({}x{})", item.name, width, height)
                }
                PreviewKind::Video { bytes } => format!("[video] {} ({} bytes)", item.name, bytes),
                PreviewKind::Unreadable { reason } => {
                    format!("[unreadable] {}: {}", item.name, reason)
                }
            })
            .join("\n")
    }
}

pub struct PreviewSurface<'a> {
    content: DocumentContent<'a>,
    lines: Vec<String>,
    committed: bool,
}

/// Proof that the preview surface has been fully populated. Generation reads
/// its content only through this.
pub struct CommittedPreview<'s, 'a> {
    surface: &'s PreviewSurface<'a>,
}

impl<'a> CommittedPreview<'_, 'a> {
    pub fn content(&self) -> &DocumentContent<'a> {
        &self.surface.content
    }
}

impl<'a> PreviewSurface<'a> {
    pub fn open(content: DocumentContent<'a>) -> Self {
        debug!("Opening preview surface");
        Self {
            content,
            lines: Vec::new(),
            committed: false,
        }
    }

    /// Populates the surface from its content and hands back the commit proof.
    pub fn commit(&mut self) -> CommittedPreview<'_, 'a> {
        if !self.committed {
            self.lines = preview_lines(&self.content);
            self.committed = true;
            debug!("Preview surface committed with {} line(s)", self.lines.len());
        }
        CommittedPreview { surface: self }
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn render_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn close(self) {
        debug!("Closing preview surface");
    }
}

fn preview_lines(content: &DocumentContent) -> Vec<String> {
    let mut lines = vec![content.title.to_string(), String::new()];

    for row in &content.rows {
        lines.push(format!("{}: {}", row.label, row.value));
    }

    if let Some(section) = &content.photos {
        lines.push(String::new());
        lines.push(section.heading.to_string());
        for row in &section.photos.iter().chunks(PHOTOS_PER_ROW) {
            lines.push(row.map(|photo| format!("[{}]", photo.name)).join(" "));
        }
    }

    if let Some(note) = &content.video_note {
        lines.push(String::new());
        lines.push(note.clone());
    }

    lines
}

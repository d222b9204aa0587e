//! Current photo and video selections.
//!
//! Each selection event starts a new generation. Decodes report back with the
//! token of the generation they were started under, so results that arrive
//! after the user has picked different files are dropped instead of mixing
//! into the new selection.

use crate::error::{ListingError, Result};
use base64::Engine;
use log::{debug, warn};

/// File content in a form that can be embedded directly in rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFile {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl EncodedFile {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Parses `data:<mime>;base64,<payload>`.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| ListingError::DataUrl("missing data: prefix".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ListingError::DataUrl("missing comma separator".to_string()))?;
        let params = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ListingError::DataUrl("only base64 payloads are supported".to_string()))?;
        // Parameters such as `;name=a.png` are not part of the type.
        let mime = params.split(';').next().unwrap_or_default().trim();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ListingError::DataUrl(format!("base64 decode error: {}", e)))?;
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };
        Ok(Self::new(mime, bytes))
    }

    pub fn is_data_url(source: &str) -> bool {
        source.starts_with("data:")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub name: String,
    pub data: EncodedFile,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedVideo {
    pub name: String,
    pub data: EncodedFile,
}

/// Identifies one selection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// What happened to a decode result handed back to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Accepted,
    Failed,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    pub name: String,
    pub state: SlotState<T>,
}

/// One file input's worth of selected files, in selection order.
#[derive(Debug, Clone)]
pub struct Selection<T> {
    generation: u64,
    slots: Vec<Slot<T>>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            slots: Vec::new(),
        }
    }
}

impl<T> Selection<T> {
    /// Discards everything previously selected and reserves a slot per name.
    pub fn begin(&mut self, names: Vec<String>) -> SelectionToken {
        self.generation += 1;
        self.slots = names
            .into_iter()
            .map(|name| Slot {
                name,
                state: SlotState::Pending,
            })
            .collect();
        debug!(
            "Selection generation {} started with {} file(s)",
            self.generation,
            self.slots.len()
        );
        SelectionToken(self.generation)
    }

    pub fn complete(
        &mut self,
        token: SelectionToken,
        index: usize,
        result: std::result::Result<T, ListingError>,
    ) -> Completion {
        if token.0 != self.generation {
            debug!(
                "Dropping decode result from generation {} (current {})",
                token.0, self.generation
            );
            return Completion::Stale;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            warn!("Dropping decode result for unknown slot {}", index);
            return Completion::Stale;
        };
        match result {
            Ok(value) => {
                slot.state = SlotState::Ready(value);
                Completion::Accepted
            }
            Err(e) => {
                warn!("Could not read {}: {}", slot.name, e);
                slot.state = SlotState::Failed(e.to_string());
                Completion::Failed
            }
        }
    }

    pub fn is_current(&self, token: SelectionToken) -> bool {
        token.0 == self.generation
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn slot_name(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.name.as_str())
    }

    /// Decoded entries in selection order.
    pub fn ready(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match &slot.state {
            SlotState::Ready(value) => Some(value),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().filter_map(|slot| match &slot.state {
            SlotState::Failed(reason) => Some((slot.name.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.state, SlotState::Pending))
            .count()
    }
}

/// Everything the user has currently selected, passed explicitly to submission.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub images: Selection<SelectedImage>,
    pub video: Selection<SelectedVideo>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> Vec<&SelectedImage> {
        self.images.ready().collect()
    }

    pub fn video(&self) -> Option<&SelectedVideo> {
        self.video.ready().next()
    }
}

//! Reacts to file selections: decodes each chosen file, updates the preview
//! panes, and records the results in the selection state.

use crate::error::{ListingError, Result};
use crate::preview::{PreviewKind, PreviewPane};
use crate::selection::{
    Completion, EncodedFile, SelectedImage, SelectedVideo, SelectionState, SelectionToken,
};
use image::ImageReader;
use log::{debug, info, warn};
use std::io::Cursor;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Upper bound on photos read at the same time.
const MAX_DECODE_WORKERS: usize = 4;

/// Where a selected file comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Path(PathBuf),
    DataUrl(String),
}

impl Source {
    pub fn parse(arg: &str) -> Self {
        if EncodedFile::is_data_url(arg) {
            Source::DataUrl(arg.to_string())
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    /// File name shown to the user; data URLs have none, so `fallback` is used.
    pub fn display_name(&self, fallback: &str) -> String {
        match self {
            Source::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Source::DataUrl(_) => fallback.to_string(),
        }
    }

    fn read(&self) -> Result<EncodedFile> {
        match self {
            Source::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| ListingError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(EncodedFile::new(mime_from_extension(path), bytes))
            }
            Source::DataUrl(url) => EncodedFile::from_data_url(url),
        }
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "ogv" | "ogg" => "video/ogg",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Reads a selected photo and its pixel size. Only the image header is
/// decoded; the pixels are left for the PDF writer.
pub fn decode_image(name: &str, source: &Source) -> Result<SelectedImage> {
    let file = source.read()?;
    let reader = ImageReader::new(Cursor::new(&file.bytes))
        .with_guessed_format()
        .map_err(|_| ListingError::UnsupportedImage(name.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| ListingError::UnsupportedImage(name.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|source| ListingError::ImageDecode {
            name: name.to_string(),
            source,
        })?;
    debug!("Read {} as {:?} ({}x{})", name, format, width, height);
    Ok(SelectedImage {
        name: name.to_string(),
        data: EncodedFile::new(format.to_mime_type(), file.bytes),
        width,
        height,
    })
}

fn decode_workers(sources: usize) -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_DECODE_WORKERS)
        .min(sources)
}

pub fn decode_video(name: &str, source: &Source) -> Result<SelectedVideo> {
    let data = source.read()?;
    debug!("Read video {} ({} bytes)", name, data.bytes.len());
    Ok(SelectedVideo {
        name: name.to_string(),
        data,
    })
}

/// Owns the selection state and the two preview panes it drives.
#[derive(Debug, Default)]
pub struct PreviewBinder {
    selection: SelectionState,
    photo_preview: PreviewPane,
    video_preview: PreviewPane,
}

impl PreviewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn photo_preview(&self) -> &PreviewPane {
        &self.photo_preview
    }

    pub fn video_preview(&self) -> &PreviewPane {
        &self.video_preview
    }

    /// Starts a new photo selection, discarding the previous one.
    pub fn begin_images(&mut self, names: Vec<String>) -> SelectionToken {
        self.photo_preview.clear();
        self.selection.images.begin(names)
    }

    pub fn image_decoded(
        &mut self,
        token: SelectionToken,
        index: usize,
        result: Result<SelectedImage>,
    ) -> Completion {
        let current = if self.selection.images.is_current(token) {
            self.selection.images.slot_name(index).map(str::to_string)
        } else {
            None
        };
        let Some(name) = current else {
            return self.selection.images.complete(token, index, result);
        };
        let kind = match &result {
            Ok(image) => PreviewKind::Image {
                width: image.width,
                height: image.height,
            },
            Err(e) => PreviewKind::Unreadable {
                reason: e.to_string(),
            },
        };
        let outcome = self.selection.images.complete(token, index, result);
        self.photo_preview.push(name, kind);
        outcome
    }

    /// Decodes the sources on a small pool of workers and applies results as
    /// they finish.
    pub fn select_images(&mut self, sources: &[Source]) {
        let names: Vec<String> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| source.display_name(&format!("photo-{}", index + 1)))
            .collect();
        let token = self.begin_images(names.clone());

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| {
            for _ in 0..decode_workers(sources.len()) {
                let tx = tx.clone();
                let (next, names) = (&next, &names);
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(source) = sources.get(index) else {
                        break;
                    };
                    if tx.send((index, decode_image(&names[index], source))).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            for (index, result) in rx {
                self.image_decoded(token, index, result);
            }
        });

        let failed = self.selection.images.failures().count();
        if failed > 0 {
            warn!("{} of {} photo(s) could not be read", failed, sources.len());
        }
        info!(
            "Selected {} photo(s)",
            self.selection.images.ready().count()
        );
    }

    pub fn begin_video(&mut self, name: Option<String>) -> SelectionToken {
        self.video_preview.clear();
        self.selection.video.begin(name.into_iter().collect())
    }

    pub fn video_decoded(
        &mut self,
        token: SelectionToken,
        result: Result<SelectedVideo>,
    ) -> Completion {
        let current = if self.selection.video.is_current(token) {
            self.selection.video.slot_name(0).map(str::to_string)
        } else {
            None
        };
        let Some(name) = current else {
            return self.selection.video.complete(token, 0, result);
        };
        let kind = match &result {
            Ok(video) => PreviewKind::Video {
                bytes: video.data.bytes.len(),
            },
            Err(e) => PreviewKind::Unreadable {
                reason: e.to_string(),
            },
        };
        let outcome = self.selection.video.complete(token, 0, result);
        self.video_preview.push(name, kind);
        outcome
    }

    /// Selects a single video, or clears the video selection with `None`.
    pub fn select_video(&mut self, source: Option<&Source>) {
        let name = source.map(|source| source.display_name("video"));
        let token = self.begin_video(name.clone());
        if let (Some(source), Some(name)) = (source, name) {
            let result = decode_video(&name, source);
            self.video_decoded(token, result);
        }
    }
}

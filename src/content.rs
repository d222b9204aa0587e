//! Builds the structured content of a listing document from the submitted
//! fields and the current selections.

use crate::fields::{display_label, FieldSnapshot};
use crate::selection::{SelectedImage, SelectionState};

pub const DOCUMENT_TITLE: &str = "Property Details";
pub const TABLE_HEADER: [&str; 2] = ["Property Field", "Value"];
pub const PHOTOS_HEADING: &str = "Property Photos";

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct PhotoSection<'a> {
    pub heading: &'static str,
    pub photos: Vec<&'a SelectedImage>,
}

#[derive(Debug, Clone)]
pub struct DocumentContent<'a> {
    pub title: &'static str,
    pub header: [&'static str; 2],
    pub rows: Vec<FieldRow>,
    pub photos: Option<PhotoSection<'a>>,
    pub video_note: Option<String>,
}

impl DocumentContent<'_> {
    pub fn photo_count(&self) -> usize {
        self.photos.as_ref().map_or(0, |section| section.photos.len())
    }
}

pub fn video_note(name: &str) -> String {
    format!(
        "Note: Video file \"{}\" is attached but not shown in PDF.",
        name
    )
}

pub fn assemble<'a>(fields: &FieldSnapshot, selection: &'a SelectionState) -> DocumentContent<'a> {
    let rows = fields
        .iter()
        .map(|(key, value)| FieldRow {
            label: display_label(key).to_string(),
            value: value.to_string(),
        })
        .collect();

    let images = selection.images();
    let photos = if images.is_empty() {
        None
    } else {
        Some(PhotoSection {
            heading: PHOTOS_HEADING,
            photos: images,
        })
    };

    DocumentContent {
        title: DOCUMENT_TITLE,
        header: TABLE_HEADER,
        rows,
        photos,
        video_note: selection.video().map(|video| video_note(&video.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{EncodedFile, SelectedVideo};

    fn selection_with(images: &[&str], video: Option<&str>) -> SelectionState {
        let mut state = SelectionState::new();
        let token = state
            .images
            .begin(images.iter().map(|n| n.to_string()).collect());
        for (index, name) in images.iter().enumerate() {
            state.images.complete(
                token,
                index,
                Ok(SelectedImage {
                    name: name.to_string(),
                    data: EncodedFile::new("image/png", vec![0]),
                    width: 1,
                    height: 1,
                }),
            );
        }
        if let Some(name) = video {
            let token = state.video.begin(vec![name.to_string()]);
            state.video.complete(
                token,
                0,
                Ok(SelectedVideo {
                    name: name.to_string(),
                    data: EncodedFile::new("video/mp4", vec![0]),
                }),
            );
        }
        state
    }

    #[test]
    fn rows_use_labels_with_raw_key_fallback() {
        let fields = FieldSnapshot::from_entries(vec![("price", "500000"), ("facing", "East")]);
        let selection = SelectionState::new();
        let content = assemble(&fields, &selection);
        assert_eq!(
            content.rows,
            vec![
                FieldRow {
                    label: "Price (₹)".into(),
                    value: "500000".into()
                },
                FieldRow {
                    label: "facing".into(),
                    value: "East".into()
                },
            ]
        );
    }

    #[test]
    fn no_images_means_no_photo_section() {
        let selection = selection_with(&[], None);
        let content = assemble(&FieldSnapshot::new(), &selection);
        assert!(content.photos.is_none());
        assert!(content.video_note.is_none());
        assert_eq!(content.title, "Property Details");
    }

    #[test]
    fn video_only_adds_a_note() {
        let selection = selection_with(&[], Some("walkthrough.mp4"));
        let content = assemble(&FieldSnapshot::new(), &selection);
        assert!(content.photos.is_none());
        assert_eq!(
            content.video_note.as_deref(),
            Some("Note: Video file \"walkthrough.mp4\" is attached but not shown in PDF.")
        );
    }

    #[test]
    fn photos_follow_selection_order() {
        let selection = selection_with(&["front.jpg", "back.jpg"], None);
        let content = assemble(&FieldSnapshot::new(), &selection);
        let section = content.photos.expect("photo section");
        assert_eq!(section.heading, "Property Photos");
        let names: Vec<&str> = section.photos.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["front.jpg", "back.jpg"]);
    }
}

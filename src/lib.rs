//! Property listing to PDF.
//!
//! Collects listing field values plus selected photos and an optional video,
//! previews what will be produced, and writes a paginated A4 document with the
//! fields as a table and the photos in a two-column grid.

pub mod binder;
pub mod config;
pub mod content;
pub mod download;
pub mod error;
pub mod fields;
pub mod layout;
pub mod pdf_writer;
pub mod preview;
pub mod selection;
pub mod status;
pub mod submission;
pub mod utils;

pub use error::{ListingError, Result};

// Page geometry, millimetres from the top-left corner.
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const TOP_MARGIN: f32 = 20.0;
pub const BOTTOM_MARGIN: f32 = 10.0;
pub const PRINTABLE_BOTTOM: f32 = PAGE_HEIGHT - BOTTOM_MARGIN;

pub const TITLE_Y: f32 = 20.0;
pub const TITLE_FONT_SIZE: f32 = 18.0;
pub const DIVIDER_Y: f32 = 25.0;
pub const DIVIDER_INSET: f32 = 20.0;
pub const DIVIDER_THICKNESS: f32 = 0.5;

pub const TABLE_START_Y: f32 = 30.0;
pub const TABLE_MARGIN: f32 = 14.0;
pub const LABEL_COLUMN_WIDTH: f32 = 70.0;
pub const CELL_PADDING: f32 = 2.0;
pub const LINE_HEIGHT: f32 = 5.0;
pub const FONT_SIZE: f32 = 10.0;

pub const SECTION_GAP: f32 = 10.0;
pub const HEADING_FONT_SIZE: f32 = 12.0;
pub const HEADING_ADVANCE: f32 = 10.0;

pub const IMAGE_WIDTH: f32 = 80.0;
pub const IMAGE_HEIGHT: f32 = 60.0;
pub const GRID_MARGIN: f32 = 20.0;
pub const GRID_GAP: f32 = 10.0;
pub const PHOTOS_PER_ROW: usize = 2;
/// Lowest top edge a photo row may have and still end above the printable bottom.
pub const MAX_ROW_TOP: f32 = PRINTABLE_BOTTOM - IMAGE_HEIGHT;

pub const OUTPUT_FILE_NAME: &str = "property-details.pdf";

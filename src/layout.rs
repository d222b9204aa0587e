//! # Pagination
//!
//! Turns [`DocumentContent`] into a list of pages, each a list of draw
//! operations in millimetres measured from the top-left corner of an A4 page.
//! Nothing here touches the PDF library; `pdf_writer` replays the plan.
//!
//! Page breaks happen in three places:
//! - a table row that would cross the printable bottom moves to a new page
//!   and the table header is repeated there; a row taller than a page is
//!   split between lines;
//! - the photo section moves to a new page when its heading and first row do
//!   not fit below the table;
//! - a photo row whose top would fall below [`MAX_ROW_TOP`] starts a new page.

use crate::content::DocumentContent;
use crate::utils::{estimate_text_width, wrap_text};
use crate::{
    CELL_PADDING, DIVIDER_INSET, DIVIDER_THICKNESS, DIVIDER_Y, FONT_SIZE, GRID_GAP, GRID_MARGIN,
    HEADING_ADVANCE, HEADING_FONT_SIZE, IMAGE_HEIGHT, IMAGE_WIDTH, LABEL_COLUMN_WIDTH, LINE_HEIGHT,
    MAX_ROW_TOP, PAGE_WIDTH, PHOTOS_PER_ROW, PRINTABLE_BOTTOM, SECTION_GAP, TABLE_MARGIN,
    TABLE_START_Y, TITLE_FONT_SIZE, TITLE_Y, TOP_MARGIN,
};
use log::debug;

/// Distance from the top of a text line to its baseline.
const BASELINE_OFFSET: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
pub const WHITE: Rgb8 = Rgb8(255, 255, 255);
pub const HEADER_FILL: Rgb8 = Rgb8(52, 152, 219);
pub const STRIPE_FILL: Rgb8 = Rgb8(245, 245, 245);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        color: Rgb8,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
    },
    /// `y` is the top edge.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb8,
    },
    /// `index` points into the photo section; `y` is the top edge.
    Image {
        index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub page: usize,
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub pages: Vec<PagePlan>,
}

impl DocumentPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image_placements(&self) -> Vec<ImagePlacement> {
        let mut placements = Vec::new();
        for (page, plan) in self.pages.iter().enumerate() {
            for op in &plan.ops {
                if let DrawOp::Image { index, x, y, .. } = op {
                    placements.push(ImagePlacement {
                        page,
                        index: *index,
                        x: *x,
                        y: *y,
                    });
                }
            }
        }
        placements
    }

    /// All text on `page`, in drawing order.
    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|plan| {
                plan.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.pages.len()).any(|page| self.texts(page).iter().any(|t| t.contains(needle)))
    }
}

struct PageCursor {
    pages: Vec<PagePlan>,
    y: f32,
}

impl PageCursor {
    fn new() -> Self {
        Self {
            pages: vec![PagePlan::default()],
            y: 0.0,
        }
    }

    fn new_page(&mut self) {
        debug!("Adding new page {}", self.pages.len() + 1);
        self.pages.push(PagePlan::default());
        self.y = TOP_MARGIN;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, weight: FontWeight, color: Rgb8) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            weight,
            color,
        });
    }
}

pub fn plan(content: &DocumentContent) -> DocumentPlan {
    let mut cursor = PageCursor::new();

    place_title(&mut cursor, content.title);
    let mut bottom = place_table(&mut cursor, content);

    if let Some(section) = &content.photos {
        bottom = place_photos(&mut cursor, section.heading, section.photos.len(), bottom);
    }

    if let Some(note) = &content.video_note {
        place_note(&mut cursor, note, bottom);
    }

    debug!("Layout finished with {} page(s)", cursor.pages.len());
    DocumentPlan {
        pages: cursor.pages,
    }
}

fn place_title(cursor: &mut PageCursor, title: &str) {
    let width = estimate_text_width(title, TITLE_FONT_SIZE);
    cursor.text(
        title,
        (PAGE_WIDTH - width) / 2.0,
        TITLE_Y,
        TITLE_FONT_SIZE,
        FontWeight::Bold,
        BLACK,
    );
    cursor.push(DrawOp::Line {
        from: (DIVIDER_INSET, DIVIDER_Y),
        to: (PAGE_WIDTH - DIVIDER_INSET, DIVIDER_Y),
        thickness: DIVIDER_THICKNESS,
    });
}

fn row_height(lines: usize) -> f32 {
    lines.max(1) as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

fn value_column_width() -> f32 {
    PAGE_WIDTH - 2.0 * TABLE_MARGIN - LABEL_COLUMN_WIDTH
}

fn cell_lines(label: &str, value: &str) -> (Vec<String>, Vec<String>) {
    (
        wrap_text(label, FONT_SIZE, LABEL_COLUMN_WIDTH - 2.0 * CELL_PADDING),
        wrap_text(value, FONT_SIZE, value_column_width() - 2.0 * CELL_PADDING),
    )
}

fn place_cells(
    cursor: &mut PageCursor,
    label: &[String],
    value: &[String],
    weight: FontWeight,
    color: Rgb8,
) {
    let columns = [
        (label, TABLE_MARGIN + CELL_PADDING),
        (value, TABLE_MARGIN + LABEL_COLUMN_WIDTH + CELL_PADDING),
    ];
    for (lines, x) in columns {
        let mut y = cursor.y + CELL_PADDING + BASELINE_OFFSET;
        for line in lines {
            if !line.is_empty() {
                cursor.text(line, x, y, FONT_SIZE, weight, color);
            }
            y += LINE_HEIGHT;
        }
    }
}

fn place_table_header(cursor: &mut PageCursor, header: &[&str; 2]) {
    let (label, value) = cell_lines(header[0], header[1]);
    let height = header_height(header);
    cursor.push(DrawOp::FillRect {
        x: TABLE_MARGIN,
        y: cursor.y,
        width: PAGE_WIDTH - 2.0 * TABLE_MARGIN,
        height,
        color: HEADER_FILL,
    });
    place_cells(cursor, &label, &value, FontWeight::Bold, WHITE);
    cursor.y += height;
}

fn header_height(header: &[&str; 2]) -> f32 {
    let (label, value) = cell_lines(header[0], header[1]);
    row_height(label.len().max(value.len()))
}

/// Whole text lines that fit in a row starting at `y`.
fn lines_that_fit(y: f32) -> usize {
    ((PRINTABLE_BOTTOM - y - 2.0 * CELL_PADDING) / LINE_HEIGHT).floor() as usize
}

fn line_range(lines: &[String], start: usize, end: usize) -> &[String] {
    &lines[start.min(lines.len())..end.min(lines.len())]
}

/// Returns the y position just below the last row.
///
/// A row that does not fit below the previous one moves to a new page. A row
/// taller than a whole page is split: the lines that fit are drawn, and the
/// rest continue under a repeated header on the next page.
fn place_table(cursor: &mut PageCursor, content: &DocumentContent) -> f32 {
    cursor.y = TABLE_START_Y;
    place_table_header(cursor, &content.header);
    let fresh_page_room = PRINTABLE_BOTTOM - TOP_MARGIN - header_height(&content.header);
    let mut rows_on_page = 0;

    for (index, row) in content.rows.iter().enumerate() {
        let (label, value) = cell_lines(&row.label, &row.value);
        let total = label.len().max(value.len()).max(1);
        let height = row_height(total);

        if cursor.y + height > PRINTABLE_BOTTOM && rows_on_page > 0 && height <= fresh_page_room {
            debug!("Table row {} continues on a new page", index);
            cursor.new_page();
            place_table_header(cursor, &content.header);
            rows_on_page = 0;
        }

        let mut start = 0;
        while start < total {
            let room = lines_that_fit(cursor.y);
            if room == 0 {
                cursor.new_page();
                place_table_header(cursor, &content.header);
                rows_on_page = 0;
                continue;
            }
            let end = (start + room).min(total);
            if start > 0 || end < total {
                debug!("Table row {} split at lines {}..{}", index, start, end);
            }

            let height = row_height(end - start);
            if index % 2 == 0 {
                cursor.push(DrawOp::FillRect {
                    x: TABLE_MARGIN,
                    y: cursor.y,
                    width: PAGE_WIDTH - 2.0 * TABLE_MARGIN,
                    height,
                    color: STRIPE_FILL,
                });
            }
            place_cells(
                cursor,
                line_range(&label, start, end),
                line_range(&value, start, end),
                FontWeight::Regular,
                BLACK,
            );
            cursor.y += height;
            rows_on_page += 1;
            start = end;

            if start < total {
                cursor.new_page();
                place_table_header(cursor, &content.header);
                rows_on_page = 0;
            }
        }
    }

    cursor.y
}

/// Two-column photo grid. Returns the y position below the last row.
fn place_photos(cursor: &mut PageCursor, heading: &str, count: usize, table_end: f32) -> f32 {
    cursor.y = table_end + SECTION_GAP;
    if cursor.y + HEADING_ADVANCE > MAX_ROW_TOP {
        debug!("Photos do not fit below the table at {}", cursor.y);
        cursor.new_page();
    }

    cursor.text(
        heading,
        GRID_MARGIN,
        cursor.y,
        HEADING_FONT_SIZE,
        FontWeight::Regular,
        BLACK,
    );
    cursor.y += HEADING_ADVANCE;

    for index in 0..count {
        let column = index % PHOTOS_PER_ROW;
        if index > 0 && column == 0 {
            cursor.y += IMAGE_HEIGHT + GRID_GAP;
            if cursor.y > MAX_ROW_TOP {
                cursor.new_page();
            }
        }

        let x = GRID_MARGIN + column as f32 * (IMAGE_WIDTH + GRID_GAP);
        debug!("Photo {} at ({}, {})", index, x, cursor.y);
        cursor.push(DrawOp::Image {
            index,
            x,
            y: cursor.y,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        });
    }

    cursor.y + IMAGE_HEIGHT
}

fn place_note(cursor: &mut PageCursor, note: &str, bottom: f32) {
    let lines = wrap_text(note, FONT_SIZE, PAGE_WIDTH - 2.0 * GRID_MARGIN);
    cursor.y = bottom + SECTION_GAP;
    if cursor.y + lines.len() as f32 * LINE_HEIGHT > PRINTABLE_BOTTOM {
        cursor.new_page();
    }
    for line in &lines {
        cursor.text(
            line,
            GRID_MARGIN,
            cursor.y + BASELINE_OFFSET,
            FONT_SIZE,
            FontWeight::Regular,
            BLACK,
        );
        cursor.y += LINE_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FieldRow, PhotoSection, DOCUMENT_TITLE, PHOTOS_HEADING, TABLE_HEADER};
    use crate::selection::{EncodedFile, SelectedImage};

    fn photos(count: usize) -> Vec<SelectedImage> {
        (0..count)
            .map(|i| SelectedImage {
                name: format!("photo-{}.jpg", i),
                data: EncodedFile::new("image/jpeg", vec![]),
                width: 4,
                height: 3,
            })
            .collect()
    }

    fn content<'a>(rows: usize, images: &'a [SelectedImage], video: Option<&str>) -> DocumentContent<'a> {
        DocumentContent {
            title: DOCUMENT_TITLE,
            header: TABLE_HEADER,
            rows: (0..rows)
                .map(|i| FieldRow {
                    label: format!("field{}", i),
                    value: format!("value{}", i),
                })
                .collect(),
            photos: if images.is_empty() {
                None
            } else {
                Some(PhotoSection {
                    heading: PHOTOS_HEADING,
                    photos: images.iter().collect(),
                })
            },
            video_note: video.map(crate::content::video_note),
        }
    }

    #[test]
    fn title_is_centered_with_divider() {
        let plan = plan(&content(0, &[], None));
        let ops = &plan.pages[0].ops;
        match &ops[0] {
            DrawOp::Text { text, x, y, size, .. } => {
                assert_eq!(text, "Property Details");
                let width = estimate_text_width(text, *size);
                assert!((x + width / 2.0 - PAGE_WIDTH / 2.0).abs() < 0.01);
                assert_eq!(*y, TITLE_Y);
            }
            other => panic!("expected title, got {:?}", other),
        }
        assert_eq!(
            ops[1],
            DrawOp::Line {
                from: (20.0, 25.0),
                to: (190.0, 25.0),
                thickness: 0.5
            }
        );
    }

    #[test]
    fn header_is_filled_and_rows_are_striped() {
        let plan = plan(&content(3, &[], None));
        let fills: Vec<Rgb8> = plan.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![HEADER_FILL, STRIPE_FILL, STRIPE_FILL]);
        let texts = plan.texts(0);
        assert!(texts.contains(&"Property Field"));
        assert!(texts.contains(&"field1"));
        assert!(texts.contains(&"value2"));
    }

    #[test]
    fn no_images_means_no_photo_section() {
        let plan = plan(&content(3, &[], None));
        assert_eq!(plan.page_count(), 1);
        assert!(plan.image_placements().is_empty());
        assert!(!plan.contains_text("Property Photos"));
    }

    #[test]
    fn three_images_fill_two_rows() {
        let images = photos(3);
        let plan = plan(&content(3, &images, None));
        let placed = plan.image_placements();
        assert_eq!(placed.len(), 3);

        // Header 9mm plus three 9mm rows from y=30, then a 10mm gap and the heading.
        let first_row = 30.0 + 4.0 * 9.0 + SECTION_GAP + HEADING_ADVANCE;
        assert_eq!((placed[0].x, placed[0].y), (20.0, first_row));
        assert_eq!((placed[1].x, placed[1].y), (110.0, first_row));
        assert_eq!((placed[2].x, placed[2].y), (20.0, first_row + 70.0));
        assert!(placed.iter().all(|p| p.page == 0));
    }

    #[test]
    fn rows_never_cross_the_printable_bottom() {
        let images = photos(11);
        let plan = plan(&content(3, &images, None));
        let placed = plan.image_placements();
        assert_eq!(placed.len(), 11);

        for p in &placed {
            assert!(p.y <= MAX_ROW_TOP, "photo {} at {}", p.index, p.y);
            assert!(p.y + IMAGE_HEIGHT <= PRINTABLE_BOTTOM);
            let expected_x = if p.index % 2 == 0 { 20.0 } else { 110.0 };
            assert_eq!(p.x, expected_x);
        }

        // Pairs share a row, and a row never spans pages.
        for pair in placed.chunks(2) {
            if let [left, right] = pair {
                assert_eq!((left.page, left.y), (right.page, right.y));
            }
        }

        // Rows at 86, 156 and 226 fit on the first page; 296 does not.
        let first_page = placed.iter().filter(|p| p.page == 0).count();
        assert_eq!(first_page, 6);
        assert_eq!(placed[6].page, 1);
        assert_eq!(placed[6].y, TOP_MARGIN);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn photos_move_to_new_page_after_a_long_table() {
        let images = photos(2);
        let plan = plan(&content(22, &images, None));
        // 30 + 9 * 23 = 237, past the point where heading and a row still fit.
        assert_eq!(plan.page_count(), 2);
        assert!(plan.texts(1).contains(&"Property Photos"));
        let placed = plan.image_placements();
        assert_eq!(placed[0].page, 1);
        assert_eq!(placed[0].y, TOP_MARGIN + HEADING_ADVANCE);
    }

    #[test]
    fn long_tables_repeat_the_header() {
        let plan = plan(&content(40, &[], None));
        assert_eq!(plan.page_count(), 2);
        assert!(plan.texts(0).contains(&"Property Field"));
        assert!(plan.texts(1).contains(&"Property Field"));
        assert!(plan.texts(1).contains(&"field39"));

        for page in &plan.pages {
            for op in &page.ops {
                if let DrawOp::FillRect { y, height, .. } = op {
                    assert!(y + height <= PRINTABLE_BOTTOM);
                }
            }
        }
    }

    fn single_row(label: &str, value: String) -> DocumentContent<'static> {
        DocumentContent {
            title: DOCUMENT_TITLE,
            header: TABLE_HEADER,
            rows: vec![FieldRow {
                label: label.to_string(),
                value,
            }],
            photos: None,
            video_note: None,
        }
    }

    #[test]
    fn tall_rows_split_across_pages() {
        let plan = plan(&single_row("Description", "word ".repeat(2000)));
        assert!(plan.page_count() > 1);

        for (number, page) in plan.pages.iter().enumerate() {
            assert!(plan.texts(number).contains(&"Property Field"));
            for op in &page.ops {
                match op {
                    DrawOp::Text { text, y, .. } => {
                        assert!(*y <= PRINTABLE_BOTTOM, "{:?} drawn at y={}", text, y)
                    }
                    DrawOp::FillRect { y, height, .. } => assert!(y + height <= PRINTABLE_BOTTOM),
                    _ => {}
                }
            }
        }

        // The label is drawn once, on the page where the row starts.
        let labels = (0..plan.page_count())
            .filter(|&page| plan.texts(page).contains(&"Description"))
            .count();
        assert_eq!(labels, 1);
        let words: usize = (0..plan.page_count())
            .flat_map(|page| plan.texts(page))
            .map(|text| text.matches("word").count())
            .sum();
        assert_eq!(words, 2000);
    }

    #[test]
    fn unbroken_values_stay_inside_the_table() {
        let plan = plan(&single_row("Khasra No.", "X".repeat(120)));
        let right_edge = PAGE_WIDTH - TABLE_MARGIN;
        for op in &plan.pages[0].ops {
            if let DrawOp::Text { text, x, size, .. } = op {
                assert!(
                    x + estimate_text_width(text, *size) <= right_edge,
                    "{:?} runs past {}",
                    text,
                    right_edge
                );
            }
        }
        assert!(plan.texts(0).iter().filter(|t| t.starts_with('X')).count() > 1);
    }

    #[test]
    fn video_note_without_images() {
        let plan = plan(&content(1, &[], Some("tour.mp4")));
        assert!(plan.image_placements().is_empty());
        assert!(plan.contains_text("Video file \"tour.mp4\""));
    }

    #[test]
    fn video_note_follows_photos() {
        let images = photos(1);
        let plan = plan(&content(1, &images, Some("tour.mp4")));
        let image_y = plan.image_placements()[0].y;
        let note_y = plan.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, y, .. } if text.starts_with("Note:") => Some(*y),
                _ => None,
            })
            .expect("note placed");
        assert!(note_y > image_y + IMAGE_HEIGHT);
    }
}

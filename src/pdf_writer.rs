use anyhow::{Context, Result};
use log::{debug, error, info};
use printpdf::image_crate::codecs::jpeg::JpegDecoder as PrintPdfJpegDecoder;
use printpdf::image_crate::codecs::png::PngDecoder as PrintPdfPngDecoder;
use printpdf::image_crate::{guess_format, ImageFormat};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::PathBuf;

use crate::content::DocumentContent;
use crate::layout::{DocumentPlan, DrawOp, FontWeight, Rgb8, BLACK};
use crate::selection::SelectedImage;
use crate::utils::builtin_font_text;
use crate::{PAGE_HEIGHT, PAGE_WIDTH};

const IMAGE_DPI: f32 = 300.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Turns a laid-out document into file bytes.
pub trait DocumentRenderer {
    fn render(&self, plan: &DocumentPlan, content: &DocumentContent) -> Result<Vec<u8>>;
}

/// Renders with `printpdf`, using the builtin Helvetica fonts unless a
/// TrueType font is configured.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    font_path: Option<PathBuf>,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    builtin: bool,
}

impl Fonts {
    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(font_path: Option<PathBuf>) -> Self {
        Self { font_path }
    }

    fn load_fonts(&self, doc: &PdfDocumentReference) -> Result<Fonts> {
        match &self.font_path {
            Some(path) => {
                debug!("Adding external font {}", path.display());
                let file = File::open(path)
                    .with_context(|| format!("Failed to open font file: {}", path.display()))?;
                let font = doc
                    .add_external_font(file)
                    .with_context(|| format!("Failed to load font: {}", path.display()))?;
                Ok(Fonts {
                    regular: font.clone(),
                    bold: font,
                    builtin: false,
                })
            }
            None => {
                debug!("Adding built-in font");
                Ok(Fonts {
                    regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
                    bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
                    builtin: true,
                })
            }
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, plan: &DocumentPlan, content: &DocumentContent) -> Result<Vec<u8>> {
        debug!("Starting PDF rendering of {} page(s)", plan.page_count());
        let (doc, page1, layer1) = PdfDocument::new(
            content.title,
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let fonts = self.load_fonts(&doc)?;
        let photos: &[&SelectedImage] = content
            .photos
            .as_ref()
            .map(|section| section.photos.as_slice())
            .unwrap_or(&[]);

        for (page_index, page) in plan.pages.iter().enumerate() {
            let layer = if page_index == 0 {
                doc.get_page(page1).get_layer(layer1)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            for op in &page.ops {
                draw_op(&layer, op, &fonts, photos);
            }
        }

        let mut buffer = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buffer));
            doc.save(&mut writer)
                .context("Failed to finalise PDF document")?;
            writer.flush().context("Failed to flush PDF document")?;
        }

        info!("PDF rendered successfully. Size: {} bytes", buffer.len());
        Ok(buffer)
    }
}

fn draw_op(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts, photos: &[&SelectedImage]) {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            weight,
            color,
        } => {
            let text = if fonts.builtin {
                builtin_font_text(text)
            } else {
                text.clone()
            };
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text, *size, Mm(*x), Mm(PAGE_HEIGHT - y), fonts.get(*weight));
        }
        DrawOp::Line {
            from,
            to,
            thickness,
        } => {
            layer.set_outline_color(pdf_color(BLACK));
            layer.set_outline_thickness(thickness * PT_PER_MM);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(from.0), Mm(PAGE_HEIGHT - from.1)), false),
                    (Point::new(Mm(to.0), Mm(PAGE_HEIGHT - to.1)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            let top = PAGE_HEIGHT - y;
            let bottom = top - height;
            layer.set_fill_color(pdf_color(*color));
            layer.add_polygon(Polygon {
                rings: vec![vec![
                    (Point::new(Mm(*x), Mm(bottom)), false),
                    (Point::new(Mm(x + width), Mm(bottom)), false),
                    (Point::new(Mm(x + width), Mm(top)), false),
                    (Point::new(Mm(*x), Mm(top)), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Image {
            index,
            x,
            y,
            width,
            height,
        } => match photos.get(*index) {
            Some(photo) => {
                if let Err(e) = embed_photo(layer, photo, *x, *y, *width, *height) {
                    error!("Error adding image {}: {:?}", photo.name, e);
                }
            }
            None => error!("No photo for image slot {}", index),
        },
    }
}

fn embed_photo(
    layer: &PdfLayerReference,
    photo: &SelectedImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Result<()> {
    debug!("Embedding {} at ({}, {})", photo.name, x, y);
    let printpdf_image = load_pdf_image(&photo.data.bytes)
        .with_context(|| format!("Failed to load image {}", photo.name))?;

    let natural_width = Mm::from(printpdf_image.image.width.into_pt(IMAGE_DPI));
    let natural_height = Mm::from(printpdf_image.image.height.into_pt(IMAGE_DPI));
    if natural_width.0 <= 0.0 || natural_height.0 <= 0.0 {
        anyhow::bail!("Image {} has no pixels", photo.name);
    }

    printpdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(PAGE_HEIGHT - y - height)),
            scale_x: Some(width / natural_width.0),
            scale_y: Some(height / natural_height.0),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

fn load_pdf_image(bytes: &[u8]) -> Result<Image> {
    let mut reader = Cursor::new(bytes);

    let printpdf_image = match guess_format(bytes)? {
        ImageFormat::Png => Image::try_from(PrintPdfPngDecoder::new(&mut reader)?)
            .context("Failed to convert PNG image for PDF")?,
        ImageFormat::Jpeg => Image::try_from(PrintPdfJpegDecoder::new(&mut reader)?)
            .context("Failed to convert JPEG image for PDF")?,
        other => {
            debug!("Converting {:?} image to raw pixels", other);
            let decoded = printpdf::image_crate::load_from_memory(bytes)
                .with_context(|| format!("Failed to decode {:?} image", other))?;
            Image::from_dynamic_image(&decoded)
        }
    };

    Ok(printpdf_image)
}

fn pdf_color(color: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

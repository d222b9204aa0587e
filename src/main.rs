use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use listing_pdf::binder::{PreviewBinder, Source};
use listing_pdf::config::Config;
use listing_pdf::download::DirectoryTarget;
use listing_pdf::fields::{parse_field_arg, FieldSnapshot};
use listing_pdf::pdf_writer::PdfRenderer;
use listing_pdf::status::StatusIndicator;
use listing_pdf::submission::{SubmissionHandler, SubmitOutcome};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a property listing PDF from form fields and photos")]
struct Args {
    /// JSON object of field values, e.g. {"landSize": "1200", "price": "500000"}
    #[arg(long)]
    form: Option<PathBuf>,

    /// Field value as key=value; applied after --form
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Photo file or data: URL, in the order they should appear
    #[arg(short, long = "photo", value_name = "PATH")]
    photos: Vec<String>,

    /// Video file or data: URL; noted in the document but not embedded
    #[arg(long)]
    video: Option<String>,

    /// Directory the PDF is written to
    #[arg(short, long, env = "LISTING_PDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// TrueType font used instead of the builtin Helvetica
    #[arg(long, env = "LISTING_PDF_FONT")]
    font: Option<PathBuf>,

    /// Print the selection and document preview before generating
    #[arg(long)]
    preview: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            output_dir: self.output_dir.clone(),
            font: self.font.clone(),
            print_preview: self.preview,
            ..Config::default()
        }
    }

    fn form_entries(&self) -> Result<Vec<(String, String)>> {
        let mut snapshot = match &self.form {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read form file: {}", path.display()))?;
                FieldSnapshot::from_json(&json)
                    .with_context(|| format!("Failed to parse form file: {}", path.display()))?
            }
            None => FieldSnapshot::new(),
        };
        for arg in &self.fields {
            let (key, value) = parse_field_arg(arg)?;
            snapshot.insert(key, value);
        }
        Ok(snapshot
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Generation failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let config = args.config();
    let form = args.form_entries()?;

    let mut binder = PreviewBinder::new();
    let photos: Vec<Source> = args.photos.iter().map(|arg| Source::parse(arg)).collect();
    binder.select_images(&photos);
    binder.select_video(args.video.as_deref().map(Source::parse).as_ref());

    if config.print_preview {
        if !binder.photo_preview().is_empty() {
            println!("{}", binder.photo_preview().render_text());
        }
        if !binder.video_preview().is_empty() {
            println!("{}", binder.video_preview().render_text());
        }
    }

    let renderer = PdfRenderer::with_font(config.font.clone());
    let target = DirectoryTarget::new(&config.output_dir);
    let mut handler =
        SubmissionHandler::new(renderer, target).with_file_name(config.file_name.clone());
    let mut status = StatusIndicator::new();

    info!("Starting generation into {}", config.output_dir.display());
    let submission = handler.submit(form, binder.selection(), &mut status)?;

    if config.print_preview {
        println!("{}\n", submission.preview);
    }

    if let SubmitOutcome::Downloaded(path) = &submission.outcome {
        info!(
            "Wrote {} page(s) to {}",
            submission.pages,
            path.display()
        );
    }
    if let Some(text) = status.text() {
        println!("{}", text);
    }

    Ok(matches!(submission.outcome, SubmitOutcome::Downloaded(_)))
}

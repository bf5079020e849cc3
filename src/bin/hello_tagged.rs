//! Write a small bilingual PDF/UA document.
//!
//! Three paragraphs (one English, two German, the last one hyphenated and
//! carrying `/ActualText`) with a translated title.
//!
//! Usage:
//!   cargo run --bin hello_tagged
//!   cargo run --bin hello_tagged -- --font /path/to/arial.ttf --pdfa 1a --output hello.pdf
//!   cargo run --bin hello_tagged -- --config options.json --compress

use std::path::PathBuf;
use std::process::ExitCode;
use tagged_pdf::compliance::PdfALevel;
use tagged_pdf::content::TextRun;
use tagged_pdf::date::PdfDate;
use tagged_pdf::document::{FontSource, PageSize, TaggedDocument};
use tagged_pdf::structure::StructType;
use tagged_pdf::writer::{PdfWriter, PdfWriterConfig};
use tagged_pdf::{Result, TaggingOptions};

struct DemoConfig {
    output: PathBuf,
    font: Option<PathBuf>,
    options_file: Option<PathBuf>,
    pdfa: Option<PdfALevel>,
    compress: bool,
}

impl DemoConfig {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            output: PathBuf::from("hello_tagged.pdf"),
            font: None,
            options_file: None,
            pdfa: None,
            compress: false,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--output" | "-o" => {
                    config.output = PathBuf::from(value.ok_or("--output needs a path")?);
                    i += 1;
                },
                "--font" => {
                    config.font = Some(PathBuf::from(value.ok_or("--font needs a path")?));
                    i += 1;
                },
                "--config" => {
                    config.options_file =
                        Some(PathBuf::from(value.ok_or("--config needs a path")?));
                    i += 1;
                },
                "--pdfa" => {
                    config.pdfa = match value.map(String::as_str) {
                        Some("1a") => Some(PdfALevel::A1a),
                        Some("1b") => Some(PdfALevel::A1b),
                        other => return Err(format!("unsupported --pdfa level {:?}", other)),
                    };
                    i += 1;
                },
                "--compress" => config.compress = true,
                other => return Err(format!("unknown argument {}", other)),
            }
            i += 1;
        }
        Ok(config)
    }
}

fn tagging_options(config: &DemoConfig) -> Result<TaggingOptions> {
    let mut options = match &config.options_file {
        Some(path) => TaggingOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => TaggingOptions::new()
            .with_language("en-US")
            .with_title_alternate("de-DE", "Das ist der Titel für deutsche Leser"),
    };
    if let Some(level) = config.pdfa {
        options = options.with_pdfa(level);
    }
    Ok(options)
}

fn run(config: &DemoConfig) -> Result<()> {
    let now = PdfDate::now();
    let writer = PdfWriter::with_config(
        PdfWriterConfig::default()
            .with_title("This is the title")
            .with_author("tagged_pdf")
            .with_subject("Tagged PDF example")
            .with_keywords("PDF/UA, accessibility")
            .with_creator("hello_tagged")
            .with_creation_date(now)
            .with_modification_date(now)
            .with_compress(config.compress),
    );

    let mut doc = TaggedDocument::new(writer, tagging_options(config)?)?;
    let font = match &config.font {
        Some(path) => doc.embed_font(&FontSource::true_type_file(path)?)?,
        None => doc.embed_font(&FontSource::standard("Helvetica"))?,
    };

    let root = doc.create_root()?;
    let body = doc.add_element(root, StructType::Document)?;

    let english = doc.add_element(body, StructType::P)?;
    doc.set_language(english, "en-US")?;

    let german = doc.add_element(body, StructType::P)?;
    doc.set_language(german, "de-DE")?;

    let hyphenated = doc.add_element(body, StructType::P)?;
    doc.set_language(hyphenated, "de-DE")?;
    doc.set_actual_text(
        hyphenated,
        "Das ist ein längerer Text mit dem schönen Wort Bundestagspräsident.",
    )?;

    doc.begin_page(PageSize::A4)?;
    doc.tagged_text(
        english,
        &TextRun::new(font.clone(), 12.0)
            .at(100.0, 800.0)
            .line("This is some english text."),
    )?;
    doc.tagged_text(
        german,
        &TextRun::new(font.clone(), 12.0)
            .at(100.0, 700.0)
            .line("Und hier ist ein Text für deutschsprachige Leser."),
    )?;
    doc.tagged_text(
        hyphenated,
        &TextRun::new(font, 12.0)
            .at(50.0, 200.0)
            .with_leading(14.0)
            .line("Das ist ein längerer Text mit dem schönen Wort Bundestags-")
            .line("präsident."),
    )?;
    doc.end_page()?;

    let result = doc.finish()?;
    for warning in &result.warnings {
        eprintln!("Warning: {}", warning);
    }
    std::fs::write(&config.output, &result.output)?;

    println!(
        "Wrote {} ({} bytes, {} structure elements, {} bytes of XMP)",
        config.output.display(),
        result.output.len(),
        result.structure.nodes.len() - 1,
        result.metadata.bytes().len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match DemoConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: hello_tagged [--output PATH] [--font TTF] [--config JSON] \
                 [--pdfa 1a|1b] [--compress]"
            );
            return ExitCode::FAILURE;
        },
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

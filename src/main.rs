//! Folio CLI - book manuscript translator.

use anyhow::{Context, Result};
use clap::Parser;
use folio::config::Config;
use folio::console::Console;
use folio::output::OutputPaths;
use folio::pipeline::{PassSettings, save_parsed, translate_to_files};
use folio::translator::{GeminiClient, Translator, check_api_key};
use folio::utils::{book_title, file_stem};
use folio::load_manuscript;
use std::path::PathBuf;

/// Translate a plain-text book manuscript with Gemini.
///
/// Any setting not given on the command line is asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the manuscript text file.
    input: Option<PathBuf>,

    /// Target language (e.g. "English", "Hindi", "Telugu").
    #[arg(long)]
    language: Option<String>,

    /// Choice of words (e.g. "simple", "formal", "conversational").
    #[arg(long)]
    tone: Option<String>,

    /// Use this config file instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let console = Console::new();

    console.section("Folio - Book Translator");

    console.step("Loading configuration...");
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    console.success("Configuration loaded");

    let input = match args.input {
        Some(path) => path,
        None => PathBuf::from(
            console.prompt_required("Path to the input text file (e.g. 'book.txt')")?,
        ),
    };
    if !input.is_file() {
        anyhow::bail!(
            "Input file '{}' not found. Please check the path and try again.",
            input.display()
        );
    }

    let absolute = std::path::absolute(&input)
        .with_context(|| format!("Failed to resolve '{}'", input.display()))?;
    let output_dir = absolute
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory '{}'", output_dir.display())
    })?;
    console.info(&format!(
        "Output files will be saved to: {}",
        console.muted(&output_dir.display().to_string())
    ));

    let stem = file_stem(&input);
    let paths = OutputPaths::new(&output_dir, &stem);

    // Probe the key before doing anything expensive; re-prompt until it works.
    let mut key = if config.api.is_configured() {
        config.api.key.clone()
    } else {
        console.prompt_hidden("Gemini API key")?
    };
    let client = loop {
        let client = GeminiClient::new(config.api.with_key(key.as_str()))
            .context("Failed to set up the translation client")?;
        if check_api_key(&client, &console).await {
            break client;
        }
        key = console.prompt_hidden("Gemini API key")?;
    };

    let language = match args.language.or_else(|| config.translation.language.clone()) {
        Some(language) => language,
        None => console.prompt_required(
            "Target language to translate into (e.g. 'English', 'Hindi', 'Telugu')",
        )?,
    };
    let tone = match args.tone.or_else(|| config.translation.tone.clone()) {
        Some(tone) => tone,
        None => console.prompt_required(
            "Preferred choice of words (e.g. 'simple', 'formal', 'conversational')",
        )?,
    };
    console.info(&format!(
        "Translation settings: Language = '{}', Tone = '{}'",
        language, tone
    ));

    console.step(&format!("Parsing '{}'...", input.display()));
    let manuscript = load_manuscript(&input)
        .await
        .context("Error parsing text file")?;
    console.success(&format!(
        "Found sections: {}",
        manuscript.section_names().join(", ")
    ));

    save_parsed(&manuscript, &paths.parsed_json, &console);

    let translator = Translator::new(client, &language, &tone).with_console(console);
    let settings = PassSettings {
        retry: config.translation.retry_policy(),
        throttle: config.translation.throttle(),
    };

    console.section("Starting translation");
    let title = book_title(&stem);
    let pass = translate_to_files(
        &manuscript,
        &translator,
        &paths,
        &title,
        settings,
        &console,
    );
    let report = match pass.await {
        Ok(report) => report,
        Err(e) => {
            console.error(&format!(
                "An unexpected error occurred during the translation process: {:#}",
                e
            ));
            console.info("Please check your input file, network connection, or API key.");
            return Err(e);
        }
    };

    if report.has_failures() {
        console.warning(&format!(
            "{} heading(s) and {} paragraph(s) could not be translated and were marked as failed.",
            report.failed_headings, report.failed_paragraphs
        ));
    }

    console.section("Done!");
    Ok(())
}

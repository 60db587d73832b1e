//! CLI tool for rendering slide records into PowerPoint files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use deck_core::{Chunk, DeckConfig, DeckRequest, ErrorReport, Language, SseDecoder};
use deck_pptx::{DeckPipeline, ExportRef, PptxReader};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Render AI generated slide records into .pptx decks.
#[derive(Parser, Debug)]
#[command(name = "deck-render")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render records into a deck and print its reference
    Render(RenderArgs),
    /// Print the text of every slide in a .pptx file
    Inspect {
        /// Input PowerPoint file (.pptx)
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("input").required(true))]
struct RenderArgs {
    /// JSON file holding an array of slide records
    #[arg(long, group = "input")]
    records: Option<PathBuf>,

    /// File holding raw model output, one record per line
    #[arg(long, group = "input")]
    text: Option<PathBuf>,

    /// Read model output incrementally from stdin
    #[arg(long, group = "input")]
    stdin: bool,

    /// Treat stdin as an OpenAI-compatible SSE stream
    #[arg(long, requires = "stdin")]
    sse: bool,

    /// Style name (e.g. 学术风, business)
    #[arg(short, long, default_value = "通用")]
    style: String,

    /// Output language (中文, English, 日本語)
    #[arg(short, long)]
    language: Option<String>,

    /// Directory exported decks are written to
    #[arg(long, env = "DECK_EXPORT_DIR", default_value = "exports")]
    out_dir: PathBuf,

    /// Directory holding <template>.json theme files
    #[arg(long, env = "DECK_THEME_DIR")]
    themes: Option<PathBuf>,

    /// Prefix of the printed reference
    #[arg(long, env = "DECK_PUBLIC_PREFIX", default_value = "/exports")]
    public_prefix: String,

    /// Print the full export record as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let json = matches!(&cli.command, Command::Render(args) if args.json);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_failure(&failure_report(&e), json));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Render(args) => render(&args),
        Command::Inspect { file } => inspect(&file),
    }
}

/// Category and detail of a failed command.
///
/// Errors that do not originate in the deck pipeline are reported as `internal`.
fn failure_report(err: &anyhow::Error) -> ErrorReport {
    let details = format!("{:#}", err);
    match err.downcast_ref::<deck_core::Error>() {
        Some(e) => ErrorReport {
            error: e.category(),
            details,
        },
        None => ErrorReport {
            error: "internal",
            details,
        },
    }
}

fn format_failure(report: &ErrorReport, json: bool) -> String {
    if json {
        if let Ok(text) = serde_json::to_string(report) {
            return text;
        }
    }
    format!("{}: {}", report.error, report.details)
}

fn render(args: &RenderArgs) -> Result<()> {
    let config = DeckConfig::new()
        .with_export_dir(&args.out_dir)
        .with_public_prefix(args.public_prefix.as_str())
        .with_theme_dir(args.themes.clone());
    let language = args
        .language
        .as_deref()
        .map(Language::parse)
        .unwrap_or(config.default_language);

    let pipeline = DeckPipeline::from_config(&config)
        .with_context(|| format!("Failed to prepare {}", config.export_dir.display()))?;

    let exported = if let Some(path) = &args.records {
        let slides: serde_json::Value = serde_json::from_str(&read_file(path)?)
            .map_err(deck_core::Error::from)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        let request = DeckRequest {
            language: Some(language_name(language)),
            style: Some(args.style.clone()),
            slides: Some(slides),
            ..Default::default()
        };
        pipeline.from_request(&request)?
    } else if let Some(path) = &args.text {
        pipeline.from_text(&read_file(path)?, &args.style, language)?
    } else {
        let lines = read_lines(io::stdin().lock());
        if args.sse {
            pipeline.from_chunk_results(sse_chunks(lines), &args.style, language)?
        } else {
            let chunks = lines.map(|line| line.map(Chunk::Data));
            pipeline.from_chunk_results(chunks, &args.style, language)?
        }
    };

    print_export(&exported, args.json)
}

fn inspect(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let slides = PptxReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;

    for slide in &slides {
        println!("--- Slide {} ---", slide.number);
        for block in &slide.blocks {
            println!("{}", block.text);
        }
    }
    log::debug!("Read {} slides", slides.len());

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(deck_core::Error::from)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Newline-terminated lines of `reader`.
///
/// Invalid UTF-8 is replaced rather than rejected, so a garbled line reaches
/// the extractor as noise. A read error is yielded once and ends the lines.
fn read_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = deck_core::Result<String>> {
    let mut failed = false;
    std::iter::from_fn(move || -> Option<deck_core::Result<String>> {
        if failed {
            return None;
        }
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut line = String::from_utf8_lossy(&buf).into_owned();
                if !line.ends_with('\n') {
                    line.push('\n');
                }
                Some(Ok(line))
            }
            Err(e) => {
                failed = true;
                Some(Err(e.into()))
            }
        }
    })
}

/// Decode SSE lines into chunks, passing read errors through.
fn sse_chunks<I>(lines: I) -> impl Iterator<Item = deck_core::Result<Chunk>>
where
    I: Iterator<Item = deck_core::Result<String>>,
{
    let mut decoder = SseDecoder::new();
    lines.flat_map(move |line| match line {
        Ok(line) => decoder.push(&line).into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    })
}

fn language_name(language: Language) -> String {
    match language {
        Language::Chinese => "中文",
        Language::English => "English",
        Language::Japanese => "日本語",
    }
    .to_string()
}

fn print_export(exported: &ExportRef, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(exported)?);
    } else {
        println!("{}", exported.url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    /// Serves `data`, then fails every read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream closed")),
                n => Ok(n),
            }
        }
    }

    fn render_in(dir: &Path, extra: &[&str]) -> Result<()> {
        let out_dir = dir.join("exports");
        let mut argv = vec![
            "deck-render",
            "render",
            "--out-dir",
            out_dir.to_str().unwrap(),
            "-l",
            "English",
        ];
        argv.extend_from_slice(extra);
        run(Cli::try_parse_from(argv).unwrap().command)
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped_as_noise() {
        let input = b"{\"type\":\"cover\",\"data\":{\"title\":\"A\"}}\n\xff\xfe\n{\"type\":\"end\"}".to_vec();
        let lines: Vec<String> = read_lines(Cursor::new(input))
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.ends_with('\n')));

        let records = deck_core::extract_records(&lines.concat());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], deck_core::SlideRecord::End);
    }

    #[test]
    fn test_read_error_is_yielded_once() {
        let reader = BufReader::new(FailingReader {
            data: Cursor::new(b"{\"type\":\"end\"}\n".to_vec()),
        });
        let lines: Vec<_> = read_lines(reader).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].is_ok());
        assert!(matches!(lines[1], Err(deck_core::Error::Io(_))));
    }

    #[test]
    fn test_sse_chunks_pass_read_errors_through() {
        let reader = BufReader::new(FailingReader {
            data: Cursor::new(b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n".to_vec()),
        });
        let chunks: Vec<_> = sse_chunks(read_lines(reader)).collect();
        assert!(matches!(chunks[0], Ok(Chunk::Data(ref s)) if s == "x"));
        assert!(matches!(chunks.last(), Some(Err(deck_core::Error::Io(_)))));
    }

    #[test]
    fn test_failure_report_carries_category() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("junk.txt");
        std::fs::write(&junk, "no records here\n").unwrap();

        let err = render_in(dir.path(), &["--text", junk.to_str().unwrap(), "--json"]).unwrap_err();
        let report = failure_report(&err);
        assert_eq!(report.error, "no_usable_slides");

        let printed: serde_json::Value =
            serde_json::from_str(&format_failure(&report, true)).unwrap();
        assert_eq!(printed["error"], "no_usable_slides");
        assert!(printed["details"].as_str().unwrap().contains("No usable slides"));
        assert!(format_failure(&report, false).starts_with("no_usable_slides: "));
    }

    #[test]
    fn test_missing_input_file_reports_io() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = render_in(dir.path(), &["--text", missing.to_str().unwrap()]).unwrap_err();

        let report = failure_report(&err);
        assert_eq!(report.error, "io");
        assert!(report.details.contains("missing.txt"));
    }

    #[test]
    fn test_unparsable_records_file_reports_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records.json");
        std::fs::write(&records, "[{oops").unwrap();
        let err = render_in(dir.path(), &["--records", records.to_str().unwrap()]).unwrap_err();
        assert_eq!(failure_report(&err).error, "serialization");
    }

    #[test]
    fn test_non_pipeline_errors_are_internal() {
        let report = failure_report(&anyhow::anyhow!("boom"));
        assert_eq!(report.error, "internal");
        assert_eq!(report.details, "boom");
    }
}

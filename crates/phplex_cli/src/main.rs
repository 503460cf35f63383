//! phplex: Tokenize a PHP template and print the token report.
//!
//! Usage:
//!   phplex [options] <FILE>
//!
//! Lexical errors are written to stderr while the file is scanned; the
//! report goes to stdout once scanning has finished.

use clap::{error::ErrorKind, Parser as ClapParser, ValueEnum};
use miette::{LabeledSpan, NamedSource, SourceSpan};
use phplex_core::{text_pos, LineMap, MAX_TEXT_LEN};
use phplex_diagnostics::{Diagnostic, DiagnosticCollection, DiagnosticSink, StderrSink};
use phplex_printer::{write_report, PrintError, ReportFormat, ReportOptions};
use phplex_scanner::{ScanResult, Scanner};
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

#[derive(ClapParser, Debug)]
#[command(name = "phplex", version, about = "phplex - A tokenizer for PHP embedded in HTML")]
struct Cli {
    /// File to tokenize.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Do not print the token table.
    #[arg(long)]
    no_table: bool,

    /// Do not print the hierarchical view.
    #[arg(long)]
    no_tree: bool,

    /// Render lexical errors with source snippets after scanning.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
enum CliError {
    #[error("Cannot open input file: {}", path.display())]
    #[diagnostic(code(phplex::open))]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Input file too large to scan: {} ({len} bytes, limit {limit})",
        path.display(),
        limit = MAX_TEXT_LEN
    )]
    #[diagnostic(code(phplex::too_large))]
    TooLarge { path: PathBuf, len: usize },

    #[error(transparent)]
    #[diagnostic(code(phplex::report))]
    Report(#[from] PrintError),
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let source = read_source(&cli.file)?;

    let sink = CliSink {
        collected: DiagnosticCollection::new(),
        echo: (!cli.pretty).then(StderrSink::stderr),
    };
    let (tokens, sink) = Scanner::new(&source, sink).finish();
    if let Some(echo) = &sink.echo {
        if echo.write_failures() > 0 {
            tracing::warn!(
                lost = echo.write_failures(),
                reported = echo.reported(),
                "some diagnostics could not be written to stderr"
            );
        }
    }
    let result = ScanResult {
        tokens,
        diagnostics: sink.collected,
    };

    if cli.pretty {
        render_pretty(&cli.file, &source, &result.diagnostics);
    }

    let options = ReportOptions {
        format: cli.format.into(),
        show_table: !cli.no_table,
        show_hierarchy: !cli.no_tree,
    };
    let mut out = BufWriter::new(io::stdout().lock());
    write_report(&result, &mut out, &options)?;
    out.flush().map_err(PrintError::from)?;
    Ok(())
}

/// Read the whole file, replacing invalid UTF-8 sequences.
fn read_source(path: &Path) -> Result<String, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_scannable(path, bytes.len())?;
    match simdutf8::compat::from_utf8(&bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(err) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            // The valid prefix is unchanged by lossy decoding.
            let at = LineMap::new(&text).line_and_column_of(text_pos(err.valid_up_to()));
            tracing::warn!(
                path = %path.display(),
                %at,
                "input is not valid UTF-8, replacing invalid sequences"
            );
            Ok(text)
        }
    }
}

/// Spans and positions are 32-bit; longer buffers are refused.
fn ensure_scannable(path: &Path, len: usize) -> Result<(), CliError> {
    if len > MAX_TEXT_LEN {
        return Err(CliError::TooLarge {
            path: path.to_path_buf(),
            len,
        });
    }
    Ok(())
}

/// Keeps every diagnostic for the report and, unless rendering is deferred,
/// echoes each one to stderr as soon as it is found.
struct CliSink {
    collected: DiagnosticCollection,
    echo: Option<StderrSink>,
}

impl DiagnosticSink for CliSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if let Some(echo) = &mut self.echo {
            echo.report(diagnostic.clone());
        }
        self.collected.report(diagnostic);
    }
}

fn render_pretty(path: &Path, source: &str, diagnostics: &DiagnosticCollection) {
    for diagnostic in diagnostics {
        let report = LexicalReport::new(path, source, diagnostic);
        eprintln!("{:?}", miette::Report::new(report));
    }
}

/// A lexical diagnostic together with the source it points into.
#[derive(Debug)]
struct LexicalReport {
    diagnostic: Diagnostic,
    src: NamedSource<String>,
    at: SourceSpan,
}

impl LexicalReport {
    fn new(path: &Path, source: &str, diagnostic: &Diagnostic) -> Self {
        let start = diagnostic.span.start as usize;
        let width = source
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        Self {
            diagnostic: diagnostic.clone(),
            src: NamedSource::new(path.display().to_string(), source.to_string()),
            at: SourceSpan::from((start, width)),
        }
    }
}

impl fmt::Display for LexicalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message_text)
    }
}

impl std::error::Error for LexicalReport {}

impl miette::Diagnostic for LexicalReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("PL{}", self.diagnostic.code)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(
            Some(format!("opened at {}, never closed", self.diagnostic.position())),
            self.at,
        );
        Some(Box::new(std::iter::once(label)))
    }
}

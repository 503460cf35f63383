//! Destinations for diagnostics reported during a scan.

use crate::{Diagnostic, DiagnosticCollection};
use std::io::{self, Write};

/// Receives lexical diagnostics as the scanner discovers them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Writes one line per diagnostic to a writer, as soon as it is reported.
///
/// Write failures are counted rather than propagated; a scan never fails
/// because its diagnostic stream went away.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    reported: usize,
    write_failures: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            reported: 0,
            write_failures: 0,
        }
    }

    /// Number of diagnostics reported so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Number of diagnostics that could not be written.
    pub fn write_failures(&self) -> usize {
        self.write_failures
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriterSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported += 1;
        if writeln!(self.writer, "{diagnostic}").is_err() {
            self.write_failures += 1;
        }
    }
}

/// The process diagnostic stream.
pub type StderrSink = WriterSink<io::Stderr>;

impl StderrSink {
    pub fn stderr() -> Self {
        WriterSink::new(io::stderr())
    }
}

use crate::boxes::{BoxClass, FourCC};
use crate::parser::WarningKind;
use crate::registry::MovieHeader;
use serde::Serialize;
use std::io::{self, Write};

/// One observation made by the walker, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    BoxFound {
        typ: FourCC,
        size: u64,
        header_size: u64,
        offset: u64,
        depth: usize,
        class: BoxClass,
    },
    MovieHeaderDecoded {
        /// Offset of the mvhd box itself.
        offset: u64,
        header: MovieHeader,
        /// `None` when the timescale is 0.
        duration_seconds: Option<f64>,
    },
    Warning {
        offset: u64,
        kind: WarningKind,
        reason: String,
    },
    EndOfScan {
        bytes_scanned: u64,
    },
}

/// Receiver for scan events. Presentation lives entirely behind this trait.
pub trait ReportSink {
    fn report(&mut self, event: ScanEvent) -> io::Result<()>;
}

impl ReportSink for Vec<ScanEvent> {
    fn report(&mut self, event: ScanEvent) -> io::Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report(&mut self, event: ScanEvent) -> io::Result<()> {
        (**self).report(event)
    }
}

/// Human-readable tree, one line per box indented two spaces per level.
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn report(&mut self, event: ScanEvent) -> io::Result<()> {
        match event {
            ScanEvent::BoxFound { typ, size, offset, depth, .. } => {
                let indent = "  ".repeat(depth);
                writeln!(self.out, "{indent}Atom: {typ} (size: {size}, offset: {offset})")
            }
            ScanEvent::MovieHeaderDecoded { header, duration_seconds, .. } => {
                writeln!(self.out, "Version: {}", header.version)?;
                writeln!(self.out, "Time Scale: {}", header.timescale)?;
                writeln!(self.out, "Duration (units): {}", header.duration)?;
                match duration_seconds {
                    Some(secs) => writeln!(self.out, "Duration (seconds): {secs:.2}"),
                    None => writeln!(self.out, "Duration (seconds): n/a (timescale is 0)"),
                }
            }
            ScanEvent::Warning { offset, reason, .. } => {
                writeln!(self.out, "Warning: {reason} (offset {offset})")
            }
            ScanEvent::EndOfScan { .. } => self.out.flush(),
        }
    }
}

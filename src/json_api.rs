use crate::{
    known_boxes::KnownBox,
    parser::WarningKind,
    registry::MovieHeader,
    report::{ReportSink, ScanEvent},
    walker::{ScanOptions, ScanSummary, Walker},
};
use anyhow::Context;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufReader, Read, Seek},
    path::Path,
};

/// A JSON-serializable representation of a single box.
///
/// This is what `mp4scan --json` prints, and is shaped for UIs that want the
/// nested tree rather than the flat event stream.
#[derive(Debug, Serialize)]
pub struct JsonBox {
    pub offset: u64,
    pub size: u64,
    pub header_size: u64,
    pub payload_offset: u64,
    pub payload_size: u64,

    pub typ: String,
    pub kind: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_header: Option<MovieHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonBox>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonWarning {
    pub offset: u64,
    pub kind: WarningKind,
    pub reason: String,
}

/// Everything one scan produced, ready for `serde_json`.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub boxes: Vec<JsonBox>,
    pub warnings: Vec<JsonWarning>,
    pub summary: ScanSummary,
}

/// Sink that rebuilds the box tree from the flat event stream.
///
/// Events arrive depth-first, so the open path from the root to the most
/// recent box is all the state needed.
#[derive(Default)]
pub struct TreeSink {
    roots: Vec<JsonBox>,
    path: Vec<JsonBox>,
    warnings: Vec<JsonWarning>,
}

impl TreeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(mut self) -> (Vec<JsonBox>, Vec<JsonWarning>) {
        self.close_to(0);
        (self.roots, self.warnings)
    }

    // Pop finished boxes until `depth` boxes remain open.
    fn close_to(&mut self, depth: usize) {
        while self.path.len() > depth {
            let Some(done) = self.path.pop() else { break };
            match self.path.last_mut() {
                Some(parent) => parent.children.push(done),
                None => self.roots.push(done),
            }
        }
    }
}

impl ReportSink for TreeSink {
    fn report(&mut self, event: ScanEvent) -> io::Result<()> {
        match event {
            ScanEvent::BoxFound { typ, size, header_size, offset, depth, class } => {
                self.close_to(depth);
                self.path.push(JsonBox {
                    offset,
                    size,
                    header_size,
                    payload_offset: offset + header_size,
                    payload_size: size - header_size,
                    typ: typ.to_string(),
                    kind: class.as_str().to_string(),
                    full_name: KnownBox::from(typ).full_name().to_string(),
                    movie_header: None,
                    duration_seconds: None,
                    children: Vec::new(),
                });
            }
            ScanEvent::MovieHeaderDecoded { offset, header, duration_seconds } => {
                if let Some(b) = self.path.iter_mut().rev().find(|b| b.offset == offset) {
                    b.movie_header = Some(header);
                    b.duration_seconds = duration_seconds;
                }
            }
            ScanEvent::Warning { offset, kind, reason } => {
                self.warnings.push(JsonWarning { offset, kind, reason });
            }
            ScanEvent::EndOfScan { .. } => self.close_to(0),
        }
        Ok(())
    }
}

/// Scan `r` with the default registry and return the assembled tree.
pub fn analyze<R: Read + Seek>(r: R, options: ScanOptions) -> anyhow::Result<Analysis> {
    let mut sink = TreeSink::new();
    let summary = Walker::new().with_options(options).scan(r, &mut sink)?;
    let (boxes, warnings) = sink.finish();
    Ok(Analysis { boxes, warnings, summary })
}

/// Synchronous analysis function: open a file and return its box tree.
pub fn analyze_file(path: impl AsRef<Path>, options: ScanOptions) -> anyhow::Result<Analysis> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    analyze(BufReader::new(f), options)
}

pub mod boxes;
pub mod json_api;
pub mod known_boxes;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod report;
pub mod walker;

pub use boxes::{BoxClass, BoxHeader, FourCC};
pub use json_api::{Analysis, JsonBox, TreeSink, analyze, analyze_file};
pub use parser::{ParseError, WarningKind, read_box_header};
pub use reader::ByteReader;
pub use registry::{DecodedFields, FieldDecoder, MovieHeader, Registry};
pub use report::{ReportSink, ScanEvent, TextReport};
pub use walker::{ScanOptions, ScanSummary, Walker};

use std::io::{Read, Seek};

/// Scan `r` with the default registry and options, reporting to `sink`.
pub fn scan<R: Read + Seek, S: ReportSink + ?Sized>(r: R, sink: &mut S) -> parser::Result<ScanSummary> {
    Walker::new().scan(r, sink)
}

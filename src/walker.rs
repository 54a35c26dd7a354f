use crate::boxes::{BoxClass, BoxHeader};
use crate::parser::{ParseError, Result, read_box_header};
use crate::reader::ByteReader;
use crate::registry::{DecodedFields, Registry, default_registry};
use crate::report::{ReportSink, ScanEvent};
use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Seek};

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Deepest level whose boxes are visited; top-level boxes are depth 0.
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl ScanOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Totals for one completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub boxes: usize,
    pub warnings: usize,
    pub max_depth_seen: usize,
    /// Sum of the sizes of all accepted top-level boxes.
    pub bytes_scanned: u64,
}

/// Recursive box tree walker.
///
/// Each level scans a byte budget box by box. A header that cannot be read,
/// or a box larger than what is left of the budget, ends that level with a
/// warning; the enclosing levels carry on. After every accepted box the
/// cursor is put back at `start + size`, whatever the decoder or the nested
/// scan did.
pub struct Walker {
    registry: Registry,
    options: ScanOptions,
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

impl Walker {
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            options: ScanOptions::default(),
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a whole seekable source from offset 0 to its end.
    ///
    /// Structural problems are reported to `sink` as warnings; only I/O
    /// failures and sink failures are returned as errors.
    pub fn scan<R: Read + Seek, S: ReportSink + ?Sized>(
        &self,
        source: R,
        sink: &mut S,
    ) -> Result<ScanSummary> {
        let mut r = ByteReader::open(source)?;
        let mut st = ScanState {
            sink,
            summary: ScanSummary::default(),
        };

        let end = r.end();
        let consumed = self.walk(&mut r, end, 0, &mut st)?;
        st.summary.bytes_scanned = consumed;
        st.emit(ScanEvent::EndOfScan { bytes_scanned: consumed })?;
        Ok(st.summary)
    }

    // Returns the bytes accounted for by accepted boxes at this level.
    fn walk<R: Read + Seek, S: ReportSink + ?Sized>(
        &self,
        r: &mut ByteReader<R>,
        range_end: u64,
        depth: usize,
        st: &mut ScanState<'_, S>,
    ) -> Result<u64> {
        let mut remaining = range_end.saturating_sub(r.position());
        let mut consumed = 0u64;

        while remaining > 0 {
            let start = r.position();
            let hdr = match read_box_header(r, start + remaining) {
                Ok(h) => h,
                Err(e) => {
                    st.warn(start, e)?;
                    break;
                }
            };

            if hdr.size > remaining {
                st.warn(
                    start,
                    ParseError::ContainmentViolation {
                        offset: start,
                        typ: hdr.typ,
                        size: hdr.size,
                        remaining,
                    },
                )?;
                break;
            }

            let class = self.registry.classify(hdr.typ);
            debug!("{}'{}' size={} at {:#x} ({})", "  ".repeat(depth), hdr.typ, hdr.size, start, class.as_str());
            st.summary.boxes += 1;
            st.summary.max_depth_seen = st.summary.max_depth_seen.max(depth);
            st.emit(ScanEvent::BoxFound {
                typ: hdr.typ,
                size: hdr.size,
                header_size: hdr.header_size,
                offset: start,
                depth,
                class,
            })?;

            match class {
                BoxClass::Container => {
                    if depth >= self.options.max_depth {
                        st.warn(
                            hdr.payload_start(),
                            ParseError::MaxDepthExceeded {
                                offset: hdr.payload_start(),
                                max: self.options.max_depth,
                            },
                        )?;
                    } else {
                        self.walk(r, hdr.end(), depth + 1, st)?;
                    }
                }
                BoxClass::FieldBox => self.decode_fields(r, &hdr, st)?,
                BoxClass::Opaque => {
                    debug!("skipping {} payload bytes of '{}'", hdr.payload_len(), hdr.typ);
                }
            }

            r.seek(hdr.end())?;
            remaining -= hdr.size;
            consumed += hdr.size;
        }

        Ok(consumed)
    }

    fn decode_fields<R: Read + Seek, S: ReportSink + ?Sized>(
        &self,
        r: &mut ByteReader<R>,
        hdr: &BoxHeader,
        st: &mut ScanState<'_, S>,
    ) -> Result<()> {
        let decoded = {
            let mut payload = r.payload(hdr.end());
            self.registry.decode(&mut payload, hdr)
        };

        match decoded {
            None => Ok(()),
            Some(Ok(DecodedFields::MovieHeader(header))) => {
                let secs = header.duration_seconds();
                st.emit(ScanEvent::MovieHeaderDecoded {
                    offset: hdr.start,
                    header,
                    duration_seconds: secs.as_ref().ok().copied(),
                })?;
                match secs {
                    Ok(_) => Ok(()),
                    Err(e) => st.warn(hdr.start, e),
                }
            }
            Some(Err(e)) => st.warn(hdr.start, e),
        }
    }
}

struct ScanState<'s, S: ReportSink + ?Sized> {
    sink: &'s mut S,
    summary: ScanSummary,
}

impl<S: ReportSink + ?Sized> ScanState<'_, S> {
    fn emit(&mut self, event: ScanEvent) -> Result<()> {
        self.sink.report(event)?;
        Ok(())
    }

    // Downgrade a structural error to a warning event; I/O errors stay fatal.
    fn warn(&mut self, fallback_offset: u64, err: ParseError) -> Result<()> {
        let Some(kind) = err.kind() else {
            return Err(err);
        };
        let offset = err.offset().unwrap_or(fallback_offset);
        warn!("{err}");
        self.summary.warnings += 1;
        self.emit(ScanEvent::Warning {
            offset,
            kind,
            reason: err.to_string(),
        })
    }
}

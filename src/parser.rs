use crate::boxes::{BoxHeader, FourCC, EXTENDED_HEADER_SIZE, EXTENDED_SIZE_MARKER, HEADER_SIZE};
use crate::reader::ByteReader;
use serde::Serialize;
use std::io::Read;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated { offset: u64, needed: u64, available: u64 },
    #[error("invalid box size {size} at offset {offset}")]
    InvalidSize { offset: u64, size: u64 },
    #[error("box '{typ}' at offset {offset} claims {size} bytes, parent has {remaining} left")]
    ContainmentViolation { offset: u64, typ: FourCC, size: u64, remaining: u64 },
    #[error("unsupported '{typ}' version {version}")]
    UnsupportedVersion { typ: FourCC, version: u8 },
    #[error("nesting deeper than {max} levels at offset {offset}")]
    MaxDepthExceeded { offset: u64, max: usize },
    #[error("timescale is 0, duration in seconds is undefined")]
    ZeroTimescale,
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Serializable tag for the structural errors reported as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Truncated,
    InvalidSize,
    ContainmentViolation,
    UnsupportedVersion,
    MaxDepthExceeded,
    ZeroTimescale,
}

impl ParseError {
    /// File offset the error concerns, when it has one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            ParseError::Truncated { offset, .. }
            | ParseError::InvalidSize { offset, .. }
            | ParseError::ContainmentViolation { offset, .. }
            | ParseError::MaxDepthExceeded { offset, .. } => Some(*offset),
            ParseError::Io(_) | ParseError::UnsupportedVersion { .. } | ParseError::ZeroTimescale => None,
        }
    }

    /// `None` for I/O failures, which are never downgraded to warnings.
    pub fn kind(&self) -> Option<WarningKind> {
        match self {
            ParseError::Io(_) => None,
            ParseError::Truncated { .. } => Some(WarningKind::Truncated),
            ParseError::InvalidSize { .. } => Some(WarningKind::InvalidSize),
            ParseError::ContainmentViolation { .. } => Some(WarningKind::ContainmentViolation),
            ParseError::UnsupportedVersion { .. } => Some(WarningKind::UnsupportedVersion),
            ParseError::MaxDepthExceeded { .. } => Some(WarningKind::MaxDepthExceeded),
            ParseError::ZeroTimescale => Some(WarningKind::ZeroTimescale),
        }
    }
}

/// Decode the box header at the reader's position.
///
/// `limit` is the end of the enclosing range; the header itself must fit
/// before it. A 32-bit size of 1 selects the 64-bit extended size. Sizes
/// smaller than the header, including the reserved 0 ("to end of file"),
/// are rejected.
pub fn read_box_header<R: Read>(r: &mut ByteReader<R>, limit: u64) -> Result<BoxHeader> {
    let start = r.position();
    r.require_within(HEADER_SIZE, limit)?;
    let size32 = r.read_u32()?;
    let typ = r.read_tag()?;

    let (size, header_size) = if size32 == EXTENDED_SIZE_MARKER {
        r.require_within(EXTENDED_HEADER_SIZE - HEADER_SIZE, limit)?;
        (r.read_u64()?, EXTENDED_HEADER_SIZE)
    } else {
        (u64::from(size32), HEADER_SIZE)
    };

    if size < header_size {
        return Err(ParseError::InvalidSize { offset: start, size });
    }

    Ok(BoxHeader { size, typ, header_size, start })
}

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

/// Size 32-bit field value that announces a following 64-bit size.
pub const EXTENDED_SIZE_MARKER: u32 = 1;
pub const HEADER_SIZE: u64 = 8;
pub const EXTENDED_HEADER_SIZE: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub size: u64,          // total size including header
    pub typ: FourCC,
    pub header_size: u64,   // 8, or 16 with the extended size
    pub start: u64,         // file offset of header start
}

impl BoxHeader {
    /// Absolute offset of the first payload byte.
    pub fn payload_start(&self) -> u64 {
        self.start + self.header_size
    }

    /// Absolute offset one past the last byte of the box.
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    pub fn payload_len(&self) -> u64 {
        self.size - self.header_size
    }
}

/// How the walker treats a box payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxClass {
    /// Payload is a sequence of child boxes.
    Container,
    /// Payload is handed to a field decoder.
    #[serde(rename = "field")]
    FieldBox,
    /// Payload is skipped.
    Opaque,
}

impl BoxClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxClass::Container => "container",
            BoxClass::FieldBox => "field",
            BoxClass::Opaque => "opaque",
        }
    }
}

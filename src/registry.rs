use crate::boxes::{BoxClass, BoxHeader, FourCC};
use crate::known_boxes::KnownBox;
use crate::parser::{ParseError, Result};
use crate::reader::PayloadReader;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Fields produced by a field decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "box", rename_all = "snake_case")]
pub enum DecodedFields {
    /// Movie Header Box (mvhd)
    MovieHeader(MovieHeader),
}

/// Movie Header Box data
///
/// Version 0 stores the three time fields in 32 bits; they are widened here
/// so both versions share one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    /// Preferred playback rate, 16.16 fixed point.
    pub rate: Option<u32>,
    /// Preferred volume, 8.8 fixed point.
    pub volume: Option<u16>,
    pub next_track_id: Option<u32>,
}

impl MovieHeader {
    /// `duration / timescale`, or `ZeroTimescale` when the division is undefined.
    pub fn duration_seconds(&self) -> Result<f64> {
        if self.timescale == 0 {
            return Err(ParseError::ZeroTimescale);
        }
        Ok(self.duration as f64 / f64::from(self.timescale))
    }

    pub fn rate_f64(&self) -> Option<f64> {
        self.rate.map(|r| f64::from(r) / 65536.0)
    }

    pub fn volume_f64(&self) -> Option<f64> {
        self.volume.map(|v| f64::from(v) / 256.0)
    }
}

/// Trait for box payload decoders.
///
/// A decoder gets a reader bounded to the payload of one box and may stop
/// before the end of it; the walker moves past the whole box afterwards.
pub trait FieldDecoder: Send + Sync {
    fn decode(&self, r: &mut PayloadReader<'_>, hdr: &BoxHeader) -> Result<DecodedFields>;
}

/// Registry of field decoders keyed by box type.
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<FourCC, DecoderEntry>,
}

struct DecoderEntry {
    inner: Box<dyn FieldDecoder>,
    name: String,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is human-readable and used only for logging.
    pub fn with_decoder(mut self, key: FourCC, name: &str, dec: Box<dyn FieldDecoder>) -> Self {
        self.map.insert(
            key,
            DecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn contains(&self, key: FourCC) -> bool {
        self.map.contains_key(&key)
    }

    /// Classify a box type against this registry.
    ///
    /// Registered types are field boxes, known structural types are
    /// containers, everything else is opaque.
    pub fn classify(&self, typ: FourCC) -> BoxClass {
        if self.contains(typ) {
            BoxClass::FieldBox
        } else if KnownBox::from(typ).is_container() {
            BoxClass::Container
        } else {
            BoxClass::Opaque
        }
    }

    /// Decode a payload with the registered decoder.
    ///
    /// Returns `None` if no decoder exists for the box type.
    pub fn decode(&self, r: &mut PayloadReader<'_>, hdr: &BoxHeader) -> Option<Result<DecodedFields>> {
        self.map.get(&hdr.typ).map(|d| {
            debug!("decoding '{}' at {:#x} with {}", hdr.typ, hdr.start, d.name);
            d.inner.decode(r, hdr)
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------- Decoders ----------

// rate(4) + volume(2)
const MVHD_PLAYBACK_LEN: u64 = 6;
// reserved(10) + matrix(36) + pre_defined(24)
const MVHD_SKIP_TO_NEXT_TRACK: u64 = 70;

// mvhd: version, times, timescale, duration, then optional playback fields
pub struct MvhdDecoder;

impl FieldDecoder for MvhdDecoder {
    fn decode(&self, r: &mut PayloadReader<'_>, hdr: &BoxHeader) -> Result<DecodedFields> {
        let version = r.read_u8()?;
        let flags = r.read_u24()?;

        let (creation_time, modification_time, timescale, duration) = match version {
            1 => {
                let creation = r.read_u64()?;
                let modification = r.read_u64()?;
                let ts = r.read_u32()?;
                let dur = r.read_u64()?;
                (creation, modification, ts, dur)
            }
            0 => {
                let creation = u64::from(r.read_u32()?);
                let modification = u64::from(r.read_u32()?);
                let ts = r.read_u32()?;
                let dur = u64::from(r.read_u32()?);
                (creation, modification, ts, dur)
            }
            _ => return Err(ParseError::UnsupportedVersion { typ: hdr.typ, version }),
        };

        let (rate, volume) = if r.remaining() >= MVHD_PLAYBACK_LEN {
            (Some(r.read_u32()?), Some(r.read_u16()?))
        } else {
            (None, None)
        };

        let next_track_id = if rate.is_some() && r.remaining() >= MVHD_SKIP_TO_NEXT_TRACK + 4 {
            r.skip(MVHD_SKIP_TO_NEXT_TRACK)?;
            Some(r.read_u32()?)
        } else {
            None
        };

        Ok(DecodedFields::MovieHeader(MovieHeader {
            version,
            flags,
            creation_time,
            modification_time,
            timescale,
            duration,
            rate,
            volume,
            next_track_id,
        }))
    }
}

/// Registry with every decoder this crate ships.
pub fn default_registry() -> Registry {
    Registry::new().with_decoder(FourCC(*b"mvhd"), "mvhd", Box::new(MvhdDecoder))
}

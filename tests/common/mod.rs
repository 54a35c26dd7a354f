#![allow(dead_code)]

use mp4scan::{ScanEvent, ScanOptions, ScanSummary, Walker};
use std::io::Cursor;

/// Box with a plain 32-bit size.
pub fn bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// Box using the 64-bit extended size.
pub fn large_bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&(16 + payload.len() as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

/// Raw header with an arbitrary 32-bit size field and no payload.
pub fn raw_header(size: u32, typ: &[u8; 4]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&size.to_be_bytes());
    v.extend_from_slice(typ);
    v
}

/// mvhd version 0 payload (timing fields only) followed by `pad` zero bytes.
pub fn mvhd_v0_payload(timescale: u32, duration: u32, pad: usize) -> Vec<u8> {
    let mut v = vec![0u8, 0, 0, 0]; // version + flags
    v.extend_from_slice(&1u32.to_be_bytes()); // creation_time
    v.extend_from_slice(&2u32.to_be_bytes()); // modification_time
    v.extend_from_slice(&timescale.to_be_bytes());
    v.extend_from_slice(&duration.to_be_bytes());
    v.extend(std::iter::repeat_n(0u8, pad));
    v
}

/// mvhd version 1 payload (timing fields only) followed by `pad` zero bytes.
pub fn mvhd_v1_payload(timescale: u32, duration: u64, pad: usize) -> Vec<u8> {
    let mut v = vec![1u8, 0, 0, 0];
    v.extend_from_slice(&3u64.to_be_bytes());
    v.extend_from_slice(&4u64.to_be_bytes());
    v.extend_from_slice(&timescale.to_be_bytes());
    v.extend_from_slice(&duration.to_be_bytes());
    v.extend(std::iter::repeat_n(0u8, pad));
    v
}

/// Trailing mvhd fields: rate 1.0, volume 1.0, reserved, matrix, pre_defined, next_track_id.
pub fn mvhd_tail(next_track_id: u32) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    v.extend_from_slice(&0x0100u16.to_be_bytes());
    v.extend_from_slice(&[0u8; 10]);
    v.extend_from_slice(&[0u8; 36]);
    v.extend_from_slice(&[0u8; 24]);
    v.extend_from_slice(&next_track_id.to_be_bytes());
    v
}

/// moov (48 bytes) holding one 40-byte mvhd, version 0, timescale 600, duration 1200.
pub fn moov_with_mvhd() -> Vec<u8> {
    bx(b"moov", &bx(b"mvhd", &mvhd_v0_payload(600, 1200, 12)))
}

pub fn scan_with(data: Vec<u8>, options: ScanOptions) -> (Vec<ScanEvent>, ScanSummary) {
    let mut events = Vec::new();
    let summary = Walker::new()
        .with_options(options)
        .scan(Cursor::new(data), &mut events)
        .expect("scan failed");
    (events, summary)
}

pub fn scan_events(data: Vec<u8>) -> (Vec<ScanEvent>, ScanSummary) {
    scan_with(data, ScanOptions::default())
}

/// (type, size, offset, depth) of every BoxFound event.
pub fn found(events: &[ScanEvent]) -> Vec<(String, u64, u64, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::BoxFound { typ, size, offset, depth, .. } => {
                Some((typ.to_string(), *size, *offset, *depth))
            }
            _ => None,
        })
        .collect()
}

pub fn warnings(events: &[ScanEvent]) -> Vec<(mp4scan::WarningKind, u64)> {
    events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Warning { kind, offset, .. } => Some((*kind, *offset)),
            _ => None,
        })
        .collect()
}

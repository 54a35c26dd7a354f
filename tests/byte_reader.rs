use mp4scan::boxes::FourCC;
use mp4scan::{ByteReader, ParseError};
use std::io::{Cursor, Read};

#[test]
fn reads_big_endian_values_and_advances() {
    let data = vec![
        0x12, 0x34, 0x56, 0x78, // u32
        0, 0, 0, 0, 0, 0, 0x01, 0x00, // u64 = 256
        b'm', b'o', b'o', b'v',
    ];
    let mut r = ByteReader::open(Cursor::new(data)).unwrap();

    assert_eq!(r.end(), 16);
    assert_eq!(r.read_u32().unwrap(), 0x1234_5678);
    assert_eq!(r.position(), 4);
    assert_eq!(r.read_u64().unwrap(), 256);
    assert_eq!(r.read_tag().unwrap(), FourCC(*b"moov"));
    assert_eq!(r.remaining(), 0);
}

#[test]
fn short_read_is_truncated_not_zero() {
    let mut r = ByteReader::open(Cursor::new(vec![0xff, 0xff, 0xff])).unwrap();

    match r.read_u32() {
        Err(ParseError::Truncated { offset, needed, available }) => {
            assert_eq!(offset, 0);
            assert_eq!(needed, 4);
            assert_eq!(available, 3);
        }
        other => panic!("expected Truncated, got {other:?}"),
    }
    // nothing was consumed
    assert_eq!(r.position(), 0);
    assert_eq!(r.read_u16().unwrap(), 0xffff);
}

#[test]
fn source_shorter_than_declared_range_is_truncated() {
    let bytes = [0u8, 1];
    let mut src: &[u8] = &bytes;
    let mut r = ByteReader::new(&mut src as &mut dyn Read, 100, 200);

    assert!(matches!(
        r.read_u32(),
        Err(ParseError::Truncated { offset: 100, needed: 4, .. })
    ));
}

#[test]
fn seek_stays_inside_range() {
    let mut r = ByteReader::open(Cursor::new(vec![0u8; 10])).unwrap();

    r.seek(10).unwrap();
    assert_eq!(r.position(), 10);
    assert!(matches!(r.seek(11), Err(ParseError::Truncated { .. })));
    assert_eq!(r.position(), 10);
}

#[test]
fn payload_view_is_bounded() {
    let data = vec![0, 0, 0, 7, 0, 0, 0, 9];
    let mut r = ByteReader::open(Cursor::new(data)).unwrap();

    {
        let mut view = r.payload(4);
        assert_eq!(view.remaining(), 4);
        assert_eq!(view.read_u32().unwrap(), 7);
        assert!(matches!(view.read_u8(), Err(ParseError::Truncated { offset: 4, .. })));
    }

    // outer position is resynchronised by seeking
    r.seek(4).unwrap();
    assert_eq!(r.read_u32().unwrap(), 9);
}

#[test]
fn skip_and_u24() {
    let data = vec![0xaa, 0xbb, 0x01, 0x02, 0x03];
    let mut r = ByteReader::open(Cursor::new(data)).unwrap();

    r.skip(2).unwrap();
    assert_eq!(r.read_u24().unwrap(), 0x010203);
    assert!(matches!(r.skip(1), Err(ParseError::Truncated { .. })));
}

use crate::boxes::FourCC;
use crate::parser::{ParseError, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

/// Reader used by field decoders: bounded to one box payload, no seeking.
pub type PayloadReader<'a> = ByteReader<&'a mut dyn Read>;

/// Big-endian cursor over a finite byte range.
///
/// `pos` is an absolute file offset and `end` the first offset that may not
/// be read. Every read checks the remaining length first, so a short range
/// fails with [`ParseError::Truncated`] instead of yielding made-up values.
pub struct ByteReader<R> {
    inner: R,
    pos: u64,
    end: u64,
}

impl<R: Read> ByteReader<R> {
    /// Wrap `inner`, which must already be positioned at `pos`.
    pub fn new(inner: R, pos: u64, end: u64) -> Self {
        Self { inner, pos, end }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn remaining(&self) -> u64 {
        self.end.saturating_sub(self.pos)
    }

    /// Fail with `Truncated` unless `needed` bytes are left before `limit`
    /// (clamped to the reader's own end).
    pub fn require_within(&self, needed: u64, limit: u64) -> Result<()> {
        let available = limit.min(self.end).saturating_sub(self.pos);
        if available < needed {
            return Err(ParseError::Truncated { offset: self.pos, needed, available });
        }
        Ok(())
    }

    pub fn require(&self, needed: u64) -> Result<()> {
        self.require_within(needed, self.end)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_with(1, |r| r.read_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_with(2, |r| r.read_u16::<BigEndian>())
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        self.read_with(3, |r| r.read_u24::<BigEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_with(4, |r| r.read_u32::<BigEndian>())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_with(8, |r| r.read_u64::<BigEndian>())
    }

    pub fn read_tag(&mut self) -> Result<FourCC> {
        self.read_with(4, |r| {
            let mut t = [0u8; 4];
            r.read_exact(&mut t)?;
            Ok(FourCC(t))
        })
    }

    /// Consume `n` bytes without interpreting them.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.read_with(n, |r| {
            let copied = io::copy(&mut Read::take(&mut *r, n), &mut io::sink())?;
            if copied < n {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            Ok(())
        })
    }

    fn read_with<T>(&mut self, n: u64, f: impl FnOnce(&mut R) -> io::Result<T>) -> Result<T> {
        self.require(n)?;
        match f(&mut self.inner) {
            Ok(v) => {
                self.pos += n;
                Ok(v)
            }
            // the source is shorter than the length we were given
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ParseError::Truncated {
                offset: self.pos,
                needed: n,
                available: 0,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wrap a seekable source, taking its total length as the readable range.
    pub fn open(mut inner: R) -> Result<Self> {
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, end })
    }

    /// Jump to an absolute offset inside the range.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.end {
            return Err(ParseError::Truncated {
                offset: self.pos,
                needed: offset.saturating_sub(self.pos),
                available: self.remaining(),
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Borrow a non-seekable view limited to `[position, end)`.
    ///
    /// The view shares the underlying stream, so after it is dropped the
    /// outer position is stale until the next [`ByteReader::seek`].
    pub fn payload(&mut self, end: u64) -> PayloadReader<'_> {
        let end = end.min(self.end);
        ByteReader::new(&mut self.inner as &mut dyn Read, self.pos, end)
    }
}

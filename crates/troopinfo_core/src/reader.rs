use std::io::{self, Read, Seek};

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    /// Reads the raw bit pattern, so NaN payloads survive a round trip.
    pub fn read_f32(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(f32::from_bits(u32::from_le_bytes(buf)))
    }

    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_little_endian_words() {
        let bytes = [0x64, 0, 0, 0, 0x00, 0x00, 0x80, 0x3F, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut r = LittleEndianReader::new(Cursor::new(&bytes[..]));
        assert_eq!(r.read_i32().unwrap(), 100);
        assert_eq!(r.read_f32().unwrap(), 1.0);
        assert_eq!(r.read_i32().unwrap(), -1);
        assert_eq!(r.position().unwrap(), 12);
    }

    #[test]
    fn short_read_is_unexpected_eof() {
        let mut r = LittleEndianReader::new(Cursor::new(&[1u8, 2][..]));
        let err = r.read_i32().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

//! Outgoing payload buffering.
//!
//! Modules never touch the transport. They write their payload into a
//! `PayloadWriter` lent out by the session, which then publishes whatever was
//! written.

use core::fmt;

/// A bounded writer over the session's payload buffer.
///
/// Writes past the end of the buffer are cut off and remembered, so the
/// session can tell a truncated payload from a complete one.
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> PayloadWriter<'a> {
    /// Wrap an empty buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            truncated: false,
        }
    }

    /// Append raw bytes, keeping as many as fit.
    ///
    /// Returns `false` if anything was cut off.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> bool {
        let room = self.buf.len() - self.len;
        let take = bytes.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&bytes[..take]);
        self.len += take;
        if take < bytes.len() {
            self.truncated = true;
        }
        !self.truncated
    }

    /// Discard everything written so far.
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Write for PayloadWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.write_bytes(s.as_bytes()) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_formats_into_buffer() {
        let mut buf = [0u8; 64];
        let mut out = PayloadWriter::new(&mut buf);
        write!(out, "{{\"v\":{}}}", 42).unwrap();
        assert_eq!(out.as_bytes(), b"{\"v\":42}");
        assert!(!out.is_truncated());
    }

    #[test]
    fn test_truncates_and_reports() {
        let mut buf = [0u8; 4];
        let mut out = PayloadWriter::new(&mut buf);
        assert!(out.write_str("hello").is_err());
        assert_eq!(out.as_bytes(), b"hell");
        assert!(out.is_truncated());

        out.clear();
        assert!(out.is_empty());
        assert!(out.write_bytes(b"ok"));
        assert_eq!(out.len(), 2);
    }
}

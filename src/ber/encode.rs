//! BER encoding.
//!
//! [`EncodeBuf`] is filled back to front: each element pushes its content
//! first, then its length, then its tag. A constructed element measures how
//! much its children wrote and prefixes that. [`EncodeBuf::finish`] reverses
//! the buffer once at the end.

use super::tag;
use crate::oid::Oid;
use bytes::Bytes;

/// Reverse-filled BER output buffer.
#[derive(Debug, Default)]
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Push one byte.
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Push raw bytes, which will appear in their given order after `finish`.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().rev());
    }

    /// Push a definite length.
    pub fn push_length(&mut self, len: usize) {
        if len < 0x80 {
            self.push_byte(len as u8);
            return;
        }

        let mut remaining = len;
        let mut octets = 0u8;
        while remaining > 0 {
            self.push_byte(remaining as u8);
            remaining >>= 8;
            octets += 1;
        }
        self.push_byte(0x80 | octets);
    }

    /// Push a tag byte.
    pub fn push_tag(&mut self, tag: u8) {
        self.push_byte(tag);
    }

    /// Push a constructed element whose content is written by `f`.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start = self.len();
        f(self);
        let content_len = self.len() - start;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Push a SEQUENCE whose content is written by `f`.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Push an INTEGER in minimal two's complement form.
    pub fn push_integer(&mut self, value: i32) {
        let bytes = value.to_be_bytes();
        let mut skip = 0;
        // Drop leading octets that only repeat the sign bit.
        while skip < 3 {
            let redundant = (bytes[skip] == 0x00 && bytes[skip + 1] & 0x80 == 0)
                || (bytes[skip] == 0xFF && bytes[skip + 1] & 0x80 != 0);
            if !redundant {
                break;
            }
            skip += 1;
        }
        let content = &bytes[skip..];
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag::universal::INTEGER);
    }

    /// Push an unsigned 32-bit value under an application tag.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        let content_len = self.push_unsigned_content(u64::from(value));
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Push a Counter64.
    pub fn push_integer64(&mut self, value: u64) {
        let content_len = self.push_unsigned_content(value);
        self.push_length(content_len);
        self.push_tag(tag::application::COUNTER64);
    }

    /// Write the minimal unsigned encoding of `value`, returning its length.
    ///
    /// A zero octet is prepended when the high bit is set so the value does
    /// not read as negative.
    fn push_unsigned_content(&mut self, value: u64) -> usize {
        let bytes = value.to_be_bytes();
        let first = bytes
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(bytes.len() - 1);
        let content = &bytes[first..];
        self.push_bytes(content);
        if content[0] & 0x80 != 0 {
            self.push_byte(0x00);
            content.len() + 1
        } else {
            content.len()
        }
    }

    /// Push an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::universal::OCTET_STRING);
    }

    /// Push a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Push an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &Oid) {
        let content = oid.to_ber();
        self.push_bytes(&content);
        self.push_length(content.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Push an IpAddress.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_bytes(&addr);
        self.push_length(4);
        self.push_tag(tag::application::IP_ADDRESS);
    }

    /// Finish encoding and return the bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

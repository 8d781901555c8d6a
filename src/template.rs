use crate::hash::double_sha256_parts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a nonce is appended to the header template to form a candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceEncoding {
    /// Eight lowercase, zero-padded hex characters (`0000002a`).
    #[default]
    HexAscii,
    /// Four raw bytes, little-endian, as in a Bitcoin block header.
    LittleEndian,
    /// Four raw bytes, big-endian.
    BigEndian,
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encoded nonce bytes; at most eight long, kept on the stack.
#[derive(Clone, Copy, Debug)]
pub struct EncodedNonce {
    buf: [u8; 8],
    len: usize,
}

impl EncodedNonce {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl NonceEncoding {
    pub fn encode(self, nonce: u32) -> EncodedNonce {
        let mut buf = [0u8; 8];
        let len = match self {
            NonceEncoding::HexAscii => {
                for (i, slot) in buf.iter_mut().enumerate() {
                    let nibble = (nonce >> (28 - 4 * i)) & 0xF;
                    *slot = HEX_DIGITS[nibble as usize];
                }
                8
            }
            NonceEncoding::LittleEndian => {
                buf[..4].copy_from_slice(&nonce.to_le_bytes());
                4
            }
            NonceEncoding::BigEndian => {
                buf[..4].copy_from_slice(&nonce.to_be_bytes());
                4
            }
        };
        EncodedNonce { buf, len }
    }
}

/// Opaque, immutable header bytes supplied by the host.
///
/// Cloning is cheap; the engine shares one allocation with its worker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeaderTemplate {
    bytes: Arc<[u8]>,
}

impl HeaderTemplate {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Full candidate bytes, `template || encode(nonce)`.
    pub fn candidate(&self, nonce: u32, encoding: NonceEncoding) -> Vec<u8> {
        let encoded = encoding.encode(nonce);
        let mut out = Vec::with_capacity(self.bytes.len() + encoded.len);
        out.extend_from_slice(&self.bytes);
        out.extend_from_slice(encoded.as_bytes());
        out
    }

    /// Double SHA-256 of the candidate for `nonce`.
    #[inline]
    pub fn hash_nonce(&self, nonce: u32, encoding: NonceEncoding) -> [u8; 32] {
        let encoded = encoding.encode(nonce);
        double_sha256_parts(&[self.as_bytes(), encoded.as_bytes()])
    }
}

impl From<Vec<u8>> for HeaderTemplate {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for HeaderTemplate {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for HeaderTemplate {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

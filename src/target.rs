//! 256-bit mining target.
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit unsigned threshold stored as big-endian bytes.
///
/// Byte-wise ordering of big-endian arrays is numeric ordering, so the derived
/// `Ord` compares full 256-bit magnitudes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target([u8; 32]);

impl Target {
    pub const ZERO: Target = Target([0u8; 32]);
    pub const MAX: Target = Target([0xFFu8; 32]);

    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Parse a hex number of any width up to 256 bits.
    ///
    /// Accepts an optional `0x` prefix and odd digit counts. Leading zeros do
    /// not count towards the width, so `"00ff"` and `"ff"` are the same target.
    pub fn from_hex(input: &str) -> Result<Self, Error> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(Error::InvalidTarget("empty hex string".into()));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(Error::InvalidTarget(format!("invalid hex digit {bad:?}")));
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(Error::InvalidTarget(format!(
                "value has {} hex digits, exceeds 256 bits",
                significant.len()
            )));
        }

        let padded = format!("{significant:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| Error::InvalidTarget(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Largest target whose values all have at least `bits` leading zero bits.
    pub fn from_leading_zero_bits(bits: u32) -> Self {
        if bits >= 256 {
            return Self::ZERO;
        }
        let mut bytes = [0xFFu8; 32];
        let zero_bytes = (bits / 8) as usize;
        for byte in bytes.iter_mut().take(zero_bytes) {
            *byte = 0;
        }
        let remaining = bits % 8;
        if remaining > 0 {
            bytes[zero_bytes] = 0xFF >> remaining;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Whether `hash`, read as a big-endian integer, is strictly below this target.
    #[inline]
    pub fn is_met_by(&self, hash: &[u8; 32]) -> bool {
        hash < &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

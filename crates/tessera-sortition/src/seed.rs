//! 256-bit selection seeds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 32-byte seed, big-endian when read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    pub const ZERO: Seed = Seed([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The integer `n` as a 256-bit big-endian value.
    pub const fn from_u64(n: u64) -> Self {
        let b = n.to_be_bytes();
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = b[i];
            i += 1;
        }
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// `H(self ‖ parts...)` as a new seed.
    pub fn mix(&self, parts: &[&[u8]]) -> Seed {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.0);
        for part in parts {
            hasher.update(part);
        }
        Seed(*hasher.finalize().as_bytes())
    }

    /// The `index`-th pseudo-random word derived from this seed.
    pub fn word(&self, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.0);
        hasher.update(&index.to_be_bytes());
        let hash = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_be_bytes(word)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::from_u64(n)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell seeds apart in logs.
        write!(f, "0x{}...", hex::encode(&self.0[..8]))
    }
}

impl FromStr for Seed {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() > 64 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        // Left-pad so short values parse as integers.
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Seed(bytes))
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u64_is_big_endian() {
        let seed = Seed::from_u64(0x0102);
        assert_eq!(seed.0[31], 0x02);
        assert_eq!(seed.0[30], 0x01);
        assert!(seed.0[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn parse_short_and_full() {
        assert_eq!("0x0c".parse::<Seed>().unwrap(), Seed::from_u64(12));
        let full = Seed([0xab; 32]);
        assert_eq!(full.to_hex().parse::<Seed>().unwrap(), full);
        assert!(format!("0x{}", "0".repeat(65)).parse::<Seed>().is_err());
    }

    #[test]
    fn words_are_deterministic_and_vary() {
        let seed = Seed::from_u64(42);
        assert_eq!(seed.word(0), seed.word(0));
        assert_ne!(seed.word(0), seed.word(1));
        assert_ne!(seed.word(0), Seed::from_u64(43).word(0));
    }

    #[test]
    fn mix_changes_seed() {
        let seed = Seed::from_u64(12);
        let mixed = seed.mix(&[b"factory"]);
        assert_ne!(mixed, seed);
        assert_eq!(mixed, seed.mix(&[b"factory"]));
        assert!(!mixed.is_zero());
    }

    #[test]
    fn serde_hex() {
        let seed = Seed::from_u64(789);
        let json = serde_json::to_string(&seed).unwrap();
        let back: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }
}

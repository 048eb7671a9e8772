//! Short identifier generation and decoding.
//!
//! Two strategies are supported:
//!
//! - **Random**: fixed-length strings drawn from `[A-Za-z0-9]`. Collisions are
//!   detected by the repository, which regenerates a bounded number of times.
//! - **Sequential**: a monotonically increasing integer key rendered in
//!   base-36 or base-16.

use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;
use std::str::FromStr;

/// Default length of random identifiers.
pub const DEFAULT_RANDOM_LENGTH: usize = 6;

/// Upper bound on accepted identifier length when decoding.
const MAX_IDENTIFIER_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Identifier '{0}' contains characters outside the alphabet")]
    InvalidIdentifier(String),
}

/// Radix used by the sequential strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Hex,
    Base36,
}

impl Radix {
    pub fn value(self) -> u32 {
        match self {
            Radix::Hex => 16,
            Radix::Base36 => 36,
        }
    }
}

/// Identifier strategy selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdCodec {
    Random { length: usize },
    Sequential { radix: Radix },
}

impl Default for IdCodec {
    fn default() -> Self {
        IdCodec::Random {
            length: DEFAULT_RANDOM_LENGTH,
        }
    }
}

impl IdCodec {
    pub fn is_sequential(&self) -> bool {
        matches!(self, IdCodec::Sequential { .. })
    }

    /// Decodes a user-supplied identifier and returns its canonical form.
    ///
    /// Sequential identifiers are case-insensitive and re-encoded in
    /// lowercase, so `"A"` and `"a"` resolve to the same entry under base-36.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidIdentifier`] if the string is empty, too
    /// long, or contains characters outside the strategy's alphabet.
    pub fn canonicalize(&self, raw: &str) -> Result<String, CodecError> {
        match self {
            IdCodec::Random { .. } => {
                if raw.is_empty()
                    || raw.len() > MAX_IDENTIFIER_LENGTH
                    || !raw.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    return Err(CodecError::InvalidIdentifier(raw.to_string()));
                }
                Ok(raw.to_string())
            }
            IdCodec::Sequential { radix } => {
                let key = decode(raw, radix.value())?;
                Ok(encode(key, radix.value()))
            }
        }
    }
}

impl fmt::Display for IdCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdCodec::Random { length } => write!(f, "random({length})"),
            IdCodec::Sequential { radix: Radix::Hex } => write!(f, "hex"),
            IdCodec::Sequential {
                radix: Radix::Base36,
            } => write!(f, "base36"),
        }
    }
}

impl FromStr for IdCodec {
    type Err = String;

    /// Parses `random`, `base36` or `hex`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(IdCodec::default()),
            "base36" => Ok(IdCodec::Sequential {
                radix: Radix::Base36,
            }),
            "hex" | "base16" => Ok(IdCodec::Sequential { radix: Radix::Hex }),
            other => Err(format!(
                "unknown identifier strategy '{other}', expected random, base36 or hex"
            )),
        }
    }
}

/// Generates a random alphanumeric identifier of the given length.
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Encodes an integer key in the given radix using lowercase digits.
pub fn encode(mut value: u64, radix: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let radix = u64::from(radix);
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % radix) as u32;
        // digit < radix <= 36, so from_digit always succeeds
        digits.push(char::from_digit(digit, radix as u32).unwrap_or('0'));
        value /= radix;
    }

    digits.iter().rev().collect()
}

/// Decodes a string produced by [`encode`]. Accepts upper- and lowercase.
///
/// # Errors
///
/// Returns [`CodecError::InvalidIdentifier`] for empty input, characters
/// outside the radix alphabet, or values that overflow `u64`.
pub fn decode(raw: &str, radix: u32) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidIdentifier(raw.to_string());

    if raw.is_empty() || !raw.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    u64::from_str_radix(raw, radix).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        assert_eq!(generate_code(6).len(), 6);
        assert_eq!(generate_code(12).len(), 12);
    }

    #[test]
    fn test_generate_code_is_alphanumeric() {
        let code = generate_code(64);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_code_produces_mostly_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code(6)).collect();
        // 62^6 possibilities; a handful of collisions would already be suspicious
        assert!(codes.len() > 995);
    }

    #[test]
    fn test_encode_base36() {
        assert_eq!(encode(0, 36), "0");
        assert_eq!(encode(35, 36), "z");
        assert_eq!(encode(36, 36), "10");
        assert_eq!(encode(1_295, 36), "zz");
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode(255, 16), "ff");
        assert_eq!(encode(4096, 16), "1000");
    }

    #[test]
    fn test_decode_then_encode_is_identity() {
        for value in [1u64, 9, 10, 35, 36, 1_000, 123_456_789, u64::MAX] {
            for radix in [16, 36] {
                let encoded = encode(value, radix);
                assert_eq!(decode(&encoded, radix).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("ZZ", 36).unwrap(), 1_295);
        assert_eq!(decode("Ff", 16).unwrap(), 255);
    }

    #[test]
    fn test_decode_rejects_characters_outside_alphabet() {
        assert!(decode("g", 16).is_err());
        assert!(decode("ab-c", 36).is_err());
        assert!(decode("+1", 36).is_err());
        assert!(decode("", 36).is_err());
    }

    #[test]
    fn test_decode_rejects_overflow() {
        assert!(decode("zzzzzzzzzzzzzzzzzzzzzzzzz", 36).is_err());
    }

    #[test]
    fn test_canonicalize_sequential_lowercases() {
        let codec = IdCodec::Sequential {
            radix: Radix::Base36,
        };
        assert_eq!(codec.canonicalize("AbC").unwrap(), "abc");
        assert_eq!(codec.canonicalize("00a").unwrap(), "a");
    }

    #[test]
    fn test_canonicalize_random_keeps_case() {
        let codec = IdCodec::default();
        assert_eq!(codec.canonicalize("aB3xYz").unwrap(), "aB3xYz");
        assert!(matches!(
            codec.canonicalize("ab/cd"),
            Err(CodecError::InvalidIdentifier(_))
        ));
        assert!(codec.canonicalize("").is_err());
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("random".parse::<IdCodec>().unwrap(), IdCodec::default());
        assert_eq!(
            "BASE36".parse::<IdCodec>().unwrap(),
            IdCodec::Sequential {
                radix: Radix::Base36
            }
        );
        assert_eq!(
            "hex".parse::<IdCodec>().unwrap(),
            IdCodec::Sequential { radix: Radix::Hex }
        );
        assert!("uuid".parse::<IdCodec>().is_err());
    }
}

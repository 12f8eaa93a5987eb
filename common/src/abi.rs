use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of a function selector in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// Offset word + length word that precede a dynamic return value.
pub const DYNAMIC_HEADER_SIZE: usize = 2 * WORD_SIZE;

/// Size of a contract address in bytes.
pub const ADDRESS_SIZE: usize = 20;

pub type Selector = [u8; SELECTOR_SIZE];
pub type Word = [u8; WORD_SIZE];

/// `name()`
pub const NAME: Selector = [0x06, 0xfd, 0xde, 0x03];

/// `totalSupply()`
pub const TOTAL_SUPPLY: Selector = [0x18, 0x16, 0x0d, 0xdd];

/// `tokenURI(uint256)`
pub const TOKEN_URI: Selector = [0xc8, 0x7b, 0x56, 0xdd];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AddressError {
    #[error("address must be 0x followed by {} hex digits", ADDRESS_SIZE * 2)]
    InvalidLength,
    #[error("address contains invalid hex: {0}")]
    InvalidHex(hex::FromHexError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenIdError {
    #[error("token id is not a non-negative decimal integer")]
    Invalid,
    #[error("token id does not fit in 256 bits")]
    OutOfRange,
}

/// A 20-byte contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s.trim());
        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(AddressError::InvalidLength);
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(digits, &mut bytes).map_err(AddressError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An unsigned 256-bit token identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(BigUint);

impl TokenId {
    pub fn new(value: BigUint) -> Result<Self, TokenIdError> {
        if value.bits() > (WORD_SIZE * 8) as u64 {
            return Err(TokenIdError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Big-endian, left-padded with zero bytes.
    pub fn to_word(&self) -> Word {
        let bytes = self.0.to_bytes_be();
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
        word
    }

    pub fn from_word(word: &Word) -> Self {
        Self(BigUint::from_bytes_be(word))
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenIdError::Invalid);
        }
        let value = BigUint::from_str(s).map_err(|_| TokenIdError::Invalid)?;
        Self::new(value)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build `0x`-prefixed call data from a selector and static 32-byte arguments.
pub fn encode_call(selector: Selector, words: &[Word]) -> String {
    let mut payload = Vec::with_capacity(SELECTOR_SIZE + words.len() * WORD_SIZE);
    payload.extend_from_slice(&selector);
    for word in words {
        payload.extend_from_slice(word);
    }
    format!("0x{}", hex::encode(payload))
}

/// Encode a string the way a contract returns a dynamic `string`:
/// offset word, length word, then the bytes zero-padded to a word boundary.
pub fn encode_string(value: &str) -> String {
    let bytes = value.as_bytes();
    let padded_len = bytes.len().div_ceil(WORD_SIZE) * WORD_SIZE;

    let mut payload = Vec::with_capacity(DYNAMIC_HEADER_SIZE + padded_len);
    payload.extend_from_slice(&TokenId::from(WORD_SIZE as u64).to_word());
    payload.extend_from_slice(&TokenId::from(bytes.len() as u64).to_word());
    payload.extend_from_slice(bytes);
    payload.resize(DYNAMIC_HEADER_SIZE + padded_len, 0);
    format!("0x{}", hex::encode(payload))
}

/// Decode a dynamic `string` return value.
///
/// Anything that does not look like a string (empty result, short header,
/// malformed hex) decodes to an empty string. The offset word is not followed:
/// the payload is assumed to start right after the header. The declared
/// length wins when it fits the payload; otherwise trailing zero bytes are
/// trimmed. Invalid UTF-8 sequences are dropped.
pub fn decode_string(raw: &str) -> String {
    let digits = strip_hex_prefix(raw);
    if digits.len() < DYNAMIC_HEADER_SIZE * 2 {
        return String::new();
    }

    let bytes = match hex::decode(digits) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to decode string return value: {}", e);
            return String::new();
        }
    };

    let tail = &bytes[DYNAMIC_HEADER_SIZE..];
    let content = match declared_length(&bytes[WORD_SIZE..DYNAMIC_HEADER_SIZE]) {
        Some(len) if len <= tail.len() => &tail[..len],
        _ => trim_trailing_zeros(tail),
    };

    let mut out = String::with_capacity(content.len());
    for chunk in content.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Decode a single `uint256` return value.
pub fn decode_uint(raw: &str) -> Option<TokenId> {
    let digits = strip_hex_prefix(raw);
    if digits.len() < WORD_SIZE * 2 {
        return None;
    }

    let bytes = match hex::decode(digits) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to decode uint return value: {}", e);
            return None;
        }
    };

    let word: &Word = bytes[..WORD_SIZE].try_into().ok()?;
    Some(TokenId::from_word(word))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Length word as `usize`, or `None` if it cannot possibly be a length.
fn declared_length(word: &[u8]) -> Option<usize> {
    let (high, low) = word.split_at(WORD_SIZE - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    usize::try_from(u64::from_be_bytes(low.try_into().ok()?)).ok()
}

fn trim_trailing_zeros(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

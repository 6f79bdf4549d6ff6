//! Turning user-typed seed text into a world seed.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Parse a world seed from free-form text.
///
/// Integers (optionally signed, surrounding whitespace ignored) map to their
/// own value; negative values wrap into `u64` two's complement. Any other
/// text is hashed with 64-bit FNV-1a, so the same phrase always yields the
/// same world.
pub fn parse_seed(text: &str) -> u64 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return value;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return value as u64;
    }
    trimmed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

//! Key hashing.
//!
//! The map stores a 32-bit hash next to every entry and never hashes a key
//! again after insertion; growth relocates entries by their stored hash.

/// Seed used by [`Murmur2::default`].
pub const DEFAULT_SEED: u32 = 5381;

const M: u32 = 0x5bd1e995;
const R: u32 = 24;

/// Hashes string keys for [`StrHashMap`](crate::StrHashMap).
///
/// Implementations must be deterministic for the lifetime of a map.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u32;
}

/// 32-bit MurmurHash2 with a fixed seed.
///
/// Not randomized: unsuitable for adversarial keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Murmur2 {
    seed: u32,
}

impl Murmur2 {
    pub const fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for Murmur2 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl KeyHasher for Murmur2 {
    #[inline]
    fn hash_key(&self, key: &str) -> u32 {
        murmur2(key.as_bytes(), self.seed)
    }
}

/// MurmurHash2 (32-bit) over `bytes`, reading 4-byte blocks little-endian.
#[allow(clippy::cast_possible_truncation)]
pub fn murmur2(bytes: &[u8], seed: u32) -> u32 {
    // Lengths above u32::MAX wrap, as the reference does.
    let mut h = seed ^ (bytes.len() as u32);

    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = blocks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if let Some(&first) = tail.first() {
        h ^= u32::from(first);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answers_seed_zero() {
        assert_eq!(murmur2(b"", 0), 0);
        assert_eq!(murmur2(b"a", 0), 2_456_313_694);
        assert_eq!(murmur2(b"abcd", 0), 646_393_889);
        assert_eq!(murmur2(b"hello world", 0), 1_151_865_881);
    }

    #[test]
    fn known_answers_default_seed() {
        let h = Murmur2::default();
        assert_eq!(h.seed(), 5381);
        assert_eq!(h.hash_key(""), 54_709_868);
        assert_eq!(h.hash_key("a"), 1_129_337_475);
        assert_eq!(h.hash_key("ab"), 2_966_849_563);
        assert_eq!(h.hash_key("abc"), 3_006_758_902);
        assert_eq!(h.hash_key("aaa"), 3_712_621_263);
        assert_eq!(h.hash_key("new_entry"), 2_010_648_400);
    }

    #[test]
    fn seed_changes_hash() {
        let a = Murmur2::with_seed(1).hash_key("key");
        let b = Murmur2::with_seed(2).hash_key("key");
        assert_ne!(a, b);
    }
}

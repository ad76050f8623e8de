//! Bucket selection.

/// Maps a key's bytes to a bucket index in `[0, capacity)`.
///
/// Implementations must be deterministic: a key always lands in the same
/// bucket for a given capacity, otherwise lookups miss entries that were
/// inserted earlier.
pub trait BucketHash {
    fn bucket(&self, key: &[u8], capacity: usize) -> usize;
}

/// Base-128 polynomial string hash.
///
/// Byte `i` of an `n`-byte key contributes `b_i * 128^(n - i - 1)`; the sum
/// is reduced modulo the capacity after every step, so it is evaluated in
/// Horner form as `h = (h * 128 + b_i) % capacity`. Bytes are read unsigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialHash;

impl PolynomialHash {
    pub const RADIX: u128 = 128;
}

impl BucketHash for PolynomialHash {
    #[inline]
    fn bucket(&self, key: &[u8], capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        let m = capacity as u128;
        key.iter()
            .fold(0u128, |h, &b| (h * Self::RADIX + u128::from(b)) % m) as usize
    }
}

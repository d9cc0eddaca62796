//! Deterministic selection from a pool.
//!
//! The hash is 64-bit FNV-1a over the UTF-8 bytes of every seed part, with
//! a unit separator byte between parts so that `["ab", "c"]` and
//! `["a", "bc"]` seed differently. The result depends only on its inputs.

use super::seed::SeedKey;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const PART_SEPARATOR: u8 = 0x1f;

/// Stable hash of a seed key.
pub fn seed_hash(seed: &SeedKey) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for (index, part) in seed.parts().iter().enumerate() {
        if index > 0 {
            hash = fnv_step(hash, PART_SEPARATOR);
        }
        for byte in part.as_bytes() {
            hash = fnv_step(hash, *byte);
        }
    }
    hash
}

#[inline]
fn fnv_step(hash: u64, byte: u8) -> u64 {
    (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
}

/// Index into a pool of `len` items, or `None` for an empty pool.
pub fn pick_index(len: usize, seed: &SeedKey) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as u64;
    usize::try_from(seed_hash(seed) % len).ok()
}

/// Pick one item from `pool`; `None` signals "no selection" for an empty pool.
pub fn pick<'a, T>(pool: &'a [T], seed: &SeedKey) -> Option<&'a T> {
    pick_index(pool.len(), seed).and_then(|index| pool.get(index))
}

//! djb2 string hashing.
//!
//! The map hashes keys by feeding their raw bytes to a [`Djb2Hasher`]
//! through `Hasher::write`. Going through `str: Hash` would append a
//! terminator byte and change the value, so keys never take that path.

use core::hash::{BuildHasher, Hasher};

/// Initial accumulator value.
pub const DJB2_SEED: u64 = 5381;

/// Hash `bytes` with djb2: `h = h * 33 + c` for every byte, wrapping.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |h, &c| step(h, c))
}

#[inline]
fn step(h: u64, c: u8) -> u64 {
    (h << 5).wrapping_add(h).wrapping_add(u64::from(c))
}

/// Streaming djb2. Successive `write` calls continue the same recurrence.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Djb2Hasher {
    pub const fn new() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |h, &c| step(h, c));
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Default `BuildHasher` for [`ChainMap`](crate::ChainMap).
#[derive(Clone, Copy, Debug, Default)]
pub struct Djb2State;

impl BuildHasher for Djb2State {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::new()
    }
}

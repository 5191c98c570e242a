//! Random number generation for dungeon building
//!
//! Uses a seeded ChaCha RNG so a level can be rebuilt from its seed alone.
//! Independent draws for the same seed go through separate ChaCha streams.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Stream used for room and corridor layout.
pub const LAYOUT_STREAM: u64 = 0;

/// Stream used for monster and item population.
pub const OCCUPANT_STREAM: u64 = 1;

/// Game random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation. The
/// serialized form is the seed, stream and word position, so a restored
/// generator continues exactly where the saved one stopped.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

#[derive(Serialize, Deserialize)]
struct RngState {
    seed: u64,
    stream: u64,
    word_pos: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RngState {
            seed: self.seed,
            stream: self.rng.get_stream(),
            word_pos: u64::try_from(self.rng.get_word_pos()).unwrap_or(u64::MAX),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let state = RngState::deserialize(deserializer)?;
        let mut rng = GameRng::with_stream(state.seed, state.stream);
        rng.rng.set_word_pos(u128::from(state.word_pos));
        Ok(rng)
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_stream(seed, LAYOUT_STREAM)
    }

    /// Create a new RNG on a specific ChaCha stream of `seed`
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng, seed }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a uniform value in `lo..=hi`.
    ///
    /// Returns `lo` when the range is empty or a single value.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns a uniform value in `lo..=hi` over the full `u64` range
    pub fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns true half of the time
    pub fn coin_flip(&mut self) -> bool {
        self.range(0, 1) == 1
    }

    /// Draw a fresh seed for a child generator
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let last = i32::try_from(items.len() - 1).unwrap_or(i32::MAX);
        items.get(self.range(0, last) as usize)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

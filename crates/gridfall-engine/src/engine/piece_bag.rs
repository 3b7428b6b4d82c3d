use std::{collections::VecDeque, fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::piece::BlockKind;

/// The queue is topped up whenever it holds fewer than this many pieces.
const REFILL_THRESHOLD: usize = 5;

/// 7-bag piece randomizer.
///
/// Whenever the queue drops below [`REFILL_THRESHOLD`] pieces it is extended
/// with one full shuffled permutation of all 7 kinds. Every 7 consecutive
/// draws starting at a bag boundary therefore contain each kind exactly
/// once, which bounds the worst-case wait between repeats of any kind to 13
/// draws (last in one bag, first in the next).
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    queue: VecDeque<BlockKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the bag's random number generator. Equal seeds produce
/// equal piece sequences, which enables reproducible sessions and
/// deterministic tests. Serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagSeed([u8; 16]);

impl BagSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl FromStr for BagSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(format!(
                "invalid seed: expected 32 hex characters, got {}",
                s.len()
            ));
        }
        // from_str_radix accepts a leading sign, which would let a 31-digit
        // string through the length check.
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid seed: {s} is not a hex string"));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|e| format!("invalid seed: {s} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BagSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for BagSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<BagSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BagSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BagSeed(seed)
    }
}

impl PieceBag {
    /// Creates a bag with a random seed. The queue starts empty and is
    /// filled on the first [`pop_next`](Self::pop_next).
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic
    /// piece sequence.
    #[must_use]
    pub fn with_seed(seed: BagSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::with_capacity(BlockKind::LEN * 2),
        }
    }

    fn refill(&mut self) {
        if self.queue.len() < REFILL_THRESHOLD {
            let mut bag = BlockKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
    }

    /// Draws the next kind, refilling the queue first when it has run low.
    ///
    /// # Panics
    ///
    /// Never in practice: the refill leaves at least 7 queued pieces.
    pub fn pop_next(&mut self) -> BlockKind {
        self.refill();
        self.queue.pop_front().expect("piece bag is never empty")
    }

    /// Upcoming kinds in draw order. After any pop the queue holds at least
    /// 4 entries, so a next-piece preview never starves.
    pub fn next_pieces(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seed(byte: u8) -> BagSeed {
        BagSeed::from_bytes([byte; 16])
    }

    #[test]
    fn test_each_seven_aligned_window_is_a_permutation() {
        let mut bag = PieceBag::with_seed(seed(0x42));

        for window in 0..10 {
            let drawn: HashSet<BlockKind> = (0..7).map(|_| bag.pop_next()).collect();
            assert_eq!(
                drawn.len(),
                BlockKind::LEN,
                "window {window} repeated a kind"
            );
        }
    }

    #[test]
    fn test_refill_keeps_preview_depth() {
        let mut bag = PieceBag::with_seed(seed(0x01));
        for _ in 0..50 {
            bag.pop_next();
            assert!(bag.next_pieces().count() >= 4);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::with_seed(seed(0x37));
        let mut b = PieceBag::with_seed(seed(0x37));
        for _ in 0..30 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn test_seed_serialization_roundtrip() {
        let original: BagSeed = rand::rng().random();
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: BagSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_seed_hex_format() {
        let seed = BagSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
    }

    #[test]
    fn test_seed_from_str_errors() {
        assert!("0123".parse::<BagSeed>().is_err());
        assert!(
            "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz"
                .parse::<BagSeed>()
                .is_err()
        );
        assert!(
            "0123456789abcdeffedcba98765432100"
                .parse::<BagSeed>()
                .is_err()
        );
        // 32 characters, but the sign makes it 31 hex digits.
        assert!(
            "+0123456789abcdef0123456789abcde"
                .parse::<BagSeed>()
                .is_err()
        );
    }

    #[test]
    fn test_seed_from_str_accepts_uppercase() {
        let seed: BagSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(
            seed,
            BagSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76,
                0x54, 0x32, 0x10,
            ])
        );
    }
}

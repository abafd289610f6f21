//! Seeded randomness for map generation and fleet assignment.
//!
//! Everything random in the simulator — node placement, edge weight
//! variation, spawn and target selection — draws from a `SimRng` owned by
//! the caller, so a single `u64` seed pins down an entire generated world.
//! Replaying or comparing runs needs only the seed, never a recorded draw
//! log.
//!
//! When two subsystems must not share one draw sequence (generating the map
//! and then assigning routes, say), [`SimRng::child`] splits off an
//! independent labelled stream.  The child seed is a splitmix64 bit-mix of
//! a fresh parent draw and the caller's label, so siblings split from the
//! same parent state still diverge.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG handed through map generation and route assignment.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent child stream tagged with `label`.
    ///
    /// The parent draw separates children of different parents; the label
    /// separates siblings of the same parent.
    pub fn child(&mut self, label: u64) -> SimRng {
        let draw: u64 = self.0.r#gen();
        SimRng::new(mix64(draw.wrapping_add(label)))
    }

    /// The underlying `SmallRng`, for APIs that want a raw `Rng` (the
    /// surface-quality `Normal` distribution does).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// One uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform draw from `range` — node coordinates, curvature multipliers,
    /// speed jitter.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform pick from `slice`, or `None` when it is empty (an empty
    /// node list is the caller's error to report, not a panic).
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let index = self.0.gen_range(0..slice.len());
        Some(&slice[index])
    }
}

/// splitmix64 finalizer.  Diffuses every input bit across the output word,
/// so adjacent labels land on unrelated child seeds.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

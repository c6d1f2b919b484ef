//! Linear congruential generator used for all mock data.
//!
//! The recurrence is the classic `state = state * 1664525 + 1013904223 (mod 2^32)`.
//! It is fast and reproducible, not statistically strong; never use it for
//! anything security related.

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

/// A stateful, single-owner PRNG. Two instances built from the same seed yield
/// identical sequences. To branch a reproducible sub-sequence, build a second
/// generator from its own seed instead of sharing one.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Float in `[0, 1)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        f64::from(self.state) / MODULUS
    }

    /// Integer in the half-open range `[min, max)`. Pass `max + 1` for an
    /// inclusive upper bound.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        (self.next() * (max - min) as f64).floor() as i64 + min
    }

    /// Float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Seeded Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

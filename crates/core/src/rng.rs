//! RNG module - deterministic element type sources
//!
//! The first fill of a session walks the catalog round-robin so the opening
//! board is reproducible and mostly free of ready-made matches. Later refills
//! draw from a seeded LCG, either uniformly or from a shuffled bag holding one
//! of each type. `ScriptedSource` replays a fixed refill sequence instead,
//! which is what fixtures and replays want.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ElementId;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would be a fixed point of the multiplier half of the step.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Value in `[0, max)`; `max` must be non-zero
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Which fill a type is drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillMode {
    /// First fill of a session (deterministic round-robin)
    Initial,
    /// Any refill after a removal
    Refill,
}

/// How refills pick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefillPolicy {
    #[default]
    Uniform,
    /// One of each type per shuffled bag
    Bag,
}

impl RefillPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefillPolicy::Uniform => "uniform",
            RefillPolicy::Bag => "bag",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Some(RefillPolicy::Uniform),
            "bag" => Some(RefillPolicy::Bag),
            _ => None,
        }
    }
}

/// Supplies element types to the refill algorithm
pub trait TypeSource: fmt::Debug {
    /// Next type for a catalog of `count` types (`count >= 1`)
    fn next_type(&mut self, mode: FillMode, count: usize) -> ElementId;

    /// Start a new episode (used on restart)
    ///
    /// The first fill must repeat exactly. Random sources keep their refill
    /// stream running so episodes differ; scripted sources rewind fully.
    fn reset(&mut self);
}

/// Round-robin cursor shared by the sources; advanced before it is read, so
/// the first type handed out is index 1
#[derive(Debug, Clone, Default)]
struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    fn next(&mut self, count: usize) -> ElementId {
        self.cursor = (self.cursor + 1) % count.max(1);
        ElementId(self.cursor as u8)
    }
}

/// Seeded type source: round-robin first fill, random refills
#[derive(Debug, Clone)]
pub struct ElementQueue {
    policy: RefillPolicy,
    seed: u32,
    rng: SimpleRng,
    round_robin: RoundRobin,
    bag: Vec<ElementId>,
    bag_index: usize,
}

impl ElementQueue {
    pub fn new(policy: RefillPolicy, seed: u32) -> Self {
        Self {
            policy,
            seed,
            rng: SimpleRng::new(seed),
            round_robin: RoundRobin::default(),
            bag: Vec::new(),
            bag_index: 0,
        }
    }

    pub fn policy(&self) -> RefillPolicy {
        self.policy
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Change the seed and rewind everything, refill stream included
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.rng = SimpleRng::new(seed);
        self.round_robin = RoundRobin::default();
        self.bag.clear();
        self.bag_index = 0;
    }

    fn refill_bag(&mut self, count: usize) {
        self.bag = (0..count as u8).map(ElementId).collect();
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}

impl Default for ElementQueue {
    fn default() -> Self {
        Self::new(RefillPolicy::default(), crate::types::DEFAULT_SEED)
    }
}

impl TypeSource for ElementQueue {
    fn next_type(&mut self, mode: FillMode, count: usize) -> ElementId {
        let count = count.max(1);
        match (mode, self.policy) {
            (FillMode::Initial, _) => self.round_robin.next(count),
            (FillMode::Refill, RefillPolicy::Uniform) => {
                ElementId(self.rng.next_range(count as u32) as u8)
            }
            (FillMode::Refill, RefillPolicy::Bag) => {
                if self.bag_index >= self.bag.len() || self.bag.len() != count {
                    self.refill_bag(count);
                }
                let id = self.bag[self.bag_index];
                self.bag_index += 1;
                id
            }
        }
    }

    fn reset(&mut self) {
        self.round_robin = RoundRobin::default();
    }
}

/// Round-robin first fill, then a fixed refill sequence cycled forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    sequence: Vec<ElementId>,
    position: usize,
    round_robin: RoundRobin,
}

impl ScriptedSource {
    pub fn new(sequence: Vec<ElementId>) -> Self {
        Self {
            sequence,
            position: 0,
            round_robin: RoundRobin::default(),
        }
    }

    /// Refill draws consumed so far
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl TypeSource for ScriptedSource {
    fn next_type(&mut self, mode: FillMode, count: usize) -> ElementId {
        if mode == FillMode::Initial || self.sequence.is_empty() {
            return self.round_robin.next(count);
        }
        let id = self.sequence[self.position % self.sequence.len()];
        self.position += 1;
        if id.index() < count {
            id
        } else {
            ElementId((id.index() % count.max(1)) as u8)
        }
    }

    fn reset(&mut self) {
        self.position = 0;
        self.round_robin = RoundRobin::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_initial_fill_is_round_robin_from_one() {
        let mut queue = ElementQueue::new(RefillPolicy::Uniform, 7);
        let drawn: Vec<u8> = (0..7)
            .map(|_| queue.next_type(FillMode::Initial, 5).0)
            .collect();
        assert_eq!(drawn, vec![1, 2, 3, 4, 0, 1, 2]);
    }

    #[test]
    fn test_uniform_refill_stays_in_range() {
        let mut queue = ElementQueue::new(RefillPolicy::Uniform, 99);
        for _ in 0..500 {
            assert!(queue.next_type(FillMode::Refill, 5).index() < 5);
        }
    }

    #[test]
    fn test_bag_hands_out_each_type_once() {
        let mut queue = ElementQueue::new(RefillPolicy::Bag, 3);
        for _ in 0..4 {
            let mut bag: Vec<u8> = (0..6)
                .map(|_| queue.next_type(FillMode::Refill, 6).0)
                .collect();
            bag.sort_unstable();
            assert_eq!(bag, vec![0, 1, 2, 3, 4, 5]);
        }
    }

    fn draw(queue: &mut ElementQueue) -> (Vec<ElementId>, Vec<ElementId>) {
        let initial = (0..5).map(|_| queue.next_type(FillMode::Initial, 4)).collect();
        let refills = (0..20).map(|_| queue.next_type(FillMode::Refill, 4)).collect();
        (initial, refills)
    }

    #[test]
    fn test_reset_repeats_first_fill_only() {
        let mut queue = ElementQueue::new(RefillPolicy::Uniform, 42);
        let (first_fill, first_refills) = draw(&mut queue);
        queue.reset();
        let (second_fill, second_refills) = draw(&mut queue);
        assert_eq!(first_fill, second_fill);
        assert_ne!(first_refills, second_refills);
    }

    #[test]
    fn test_reseed_rewinds_refills() {
        let mut queue = ElementQueue::new(RefillPolicy::Bag, 42);
        let first = draw(&mut queue);
        queue.reseed(42);
        assert_eq!(draw(&mut queue), first);
    }

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSource::new(vec![ElementId(2), ElementId(0)]);
        assert_eq!(source.next_type(FillMode::Initial, 3), ElementId(1));
        let refills: Vec<u8> = (0..5)
            .map(|_| source.next_type(FillMode::Refill, 3).0)
            .collect();
        assert_eq!(refills, vec![2, 0, 2, 0, 2]);
        assert_eq!(source.consumed(), 5);
        source.reset();
        assert_eq!(source.consumed(), 0);
        assert_eq!(source.next_type(FillMode::Initial, 3), ElementId(1));
    }

    #[test]
    fn test_policy_strings() {
        assert_eq!(RefillPolicy::from_str("BAG"), Some(RefillPolicy::Bag));
        assert_eq!(RefillPolicy::Uniform.as_str(), "uniform");
        assert_eq!(RefillPolicy::from_str("weighted"), None);
    }
}

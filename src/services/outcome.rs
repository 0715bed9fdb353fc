//! Outcome generator - the "found items" report shown when cleaning finishes
//!
//! Sampling procedure:
//! 1. draw a count `n` uniformly from `0..=K` (K = catalog size)
//! 2. `n == 0` reports nothing
//! 3. otherwise draw `n` names with replacement, each index from `0..n`
//!
//! Step 3 bounds the index by `n`, not `K`: with `n < K` the tail of the
//! catalog can never be reported and duplicates are common. This matches the
//! established report behavior and is kept as is.

use rand::Rng;
use tracing::debug;

/// Items that can turn up while cleaning, in catalog order
pub const FOUND_ITEMS: [&str; 9] =
    ["Wallet", "Smartphone", "Keys", "Sunglasses", "Purse", "Cash", "Card", "Passport", "ID"];

#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    catalog: &'static [&'static str],
}

impl Default for OutcomeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeGenerator {
    pub fn new() -> Self {
        Self { catalog: &FOUND_ITEMS }
    }

    pub fn with_catalog(catalog: &'static [&'static str]) -> Self {
        Self { catalog }
    }

    #[inline]
    pub fn catalog(&self) -> &'static [&'static str] {
        self.catalog
    }

    /// Produce a report using `rng` for every draw
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<&'static str> {
        self.generate_with(|bound| rng.gen_range(0..bound))
    }

    /// Produce a report from an explicit draw source
    ///
    /// `draw(bound)` must return a value in `0..bound`; out-of-range values are
    /// clamped to `bound - 1`.
    pub fn generate_with<F>(&self, mut draw: F) -> Vec<&'static str>
    where
        F: FnMut(usize) -> usize,
    {
        let k = self.catalog.len();
        let n = draw(k + 1).min(k);
        if n == 0 {
            debug!("outcome_nothing_found");
            return Vec::new();
        }

        let items: Vec<&'static str> =
            (0..n).map(|_| self.catalog[draw(n).min(n - 1)]).collect();
        debug!(count = %n, items = ?items, "outcome_generated");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Draw source replaying fixed values and recording the requested bounds
    struct ScriptedDraws {
        values: VecDeque<usize>,
        bounds: Vec<usize>,
    }

    impl ScriptedDraws {
        fn new(values: &[usize]) -> Self {
            Self { values: values.iter().copied().collect(), bounds: Vec::new() }
        }

        fn draw(&mut self, bound: usize) -> usize {
            self.bounds.push(bound);
            self.values.pop_front().expect("ran out of scripted draws")
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let generator = OutcomeGenerator::new();
        let mut draws = ScriptedDraws::new(&[0]);
        let items = generator.generate_with(|bound| draws.draw(bound));
        assert!(items.is_empty());
        assert_eq!(draws.bounds, vec![10]);
    }

    #[test]
    fn test_picks_are_bounded_by_count() {
        let generator = OutcomeGenerator::new();
        let mut draws = ScriptedDraws::new(&[3, 2, 0, 2]);
        let items = generator.generate_with(|bound| draws.draw(bound));

        assert_eq!(items, vec!["Keys", "Wallet", "Keys"]);
        // count drawn over 0..=9, each pick over 0..3
        assert_eq!(draws.bounds, vec![10, 3, 3, 3]);
    }

    #[test]
    fn test_full_count_reaches_whole_catalog() {
        let generator = OutcomeGenerator::new();
        let mut draws = ScriptedDraws::new(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        let items = generator.generate_with(|bound| draws.draw(bound));
        assert_eq!(
            items,
            vec!["ID", "Passport", "Card", "Cash", "Purse", "Sunglasses", "Keys", "Smartphone", "Wallet"]
        );
        assert!(draws.bounds[1..].iter().all(|&b| b == 9));
    }

    #[test]
    fn test_out_of_range_draws_are_clamped() {
        let generator = OutcomeGenerator::new();
        let mut draws = ScriptedDraws::new(&[42, 100, 100, 100, 100, 100, 100, 100, 100, 100]);
        let items = generator.generate_with(|bound| draws.draw(bound));
        assert_eq!(items.len(), 9);
        assert!(items.iter().all(|item| *item == "ID"));
    }

    #[test]
    fn test_seeded_rng_respects_quirk() {
        let generator = OutcomeGenerator::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let items = generator.generate(&mut rng);
            let n = items.len();
            assert!(n <= FOUND_ITEMS.len());
            let reachable = &FOUND_ITEMS[..n];
            for item in &items {
                assert!(reachable.contains(item), "seed {seed}: {item} outside first {n}");
            }
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let generator = OutcomeGenerator::new();
        let a = generator.generate(&mut StdRng::seed_from_u64(7));
        let b = generator.generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_catalog() {
        static CATALOG: [&str; 2] = ["Umbrella", "Glove"];
        let generator = OutcomeGenerator::with_catalog(&CATALOG);
        let mut draws = ScriptedDraws::new(&[2, 1, 0]);
        let items = generator.generate_with(|bound| draws.draw(bound));
        assert_eq!(items, vec!["Glove", "Umbrella"]);
        assert_eq!(draws.bounds, vec![3, 2, 2]);
    }
}

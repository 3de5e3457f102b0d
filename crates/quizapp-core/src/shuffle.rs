//! Unbiased in-place shuffling of answer options.

use rand::Rng;

/// Shuffle `items` in place with the Durstenfeld variant of Fisher–Yates.
///
/// Walks from the last index down to 1, swapping each position with a
/// uniformly chosen index in `0..=i`. Every permutation is equally likely
/// given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn output_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut items = vec!["a", "b", "c", "d"];
            shuffle(&mut items, &mut rng);
            let mut sorted = items.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec!["a", "b", "c", "d"]);
        }
    }

    #[test]
    fn empty_and_single_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![42];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn positions_are_uniform() {
        // Chi-square over the 4x4 (element, position) table. With 9 degrees
        // of freedom the 0.999 critical value is 27.88.
        const TRIALS: usize = 40_000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [[0usize; 4]; 4];

        for _ in 0..TRIALS {
            let mut items = [0usize, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            for (pos, &elem) in items.iter().enumerate() {
                counts[elem][pos] += 1;
            }
        }

        let expected = TRIALS as f64 / 4.0;
        let chi_square: f64 = counts
            .iter()
            .flatten()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        assert!(chi_square < 27.88, "chi-square too high: {chi_square}");
    }

    #[test]
    fn all_permutations_appear() {
        const TRIALS: usize = 24_000;
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashMap::new();

        for _ in 0..TRIALS {
            let mut items = [0u8, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            *seen.entry(items).or_insert(0usize) += 1;
        }

        assert_eq!(seen.len(), 24);
        // Each permutation expects 1000 hits; allow a wide band.
        for (perm, count) in &seen {
            assert!(
                (800..1200).contains(count),
                "permutation {perm:?} appeared {count} times"
            );
        }
    }
}

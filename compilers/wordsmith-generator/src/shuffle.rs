use rand::Rng;

/// In-place Fisher–Yates: for every index from last to first, swap with a
/// uniformly chosen index in `[0, i]`.
///
/// Written out rather than delegated so the exact draw sequence is pinned
/// down for seeded reproducibility.
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
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_matches_reference_draws() {
        let mut items: Vec<char> = "abcdefgh".chars().collect();
        shuffle(&mut items, &mut StdRng::seed_from_u64(42));

        let mut reference: Vec<char> = "abcdefgh".chars().collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut i = reference.len() - 1;
        while i > 0 {
            let j = rng.random_range(0..=i);
            reference.swap(i, j);
            i -= 1;
        }
        assert_eq!(items, reference);
    }

    #[test]
    fn test_shuffle_trivial_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());
        let mut one = vec![9];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [9]);
    }
}

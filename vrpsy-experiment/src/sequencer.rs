use rand::Rng;
use rand::seq::SliceRandom;

/// Builds a shuffled trial order.
///
/// `repetitions[i]` is how often trial type `i` runs; the returned sequence
/// holds each index exactly that many times, uniformly shuffled.
pub fn build_sequence<R: Rng + ?Sized>(repetitions: &[usize], rng: &mut R) -> Vec<usize> {
    let mut sequence: Vec<usize> = repetitions
        .iter()
        .enumerate()
        .flat_map(|(index, &count)| std::iter::repeat_n(index, count))
        .collect();
    sequence.shuffle(rng);
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn counts(sequence: &[usize], types: usize) -> Vec<usize> {
        let mut c = vec![0; types];
        for &i in sequence {
            c[i] += 1;
        }
        c
    }

    #[test]
    fn zero_repetitions_excludes_type() {
        let mut rng = StdRng::seed_from_u64(7);
        let seq = build_sequence(&[3, 0, 2], &mut rng);
        assert_eq!(seq.len(), 5);
        assert!(!seq.contains(&1));
    }

    #[test]
    fn empty_registry_gives_empty_sequence() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(build_sequence(&[], &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_order() {
        let a = build_sequence(&[4, 4, 4], &mut StdRng::seed_from_u64(42));
        let b = build_sequence(&[4, 4, 4], &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_reaches_every_ordering_of_small_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(build_sequence(&[1, 1, 1], &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    proptest! {
        #[test]
        fn composition_matches_repetitions(
            reps in proptest::collection::vec(0usize..12, 0..8),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = build_sequence(&reps, &mut rng);
            prop_assert_eq!(seq.len(), reps.iter().sum::<usize>());
            prop_assert_eq!(counts(&seq, reps.len()), reps);
        }
    }
}

use super::*;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn is_permutation(ranks: &[u32]) -> bool {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &r)| r as usize == i)
}

#[test]
fn test_distinct_scores_rank_descending() {
    let scores = [0.3, 0.9, -1.0, 0.5, 0.0];
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let ranks = rank_with_ties(&scores, &mut rng).unwrap();
        assert_eq!(ranks, vec![2, 0, 4, 1, 3]);
    }
}

#[test]
fn test_ascending_ranks_smallest_first() {
    let mut rng = StdRng::seed_from_u64(1);
    let ranks = rank_ascending_with_ties(&[0.1, 0.5, 0.9, 0.3], &mut rng).unwrap();
    assert_eq!(ranks, vec![0, 2, 3, 1]);
}

#[test]
fn test_ties_share_the_tied_rank_range() {
    let scores = [1.0, 5.0, 5.0, 5.0, 0.0];
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..50 {
        let ranks = rank_with_ties(&scores, &mut rng).unwrap();
        assert_eq!(ranks[0], 3);
        assert_eq!(ranks[4], 4);
        let mut tied = vec![ranks[1], ranks[2], ranks[3]];
        tied.sort_unstable();
        assert_eq!(tied, vec![0, 1, 2]);
    }
}

#[test]
fn test_tie_break_uses_every_order() {
    // Each of the 2 tied elements should win the better rank sometimes.
    let scores = [2.0, 2.0];
    let mut rng = StdRng::seed_from_u64(42);
    let mut first_wins = 0;
    let trials = 400;
    for _ in 0..trials {
        if rank_with_ties(&scores, &mut rng).unwrap()[0] == 0 {
            first_wins += 1;
        }
    }
    assert!(
        (120..=280).contains(&first_wins),
        "first element won {first_wins}/{trials}"
    );
}

#[test]
fn test_same_seed_reproduces_tie_break() {
    let scores = [1.0; 16];
    let a = rank_with_ties(&scores, &mut StdRng::seed_from_u64(123)).unwrap();
    let b = rank_with_ties(&scores, &mut StdRng::seed_from_u64(123)).unwrap();
    assert_eq!(a, b);
    assert!(is_permutation(&a));
}

#[test]
fn test_infinite_sentinels_rank_last() {
    let mut rng = StdRng::seed_from_u64(3);
    let ranks = rank_with_ties(&[f64::NEG_INFINITY, 2.0, f64::INFINITY], &mut rng).unwrap();
    assert_eq!(ranks, vec![2, 1, 0]);
}

#[test]
fn test_invalid_vectors_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        rank_with_ties(&[], &mut rng),
        Err(RankError::InvalidInput(_))
    ));
    match rank_with_ties(&[1.0, f64::NAN], &mut rng) {
        Err(RankError::InvalidInput(msg)) => assert!(msg.contains("index 1"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_rank_ratios() {
    let ratios = rank_ratios(&[0, 3, 1, 2]);
    assert_eq!(ratios, vec![0.25, 1.0, 0.5, 0.75]);
}

proptest! {
    #[test]
    fn prop_rank_is_permutation(
        scores in prop::collection::vec(-3i32..3, 1..64),
        seed in any::<u64>()
    ) {
        // Small integer range forces plenty of ties.
        let scores: Vec<f64> = scores.into_iter().map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let ranks = rank_with_ties(&scores, &mut rng).unwrap();
        prop_assert_eq!(ranks.len(), scores.len());
        prop_assert!(is_permutation(&ranks));
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] > scores[j] {
                    prop_assert!(ranks[i] < ranks[j]);
                }
            }
        }
    }

    #[test]
    fn prop_distinct_scores_ignore_seed(
        scores in prop::collection::hash_set(-10_000i32..10_000, 1..48),
        seed_a in any::<u64>(),
        seed_b in any::<u64>()
    ) {
        let scores: Vec<f64> = scores.into_iter().map(f64::from).collect();
        let a = rank_with_ties(&scores, &mut StdRng::seed_from_u64(seed_a)).unwrap();
        let b = rank_with_ties(&scores, &mut StdRng::seed_from_u64(seed_b)).unwrap();
        prop_assert_eq!(&a, &b);

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&x, &y| scores[y].partial_cmp(&scores[x]).unwrap());
        for (rank, &idx) in order.iter().enumerate() {
            prop_assert_eq!(a[idx] as usize, rank);
        }
    }

    #[test]
    fn prop_rank_ratios_in_unit_interval(n in 1usize..200) {
        let ranks: Vec<u32> = (0..n as u32).rev().collect();
        let ratios = rank_ratios(&ranks);
        for (r, q) in ranks.iter().zip(&ratios) {
            prop_assert!(*q > 0.0 && *q <= 1.0);
            prop_assert_eq!(*q, (*r as f64 + 1.0) / n as f64);
        }
    }
}

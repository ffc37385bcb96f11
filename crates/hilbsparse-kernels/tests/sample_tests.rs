use hilbsparse_core::SbmError;
use hilbsparse_kernels::{randexp, randsubseq, randsubseq_vec};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_strictly_ascending_below(samples: &[usize], n: usize) {
    assert!(samples.windows(2).all(|w| w[0] < w[1]), "not ascending: {samples:?}");
    assert!(samples.iter().all(|&s| s < n));
}

#[test]
fn randexp_is_non_negative_with_unit_mean() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let draws = 200_000;
    let mut sum = 0.0;
    for _ in 0..draws {
        let e = randexp(&mut rng);
        assert!(e >= 0.0 && e.is_finite());
        sum += e;
    }
    let mean = sum / f64::from(draws);
    assert!((mean - 1.0).abs() < 0.02, "mean {mean}");
}

#[test]
fn samples_are_distinct_ascending_and_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(32);
    for &(n, p) in &[(1usize, 0.5), (2, 0.9), (10, 0.3), (1000, 0.01), (1000, 0.99), (50_000, 0.2)] {
        for _ in 0..20 {
            let s = randsubseq_vec(&mut rng, n, usize::MAX, p).unwrap();
            assert_strictly_ascending_below(&s, n);
        }
    }
}

#[test]
fn cap_limits_sample_count() {
    let mut rng = ChaCha8Rng::seed_from_u64(33);
    let mut out = vec![0usize; 16];
    let count = randsubseq(&mut rng, 1_000_000, 10, 0.5, &mut out).unwrap();
    assert_eq!(count, 10);
    assert_strictly_ascending_below(&out[..count], 1_000_000);
    assert!(out[10..].iter().all(|&v| v == 0));
}

#[test]
fn inclusion_rate_converges_to_p() {
    let mut rng = ChaCha8Rng::seed_from_u64(34);
    let n = 200_000usize;
    for p in [0.001, 0.05, 0.3, 0.8] {
        let trials = 10;
        let total: usize = (0..trials)
            .map(|_| randsubseq_vec(&mut rng, n, n, p).unwrap().len())
            .sum();
        let rate = total as f64 / (trials * n) as f64;
        assert!((rate - p).abs() < 0.05 * p + 1e-4, "p={p} rate={rate}");
    }
}

#[test]
fn probability_one_takes_everything() {
    let mut rng = ChaCha8Rng::seed_from_u64(35);
    let s = randsubseq_vec(&mut rng, 12, 100, 1.0).unwrap();
    assert_eq!(s, (0..12).collect::<Vec<_>>());
}

#[test]
fn probability_zero_and_empty_range_take_nothing() {
    let mut rng = ChaCha8Rng::seed_from_u64(36);
    assert!(randsubseq_vec(&mut rng, 1000, 1000, 0.0).unwrap().is_empty());
    assert!(randsubseq_vec(&mut rng, 0, 1000, 0.7).unwrap().is_empty());
    let mut out = [0usize; 4];
    assert_eq!(randsubseq(&mut rng, 1000, 0, 0.7, &mut out).unwrap(), 0);
}

#[test]
fn invalid_arguments_are_reported() {
    let mut rng = ChaCha8Rng::seed_from_u64(37);
    let mut out = [0usize; 4];
    for p in [-0.1, 1.5, f64::NAN] {
        let err = randsubseq(&mut rng, 10, 4, p, &mut out).unwrap_err();
        assert!(matches!(err, SbmError::InvalidProbability(_)));
    }
    let err = randsubseq(&mut rng, 10, 5, 0.5, &mut out).unwrap_err();
    assert!(matches!(err, SbmError::SampleBufferTooSmall { requested: 5, available: 4 }));
}

#[test]
fn same_seed_same_samples() {
    let a = randsubseq_vec(&mut ChaCha8Rng::seed_from_u64(38), 10_000, 500, 0.1).unwrap();
    let b = randsubseq_vec(&mut ChaCha8Rng::seed_from_u64(38), 10_000, 500, 0.1).unwrap();
    assert_eq!(a, b);
}

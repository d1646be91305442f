//! Multiplicative weight updates and prediction sampling

mod common;

use common::{alternating, chi_square_uniform, random_sequence};
use pennies::{EnsembleLearner, Error, InvalidArgument, Learner, ports::UniformLearner};
use rand::{SeedableRng, rngs::StdRng};
use statrs::distribution::{ChiSquared, ContinuousCDF};

fn weight_sum(learner: &EnsembleLearner) -> f64 {
    learner.weights().iter().sum()
}

#[test]
fn test_initial_weights_are_uniform() {
    let learner = EnsembleLearner::seeded(3, 1, 0.5, 7).unwrap();
    let expected = 1.0 / 27.0;
    assert!(learner.weights().iter().all(|&w| (w - expected).abs() < 1e-15));
    assert!(!learner.is_warmed_up());
    assert!(learner.current_history().is_none());
}

#[test]
fn test_weights_sum_to_one_after_every_update() {
    let mut learner = EnsembleLearner::seeded(2, 3, 0.8, 11).unwrap();
    assert!((weight_sum(&learner) - 1.0).abs() < 1e-9);
    for action in random_sequence(2, 300, 5) {
        learner.predict();
        learner.observe_action(action).unwrap();
        assert!((weight_sum(&learner) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_mistaken_experts_lose_factor_e_to_minus_eta() {
    let eta = 0.7;
    let mut learner = EnsembleLearner::seeded(2, 2, eta, 3).unwrap();
    // Warm-up: no weight changes.
    learner.observe_action(1).unwrap();
    learner.observe_action(0).unwrap();
    assert!(learner.weights().iter().all(|&w| (w - 1.0 / 16.0).abs() < 1e-15));

    // History [1, 0] is context 2; the player answers 1.
    learner.observe_action(1).unwrap();
    let (mut correct, mut mistaken) = (Vec::new(), Vec::new());
    for (expert, &weight) in learner.experts().iter().zip(learner.weights()) {
        if expert.predict_context(2) == 1 {
            correct.push(weight);
        } else {
            mistaken.push(weight);
        }
    }
    assert_eq!(correct.len(), 8);
    assert_eq!(mistaken.len(), 8);
    let ratio = mistaken[0] / correct[0];
    assert!((ratio - (-eta).exp()).abs() < 1e-12);
    assert!(correct.iter().all(|&w| (w - correct[0]).abs() < 1e-15));
    assert!(mistaken.iter().all(|&w| (w - mistaken[0]).abs() < 1e-15));
}

#[test]
fn test_action_probabilities_form_a_distribution() {
    let mut learner = EnsembleLearner::seeded(3, 1, 0.4, 21).unwrap();
    for action in random_sequence(3, 60, 8) {
        learner.observe_action(action).unwrap();
        for history in [[0], [1], [2]] {
            let probs = learner.action_probabilities(&history).unwrap();
            assert_eq!(probs.len(), 3);
            assert!(probs.iter().all(|&p| p >= 0.0));
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
    assert!(learner.action_probabilities(&[3]).is_err());
    assert!(learner.action_probabilities(&[0, 1]).is_err());
}

#[test]
fn test_warm_up_predictions_are_uniform() {
    let mut learner = EnsembleLearner::seeded(2, 1, 0.5, 2024).unwrap();
    let mut counts = [0usize; 2];
    for _ in 0..10_000 {
        counts[learner.predict()] += 1;
        learner.clear();
    }
    let critical = ChiSquared::new(1.0).unwrap().inverse_cdf(0.999);
    let statistic = chi_square_uniform(&counts);
    assert!(
        statistic < critical,
        "chi-square {statistic} exceeds {critical} for counts {counts:?}"
    );
}

#[test]
fn test_alternation_expert_gains_monotonically() {
    let mut learner = EnsembleLearner::seeded(2, 1, 0.5, 99).unwrap();
    // After 0 play 1, after 1 play 0: table [1, 0] is expert 2.
    let alternation = 2;
    let mut previous = learner.weights()[alternation];
    let mut previous_ratio = 1.0;
    for action in alternating(50) {
        learner.predict();
        learner.observe_action(action).unwrap();

        let weights = learner.weights();
        let weight = weights[alternation];
        assert!(weight >= previous - 1e-12);
        let best_other = weights
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != alternation)
            .map(|(_, &w)| w)
            .fold(0.0, f64::max);
        let ratio = weight / best_other;
        assert!(ratio >= previous_ratio - 1e-12);
        previous = weight;
        previous_ratio = ratio;
    }
    assert!(previous > 0.25);
    assert_eq!(learner.leading_expert().0, alternation);
    // The learner should now almost always continue the alternation.
    assert!(learner.action_probabilities(&[0]).unwrap()[1] > 0.99);
}

#[test]
fn test_seeded_learners_are_deterministic() {
    let input = random_sequence(2, 150, 17);
    let play = |seed| {
        let mut learner = EnsembleLearner::seeded(2, 2, 0.3, seed).unwrap();
        for &action in &input {
            learner.predict();
            learner.observe_action(action).unwrap();
        }
        (learner.predictions().to_vec(), learner.weights().to_vec())
    };
    assert_eq!(play(5), play(5));
    assert_ne!(play(5).0, play(6).0);
}

#[test]
fn test_injected_rng_matches_seeded_constructor() {
    let mut a = EnsembleLearner::seeded(2, 1, 0.5, 42).unwrap();
    let mut b = EnsembleLearner::with_rng(2, 1, 0.5, StdRng::seed_from_u64(42)).unwrap();
    for action in alternating(40) {
        assert_eq!(a.predict(), b.predict());
        a.observe_action(action).unwrap();
        b.observe_action(action).unwrap();
    }
}

#[test]
fn test_invalid_arguments_leave_learner_untouched() {
    let mut learner = EnsembleLearner::seeded(2, 1, 0.5, 0).unwrap();
    learner.observe_action(1).unwrap();
    let before = learner.weights().to_vec();
    let err = learner.observe_action(2).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::ActionOutOfRange { action: 2, actions: 2 })
    ));
    assert_eq!(learner.weights(), before.as_slice());
    assert_eq!(learner.actions(), &[1]);

    for eta in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            EnsembleLearner::seeded(2, 1, eta, 0).unwrap_err(),
            Error::InvalidArgument(InvalidArgument::LearningRate { .. })
        ));
    }
}

#[test]
fn test_large_learning_rate_stays_normalized() {
    let mut learner = EnsembleLearner::seeded(2, 2, 50.0, 1).unwrap();
    for action in random_sequence(2, 400, 3) {
        learner.predict();
        learner.observe_action(action).unwrap();
    }
    assert!(learner.weights().iter().all(|w| w.is_finite()));
    assert!((weight_sum(&learner) - 1.0).abs() < 1e-9);
}

#[test]
fn test_learners_are_interchangeable_behind_the_trait() {
    let mut learners: Vec<Box<dyn Learner>> = vec![
        Box::new(EnsembleLearner::seeded(2, 1, 0.5, 1).unwrap()),
        Box::new(UniformLearner::new(2, Some(1)).unwrap()),
    ];
    for learner in &mut learners {
        for action in alternating(10) {
            assert!(learner.predict() < 2);
            learner.observe_action(action).unwrap();
        }
        assert_eq!(learner.action_count(), 2);
        assert!(learner.observe_action(5).is_err());
    }
}

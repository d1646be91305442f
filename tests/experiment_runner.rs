//! Experiment harness: single games, averages, expectations and sweeps

mod common;

use std::fs;

use common::{alternating, assert_close, expert_mistakes, random_sequence};
use pennies::{
    AdversarySynthesizer, EnsembleLearner, Error, ExperimentRunner, InvalidArgument,
    experiment::{
        GameRecord, JsonlObserver, MAX_SWEEP_POINTS, MetricsObserver, SimulatedScore, SweepReport,
        WINNING_SCORE, eta_range, generate_pattern, parse_actions,
    },
};

#[test]
fn test_single_game_stops_at_target() {
    let runner = ExperimentRunner::new(2, 1).unwrap().with_seed(3);
    let input = alternating(200);
    let score = runner.run_single(0.5, &input).unwrap();

    assert!(score.concluded);
    assert_eq!(score.user.max(score.learner), WINNING_SCORE);
    assert!(score.user.min(score.learner) < WINNING_SCORE);
    assert!(score.rounds() as usize <= input.len());
    // The alternation is learned almost immediately.
    assert_eq!(score.learner, WINNING_SCORE);
    assert!(score.user < 20);
}

#[test]
fn test_short_input_is_reported_unconcluded() {
    let runner = ExperimentRunner::new(2, 1).unwrap().with_seed(1);
    let input = alternating(30);
    let score = runner.run_single(0.5, &input).unwrap();
    assert!(!score.concluded);
    assert_eq!(score.rounds(), 30);
    assert_eq!(score.winner(), None);

    let simulated = runner.simulate(0.5, &input).unwrap();
    assert!(matches!(simulated, SimulatedScore::Unconcluded { .. }));
    assert_close(simulated.user() + simulated.learner(), 30.0, 1e-9);
}

#[test]
fn test_simulation_agrees_with_monte_carlo() {
    let input = generate_pattern(&parse_actions("0110", 2).unwrap(), 200).unwrap();
    let runner = ExperimentRunner::new(2, 2).unwrap().with_seed(42);
    for eta in [0.3, 0.8] {
        let simulated = runner.simulate(eta, &input).unwrap();
        let average = runner.run_average(eta, &input, 2000).unwrap();
        assert!(simulated.is_concluded());
        assert_eq!(average.unconcluded, 0);

        let sim_share = simulated.learner() / (simulated.user() + simulated.learner());
        let mc_share = average.learner / (average.user + average.learner);
        assert!(
            (sim_share - mc_share).abs() < 0.03,
            "eta={eta}: simulated {sim_share:.4}, monte carlo {mc_share:.4}"
        );
        assert_close(average.user, simulated.user(), 1.0);
    }
}

#[test]
fn test_expected_mistakes_respect_regret_bound() {
    let inputs = [
        random_sequence(2, 200, 7),
        alternating(200),
        AdversarySynthesizer::new(2, 2).unwrap().generate(),
    ];
    let runner = ExperimentRunner::new(2, 2).unwrap();
    let experts = EnsembleLearner::seeded(2, 2, 0.5, 0).unwrap();
    let n = experts.experts().len() as f64;

    for input in &inputs {
        let best = experts
            .experts()
            .iter()
            .map(|expert| expert_mistakes(expert, input, 2))
            .min()
            .unwrap() as f64;
        for eta in [0.1, 0.5, 1.0, 2.0] {
            let trace = runner.simulate_trace(eta, input).unwrap();
            let expected = trace.expected_mistakes();
            let bound = (eta * best + n.ln()) / (1.0 - (-eta).exp());
            assert!(
                expected <= bound + 1e-9,
                "eta={eta}: expected {expected:.3} mistakes, bound {bound:.3}"
            );
        }
    }
}

#[test]
fn test_trace_is_consistent() {
    let runner = ExperimentRunner::new(3, 1).unwrap();
    let input = random_sequence(3, 250, 9);
    let trace = runner.simulate_trace(0.4, &input).unwrap();

    assert_eq!(trace.warm_up, 1);
    assert_eq!(trace.learner_win.len(), input.len());
    assert_close(trace.learner_win[0], 1.0 / 3.0, 1e-12);
    for (round, &p) in trace.learner_win.iter().enumerate() {
        assert!((0.0..=1.0).contains(&p));
        assert_close(
            trace.user_scores[round] + trace.learner_scores[round],
            (round + 1) as f64,
            1e-9,
        );
    }
    // Random input over three actions keeps the user ahead.
    match trace.outcome() {
        SimulatedScore::Concluded {
            rounds,
            user,
            learner,
        } => {
            assert_eq!(Some(rounds - 1), trace.stop_round);
            assert!(user > 99.5 && user > learner);
        }
        SimulatedScore::Unconcluded { .. } => panic!("250 rounds should conclude"),
    }
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let runner = ExperimentRunner::new(2, 1).unwrap();
    assert!(matches!(
        runner.run_single(0.5, &[]).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::EmptyInput)
    ));
    assert!(matches!(
        runner.simulate(0.5, &[0, 1, 2]).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::ActionOutOfRange { action: 2, .. })
    ));
    assert!(matches!(
        runner.run_average(0.5, &[0, 1], 0).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::TrialCount)
    ));
    assert!(runner.run(&[0.5, -0.1], &[0, 1], 0).is_err());
    assert!(runner.run_for_range(0.5, 0.1, 0.1, &[0, 1], 0).is_err());
    assert!(ExperimentRunner::new(2, 5).is_err());
    assert!(matches!(
        ExperimentRunner::new(2, 1).unwrap().with_target_score(0),
        Err(Error::InvalidArgument(InvalidArgument::TargetScore))
    ));
}

#[test]
fn test_eta_range_is_capped() {
    assert!(matches!(
        eta_range(0.1, 1.0, 1e-12).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::EtaRange { .. })
    ));
    assert!(eta_range(0.1, 1.0, f64::MIN_POSITIVE).is_err());

    let etas = eta_range(0.5, 1.0, 1e-6).unwrap();
    assert!(etas.len().abs_diff(500_000) <= 1, "{} points", etas.len());
    assert!(etas.len() <= MAX_SWEEP_POINTS as usize);
    assert!(etas.iter().all(|&eta| (0.5..1.0).contains(&eta)));
}

#[test]
fn test_parallel_and_sequential_sweeps_match() {
    let input = generate_pattern(&[0, 0, 1], 200).unwrap();
    let etas = [0.2, 0.5, 1.0];
    let parallel = ExperimentRunner::new(2, 2)
        .unwrap()
        .with_seed(8)
        .run(&etas, &input, 20)
        .unwrap();
    let sequential = ExperimentRunner::new(2, 2)
        .unwrap()
        .with_seed(8)
        .sequential()
        .run(&etas, &input, 20)
        .unwrap();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 3);
    assert_eq!(parallel.etas, etas.to_vec());
}

#[test]
fn test_range_sweep_uses_expectation_when_count_is_zero() {
    let input = alternating(200);
    let runner = ExperimentRunner::new(2, 1).unwrap();
    let report = runner.run_for_range(0.25, 1.0, 0.25, &input, 0).unwrap();
    assert_eq!(report.len(), 3);
    for (point, eta) in report.points().zip([0.25, 0.5, 0.75]) {
        assert_close(point.eta, eta, 1e-12);
        let simulated = runner.simulate(eta, &input).unwrap();
        assert_close(point.learner_score, simulated.learner(), 1e-12);
        assert!(point.concluded);
        assert_close(point.user_percent + point.learner_percent, 100.0, 1e-9);
    }
}

#[test]
fn test_observers_and_report_exports() {
    let dir = tempfile::tempdir().unwrap();
    let jsonl_path = dir.path().join("games.jsonl");
    let metrics = MetricsObserver::new();

    let runner = ExperimentRunner::new(2, 1)
        .unwrap()
        .with_seed(5)
        .with_observer(Box::new(metrics.clone()))
        .with_observer(Box::new(JsonlObserver::new(&jsonl_path).unwrap()));
    let input = alternating(200);
    let report = runner.run(&[0.3, 0.6], &input, 10).unwrap();

    let summary = metrics.summary();
    assert_eq!(summary.total_games, 20);
    assert_eq!(summary.points, 2);
    assert_eq!(summary.user_wins + summary.learner_wins + summary.unconcluded, 20);
    assert_eq!(summary.learner_wins, 20);

    let contents = fs::read_to_string(&jsonl_path).unwrap();
    let records: Vec<GameRecord> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 20);
    assert!(records.iter().all(|r| r.score.concluded));

    let json_path = dir.path().join("report.json");
    report.save_json(&json_path).unwrap();
    let loaded = SweepReport::load_json(&json_path).unwrap();
    assert_eq!(loaded.len(), report.len());
    assert_eq!(loaded.concluded, report.concluded);
    for (a, b) in loaded.points().zip(report.points()) {
        assert_close(a.eta, b.eta, 1e-12);
        assert_close(a.learner_score, b.learner_score, 1e-9);
    }

    let csv_path = dir.path().join("report.csv");
    report.save_csv(&csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("eta,user_score,learner_score"));
    assert_eq!(lines.count(), 2);
}

//! Expert enumeration: every history-to-action function appears exactly once

use std::collections::HashSet;

use pennies::{ContextShape, ContextTreeExpert, EnsembleLearner, Error, InvalidArgument};

fn truth_tables(actions: usize, depth: usize) -> Vec<Vec<usize>> {
    let count = ContextShape::new(actions, depth)
        .unwrap()
        .expert_count()
        .unwrap();
    (0..count as u64)
        .map(|index| {
            ContextTreeExpert::new(index, actions, depth)
                .unwrap()
                .truth_table()
                .collect()
        })
        .collect()
}

#[test]
fn test_enumeration_is_a_bijection() {
    for (actions, depth, expected) in [(2, 1, 4), (2, 2, 16), (2, 3, 256), (3, 1, 27)] {
        let tables = truth_tables(actions, depth);
        assert_eq!(tables.len(), expected, "n={actions}, h={depth}");

        let distinct: HashSet<_> = tables.iter().cloned().collect();
        assert_eq!(distinct.len(), expected, "duplicate table for n={actions}, h={depth}");

        let contexts = actions.pow(depth as u32);
        for (index, table) in tables.iter().enumerate() {
            assert_eq!(table.len(), contexts);
            assert!(table.iter().all(|&a| a < actions));
            // Reading the table as base-n digits, most significant first,
            // recovers the index.
            let decoded = table.iter().fold(0, |acc, &digit| acc * actions + digit);
            assert_eq!(decoded, index);
        }
    }
}

#[test]
fn test_expert_six_for_two_actions_depth_two() {
    let expert = ContextTreeExpert::new(6, 2, 2).unwrap();
    assert_eq!(expert.truth_table().collect::<Vec<_>>(), vec![0, 1, 1, 0]);
    // history [0, 1] is context 1
    assert_eq!(expert.predict(&[0, 1]).unwrap(), 1);
    assert_eq!(expert.predict(&[1, 1]).unwrap(), 0);
}

#[test]
fn test_learner_holds_every_expert_once() {
    let learner = EnsembleLearner::seeded(2, 2, 0.5, 1).unwrap();
    assert_eq!(learner.experts().len(), 16);
    for (position, expert) in learner.experts().iter().enumerate() {
        assert_eq!(expert.index(), position as u64);
    }
}

#[test]
fn test_out_of_range_index_is_rejected() {
    let err = ContextTreeExpert::new(16, 2, 2).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::ExpertIndex { index: 16, count: 16 })
    ));
}

#[test]
fn test_wrong_history_is_rejected() {
    let expert = ContextTreeExpert::new(3, 2, 2).unwrap();
    assert!(expert.predict(&[0]).unwrap_err().is_invalid_argument());
    assert!(expert.predict(&[0, 2]).unwrap_err().is_invalid_argument());
}

#[test]
fn test_oversized_ensembles_are_rejected() {
    // 2^(2^5) = 2^32 experts
    let err = EnsembleLearner::seeded(2, 5, 0.5, 0).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidArgument(InvalidArgument::TooManyExperts { actions: 2, depth: 5, .. })
    ));
    // 3^27 overflows before the limit is even consulted
    assert!(EnsembleLearner::seeded(3, 3, 0.5, 0).is_err());
    // 2^16 = 65,536 is fine
    assert_eq!(
        ContextShape::new(2, 4).unwrap().expert_count().unwrap(),
        65_536
    );
}

#[test]
fn test_invalid_shapes_are_rejected() {
    assert!(matches!(
        ContextShape::new(1, 2).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::ActionCount { actions: 1 })
    ));
    assert!(matches!(
        ContextShape::new(2, 0).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::HistoryDepth { depth: 0 })
    ));
}

//! Integration tests for the series tie-break.

use cup_bracket_web::{decide, BracketError, DecidedBy, Penalties, ScoredLeg, SeriesDecision, TeamId};

fn leg(home_id: TeamId, away_id: TeamId, home_goals: u32, away_goals: u32) -> ScoredLeg {
    ScoredLeg {
        home_id,
        away_id,
        home_goals,
        away_goals,
    }
}

fn two_teams() -> (TeamId, TeamId) {
    (TeamId::new_v4(), TeamId::new_v4())
}

#[test]
fn single_leg_home_win_by_aggregate() {
    let (a, b) = two_teams();
    let decision = decide(&[leg(a, b, 2, 1)], false, None).unwrap();
    assert_eq!(
        decision,
        SeriesDecision::Decided {
            winner_id: a,
            decided_by: DecidedBy::Aggregate,
            aggregate_home: 2,
            aggregate_away: 1,
        }
    );
}

#[test]
fn aggregate_counts_goals_per_team_across_swapped_legs() {
    let (a, b) = two_teams();
    // A 2-1 B, then B 1-2 A: A scores 4, B scores 2.
    let legs = [leg(a, b, 2, 1), leg(b, a, 1, 2)];
    for rule in [false, true] {
        let decision = decide(&legs, rule, None).unwrap();
        assert_eq!(
            decision,
            SeriesDecision::Decided {
                winner_id: a,
                decided_by: DecidedBy::Aggregate,
                aggregate_home: 4,
                aggregate_away: 2,
            }
        );
    }
}

#[test]
fn away_team_can_win_on_aggregate() {
    let (a, b) = two_teams();
    let legs = [leg(a, b, 0, 1), leg(b, a, 1, 1)];
    match decide(&legs, true, None).unwrap() {
        SeriesDecision::Decided {
            winner_id,
            decided_by,
            ..
        } => {
            assert_eq!(winner_id, b);
            assert_eq!(decided_by, DecidedBy::Aggregate);
        }
        other => panic!("unexpected decision {other:?}"),
    }
}

#[test]
fn level_aggregate_decided_by_doubled_away_goals() {
    let (a, b) = two_teams();
    // A 1-0 B, then B 2-1 A: aggregate 2-2. Doubling visitors' goals: A 1 + 2*1 = 3, B 2 + 0 = 2.
    let legs = [leg(a, b, 1, 0), leg(b, a, 2, 1)];
    assert_eq!(
        decide(&legs, true, None).unwrap(),
        SeriesDecision::Decided {
            winner_id: a,
            decided_by: DecidedBy::AwayGoals,
            aggregate_home: 2,
            aggregate_away: 2,
        }
    );
}

#[test]
fn away_goals_ignored_when_rule_is_off() {
    let (a, b) = two_teams();
    let legs = [leg(a, b, 1, 0), leg(b, a, 2, 1)];
    assert_eq!(
        decide(&legs, false, None).unwrap(),
        SeriesDecision::PenaltiesRequired {
            aggregate_home: 2,
            aggregate_away: 2,
        }
    );
}

#[test]
fn level_after_away_goals_needs_penalties() {
    let (a, b) = two_teams();
    // 1-1 both legs: adjusted totals are 3-3.
    let legs = [leg(a, b, 1, 1), leg(b, a, 1, 1)];
    assert_eq!(
        decide(&legs, true, None).unwrap(),
        SeriesDecision::PenaltiesRequired {
            aggregate_home: 2,
            aggregate_away: 2,
        }
    );

    let decision = decide(&legs, true, Some(Penalties { home: 5, away: 4 })).unwrap();
    assert_eq!(
        decision,
        SeriesDecision::Decided {
            winner_id: a,
            decided_by: DecidedBy::Penalties,
            aggregate_home: 2,
            aggregate_away: 2,
        }
    );
}

#[test]
fn single_leg_draw_away_side_wins_shootout() {
    let (a, b) = two_teams();
    let decision = decide(&[leg(a, b, 0, 0)], true, Some(Penalties { home: 2, away: 4 })).unwrap();
    assert!(matches!(
        decision,
        SeriesDecision::Decided { winner_id, decided_by: DecidedBy::Penalties, .. } if winner_id == b
    ));
}

#[test]
fn level_shootout_is_invalid() {
    let (a, b) = two_teams();
    assert_eq!(
        decide(&[leg(a, b, 0, 0)], false, Some(Penalties { home: 3, away: 3 })),
        Err(BracketError::InvalidPenalties { home: 3, away: 3 })
    );
}

#[test]
fn penalties_are_not_consulted_when_aggregate_decides() {
    let (a, b) = two_teams();
    let decision = decide(&[leg(a, b, 3, 0)], false, Some(Penalties { home: 1, away: 1 })).unwrap();
    assert!(matches!(
        decision,
        SeriesDecision::Decided { decided_by: DecidedBy::Aggregate, .. }
    ));
}

#[test]
fn legs_must_share_the_same_teams() {
    let (a, b) = two_teams();
    let c = TeamId::new_v4();
    assert!(matches!(
        decide(&[leg(a, b, 1, 0), leg(c, a, 0, 0)], false, None),
        Err(BracketError::InvalidSeriesLegs(_))
    ));
    assert!(matches!(decide(&[], false, None), Err(BracketError::InvalidSeriesLegs(_))));
}

#[test]
fn aggregate_beyond_u32_is_rejected() {
    let (a, b) = two_teams();
    let legs = [leg(a, b, u32::MAX, 0), leg(b, a, 0, 1)];
    assert_eq!(
        decide(&legs, false, None),
        Err(BracketError::AggregateOutOfRange {
            goals: u64::from(u32::MAX) + 1
        })
    );
}

#[test]
fn huge_away_goals_are_weighted_without_overflow() {
    let (a, b) = two_teams();
    // Each side scores 3_000_000_000 away: doubled that exceeds u32, the aggregates do not.
    let legs = [leg(a, b, 0, 3_000_000_000), leg(b, a, 0, 3_000_000_000)];
    assert_eq!(
        decide(&legs, true, None).unwrap(),
        SeriesDecision::PenaltiesRequired {
            aggregate_home: 3_000_000_000,
            aggregate_away: 3_000_000_000,
        }
    );
}

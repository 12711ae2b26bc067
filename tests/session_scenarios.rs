//! Session scenarios - end to end games from a JSON config

use std::cell::RefCell;
use std::rc::Rc;

use hexmatch::core::{
    EventRecorder, GameConfig, HexMatchError, RecordingEffects, ScriptedSource, Session,
    SessionSnapshot, SwapError,
};
use hexmatch::types::{Coord, ElementId, GameEvent, GameOutcome, TurnPhase, GOAL_DELTA};

fn c(x: i16, y: i16) -> Coord {
    Coord::new(x, y)
}

fn session_from_json(json: &str) -> Session<RecordingEffects> {
    let config = GameConfig::from_json_str(json).unwrap();
    let refills = (0..5).map(ElementId).collect();
    let mut session = Session::with_source(
        config,
        RecordingEffects::new(),
        Box::new(ScriptedSource::new(refills)),
    )
    .unwrap();
    session.run_until_idle().unwrap();
    session
}

#[test]
fn test_three_in_a_row_scores_a_move() {
    let mut session = session_from_json("{}");
    let recorder = EventRecorder::new();
    session.subscribe(recorder.clone());

    session.request_swap(c(0, 1), c(0, 2)).unwrap();
    assert_eq!(session.phase(), TurnPhase::Swapping);
    assert!(session.is_resolving());
    session.run_until_idle().unwrap();

    assert_eq!(
        recorder.events()[0],
        GameEvent::AutoMatchesFound {
            groups: vec![vec![c(0, 2), c(1, 2), c(1, 3)]],
        }
    );
    assert_eq!(recorder.names(), vec!["auto_matches_found", "successful_move"]);
    assert_eq!(session.moves_left(), 24);
    assert!(session.board().is_full());
    assert_eq!(session.phase(), TurnPhase::Idle);
}

#[test]
fn test_swap_without_match_is_free() {
    let mut session = session_from_json("{}");
    let recorder = EventRecorder::new();
    session.subscribe(recorder.clone());
    let before = session.snapshot();

    let events = session.play_swap(c(0, 0), c(0, 1)).unwrap();

    assert!(events.is_empty());
    assert!(recorder.is_empty());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_invalid_swaps_are_rejected_quietly() {
    let mut session = session_from_json("{}");
    let before = session.snapshot();
    for (a, b) in [(c(0, 0), c(8, 0)), (c(2, 0), c(3, 0)), (c(4, 4), c(4, 3))] {
        assert!(matches!(
            session.play_swap(a, b),
            Err(HexMatchError::Swap(SwapError::InvalidSwap { .. }))
        ));
    }
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_single_goal_target_wins_mid_cascade() {
    let mut session = session_from_json(r#"{ "session": { "goal_count": 1 } }"#);
    let game_overs = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&game_overs);
    session.subscribe(move |e: &GameEvent| {
        if matches!(e, GameEvent::GameOver { .. }) {
            *counter.borrow_mut() += 1;
        }
    });

    let events = session.play_swap(c(1, 0), c(1, 1)).unwrap();

    let destroyed = events
        .iter()
        .position(|e| {
            *e == GameEvent::GoalDestroyed {
                at: c(3, 0),
                delta: GOAL_DELTA,
            }
        })
        .unwrap();
    assert_eq!(events[destroyed + 1], GameEvent::GameOver { won: true });
    // The cascade keeps resolving after the win.
    assert!(matches!(
        events.last(),
        Some(GameEvent::AutoMatchesFound { .. })
    ));
    assert_eq!(*game_overs.borrow(), 1);
    assert_eq!(session.outcome(), Some(GameOutcome::Won));
    assert!(session.board().is_full());
    assert!(matches!(
        session.play_swap(c(0, 1), c(0, 2)),
        Err(HexMatchError::Swap(SwapError::SessionOver {
            outcome: GameOutcome::Won
        }))
    ));
}

#[test]
fn test_running_out_of_moves_loses() {
    let mut session = session_from_json(r#"{ "session": { "move_budget": 1 } }"#);
    let events = session.play_swap(c(0, 1), c(0, 2)).unwrap();
    assert_eq!(events.last(), Some(&GameEvent::GameOver { won: false }));
    let snap = session.snapshot();
    assert!(snap.is_over());
    assert!(!snap.playable());
    assert_eq!(snap.outcome, Some(GameOutcome::Lost));
}

#[test]
fn test_restart_is_idempotent() {
    let mut session = session_from_json(r#"{ "session": { "move_budget": 1 } }"#);
    let opening = session.snapshot();
    session.play_swap(c(0, 1), c(0, 2)).unwrap();

    let mut boards = Vec::new();
    for _ in 0..2 {
        session.restart().unwrap();
        assert!(session.is_resolving());
        session.run_until_idle().unwrap();
        boards.push(session.snapshot());
    }

    assert_eq!(boards[0].board, opening.board);
    assert_eq!(boards[1].board, opening.board);
    assert_eq!(boards[1].board.board_hash(), opening.board.board_hash());
    assert_eq!(boards[1].moves_left, 1);
    assert_eq!(boards[1].goals_left, 2);
    assert_eq!(boards[1].episode, 3);
    assert!(boards[1].playable());
    assert_eq!(session.effects().live_handles().len(), 29);
    assert_eq!(session.effects().stale_releases(), 0);
}

#[test]
fn test_config_file_and_snapshot_json() {
    let path = std::env::temp_dir().join(format!("hexmatch-config-{}.json", std::process::id()));
    let config = GameConfig::default().with_move_budget(7).with_seed(11);
    std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();
    let loaded = GameConfig::from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, config);

    let mut session = Session::headless(loaded).unwrap();
    session.run_until_idle().unwrap();
    let snap = session.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
    assert_eq!(back.moves_left, 7);
    assert_eq!(back.board.rows(), snap.board.rows());
}

//! Integration tests for the session synchronization engine.
//!
//! These run against the real standard-chess oracle and the in-memory
//! store, exercising the engine's externally observable properties:
//! determinism of the log, terminal idempotence, queen-only promotion,
//! best-effort delivery, and serialization of concurrent submissions.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tempo_engine::{ClickOutcome, EventBus, MoveCoordinator, OpponentConfig};
use tempo_rules::{RulesOracle, StandardRules};
use tempo_store::{MemoryStore, SessionStore};
use tempo_types::{
    BoardSnapshot, PlayerId, PromotionPiece, RoomEvent, RoomKey, Square, TerminalReason,
    TurnPhase,
};
use tokio::time::timeout;

/// Wait this long, at most, for a broadcast event in tests.
const EVENT_WAIT: Duration = Duration::from_secs(2);

struct Harness {
    coordinator: Arc<MoveCoordinator>,
    bus: Arc<EventBus>,
    store: Arc<MemoryStore>,
}

/// Build an engine over the in-memory store with a given opponent
/// delay.
fn harness(opponent_delay: Duration) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    let (coordinator, _failures) = MoveCoordinator::new(
        Arc::clone(&store) as Arc<dyn SessionStore>,
        Arc::new(StandardRules::new()),
        Arc::clone(&bus),
        OpponentConfig {
            delay: opponent_delay,
        },
    );
    Harness {
        coordinator: Arc::new(coordinator),
        bus,
        store,
    }
}

/// An opponent delay long enough that it never fires inside a test.
fn harness_without_opponent() -> Harness {
    harness(Duration::from_secs(600))
}

fn sq(index: u8) -> Square {
    Square::try_new(index).expect("test square in range")
}

/// Submit a two-click gesture and return the second click's outcome.
async fn gesture(
    coordinator: &MoveCoordinator,
    room: &RoomKey,
    player: &PlayerId,
    from: u8,
    to: u8,
) -> ClickOutcome {
    coordinator
        .submit_click(room, player, sq(from))
        .await
        .expect("first click");
    coordinator
        .submit_click(room, player, sq(to))
        .await
        .expect("second click")
}

#[tokio::test]
async fn create_session_seeds_starting_position() {
    let h = harness_without_opponent();
    let room = RoomKey::new("seed");
    let player = PlayerId::new("Wren");

    let snapshot = h.coordinator.create_session(&room, &player).await.unwrap();
    assert_eq!(snapshot, BoardSnapshot::starting());
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 1);
    assert_eq!(
        h.coordinator.phase(&room).await,
        Some(TurnPhase::AwaitingFirstClick)
    );
}

#[tokio::test]
async fn unknown_room_click_is_ignored() {
    let h = harness_without_opponent();
    let room = RoomKey::new("nowhere");
    let player = PlayerId::new("Wren");

    let outcome = h
        .coordinator
        .submit_click(&room, &player, sq(12))
        .await
        .unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored);
}

#[tokio::test]
async fn legal_gesture_appends_and_broadcasts() {
    let h = harness_without_opponent();
    let room = RoomKey::new("opening");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();
    let mut rx = h.bus.subscribe(&room).await;

    // e2 then e4.
    let first = h
        .coordinator
        .submit_click(&room, &player, sq(12))
        .await
        .unwrap();
    assert_eq!(first, ClickOutcome::Recorded);
    assert_eq!(
        h.coordinator.phase(&room).await,
        Some(TurnPhase::AwaitingSecondClick)
    );

    let second = h
        .coordinator
        .submit_click(&room, &player, sq(28))
        .await
        .unwrap();
    assert!(matches!(
        second,
        ClickOutcome::Applied { terminal: None, .. }
    ));

    let log = h.coordinator.snapshot_log(&room).await.unwrap();
    assert_eq!(log.len(), 2);
    assert!(log.first().unwrap().as_str().contains(" b "));
    assert_eq!(
        h.coordinator.phase(&room).await,
        Some(TurnPhase::AwaitingOpponentReply)
    );

    let event = timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(event, RoomEvent::OpponentShouldMove);
}

#[tokio::test]
async fn illegal_gesture_is_silently_rejected_and_resets() {
    let h = harness_without_opponent();
    let room = RoomKey::new("illegal");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();

    // e2 to e6 is not a legal pawn move.
    let outcome = gesture(&h.coordinator, &room, &player, 12, 44).await;
    assert_eq!(outcome, ClickOutcome::Rejected);
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 1);
    assert_eq!(
        h.coordinator.phase(&room).await,
        Some(TurnPhase::AwaitingFirstClick)
    );

    // The gesture machinery recovers: a fresh legal gesture applies.
    let outcome = gesture(&h.coordinator, &room, &player, 12, 28).await;
    assert!(matches!(outcome, ClickOutcome::Applied { .. }));
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 2);
}

#[tokio::test]
async fn viewer_clicks_are_recorded_but_never_acted_on() {
    let h = harness_without_opponent();
    let room = RoomKey::new("viewer");
    let player = PlayerId::new("Wren");
    let viewer = PlayerId::new("Lurker");
    h.coordinator.create_session(&room, &player).await.unwrap();

    let outcome = gesture(&h.coordinator, &room, &viewer, 12, 28).await;
    assert_eq!(outcome, ClickOutcome::Recorded);
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 1);

    // The viewer's clicks landed in their own input log.
    assert_eq!(
        h.store.last_two_clicks(&viewer).await.unwrap(),
        Some((sq(28), sq(12)))
    );
}

#[tokio::test]
async fn out_of_turn_clicks_are_recorded_but_never_acted_on() {
    let h = harness_without_opponent();
    let room = RoomKey::new("outofturn");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();

    let applied = gesture(&h.coordinator, &room, &player, 12, 28).await;
    assert!(matches!(applied, ClickOutcome::Applied { .. }));

    // Black is on move now; the human's clicks must not drive a move.
    let outcome = gesture(&h.coordinator, &room, &player, 28, 36).await;
    assert_eq!(outcome, ClickOutcome::Recorded);
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 2);
}

#[tokio::test]
async fn checkmate_publishes_game_over_and_freezes_the_room() {
    let h = harness_without_opponent();
    let room = RoomKey::new("mate");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();

    // Jump to a position where Ra1-a8 is back-rank mate.
    h.store
        .append_snapshot(
            &room,
            BoardSnapshot::new("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"),
        )
        .await
        .unwrap();
    let mut rx = h.bus.subscribe(&room).await;

    let outcome = gesture(&h.coordinator, &room, &player, 0, 56).await;
    assert!(matches!(
        outcome,
        ClickOutcome::Applied {
            terminal: Some(TerminalReason::Checkmate { .. }),
            ..
        }
    ));
    assert_eq!(h.coordinator.phase(&room).await, Some(TurnPhase::Terminal));

    let event = timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(matches!(event, RoomEvent::GameOver { .. }));

    // Terminal idempotence: further clicks never change the log.
    let log_len = h.coordinator.snapshot_log(&room).await.unwrap().len();
    for square in [12u8, 28, 0, 56] {
        let outcome = h
            .coordinator
            .submit_click(&room, &player, sq(square))
            .await
            .unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored);
    }
    assert_eq!(
        h.coordinator.snapshot_log(&room).await.unwrap().len(),
        log_len
    );
}

#[tokio::test]
async fn opponent_trigger_is_a_no_op_on_finished_games() {
    let h = harness(Duration::from_millis(5));
    let room = RoomKey::new("no-self-play");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();
    h.store
        .append_snapshot(
            &room,
            BoardSnapshot::new("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1"),
        )
        .await
        .unwrap();

    let log_len = h.coordinator.snapshot_log(&room).await.unwrap().len();
    // Repeated triggers, all of which wake after the game ended.
    for _ in 0..3 {
        h.coordinator.trigger_opponent(room.clone()).await.unwrap();
    }
    assert_eq!(
        h.coordinator.snapshot_log(&room).await.unwrap().len(),
        log_len
    );
    assert_eq!(h.coordinator.phase(&room).await, Some(TurnPhase::Terminal));
}

#[tokio::test]
async fn promotion_is_always_a_queen() {
    let h = harness_without_opponent();
    let room = RoomKey::new("promotion");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();
    h.store
        .append_snapshot(&room, BoardSnapshot::new("8/P6k/8/8/8/8/8/K7 w - - 0 1"))
        .await
        .unwrap();

    // a7 then a8; the bare pair only matches promotion moves.
    let outcome = gesture(&h.coordinator, &room, &player, 48, 56).await;
    let ClickOutcome::Applied { mv, .. } = outcome else {
        panic!("expected an applied promotion, got {outcome:?}");
    };
    assert_eq!(mv.promotion, Some(PromotionPiece::Queen));
    let head = h.coordinator.current_snapshot(&room).await.unwrap().unwrap();
    assert!(head.as_str().starts_with("Q7/"));
}

#[tokio::test]
async fn single_viewer_end_to_end() {
    let h = harness(Duration::from_millis(20));
    let room = RoomKey::new("e2e");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();
    let mut rx = h.bus.subscribe(&room).await;

    // The opening pawn advance: clicks 12 then 28.
    let outcome = gesture(&h.coordinator, &room, &player, 12, 28).await;
    assert!(matches!(outcome, ClickOutcome::Applied { .. }));

    let first = timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(first, RoomEvent::OpponentShouldMove);
    let head = h.coordinator.current_snapshot(&room).await.unwrap().unwrap();
    assert!(head.as_str().contains(" b "));

    // Within the opponent's delay, a reply lands and the side to move
    // flips back.
    let second = timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(second, RoomEvent::OpponentMoved);
    let head = h.coordinator.current_snapshot(&room).await.unwrap().unwrap();
    assert!(head.as_str().contains(" w "));
    assert_eq!(h.coordinator.snapshot_log(&room).await.unwrap().len(), 3);
    assert_eq!(
        h.coordinator.phase(&room).await,
        Some(TurnPhase::AwaitingFirstClick)
    );
}

#[tokio::test]
async fn replaying_the_log_reproduces_every_head() {
    let h = harness(Duration::from_millis(10));
    let room = RoomKey::new("replay");
    let player = PlayerId::new("Wren");
    let rules = StandardRules::new();
    h.coordinator.create_session(&room, &player).await.unwrap();
    let mut rx = h.bus.subscribe(&room).await;

    // Two human moves with opponent replies in between.
    for (from, to) in [(12u8, 28u8), (6, 21)] {
        let outcome = gesture(&h.coordinator, &room, &player, from, to).await;
        assert!(matches!(outcome, ClickOutcome::Applied { .. }), "{from}->{to}");
        // Wait for OpponentShouldMove then OpponentMoved.
        timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
        let replied = timeout(EVENT_WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(replied, RoomEvent::OpponentMoved);
    }

    // Oldest-first replay: each successor must be reachable from its
    // parent by exactly one legal move, and the final position must be
    // the stored head.
    let log = h.coordinator.snapshot_log(&room).await.unwrap();
    assert_eq!(log.len(), 5);
    let mut ordered = log.clone();
    ordered.reverse();
    let mut current = ordered.first().unwrap().clone();
    assert_eq!(current, BoardSnapshot::starting());
    for successor in ordered.iter().skip(1) {
        let moves = rules.legal_moves(&current).unwrap();
        let step = moves
            .iter()
            .find(|m| rules.apply(&current, m).ok().as_ref() == Some(successor));
        assert!(step.is_some(), "no single legal move reaches {successor}");
        current = successor.clone();
    }
    assert_eq!(Some(&current), log.first());
}

#[tokio::test]
async fn concurrent_gestures_cannot_both_append() {
    // Regression target for the divergent-append race: two complete
    // gestures race on the same room; the per-room lock serializes
    // them so at most one move is applied from the shared parent.
    for _ in 0..16 {
        let h = harness_without_opponent();
        let room = RoomKey::new("race");
        let player = PlayerId::new("Wren");
        h.coordinator.create_session(&room, &player).await.unwrap();

        let a = {
            let coordinator = Arc::clone(&h.coordinator);
            let room = room.clone();
            let player = player.clone();
            tokio::spawn(async move { gesture(&coordinator, &room, &player, 12, 28).await })
        };
        let b = {
            let coordinator = Arc::clone(&h.coordinator);
            let room = room.clone();
            let player = player.clone();
            tokio::spawn(async move { gesture(&coordinator, &room, &player, 12, 28).await })
        };
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        let log = h.coordinator.snapshot_log(&room).await.unwrap();
        assert!(
            log.len() <= 2,
            "divergent appends: {} snapshots from interleaving {a:?} / {b:?}",
            log.len()
        );
        // Both gestures can never have applied.
        let applied = [a, b]
            .iter()
            .filter(|o| matches!(o, ClickOutcome::Applied { .. }))
            .count();
        assert!(applied <= 1);
    }
}

#[tokio::test]
async fn late_subscriber_sees_no_backlog() {
    let h = harness_without_opponent();
    let room = RoomKey::new("no-replay");
    let player = PlayerId::new("Wren");
    h.coordinator.create_session(&room, &player).await.unwrap();

    // Apply a move with nobody listening.
    let outcome = gesture(&h.coordinator, &room, &player, 12, 28).await;
    assert!(matches!(outcome, ClickOutcome::Applied { .. }));

    // Subscribing afterwards yields nothing: no backlog replay.
    let mut rx = h.bus.subscribe(&room).await;
    assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
}

//! End-to-end: load units, compose a turn, replay the server's result

use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::mpsc;

use trigger_tactics::composer::UnitPhase;
use trigger_tactics::core::types::{GameId, PlayerId, UnitId};
use trigger_tactics::core::ClientConfig;
use trigger_tactics::hex::{Azimuth, Position};
use trigger_tactics::session::{
    run_session, HookEvent, InboundMessage, MatchSession, OutboundMessage, PointerInput,
    RecordingGateway, RecordingHooks, SessionEvent, SessionPhase,
};
use trigger_tactics::unit::{CombatEffect, UnitState};

type TestSession = MatchSession<RecordingGateway, RecordingHooks>;

fn game_state(turn_number: u32) -> String {
    json!({
        "action": "getGameStateResult",
        "turnNumber": turn_number,
        "friendUnits": [{
            "unitId": "p1",
            "unitTypeId": "KUGA_YUMA",
            "position": { "col": 4, "row": 34 },
            "usingMainTriggerId": "KOGETSU",
            "usingSubTriggerId": "SHIELD",
            "mainTriggerHp": 100,
            "subTriggerHp": 100,
            "sightRange": 4,
            "isBailout": false
        }],
        "enemyUnits": [{
            "unitId": "e1",
            "unitTypeId": "MIKUMO_OSAMU",
            "position": { "col": 31, "row": 4 },
            "usingMainTriggerId": "RAYGUST",
            "usingSubTriggerId": "SHIELD"
        }]
    })
    .to_string()
}

fn session(turn_number: u32) -> TestSession {
    let mut session = MatchSession::new(
        ClientConfig::default(),
        PlayerId::new("player-1"),
        GameId::new("game-1"),
        RecordingGateway::new(),
        RecordingHooks::new(),
    );
    session.handle_inbound_text(&game_state(turn_number));
    assert_eq!(session.phase(), SessionPhase::Composing);
    session
}

/// Move p1 two cells north and orient both triggers
fn compose_move(session: &mut TestSession) {
    let inputs = [
        PointerInput::Select(Position::new(4, 34)),
        PointerInput::Select(Position::new(4, 32)),
        PointerInput::DragAngle(Azimuth::new(0.0)),
        PointerInput::Commit,
        PointerInput::DragAngle(Azimuth::new(90.0)),
        PointerInput::Commit,
    ];
    for input in inputs {
        session.handle_pointer(input).unwrap();
    }
}

fn action(unit: &str, col: i32, row: i32) -> Value {
    json!({
        "actionType": "Move",
        "unitId": unit,
        "unitTypeId": "KUGA_YUMA",
        "position": { "col": col, "row": row },
        "usingMainTriggerId": "KOGETSU",
        "usingSubTriggerId": "SHIELD",
        "mainTriggerAzimuth": 0,
        "subTriggerAzimuth": 90
    })
}

fn defeating_combat(attacker: &str, defender: &str) -> Value {
    json!({
        "combatId": "c-1",
        "attackingUnitId": attacker,
        "attackerPosition": { "col": 4, "row": 32 },
        "attackerMainTriggerId": "KOGETSU",
        "attackerSubTriggerId": "SHIELD",
        "attackerMainTriggerAzimuth": 0,
        "attackerSubTriggerAzimuth": 90,
        "attackerBaseAttack": 50,
        "defendingUnitId": defender,
        "defenderPosition": { "col": 4, "row": 31 },
        "defenderMainTriggerId": "RAYGUST",
        "defenderSubTriggerId": "SHIELD",
        "defenderMainTriggerAzimuth": 180,
        "defenderSubTriggerAzimuth": 180,
        "mainTriggerHp": 0,
        "subTriggerHp": 0,
        "defenderBaseDefense": 5,
        "defenderBaseAvoid": 10,
        "isAvoided": false,
        "isDefeated": true
    })
}

fn turn_result(turn_number: u32, steps: Value) -> SessionEvent {
    SessionEvent::Inbound(InboundMessage::TurnResult {
        turn_number,
        result: json!({ "turnStatus": "Completed", "steps": steps }),
    })
}

fn unit_moves(session: &TestSession, unit: &str) -> usize {
    session
        .hooks()
        .events
        .iter()
        .filter(|e| matches!(e, HookEvent::UnitMoved(id, _) if id.as_str() == unit))
        .count()
}

#[test]
fn test_two_cell_move_fills_two_steps() {
    let mut session = session(1);
    compose_move(&mut session);

    let p1 = UnitId::new("p1");
    let unit = session.roster().player(&p1).unwrap();
    assert_eq!(unit.position(), Position::new(4, 32));
    assert_eq!(unit.budget(), 0);
    assert_eq!(
        session.composer().unit_phase(session.roster(), &p1),
        Some(UnitPhase::Completed)
    );

    assert_eq!(session.phase(), SessionPhase::AwaitingResult);
    let Some(OutboundMessage::SubmitTurn { steps, .. }) = session.gateway().last() else {
        panic!("turn was not submitted");
    };
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].actions.len(), 1);
    assert_eq!(steps[0].actions[0].position(), Position::new(4, 33));
    assert_eq!(steps[1].actions[0].position(), Position::new(4, 32));
    assert_eq!(steps[1].actions[0].direction().sub.degrees(), 90.0);
}

#[test]
fn test_defeated_defender_is_bailed_out() {
    let mut session = session(5);
    compose_move(&mut session);

    let steps = json!([
        { "actions": [action("p1", 4, 33)], "combats": [] },
        {
            "actions": [action("p1", 4, 32)],
            "combats": [defeating_combat("p1", "e1")]
        }
    ]);
    let continuation = session.handle(turn_result(5, steps)).unwrap();
    assert_eq!(continuation.delay, Duration::from_millis(1500));
    assert!(session
        .handle(SessionEvent::ContinuationDue(continuation.token))
        .is_none());

    let e1 = UnitId::new("e1");
    let enemy = session.roster().opponent(&e1).unwrap();
    assert!(enemy.is_bailed_out());
    assert!(session.roster().unit_at(enemy.position()).is_none());
    assert!(session
        .hooks()
        .events
        .contains(&HookEvent::CombatResolved(e1.clone(), CombatEffect::Defeated)));

    assert_eq!(session.turn_number(), 6);
    assert_eq!(session.phase(), SessionPhase::Composing);
    assert_eq!(
        session.hooks().events.last(),
        Some(&HookEvent::TurnReplayComplete(6))
    );
    let p1 = session.roster().player(&UnitId::new("p1")).unwrap();
    assert_eq!(p1.budget(), 2);
    assert_eq!(p1.current_step(), 0);
}

#[test]
fn test_empty_turn_completes_immediately() {
    let mut session = session(3);
    compose_move(&mut session);
    let moves_before = unit_moves(&session, "p1");

    assert!(session.handle(turn_result(3, json!([]))).is_none());

    assert_eq!(session.turn_number(), 4);
    assert_eq!(session.phase(), SessionPhase::Composing);
    assert_eq!(unit_moves(&session, "p1"), moves_before);
    assert_eq!(
        session.hooks().events.last(),
        Some(&HookEvent::TurnReplayComplete(4))
    );
}

#[test]
fn test_steps_apply_in_order_and_stale_tokens_are_ignored() {
    let mut session = session(1);
    compose_move(&mut session);

    let steps = json!([
        { "actions": [action("p1", 4, 33)] },
        { "actions": [action("p1", 4, 32)] },
        { "actions": [action("p1", 5, 32)] }
    ]);
    let p1 = UnitId::new("p1");
    let first = session.handle(turn_result(1, steps)).unwrap();
    assert_eq!(
        session.roster().player(&p1).unwrap().position(),
        Position::new(4, 33)
    );
    assert_eq!(session.phase(), SessionPhase::Replaying);
    assert_eq!(
        session.handle_pointer(PointerInput::Select(Position::new(4, 33))),
        Err(trigger_tactics::composer::Rejection::ReplayInProgress)
    );

    assert!(session
        .handle(SessionEvent::ContinuationDue(first.token + 100))
        .is_none());
    assert_eq!(
        session.roster().player(&p1).unwrap().position(),
        Position::new(4, 33)
    );

    let second = session
        .handle(SessionEvent::ContinuationDue(first.token))
        .unwrap();
    assert_ne!(second.token, first.token);
    assert_eq!(
        session.roster().player(&p1).unwrap().position(),
        Position::new(4, 32)
    );

    assert!(session
        .handle(SessionEvent::ContinuationDue(second.token))
        .is_none());
    assert_eq!(
        session.roster().player(&p1).unwrap().position(),
        Position::new(5, 32)
    );
    assert_eq!(session.turn_number(), 2);
}

#[test]
fn test_last_possible_turn_number_is_handled() {
    let mut session = session(u32::MAX);
    compose_move(&mut session);

    assert!(session.handle(turn_result(u32::MAX, json!([]))).is_none());
    assert_eq!(session.turn_number(), u32::MAX);
    assert_eq!(session.phase(), SessionPhase::Composing);
}

#[test]
fn test_cancelled_order_does_not_leak_facing() {
    let mut session = session(1);
    let p1 = UnitId::new("p1");
    let facing = session.roster().player(&p1).unwrap().direction();

    session
        .handle_pointer(PointerInput::Select(Position::new(4, 34)))
        .unwrap();
    session
        .handle_pointer(PointerInput::Select(Position::new(4, 33)))
        .unwrap();
    session
        .handle_pointer(PointerInput::DragAngle(Azimuth::new(123.0)))
        .unwrap();
    session.handle_pointer(PointerInput::Cancel).unwrap();
    assert_eq!(session.roster().player(&p1).unwrap().direction(), facing);

    // Two in-place orders without any drag
    for _ in 0..2 {
        session
            .handle_pointer(PointerInput::Select(Position::new(4, 34)))
            .unwrap();
        session
            .handle_pointer(PointerInput::Select(Position::new(4, 34)))
            .unwrap();
        session.handle_pointer(PointerInput::Commit).unwrap();
        session.handle_pointer(PointerInput::Commit).unwrap();
    }

    let Some(OutboundMessage::SubmitTurn { steps, .. }) = session.gateway().last() else {
        panic!("turn was not submitted");
    };
    assert_eq!(steps.len(), 2);
    assert!(steps.iter().all(|s| s.actions[0].direction() == facing));
}

#[test]
fn test_malformed_entry_is_skipped() {
    let mut session = session(1);
    compose_move(&mut session);

    let steps = json!([{
        "actions": [action("ghost", 99, 99), action("p1", 4, 33)],
        "combats": [{ "combatId": "broken" }]
    }]);
    assert!(session.handle(turn_result(1, steps)).is_none());

    let p1 = session.roster().player(&UnitId::new("p1")).unwrap();
    assert_eq!(p1.position(), Position::new(4, 33));
    assert_eq!(session.turn_number(), 2);
    assert_eq!(session.phase(), SessionPhase::Composing);
}

#[test]
fn test_malformed_payload_leaves_state_untouched() {
    let mut session = session(1);
    compose_move(&mut session);
    let events_before = session.hooks().events.len();

    let text = json!({
        "action": "turnExecutionResult",
        "turnNumber": 1,
        "result": { "turnStatus": "Completed" }
    })
    .to_string();
    assert!(session.handle(SessionEvent::InboundText(text)).is_none());

    assert_eq!(session.phase(), SessionPhase::AwaitingResult);
    assert_eq!(session.turn_number(), 1);
    assert_eq!(
        session
            .roster()
            .player(&UnitId::new("p1"))
            .unwrap()
            .position(),
        Position::new(4, 32)
    );
    assert_eq!(session.hooks().events.len(), events_before + 1);
    assert!(matches!(
        session.hooks().events.last(),
        Some(HookEvent::Error(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_driver_paces_steps() {
    let mut session = session(1);
    compose_move(&mut session);

    let steps = json!([
        { "actions": [action("p1", 4, 33)] },
        { "actions": [action("p1", 4, 32)] },
        { "actions": [action("p1", 5, 32)] }
    ]);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(turn_result(1, steps)).unwrap();
    drop(tx);

    let started = tokio::time::Instant::now();
    let session = run_session(session, rx).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(3000), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(3100), "{:?}", elapsed);
    assert_eq!(session.turn_number(), 2);
    assert_eq!(session.phase(), SessionPhase::Composing);
    assert_eq!(
        session
            .roster()
            .player(&UnitId::new("p1"))
            .unwrap()
            .position(),
        Position::new(5, 32)
    );
}

//! One match, from unit list to the last replayed turn
//!
//! `MatchSession` is a plain state machine: feed it [`SessionEvent`]s and it
//! returns the continuation (if any) the caller must schedule. It never blocks.

use crate::composer::rejection::Rejection;
use crate::composer::turn_composer::{ComposerOutcome, TurnComposer};
use crate::core::config::ClientConfig;
use crate::core::types::{GameId, PlayerId};
use crate::hex::azimuth::Azimuth;
use crate::hex::coord::Position;
use crate::hex::layout::{position_to_pixel, PixelPosition, ViewTransform};
use crate::replay::engine::{Continuation, ReplayEngine, ReplayProgress};
use crate::session::gateway::ProtocolGateway;
use crate::session::hooks::PresentationHooks;
use crate::session::messages::{InboundMessage, OutboundMessage};
use crate::turn::step::Step;
use crate::turn::wire::parse_turn;
use crate::unit::roster::UnitRoster;
use crate::unit::snapshot::{EnemyUnitSnapshot, FriendUnitSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No unit list yet, or the match was cancelled
    Lobby,
    /// Accepting pointer input
    Composing,
    /// Turn submitted, waiting for the server's result
    AwaitingResult,
    /// Playing back a confirmed turn
    Replaying,
}

/// Pointer input already mapped to grid terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Select(Position),
    DragAngle(Azimuth),
    Commit,
    /// Drop the selection, undoing a half-finished order
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Pointer(PointerInput),
    Inbound(InboundMessage),
    /// Raw text frame from the server
    InboundText(String),
    ContinuationDue(u64),
}

pub struct MatchSession<G, H> {
    config: ClientConfig,
    player_id: PlayerId,
    game_id: GameId,
    turn_number: u32,
    phase: SessionPhase,
    roster: UnitRoster,
    composer: TurnComposer,
    replay: ReplayEngine,
    view: ViewTransform,
    gateway: G,
    hooks: H,
}

impl<G: ProtocolGateway, H: PresentationHooks> MatchSession<G, H> {
    pub fn new(
        config: ClientConfig,
        player_id: PlayerId,
        game_id: GameId,
        gateway: G,
        hooks: H,
    ) -> Self {
        let composer = TurnComposer::new(config.grid);
        let replay = ReplayEngine::new(config.grid, config.replay);
        Self {
            config,
            player_id,
            game_id,
            turn_number: 1,
            phase: SessionPhase::Lobby,
            roster: UnitRoster::default(),
            composer,
            replay,
            view: ViewTransform::default(),
            gateway,
            hooks,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn roster(&self) -> &UnitRoster {
        &self.roster
    }

    pub fn composer(&self) -> &TurnComposer {
        &self.composer
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
    }

    /// Dispatch any event. Returns a continuation to schedule, if one is due.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Continuation> {
        match event {
            SessionEvent::Pointer(input) => {
                // Rejections are already reported through the hooks
                let _ = self.handle_pointer(input);
                None
            }
            SessionEvent::Inbound(message) => self.handle_inbound(message),
            SessionEvent::InboundText(text) => self.handle_inbound_text(&text),
            SessionEvent::ContinuationDue(token) => self.on_continuation(token),
        }
    }

    /// Replace the roster from a server unit list and start composing
    pub fn load_units(
        &mut self,
        friends: Vec<FriendUnitSnapshot>,
        enemies: Vec<EnemyUnitSnapshot>,
    ) {
        self.replay.cancel();
        self.composer.clear();
        self.roster =
            UnitRoster::from_snapshots(friends, enemies, &self.config.catalog, &self.config.grid);
        self.phase = SessionPhase::Composing;
        tracing::info!(
            players = self.roster.players().len(),
            opponents = self.roster.opponents().len(),
            turn = self.turn_number,
            "units loaded"
        );
    }

    pub fn request_state(&mut self) {
        self.gateway.send(OutboundMessage::RequestState {
            player_id: self.player_id.clone(),
            game_id: self.game_id.clone(),
        });
    }

    pub fn cancel_match(&mut self) {
        self.gateway.send(OutboundMessage::CancelMatch {
            player_id: self.player_id.clone(),
        });
    }

    fn check_accepting_input(&self) -> Result<(), Rejection> {
        match self.phase {
            SessionPhase::Composing => Ok(()),
            SessionPhase::Replaying => Err(Rejection::ReplayInProgress),
            SessionPhase::AwaitingResult => Err(Rejection::AwaitingResult),
            SessionPhase::Lobby => Err(Rejection::NoMatch),
        }
    }

    pub fn handle_pointer(&mut self, input: PointerInput) -> Result<ComposerOutcome, Rejection> {
        let result = self.check_accepting_input().and_then(|()| match input {
            PointerInput::Select(cell) => self.composer.pointer_select(&mut self.roster, cell),
            PointerInput::DragAngle(azimuth) => {
                self.composer.update_drag(&mut self.roster, azimuth)
            }
            PointerInput::Commit => self.composer.commit_orientation(&mut self.roster),
            PointerInput::Cancel => Ok(self.composer.deselect(&mut self.roster)),
        });
        self.report(result)
    }

    /// Aim the trigger being oriented toward a screen-space pointer
    pub fn pointer_drag_to(&mut self, pointer: PixelPosition) -> Result<ComposerOutcome, Rejection> {
        let view = self.view;
        let result = self
            .check_accepting_input()
            .and_then(|()| {
                self.composer
                    .pointer_drag_to(&mut self.roster, pointer, &view)
            });
        self.report(result)
    }

    fn report(
        &mut self,
        result: Result<ComposerOutcome, Rejection>,
    ) -> Result<ComposerOutcome, Rejection> {
        match &result {
            Ok(ComposerOutcome::Moved { unit_id, to, .. }) => {
                let pixel = position_to_pixel(*to, &self.config.grid);
                self.hooks.on_unit_moved(unit_id, pixel);
            }
            Ok(ComposerOutcome::RolledBack {
                unit_id,
                position,
                direction,
            }) => {
                let pixel = position_to_pixel(*position, &self.config.grid);
                self.hooks.on_unit_moved(unit_id, pixel);
                self.hooks.on_orientation_changed(unit_id, *direction);
            }
            Ok(ComposerOutcome::OrientationChanged { unit_id, direction }) => {
                self.hooks.on_orientation_changed(unit_id, *direction);
            }
            Ok(ComposerOutcome::TurnReady(steps)) => {
                self.submit(steps.clone());
            }
            Ok(_) => {}
            Err(rejection) => self.hooks.on_rejected(rejection),
        }
        result
    }

    fn submit(&mut self, steps: Vec<Step>) {
        tracing::info!(
            turn = self.turn_number,
            steps = steps.len(),
            "submitting turn"
        );
        self.gateway.send(OutboundMessage::SubmitTurn {
            player_id: self.player_id.clone(),
            game_id: self.game_id.clone(),
            turn_number: self.turn_number,
            steps,
        });
        self.phase = SessionPhase::AwaitingResult;
    }

    pub fn handle_inbound_text(&mut self, text: &str) -> Option<Continuation> {
        match InboundMessage::parse(text) {
            Ok(message) => self.handle_inbound(message),
            Err(e) => {
                tracing::error!(error = %e, "dropping malformed message");
                self.hooks.on_error(&e.to_string());
                None
            }
        }
    }

    pub fn handle_inbound(&mut self, message: InboundMessage) -> Option<Continuation> {
        match message {
            InboundMessage::TurnResult {
                turn_number,
                result,
            } => self.on_turn_result(turn_number, &result),
            InboundMessage::MatchCancelled { .. } => {
                self.replay.cancel();
                self.composer.clear();
                self.roster = UnitRoster::default();
                self.phase = SessionPhase::Lobby;
                tracing::info!("match cancelled");
                None
            }
            InboundMessage::GameState {
                turn_number,
                friend_units,
                enemy_units,
            } => {
                if let Some(turn_number) = turn_number {
                    self.turn_number = turn_number;
                }
                self.load_units(friend_units, enemy_units);
                None
            }
            InboundMessage::Error { message } => {
                tracing::error!(%message, "server reported an error");
                self.hooks.on_error(&message);
                None
            }
        }
    }

    fn on_turn_result(
        &mut self,
        turn_number: u32,
        payload: &serde_json::Value,
    ) -> Option<Continuation> {
        if self.phase != SessionPhase::AwaitingResult {
            tracing::warn!(
                turn = turn_number,
                phase = ?self.phase,
                "turn result arrived while not waiting for one; dropped"
            );
            return None;
        }

        let turn = match parse_turn(turn_number, payload, &self.config.grid) {
            Ok((turn, desyncs)) => {
                if !desyncs.is_empty() {
                    tracing::warn!(
                        turn = turn_number,
                        skipped = desyncs.len(),
                        "turn result had invalid entries"
                    );
                }
                turn
            }
            Err(e) => {
                tracing::error!(turn = turn_number, error = %e, "dropping malformed turn result");
                self.hooks.on_error(&e.to_string());
                return None;
            }
        };

        self.phase = SessionPhase::Replaying;
        let progress = self.replay.start(turn, &mut self.roster, &mut self.hooks);
        self.on_progress(progress)
    }

    pub fn on_continuation(&mut self, token: u64) -> Option<Continuation> {
        let progress = self.replay.resume(token, &mut self.roster, &mut self.hooks);
        self.on_progress(progress)
    }

    fn on_progress(&mut self, progress: ReplayProgress) -> Option<Continuation> {
        match progress {
            ReplayProgress::Continue(continuation) => Some(continuation),
            ReplayProgress::Completed { next_turn_number } => {
                self.finish_turn(next_turn_number);
                None
            }
            ReplayProgress::Idle => None,
        }
    }

    fn finish_turn(&mut self, next_turn_number: u32) {
        self.turn_number = next_turn_number;
        self.roster.reset_budgets(&self.config.catalog);
        self.composer.clear();
        self.phase = SessionPhase::Composing;
        self.hooks.on_turn_replay_complete(next_turn_number);
        tracing::info!(turn = next_turn_number, "ready for next turn");
    }
}

//! Trigger Tactics - Headless Runner
//!
//! Loads a unit list, composes a turn from a script (or a seeded autopilot),
//! prints the submission frame, then replays a recorded server result with
//! real pacing.

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use trigger_tactics::composer::Autopilot;
use trigger_tactics::core::error::{Result, TacticsError};
use trigger_tactics::core::types::{GameId, PlayerId, UnitId};
use trigger_tactics::core::ClientConfig;
use trigger_tactics::hex::{Azimuth, PixelPosition, Position, TriggerDirection};
use trigger_tactics::session::{
    run_session, ChannelGateway, MatchSession, PointerInput, PresentationHooks, SessionEvent,
    SessionPhase,
};
use trigger_tactics::turn::Combat;
use trigger_tactics::unit::{CombatEffect, UnitState};

const MAX_AUTOPILOT_ORDERS: usize = 256;

/// Headless Trigger Tactics client
#[derive(Parser, Debug)]
#[command(name = "trigger-tactics")]
#[command(about = "Compose a turn from a script and replay a recorded server result")]
struct Args {
    /// Game-state message (getGameStateResult JSON)
    #[arg(long)]
    state: PathBuf,

    /// Input script: `tap <col> <row>`, `drag <degrees>`, `commit`, `cancel`
    #[arg(long)]
    script: Option<PathBuf>,

    /// Seed for autopilot orders when no script is given
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Recorded turn result (turnExecutionResult JSON) to replay
    #[arg(long)]
    result: Option<PathBuf>,

    /// Client config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "player-1")]
    player: String,

    #[arg(long, default_value = "game-1")]
    game: String,
}

/// Logs every presentation callback
struct ConsoleHooks;

impl PresentationHooks for ConsoleHooks {
    fn on_unit_moved(&mut self, unit_id: &UnitId, pixel: PixelPosition) {
        tracing::info!(unit = %unit_id, x = pixel.x, y = pixel.y, "unit moved");
    }

    fn on_orientation_changed(&mut self, unit_id: &UnitId, direction: TriggerDirection) {
        tracing::debug!(
            unit = %unit_id,
            main = direction.main.degrees(),
            sub = direction.sub.degrees(),
            "orientation changed"
        );
    }

    fn on_combat_resolved(&mut self, combat: &Combat, effect: CombatEffect) {
        tracing::info!(
            attacker = %combat.attacking_unit_id,
            defender = %combat.defending_unit_id,
            ?effect,
            "combat resolved"
        );
    }

    fn on_turn_replay_complete(&mut self, next_turn_number: u32) {
        tracing::info!(next_turn = next_turn_number, "turn replay complete");
    }

    fn on_rejected(&mut self, rejection: &trigger_tactics::composer::Rejection) {
        tracing::warn!(%rejection, "input rejected");
    }

    fn on_error(&mut self, message: &str) {
        tracing::error!(%message, "session error");
    }
}

fn parse_script_line(line_no: usize, line: &str) -> Result<Option<PointerInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let invalid =
        || TacticsError::InvalidInput(format!("script line {}: {:?}", line_no + 1, line));
    let parts: Vec<&str> = line.split_whitespace().collect();
    let input = match parts.as_slice() {
        ["tap", col, row] => {
            let col = col.parse().map_err(|_| invalid())?;
            let row = row.parse().map_err(|_| invalid())?;
            PointerInput::Select(Position::new(col, row))
        }
        ["drag", degrees] => {
            let degrees: f64 = degrees.parse().map_err(|_| invalid())?;
            PointerInput::DragAngle(Azimuth::new(degrees))
        }
        ["commit"] => PointerInput::Commit,
        ["cancel"] => PointerInput::Cancel,
        _ => return Err(invalid()),
    };
    Ok(Some(input))
}

fn load_script(path: &Path) -> Result<Vec<PointerInput>> {
    let content = std::fs::read_to_string(path)?;
    let mut inputs = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if let Some(input) = parse_script_line(line_no, line)? {
            inputs.push(input);
        }
    }
    Ok(inputs)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trigger_tactics=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let grid = config.grid;

    let (gateway, mut outbound) = ChannelGateway::channel();
    let mut session = MatchSession::new(
        config,
        PlayerId::new(args.player.clone()),
        GameId::new(args.game.clone()),
        gateway,
        ConsoleHooks,
    );

    let state = std::fs::read_to_string(&args.state)?;
    session.handle_inbound_text(&state);
    if session.phase() != SessionPhase::Composing {
        return Err(TacticsError::InvalidInput(format!(
            "{} did not contain a usable game state",
            args.state.display()
        )));
    }

    match &args.script {
        Some(path) => {
            for input in load_script(path)? {
                // Rejections are logged by the hooks
                let _ = session.handle_pointer(input);
            }
        }
        None => {
            let mut autopilot = Autopilot::new(args.seed);
            let mut attempts = 0;
            while session.phase() == SessionPhase::Composing && attempts < MAX_AUTOPILOT_ORDERS {
                attempts += 1;
                let Some(order) = autopilot.next_order(session.roster(), &grid) else {
                    break;
                };
                for input in order {
                    let _ = session.handle_pointer(input);
                }
            }
        }
    }

    while let Ok(frame) = outbound.try_recv() {
        println!("{}", frame);
    }

    if let Some(path) = &args.result {
        let result = std::fs::read_to_string(path)?;
        let rt = Runtime::new()?;
        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is still alive, so this cannot fail
        let _ = tx.send(SessionEvent::InboundText(result));
        drop(tx);
        session = rt.block_on(run_session(session, rx));
    }

    println!("\n=== TURN {} ===", session.turn_number());
    for unit in session.roster().players() {
        println!(
            "  {} {:<14} at {} budget {}{}",
            unit.unit_id(),
            unit.unit_type_id(),
            unit.position(),
            unit.budget(),
            if unit.is_bailed_out() { " (bailed out)" } else { "" }
        );
    }
    for unit in session.roster().opponents() {
        println!(
            "  {} {:<14} at {} (opponent){}",
            unit.unit_id(),
            unit.unit_type_id(),
            unit.position(),
            if unit.is_bailed_out() { " (bailed out)" } else { "" }
        );
    }

    Ok(())
}

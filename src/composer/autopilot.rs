//! Seeded random orders for headless runs

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::hex::azimuth::Azimuth;
use crate::hex::coord::{adjacent_cells, Position};
use crate::hex::layout::GridConfig;
use crate::session::match_session::PointerInput;
use crate::unit::roster::UnitRoster;
use crate::unit::state::UnitState;

/// Picks a random order for one idle unit at a time.
///
/// The same seed against the same roster yields the same inputs.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: ChaCha8Rng,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Inputs for one complete order (select, move or stay, orient both
    /// triggers), or `None` when no player unit can act
    pub fn next_order(
        &mut self,
        roster: &UnitRoster,
        grid: &GridConfig,
    ) -> Option<Vec<PointerInput>> {
        let unit = roster.players().iter().find(|u| u.can_act())?;
        let origin = unit.position();

        let mut targets: Vec<Position> = adjacent_cells(origin, unit.budget(), grid)
            .into_iter()
            .map(|cell| cell.position)
            .filter(|pos| !roster.is_occupied(*pos))
            .collect();
        // Staying put is always an option
        targets.push(origin);
        let target = *targets.choose(&mut self.rng)?;

        let main = Azimuth::new(self.rng.gen_range(0.0..360.0));
        let sub = Azimuth::new(self.rng.gen_range(0.0..360.0));
        Some(vec![
            PointerInput::Select(origin),
            PointerInput::Select(target),
            PointerInput::DragAngle(main),
            PointerInput::Commit,
            PointerInput::DragAngle(sub),
            PointerInput::Commit,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitId;
    use crate::unit::state::PlayerUnit;

    fn roster() -> UnitRoster {
        UnitRoster::new(
            vec![PlayerUnit::new(
                UnitId::new("p1"),
                "KUGA_YUMA",
                Position::new(4, 34),
                ("KOGETSU".into(), "SHIELD".into()),
                2,
            )],
            Vec::new(),
        )
    }

    #[test]
    fn test_same_seed_same_order() {
        let grid = GridConfig::default();
        let a = Autopilot::new(7).next_order(&roster(), &grid);
        let b = Autopilot::new(7).next_order(&roster(), &grid);
        assert_eq!(a, b);
        let inputs = a.unwrap();
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs[0], PointerInput::Select(Position::new(4, 34)));
    }

    #[test]
    fn test_nothing_to_do_when_exhausted() {
        let mut roster = roster();
        roster.player_mut(&UnitId::new("p1")).unwrap().set_budget(0);
        assert!(Autopilot::new(1)
            .next_order(&roster, &GridConfig::default())
            .is_none());
    }
}

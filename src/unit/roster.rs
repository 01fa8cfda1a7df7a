//! Owner of every unit in a match

use ahash::AHashMap;

use crate::core::types::UnitId;
use crate::hex::coord::Position;
use crate::hex::layout::GridConfig;
use crate::unit::catalog::UnitCatalog;
use crate::unit::snapshot::{EnemyUnitSnapshot, FriendUnitSnapshot};
use crate::unit::state::{OpponentUnit, PlayerUnit, UnitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Player(usize),
    Opponent(usize),
}

/// Both sides' units, indexed by id
#[derive(Debug, Clone, Default)]
pub struct UnitRoster {
    players: Vec<PlayerUnit>,
    opponents: Vec<OpponentUnit>,
    index: AHashMap<UnitId, Slot>,
}

impl UnitRoster {
    pub fn new(players: Vec<PlayerUnit>, opponents: Vec<OpponentUnit>) -> Self {
        let mut index = AHashMap::with_capacity(players.len() + opponents.len());
        for (i, unit) in opponents.iter().enumerate() {
            index.insert(unit.unit_id().clone(), Slot::Opponent(i));
        }
        // Player entries win on id collision
        for (i, unit) in players.iter().enumerate() {
            index.insert(unit.unit_id().clone(), Slot::Player(i));
        }

        Self {
            players,
            opponents,
            index,
        }
    }

    /// Build from a game-state unit list
    pub fn from_snapshots(
        friends: Vec<FriendUnitSnapshot>,
        enemies: Vec<EnemyUnitSnapshot>,
        catalog: &UnitCatalog,
        grid: &GridConfig,
    ) -> Self {
        let players = friends
            .into_iter()
            .map(|snapshot| {
                let budget = catalog.action_points(&snapshot.unit_type_id);
                PlayerUnit::from_snapshot(snapshot, budget)
            })
            .collect();
        let opponents = enemies
            .into_iter()
            .map(|snapshot| OpponentUnit::from_snapshot(snapshot, grid))
            .collect();
        Self::new(players, opponents)
    }

    pub fn players(&self) -> &[PlayerUnit] {
        &self.players
    }

    pub fn opponents(&self) -> &[OpponentUnit] {
        &self.opponents
    }

    pub fn len(&self) -> usize {
        self.players.len() + self.opponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn player(&self, id: &UnitId) -> Option<&PlayerUnit> {
        match self.index.get(id)? {
            Slot::Player(i) => self.players.get(*i),
            Slot::Opponent(_) => None,
        }
    }

    pub fn player_mut(&mut self, id: &UnitId) -> Option<&mut PlayerUnit> {
        match self.index.get(id)? {
            Slot::Player(i) => self.players.get_mut(*i),
            Slot::Opponent(_) => None,
        }
    }

    pub fn opponent(&self, id: &UnitId) -> Option<&OpponentUnit> {
        match self.index.get(id)? {
            Slot::Opponent(i) => self.opponents.get(*i),
            Slot::Player(_) => None,
        }
    }

    /// Look up a unit on either side
    pub fn get(&self, id: &UnitId) -> Option<&dyn UnitState> {
        match self.index.get(id)? {
            Slot::Player(i) => self.players.get(*i).map(|u| u as &dyn UnitState),
            Slot::Opponent(i) => self.opponents.get(*i).map(|u| u as &dyn UnitState),
        }
    }

    pub fn get_mut(&mut self, id: &UnitId) -> Option<&mut dyn UnitState> {
        match self.index.get(id)? {
            Slot::Player(i) => self.players.get_mut(*i).map(|u| u as &mut dyn UnitState),
            Slot::Opponent(i) => self.opponents.get_mut(*i).map(|u| u as &mut dyn UnitState),
        }
    }

    /// Live unit standing on `pos`. Bailed-out units are not targets.
    pub fn unit_at(&self, pos: Position) -> Option<&dyn UnitState> {
        let player = self
            .players
            .iter()
            .find(|u| !u.is_bailed_out() && u.position() == pos)
            .map(|u| u as &dyn UnitState);
        player.or_else(|| {
            self.opponents
                .iter()
                .find(|u| !u.is_bailed_out() && u.position() == pos)
                .map(|u| u as &dyn UnitState)
        })
    }

    /// Live player unit standing on `pos`
    pub fn player_at(&self, pos: Position) -> Option<&PlayerUnit> {
        self.players
            .iter()
            .find(|u| !u.is_bailed_out() && u.position() == pos)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.unit_at(pos).is_some()
    }

    /// Refill every player unit's budget from the catalog
    pub fn reset_budgets(&mut self, catalog: &UnitCatalog) {
        for unit in &mut self.players {
            let budget = catalog.action_points(unit.unit_type_id());
            unit.reset_for_turn(budget);
        }
    }

    /// Every live player unit has spent its budget
    pub fn all_players_done(&self) -> bool {
        self.players.iter().all(PlayerUnit::is_done)
    }
}

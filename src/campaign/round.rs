//! Round engine - owns the game state and runs the phase schedule
//!
//! Moves are applied the moment they are queued, so the caller learns at
//! once whether a move worked. A truck moves at most once per round. Attacks
//! are only collected when queued and resolved in the attack phase.
//!
//! [`RoundEngine::run_round`] is the single sanctioned way to advance the
//! game and must be called exactly once per round: its upkeep phase eats
//! food every time it runs.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::combat::{resolve_attack, AttackResult, RollSource, SeededRolls};
use super::engineering;
use super::entities::{Faction, Truck};
use super::map::{HexCoord, HexGrid, Occupant};
use super::movement::{move_truck, MoveOutcome};
use super::pathfinding::{find_path, PathResult};
use super::supply;
use crate::core::config::RulesConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{
    EngineerId, FactionId, Resource, ResourceStore, Round, TruckId, WarehouseId,
};

/// A move that has been applied this round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub faction: FactionId,
    pub truck: TruckId,
    pub path: Vec<HexCoord>,
    pub from: HexCoord,
    pub to: HexCoord,
    pub cost: u32,
}

/// An attack waiting for the attack phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackIntent {
    pub attacker: FactionId,
    pub defender: FactionId,
    pub requested: u32,
}

/// What happened in one resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSummary {
    pub attacker: FactionId,
    pub defender: FactionId,
    pub requested: u32,
    #[serde(flatten)]
    pub result: AttackResult,
}

/// Food eaten by one faction during upkeep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepSummary {
    pub faction: FactionId,
    pub food_consumed: u32,
    pub starvation_loss: u32,
}

/// Everything that happened in a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: Round,
    pub moves: Vec<MoveRecord>,
    pub attacks: Vec<AttackSummary>,
    pub upkeep: Vec<UpkeepSummary>,
    pub eliminated: Vec<FactionId>,
    pub winner: Option<FactionId>,
}

/// Snapshot of a truck for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckStatus {
    pub id: TruckId,
    pub position: HexCoord,
    pub remaining_mp: u32,
    pub cargo: ResourceStore,
    pub moved_this_round: bool,
}

/// Snapshot of a faction for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionStatus {
    pub id: FactionId,
    pub name: String,
    pub soldiers: u32,
    pub ammo: u32,
    pub food: u32,
    pub engineers: u32,
    pub trucks: Vec<TruckStatus>,
}

/// The authoritative game state plus its action queues
pub struct RoundEngine {
    grid: HexGrid,
    factions: Vec<Faction>,
    rules: RulesConfig,
    rolls: Box<dyn RollSource>,
    move_queue: Vec<MoveRecord>,
    attack_queue: Vec<AttackIntent>,
    moved_this_round: AHashSet<(FactionId, TruckId)>,
    round: Round,
}

impl std::fmt::Debug for RoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("round", &self.round)
            .field("cells", &self.grid.len())
            .field("factions", &self.factions.len())
            .field("queued_moves", &self.move_queue.len())
            .field("queued_attacks", &self.attack_queue.len())
            .finish()
    }
}

impl RoundEngine {
    /// Create an engine. Every warehouse's cell is tagged on the grid.
    pub fn new(
        mut grid: HexGrid,
        factions: Vec<Faction>,
        rules: RulesConfig,
        rolls: impl RollSource + 'static,
    ) -> Self {
        for warehouse in factions.iter().flat_map(|f| f.warehouses.iter()) {
            if !grid.add_occupant(&warehouse.position, Occupant::Warehouse) {
                tracing::warn!(
                    warehouse = %warehouse.id,
                    position = %warehouse.position,
                    "warehouse placed off the grid"
                );
            }
        }

        Self {
            grid,
            factions,
            rules,
            rolls: Box::new(rolls),
            move_queue: Vec::new(),
            attack_queue: Vec::new(),
            moved_this_round: AHashSet::new(),
            round: 1,
        }
    }

    /// Create an engine whose rolls come from a seeded stream
    pub fn with_seed(grid: HexGrid, factions: Vec<Faction>, rules: RulesConfig, seed: u64) -> Self {
        Self::new(grid, factions, rules, SeededRolls::new(seed))
    }

    /// The round currently being played (starts at 1)
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    fn faction_mut(&mut self, id: FactionId) -> Result<&mut Faction> {
        self.factions
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(GameError::FactionNotFound(id))
    }

    pub fn truck(&self, faction: FactionId, truck: TruckId) -> Option<&Truck> {
        self.faction(faction)?.get_truck(truck)
    }

    pub fn has_moved(&self, faction: FactionId, truck: TruckId) -> bool {
        self.moved_this_round.contains(&(faction, truck))
    }

    pub fn pending_attacks(&self) -> &[AttackIntent] {
        &self.attack_queue
    }

    /// Cheapest route between two cells under the current road network
    pub fn plan_path(&self, from: HexCoord, to: HexCoord) -> Option<PathResult> {
        find_path(&self.grid, from, to, &self.rules.movement)
    }

    /// Move a truck now. Each truck may move once per round.
    pub fn queue_move(
        &mut self,
        faction: FactionId,
        truck: TruckId,
        path: &[HexCoord],
    ) -> Result<MoveOutcome> {
        if self.has_moved(faction, truck) {
            return Err(GameError::AlreadyMoved(truck));
        }

        let grid = &self.grid;
        let rules = &self.rules.movement;
        let owner = self
            .factions
            .iter_mut()
            .find(|f| f.id == faction)
            .ok_or(GameError::FactionNotFound(faction))?;
        let unit = owner
            .get_truck_mut(truck)
            .ok_or(GameError::TruckNotFound { faction, truck })?;

        let outcome = move_truck(grid, unit, path, rules).map_err(|e| {
            tracing::debug!(%faction, %truck, error = %e, "move rejected");
            e
        })?;

        self.moved_this_round.insert((faction, truck));
        self.move_queue.push(MoveRecord {
            faction,
            truck,
            path: path.to_vec(),
            from: outcome.from,
            to: outcome.to,
            cost: outcome.cost,
        });
        Ok(outcome)
    }

    /// Queue an attack for the attack phase. Always accepted.
    pub fn queue_attack(&mut self, attacker: FactionId, defender: FactionId, requested: u32) {
        self.attack_queue.push(AttackIntent {
            attacker,
            defender,
            requested,
        });
    }

    /// Run one full round: movement, attack, upkeep, victory check
    pub fn run_round(&mut self) -> RoundReport {
        self.begin_round();

        let moves = self.movement_phase();
        let attacks = self.attack_phase();
        let upkeep = self.upkeep_phase();

        let eliminated: Vec<FactionId> = self
            .factions
            .iter()
            .filter(|f| f.is_eliminated())
            .map(|f| f.id)
            .collect();
        let winner = self.check_victory();

        tracing::info!(
            round = self.round,
            moves = moves.len(),
            attacks = attacks.len(),
            eliminated = eliminated.len(),
            "round complete"
        );
        if let Some(w) = winner {
            tracing::info!(winner = %w, round = self.round, "victory");
        }

        let report = RoundReport {
            round: self.round,
            moves,
            attacks,
            upkeep,
            eliminated,
            winner,
        };
        self.round += 1;
        report
    }

    /// Round-start transition: trucks get a fresh move and spent budgets
    /// are refilled.
    fn begin_round(&mut self) {
        self.moved_this_round.clear();
        let allowance = self.rules.movement.mp_per_round;
        for truck in self.factions.iter_mut().flat_map(|f| f.trucks.iter_mut()) {
            truck.refill_mp_if_exhausted(allowance);
        }
    }

    /// Moves were applied when queued; this phase hands them to the report.
    fn movement_phase(&mut self) -> Vec<MoveRecord> {
        std::mem::take(&mut self.move_queue)
    }

    fn attack_phase(&mut self) -> Vec<AttackSummary> {
        let intents = std::mem::take(&mut self.attack_queue);
        let combat = self.rules.combat.clone();
        let mut summaries = Vec::with_capacity(intents.len());

        for intent in intents {
            if intent.attacker == intent.defender {
                tracing::warn!(faction = %intent.attacker, "faction cannot attack itself; skipped");
                continue;
            }
            let att_idx = self.factions.iter().position(|f| f.id == intent.attacker);
            let def_idx = self.factions.iter().position(|f| f.id == intent.defender);
            let (Some(att_idx), Some(def_idx)) = (att_idx, def_idx) else {
                tracing::warn!(
                    attacker = %intent.attacker,
                    defender = %intent.defender,
                    "attack names an unknown faction; skipped"
                );
                continue;
            };

            let (soldiers, ammo) = {
                let att = &self.factions[att_idx];
                (att.soldiers, att.ammo)
            };
            let participating = intent.requested.min(soldiers).min(ammo);
            let defending = self.factions[def_idx].soldiers;

            let result = resolve_attack(
                participating,
                defending,
                ammo,
                combat.damage_ratio,
                combat.failure_loss_ratio,
                self.rolls.as_mut(),
            );

            let att = &mut self.factions[att_idx];
            att.ammo = att.ammo.saturating_sub(result.ammo_used);
            att.soldiers = att.soldiers.saturating_sub(result.attacker_loss);

            let def = &mut self.factions[def_idx];
            def.soldiers = def.soldiers.saturating_sub(result.damage);

            tracing::debug!(
                attacker = %intent.attacker,
                defender = %intent.defender,
                participating = result.participating,
                success = result.success,
                damage = result.damage,
                attacker_loss = result.attacker_loss,
                probability = result.probability,
                roll = result.roll,
                "attack resolved"
            );

            summaries.push(AttackSummary {
                attacker: intent.attacker,
                defender: intent.defender,
                requested: intent.requested,
                result,
            });
        }

        summaries
    }

    fn upkeep_phase(&mut self) -> Vec<UpkeepSummary> {
        let divisor = self.rules.combat.starvation_divisor.max(1);

        self.factions
            .iter_mut()
            .map(|f| {
                if f.food >= f.soldiers {
                    f.food -= f.soldiers;
                    return UpkeepSummary {
                        faction: f.id,
                        food_consumed: f.soldiers,
                        starvation_loss: 0,
                    };
                }

                let food_consumed = f.food;
                f.food = 0;
                let starvation_loss = if f.soldiers > 0 {
                    (f.soldiers / divisor).max(1)
                } else {
                    0
                };
                f.soldiers = f.soldiers.saturating_sub(starvation_loss);

                if starvation_loss > 0 {
                    tracing::debug!(faction = %f.id, starvation_loss, "faction starving");
                }

                UpkeepSummary {
                    faction: f.id,
                    food_consumed,
                    starvation_loss,
                }
            })
            .collect()
    }

    /// The sole faction with soldiers left, if there is exactly one
    pub fn check_victory(&self) -> Option<FactionId> {
        let mut alive = self.factions.iter().filter(|f| !f.is_eliminated());
        match (alive.next(), alive.next()) {
            (Some(only), None) => Some(only.id),
            _ => None,
        }
    }

    /// Send one of a faction's engineers to upgrade the road at `coord`
    pub fn start_upgrade(
        &mut self,
        faction: FactionId,
        engineer: EngineerId,
        coord: HexCoord,
    ) -> Result<()> {
        let turns = self.rules.engineering.upgrade_turns;
        let grid = &mut self.grid;
        let owner = self
            .factions
            .iter_mut()
            .find(|f| f.id == faction)
            .ok_or(GameError::FactionNotFound(faction))?;
        let unit = owner
            .get_engineer_mut(engineer)
            .ok_or(GameError::EngineerNotFound { faction, engineer })?;

        engineering::start_upgrade(grid, unit, coord, turns)?;
        Ok(())
    }

    /// Advance every running road upgrade by one round
    pub fn advance_upgrades(&mut self) -> Vec<HexCoord> {
        engineering::advance_upgrades(&mut self.grid)
    }

    /// Load cargo from one of a faction's warehouses onto one of its trucks
    ///
    /// No adjacency check is made here; see [`Self::is_adjacent_to_warehouse`].
    pub fn load(
        &mut self,
        faction: FactionId,
        truck: TruckId,
        warehouse: WarehouseId,
        resource: Resource,
        amount: u32,
    ) -> Result<()> {
        let owner = self.faction_mut(faction)?;
        match owner.truck_and_warehouse_mut(truck, warehouse) {
            (Some(t), Some(w)) => Ok(supply::load(w, t, resource, amount)?),
            (None, _) => Err(GameError::TruckNotFound { faction, truck }),
            (_, None) => Err(GameError::WarehouseNotFound { faction, warehouse }),
        }
    }

    /// Unload cargo from one of a faction's trucks into one of its warehouses
    pub fn unload(
        &mut self,
        faction: FactionId,
        truck: TruckId,
        warehouse: WarehouseId,
        resource: Resource,
        amount: u32,
    ) -> Result<()> {
        let owner = self.faction_mut(faction)?;
        match owner.truck_and_warehouse_mut(truck, warehouse) {
            (Some(t), Some(w)) => Ok(supply::unload(t, w, resource, amount)?),
            (None, _) => Err(GameError::TruckNotFound { faction, truck }),
            (_, None) => Err(GameError::WarehouseNotFound { faction, warehouse }),
        }
    }

    /// Whether a truck stands next to a warehouse of the same faction
    pub fn is_adjacent_to_warehouse(
        &self,
        faction: FactionId,
        truck: TruckId,
        warehouse: WarehouseId,
    ) -> bool {
        let Some(owner) = self.faction(faction) else {
            return false;
        };
        match (owner.get_truck(truck), owner.get_warehouse(warehouse)) {
            (Some(t), Some(w)) => self.grid.are_adjacent(&t.position, &w.position),
            _ => false,
        }
    }

    /// Current pools and truck positions of every faction
    pub fn status(&self) -> Vec<FactionStatus> {
        self.factions
            .iter()
            .map(|f| FactionStatus {
                id: f.id,
                name: f.name.clone(),
                soldiers: f.soldiers,
                ammo: f.ammo,
                food: f.food,
                engineers: f.engineers,
                trucks: f
                    .trucks
                    .iter()
                    .map(|t| TruckStatus {
                        id: t.id,
                        position: t.position,
                        remaining_mp: t.remaining_mp,
                        cargo: t.cargo,
                        moved_this_round: self.has_moved(f.id, t.id),
                    })
                    .collect(),
            })
            .collect()
    }
}

//! Rules configuration with documented constants
//!
//! Every tunable number of the simulation lives here. The defaults reproduce
//! the standard rule set; a TOML file can override any subset of them:
//!
//! ```toml
//! [movement]
//! mp_per_round = 8
//!
//! [engineering]
//! upgrade_turns = 2
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating rules
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rules TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rules: {0}")]
    Invalid(String),
}

/// Movement costs and budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementRules {
    /// Cost to enter a cell whose road has been upgraded
    pub upgraded_road_cost: u32,
    /// Cost to enter a cell with an ordinary road
    pub unupgraded_road_cost: u32,
    /// Cost charged for a cell that does not exist on the grid
    ///
    /// Large but finite so that cost sums never overflow into "infinity".
    pub impassable_cost: u32,
    /// Movement points a truck receives when its budget is refilled
    pub mp_per_round: u32,
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            upgraded_road_cost: 1,
            unupgraded_road_cost: 2,
            impassable_cost: 9999,
            mp_per_round: 6,
        }
    }
}

/// Combat and upkeep tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Fraction of participating attackers converted to damage on success
    pub damage_ratio: f64,
    /// Fraction of participating attackers lost on a failed attack
    pub failure_loss_ratio: f64,
    /// A starving faction loses `soldiers / starvation_divisor` (at least 1)
    pub starvation_divisor: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            damage_ratio: 0.4,
            failure_loss_ratio: 0.1,
            starvation_divisor: 10,
        }
    }
}

/// Road construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineeringRules {
    /// Rounds between starting an upgrade and the road being usable
    pub upgrade_turns: u32,
}

impl Default for EngineeringRules {
    fn default() -> Self {
        Self { upgrade_turns: 1 }
    }
}

/// Starting forces for the standard two-faction scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRules {
    pub initial_soldiers: u32,
    pub initial_ammo: u32,
    pub initial_food: u32,
    pub initial_engineers: u32,
    pub trucks_per_faction: u32,
    pub truck_capacity: u32,
    /// Half-width of the line map; cells span `-half_width..=half_width`
    pub half_width: i32,
}

impl Default for ScenarioRules {
    fn default() -> Self {
        Self {
            initial_soldiers: 20,
            initial_ammo: 20,
            initial_food: 40,
            initial_engineers: 2,
            trucks_per_faction: 2,
            truck_capacity: 10,
            half_width: 4,
        }
    }
}

/// Complete rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub movement: MovementRules,
    #[serde(default)]
    pub combat: CombatRules,
    #[serde(default)]
    pub engineering: EngineeringRules,
    #[serde(default)]
    pub scenario: ScenarioRules,
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate rules from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let rules: RulesConfig = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        if m.upgraded_road_cost == 0 || m.unupgraded_road_cost == 0 {
            return Err(ConfigError::Invalid("road costs must be at least 1".into()));
        }

        // The hex-distance heuristic assumes every step costs at least 1,
        // and upgraded roads are supposed to be the fast ones.
        if m.upgraded_road_cost > m.unupgraded_road_cost {
            return Err(ConfigError::Invalid(format!(
                "upgraded_road_cost ({}) should be <= unupgraded_road_cost ({})",
                m.upgraded_road_cost, m.unupgraded_road_cost
            )));
        }

        if m.impassable_cost <= m.unupgraded_road_cost {
            return Err(ConfigError::Invalid(format!(
                "impassable_cost ({}) should exceed unupgraded_road_cost ({})",
                m.impassable_cost, m.unupgraded_road_cost
            )));
        }

        if m.mp_per_round == 0 {
            return Err(ConfigError::Invalid("mp_per_round must be positive".into()));
        }

        let c = &self.combat;
        if !(0.0..=1.0).contains(&c.damage_ratio)
            || !(0.0..=1.0).contains(&c.failure_loss_ratio)
        {
            return Err(ConfigError::Invalid("combat ratios must lie within [0, 1]".into()));
        }

        if c.starvation_divisor == 0 {
            return Err(ConfigError::Invalid("starvation_divisor must be positive".into()));
        }

        if self.scenario.half_width < 2 {
            return Err(ConfigError::Invalid("scenario half_width must be at least 2".into()));
        }

        Ok(())
    }
}

/// Load rules from a TOML file
pub fn load_rules(path: &Path) -> Result<RulesConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    RulesConfig::from_toml_str(&contents)
}

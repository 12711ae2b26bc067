//! Session configuration
//!
//! Everything a session needs at start-up, loadable from JSON. Every section
//! and field has a default, so `{}` is a complete config describing the
//! standard 9-wide board.
//!
//! ```json
//! {
//!   "board": { "topology": "offset_columns", "width": 3, "height": 2,
//!              "rows": [[1, 3, 1], [1, 1, 1]] },
//!   "rules": { "mode": "lanes", "min_group_size": 3, "lanes": ["column", "row"] },
//!   "session": { "move_budget": 10 },
//!   "refill": { "policy": "bag", "seed": 7 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{standard_types, ElementCatalog, ElementType};
use crate::effects::PoolTags;
use crate::error::ConfigError;
use crate::hex::{HexMetrics, Topology};
use crate::layout::BoardLayout;
use crate::matcher::{Detector, DiscardPolicy, MatchMode};
use crate::resolver::CascadeRules;
use crate::rng::{ElementQueue, RefillPolicy};
use crate::types::{
    Coord, Lane, DEFAULT_CASCADE_STEP_CAP, DEFAULT_ELEMENT_TYPES, DEFAULT_MIN_GROUP_SIZE,
    DEFAULT_MOVE_BUDGET, DEFAULT_REFILL_ITERATION_CAP, DEFAULT_SEED, DEFAULT_SPECIAL_THRESHOLD,
};

/// Board shape; `rows` are listed bottom row first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub topology: Topology,
    pub rows: Vec<Vec<u8>>,
    /// Defaults to the playable cells of the top row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_points: Option<Vec<Coord>>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let layout = BoardLayout::diamond();
        Self {
            width: layout.width(),
            height: layout.height(),
            topology: layout.grid().topology(),
            rows: layout.rows(),
            spawn_points: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub mode: MatchMode,
    pub min_group_size: usize,
    pub special_threshold: usize,
    pub discard: DiscardPolicy,
    pub chain_specials: bool,
    /// Lanes scanned in lane mode
    pub lanes: Vec<Lane>,
    /// Logical steps allowed per turn
    pub step_cap: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            special_threshold: DEFAULT_SPECIAL_THRESHOLD,
            discard: DiscardPolicy::default(),
            chain_specials: false,
            lanes: Lane::STRAIGHT.to_vec(),
            step_cap: DEFAULT_CASCADE_STEP_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub move_budget: u32,
    /// Goals to destroy for a win; defaults to the goal tiles in the layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_count: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_budget: DEFAULT_MOVE_BUDGET,
            goal_count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefillConfig {
    pub policy: RefillPolicy,
    pub seed: u32,
    /// Spawn/compaction rounds allowed per refill
    pub iteration_cap: u32,
}

impl Default for RefillConfig {
    fn default() -> Self {
        Self {
            policy: RefillPolicy::default(),
            seed: DEFAULT_SEED,
            iteration_cap: DEFAULT_REFILL_ITERATION_CAP,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub elements: Vec<ElementType>,
    pub rules: RulesConfig,
    pub session: SessionConfig,
    pub refill: RefillConfig,
    pub pools: PoolTags,
    pub metrics: HexMetrics,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            elements: standard_types(DEFAULT_ELEMENT_TYPES),
            rules: RulesConfig::default(),
            session: SessionConfig::default(),
            refill: RefillConfig::default(),
            pools: PoolTags::default(),
            metrics: HexMetrics::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply `HEXMATCH_SEED` and `HEXMATCH_MOVES` when set and parseable
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        if let Some(seed) = env::var("HEXMATCH_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.refill.seed = seed;
        }
        if let Some(moves) = env::var("HEXMATCH_MOVES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.session.move_budget = moves;
        }
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.refill.seed = seed;
        self
    }

    pub fn with_move_budget(mut self, moves: u32) -> Self {
        self.session.move_budget = moves;
        self
    }

    pub fn with_goal_count(mut self, goals: u32) -> Self {
        self.session.goal_count = Some(goals);
        self
    }

    /// Replace the board; oversized pictures saturate at 255 and fail `validate`
    pub fn with_layout(mut self, topology: Topology, rows: Vec<Vec<u8>>) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        self.board.width = u8::try_from(width).unwrap_or(u8::MAX);
        self.board.height = u8::try_from(rows.len()).unwrap_or(u8::MAX);
        self.board.topology = topology;
        self.board.rows = rows;
        self.board.spawn_points = None;
        self
    }

    pub fn with_elements(mut self, elements: Vec<ElementType>) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Check every section; returns the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = self.layout()?;
        self.catalog()?;
        let rules = &self.rules;
        if rules.min_group_size == 0
            || rules.special_threshold <= rules.min_group_size
            || (rules.mode == MatchMode::Lanes && rules.lanes.is_empty())
        {
            return Err(ConfigError::InvalidThresholds {
                min_group_size: rules.min_group_size,
                special_threshold: rules.special_threshold,
            });
        }
        if self.session.move_budget == 0 {
            return Err(ConfigError::InvalidMoveBudget);
        }
        let goal_count = self.goal_count_for(&layout);
        let goal_tiles = layout.goal_count();
        if goal_count == 0 || goal_count as usize > goal_tiles {
            return Err(ConfigError::InvalidGoalCount {
                goal_count,
                goal_tiles,
            });
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        let b = &self.board;
        let width = usize::from(b.width);
        if let Some((row, r)) = b.rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ConfigError::RowLength {
                row,
                expected: width,
                actual: r.len(),
            });
        }
        let codes: Vec<u8> = b.rows.iter().flatten().copied().collect();
        BoardLayout::from_codes(b.width, b.height, b.topology, &codes, b.spawn_points.clone())
    }

    pub fn catalog(&self) -> Result<ElementCatalog, ConfigError> {
        ElementCatalog::new(self.elements.clone())
    }

    pub fn detector(&self) -> Detector {
        let r = &self.rules;
        let detector = match r.mode {
            MatchMode::Cluster => Detector::cluster(r.min_group_size),
            MatchMode::Lanes => Detector::lanes(r.min_group_size, &r.lanes),
        };
        detector.with_discard(r.discard)
    }

    pub fn cascade_rules(&self) -> CascadeRules {
        CascadeRules {
            special_threshold: self.rules.special_threshold,
            chain_specials: self.rules.chain_specials,
            refill_cap: self.refill.iteration_cap,
            step_cap: self.rules.step_cap,
        }
    }

    pub fn type_source(&self) -> ElementQueue {
        ElementQueue::new(self.refill.policy, self.refill.seed)
    }

    /// Goals needed for a win given the configured layout
    pub fn goal_count(&self) -> Result<u32, ConfigError> {
        Ok(self.goal_count_for(&self.layout()?))
    }

    fn goal_count_for(&self, layout: &BoardLayout) -> u32 {
        self.session
            .goal_count
            .unwrap_or(layout.goal_count() as u32)
    }
}

//! Cascade resolver - one player turn as an explicit state machine
//!
//! ```text
//! Idle --request_swap--> Swapping --step--> Resolving --step--> Resolving ...
//!                                              |  (round found matches: remove, refill)
//!                                              +--step--> Settling --step--> Idle
//!                                                 (round found nothing; an unmatched
//!                                                  player swap is restored first)
//! ```
//!
//! Each call to [`Resolver::step`] performs one logical transition, so a host
//! can spread a turn over frames while a headless caller simply runs
//! [`Resolver::run_until_idle`]. Events produced by a step are queued and
//! handed out by [`Resolver::drain_events`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Board, GoalHit, Occupant};
use crate::catalog::ElementCatalog;
use crate::effects::{EffectsSink, PoolTags};
use crate::error::{ConfigError, SwapError};
use crate::matcher::{dominant_lane, Detector, MatchGroup};
use crate::refill::{fill_until_full, RefillReport};
use crate::rng::{FillMode, TypeSource};
use crate::types::{
    Coord, GameEvent, Lane, TurnPhase, DEFAULT_CASCADE_STEP_CAP, DEFAULT_REFILL_ITERATION_CAP,
    DEFAULT_SPECIAL_THRESHOLD, GOAL_DELTA, MOVE_DELTA,
};

/// Removal rules applied by each resolution round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeRules {
    /// Groups at least this large leave one empowered element behind
    pub special_threshold: usize,
    /// Whether a lane sweep triggers the specials it hits
    pub chain_specials: bool,
    /// Spawn/compaction rounds allowed per refill
    pub refill_cap: u32,
    /// Logical steps allowed per turn
    pub step_cap: u32,
}

impl Default for CascadeRules {
    fn default() -> Self {
        Self {
            special_threshold: DEFAULT_SPECIAL_THRESHOLD,
            chain_specials: false,
            refill_cap: DEFAULT_REFILL_ITERATION_CAP,
            step_cap: DEFAULT_CASCADE_STEP_CAP,
        }
    }
}

pub struct Resolver<E: EffectsSink> {
    board: Board,
    catalog: ElementCatalog,
    detector: Detector,
    rules: CascadeRules,
    source: Box<dyn TypeSource>,
    effects: E,
    pools: PoolTags,
    phase: TurnPhase,
    /// Player swap awaiting its first resolution round
    pending_swap: Option<(Coord, Coord)>,
    /// Rounds with matches in the current turn
    round: u32,
    outbox: Vec<GameEvent>,
}

impl<E: EffectsSink> Resolver<E> {
    /// Resolver over `board` as given; call [`Resolver::initialize`] to place
    /// goals and run the first fill
    pub fn new(
        board: Board,
        catalog: ElementCatalog,
        detector: Detector,
        rules: CascadeRules,
        source: Box<dyn TypeSource>,
        effects: E,
    ) -> Self {
        Self {
            board,
            catalog,
            detector,
            rules,
            source,
            effects,
            pools: PoolTags::default(),
            phase: TurnPhase::Idle,
            pending_swap: None,
            round: 0,
            outbox: Vec::new(),
        }
    }

    pub fn with_pools(mut self, pools: PoolTags) -> Self {
        self.pools = pools;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for hosts and fixtures; only meaningful while idle
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn rules(&self) -> &CascadeRules {
        &self.rules
    }

    pub fn pools(&self) -> &PoolTags {
        &self.pools
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// True while a turn is in flight (new swaps are rejected)
    pub fn is_resolving(&self) -> bool {
        self.phase != TurnPhase::Idle
    }

    pub fn pending_swap(&self) -> Option<(Coord, Coord)> {
        self.pending_swap
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Release every visual, place goals and run the first fill
    ///
    /// Leaves the resolver in `Resolving` so ready-made matches of the opening
    /// board are resolved by the next steps.
    pub fn initialize(&mut self) -> Result<RefillReport, ConfigError> {
        self.board.release_all(&mut self.effects);
        self.pending_swap = None;
        self.round = 0;
        self.outbox.clear();
        self.phase = TurnPhase::Idle;

        self.board.populate_goals(&mut self.effects, &self.pools.goal);
        let report = fill_until_full(
            &mut self.board,
            &self.catalog,
            self.source.as_mut(),
            FillMode::Initial,
            &mut self.effects,
            &self.pools.element,
            self.rules.refill_cap,
        )?;
        debug!(
            iterations = report.iterations,
            spawned = report.spawned.len(),
            "board filled"
        );
        self.phase = TurnPhase::Resolving;
        Ok(report)
    }

    /// Discard any turn in flight and start a new episode from the first fill
    pub fn reset(&mut self) -> Result<RefillReport, ConfigError> {
        self.source.reset();
        self.initialize()
    }

    /// Release every visual still on the board
    pub fn release_all(&mut self) {
        self.board.release_all(&mut self.effects);
    }

    /// Start a turn by swapping two adjacent elements
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<(), SwapError> {
        if self.phase != TurnPhase::Idle {
            warn!(phase = %self.phase, %a, %b, "swap rejected while a turn is in flight");
            return Err(SwapError::StateConflict { phase: self.phase });
        }
        self.board.swap(a, b)?;
        self.pending_swap = Some((a, b));
        self.round = 0;
        self.phase = TurnPhase::Swapping;
        debug!(%a, %b, "swap accepted");
        Ok(())
    }

    /// Advance one transition; returns the phase after it
    pub fn step(&mut self) -> Result<TurnPhase, ConfigError> {
        self.phase = match self.phase {
            TurnPhase::Idle => TurnPhase::Idle,
            TurnPhase::Swapping => TurnPhase::Resolving,
            TurnPhase::Resolving => self.resolve_round()?,
            TurnPhase::Settling => TurnPhase::Idle,
        };
        Ok(self.phase)
    }

    /// Step until `Idle`; returns the steps taken
    pub fn run_until_idle(&mut self) -> Result<u32, ConfigError> {
        let mut steps = 0;
        while self.phase != TurnPhase::Idle {
            if steps >= self.rules.step_cap {
                warn!(steps, "turn did not settle");
                return Err(ConfigError::CascadeLimit { steps });
            }
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Events queued since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn resolve_round(&mut self) -> Result<TurnPhase, ConfigError> {
        let groups = self.detector.detect(&self.board, &self.catalog);
        if groups.is_empty() {
            if let Some((a, b)) = self.pending_swap.take() {
                self.board.exchange(a, b);
                debug!(%a, %b, "swap produced no match, restored");
            }
            return Ok(TurnPhase::Settling);
        }

        self.round += 1;
        let pending = self.pending_swap.take();
        debug!(
            round = self.round,
            groups = groups.len(),
            cells = groups.iter().map(MatchGroup::len).sum::<usize>(),
            player_move = pending.is_some(),
            "resolving matches"
        );

        self.outbox.push(GameEvent::AutoMatchesFound {
            groups: groups.iter().map(|g| g.cells.clone()).collect(),
        });
        if pending.is_some() {
            self.outbox.push(GameEvent::SuccessfulMove { delta: MOVE_DELTA });
        }

        self.remove_groups(&groups, pending);

        fill_until_full(
            &mut self.board,
            &self.catalog,
            self.source.as_mut(),
            FillMode::Refill,
            &mut self.effects,
            &self.pools.element,
            self.rules.refill_cap,
        )?;
        Ok(TurnPhase::Resolving)
    }

    fn remove_groups(&mut self, groups: &[MatchGroup], pending: Option<(Coord, Coord)>) {
        let conversions: Vec<(Coord, Lane)> = groups
            .iter()
            .filter_map(|g| self.pick_special(g, pending))
            .collect();
        let converted = |c: Coord| conversions.iter().any(|&(k, _)| k == c);

        let mut sweeps = VecDeque::new();
        let mut triggered = Vec::new();
        for group in groups {
            for &c in &group.cells {
                if converted(c) {
                    continue;
                }
                if let Some(lane) = self.board.element(c).and_then(|e| e.charge) {
                    triggered.push(c);
                    sweeps.push_back((c, lane));
                }
                self.collect(c);
                for n in self.board.neighbors(c) {
                    if self.board.goal(n).is_some() {
                        self.hit_goal(n);
                    }
                }
            }
        }

        while let Some((origin, lane)) = sweeps.pop_front() {
            let slot = self.outbox.len();
            let origin_pos = self.board.world_pos(origin);
            self.effects.play_effect(&self.pools.sweep_effect, origin_pos);

            let mut swept = 0;
            for c in self.board.grid().lane_path(origin, lane) {
                if converted(c) {
                    continue;
                }
                match self.board.get(c).copied() {
                    Some(Occupant::Element(e)) => {
                        if let Some(next_lane) = e.charge {
                            if self.rules.chain_specials && !triggered.contains(&c) {
                                triggered.push(c);
                                sweeps.push_back((c, next_lane));
                            }
                        }
                        self.collect(c);
                        swept += 1;
                    }
                    Some(Occupant::Goal(_)) => self.hit_goal(c),
                    _ => {}
                }
            }
            debug!(%origin, lane = lane.as_str(), swept, "lane swept");
            self.outbox.insert(
                slot,
                GameEvent::SpecialTriggered {
                    at: origin,
                    lane,
                    swept,
                },
            );
        }

        for (at, lane) in conversions {
            self.board.set_charge(at, lane);
            let pos = self.board.world_pos(at);
            self.effects
                .play_effect(&self.pools.special_created_effect, pos);
            self.outbox.push(GameEvent::SpecialCreated { at, lane });
        }
    }

    /// Cell of a large group that becomes special, with its lane
    fn pick_special(
        &self,
        group: &MatchGroup,
        pending: Option<(Coord, Coord)>,
    ) -> Option<(Coord, Lane)> {
        if group.len() < self.rules.special_threshold {
            return None;
        }
        let eligible = |c: Coord| self.board.element(c).is_some_and(|e| !e.is_special());
        let at = pending
            .into_iter()
            .flat_map(|(a, b)| [a, b])
            .find(|&c| group.contains(c) && eligible(c))
            .or_else(|| group.cells.iter().copied().find(|&c| eligible(c)))?;
        let lane = group
            .lane
            .unwrap_or_else(|| dominant_lane(&self.board, &self.catalog, &group.cells, at));
        Some((at, lane))
    }

    /// Remove an element with its collection effect
    fn collect(&mut self, c: Coord) {
        if let Some(kind) = self.board.element_kind(c) {
            let pos = self.board.world_pos(c);
            if let Some(t) = self.catalog.get(kind) {
                self.effects.play_effect(&t.effect_tag, pos);
            }
        }
        self.board.clear(c, &mut self.effects);
    }

    fn hit_goal(&mut self, c: Coord) {
        let pos = self.board.world_pos(c);
        match self.board.hit_goal(c, &mut self.effects) {
            Some(GoalHit::Damaged { health }) => {
                self.effects.play_effect(&self.pools.goal_hit_effect, pos);
                self.outbox.push(GameEvent::GoalDamaged { at: c, health });
            }
            Some(GoalHit::Destroyed) => {
                self.effects
                    .play_effect(&self.pools.goal_destroyed_effect, pos);
                debug!(at = %c, "goal destroyed");
                self.outbox.push(GameEvent::GoalDestroyed {
                    at: c,
                    delta: GOAL_DELTA,
                });
            }
            None => {}
        }
    }
}

impl<E: EffectsSink> std::fmt::Debug for Resolver<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("phase", &self.phase)
            .field("pending_swap", &self.pending_swap)
            .field("round", &self.round)
            .field("rules", &self.rules)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Element;
    use crate::effects::RecordingEffects;
    use crate::hex::HexMetrics;
    use crate::layout::BoardLayout;
    use crate::rng::{ElementQueue, ScriptedSource};
    use crate::types::ElementId;

    const FIRST_FILL: [&str; 5] = [
        "c . . . . . . . b",
        "c a . . . . . e d",
        "b a d . . . c b c",
        "a e d b . a e a b",
        "b d c 2 e 2 d e c",
    ];

    fn painted(rows: &[&str]) -> Board {
        let mut board = Board::new(BoardLayout::diamond(), HexMetrics::default());
        board.paint(rows).unwrap();
        board
    }

    fn resolver_with(board: Board, rules: CascadeRules) -> Resolver<RecordingEffects> {
        let refills = (0..5).map(ElementId).collect();
        Resolver::new(
            board,
            ElementCatalog::standard(5).unwrap(),
            Detector::default(),
            rules,
            Box::new(ScriptedSource::new(refills)),
            RecordingEffects::new(),
        )
    }

    fn resolver(rows: &[&str]) -> Resolver<RecordingEffects> {
        resolver_with(painted(rows), CascadeRules::default())
    }

    fn kinds(board: &Board) -> Vec<Option<ElementId>> {
        board.coords().map(|c| board.element_kind(c)).collect()
    }

    fn goal_health(board: &Board) -> Vec<Option<u8>> {
        board.coords().map(|c| board.goal(c).map(|g| g.health)).collect()
    }

    fn assert_board(board: &Board, rows: &[&str]) {
        let expected = painted(rows);
        assert_eq!(kinds(board), kinds(&expected));
        assert_eq!(goal_health(board), goal_health(&expected));
    }

    fn c(x: i16, y: i16) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_unmatched_swap_is_restored() {
        let mut r = resolver(&FIRST_FILL);
        r.request_swap(c(0, 0), c(0, 1)).unwrap();
        assert_eq!(r.phase(), TurnPhase::Swapping);
        assert_eq!(r.run_until_idle().unwrap(), 3);
        assert!(r.drain_events().is_empty());
        assert_board(r.board(), &FIRST_FILL);
        assert_eq!(r.pending_swap(), None);
    }

    #[test]
    fn test_matched_swap_resolves_and_refills() {
        let mut r = resolver(&FIRST_FILL);
        r.request_swap(c(0, 1), c(0, 2)).unwrap();
        assert_eq!(r.step().unwrap(), TurnPhase::Resolving);
        assert_eq!(r.step().unwrap(), TurnPhase::Resolving);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(0, 2), c(1, 2), c(1, 3)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
            ]
        );
        assert_eq!(r.step().unwrap(), TurnPhase::Settling);
        assert_eq!(r.step().unwrap(), TurnPhase::Idle);
        assert!(r.board().is_full());
        assert_board(
            r.board(),
            &[
                "c . . . . . . . b",
                "a b . . . . . e d",
                "c c d . . . c b c",
                "b e d b . a e a b",
                "b d c 2 e 2 d e c",
            ],
        );
        let bursts = r
            .effects()
            .effect_tags()
            .into_iter()
            .filter(|t| *t == "red_burst")
            .count();
        assert_eq!(bursts, 3);
    }

    #[test]
    fn test_cascade_damages_and_destroys_goals() {
        let mut r = resolver(&FIRST_FILL);
        r.request_swap(c(1, 0), c(1, 1)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 7);
        assert_eq!(r.round(), 4);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(1, 1), c(2, 1), c(2, 2)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::GoalDamaged {
                    at: c(3, 0),
                    health: 1,
                },
                GameEvent::AutoMatchesFound {
                    groups: vec![
                        vec![c(2, 1), c(2, 2), c(1, 2)],
                        vec![c(0, 2), c(0, 3), c(0, 4)],
                    ],
                },
                GameEvent::GoalDestroyed {
                    at: c(3, 0),
                    delta: GOAL_DELTA,
                },
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(4, 0), c(3, 1), c(2, 1), c(1, 1)]],
                },
                GameEvent::GoalDamaged {
                    at: c(5, 0),
                    health: 1,
                },
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(7, 2), c(7, 3), c(8, 4)]],
                },
            ]
        );
        // The destroyed goal's cell is refilled like any other.
        assert_board(
            r.board(),
            &[
                "d . . . . . . . b",
                "e c . . . . . a e",
                "a d a . . . e d c",
                "a d e c . c e a b",
                "b e c e a 1 d e c",
            ],
        );
    }

    #[test]
    fn test_large_group_leaves_special_on_swapped_cell() {
        let mut r = resolver(&[
            "b . . . . . . . c",
            "b e . . . . . e d",
            "d a b . . . b e c",
            "e b c b . e d d a",
            "a d b 2 c 2 b a d",
        ]);
        r.request_swap(c(1, 1), c(1, 2)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 4);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(3, 1), c(2, 2), c(1, 2), c(0, 3), c(0, 4)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::GoalDamaged {
                    at: c(3, 0),
                    health: 1,
                },
                GameEvent::SpecialCreated {
                    at: c(1, 2),
                    lane: Lane::Rising,
                },
            ]
        );
        let special = r.board().element(c(1, 2)).unwrap();
        assert_eq!(special.kind, ElementId(1));
        assert_eq!(special.charge, Some(Lane::Rising));
        assert_board(
            r.board(),
            &[
                "d . . . . . . . c",
                "a c . . . . . e d",
                "d b b . . . b e c",
                "e a c e . e d d a",
                "a d b 1 c 2 b a d",
            ],
        );
        assert!(r.effects().effect_tags().contains(&"special_created"));
    }

    #[test]
    fn test_special_in_group_sweeps_its_lane() {
        let mut r = resolver(&[
            "c . . . . . . . d",
            "d e . . . . . c d",
            "A d a . . . d e a",
            "d a b a . a c c e",
            "d c b 2 c 2 d a d",
        ]);
        r.request_swap(c(1, 2), c(2, 2)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 4);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(1, 1), c(1, 2), c(0, 2)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::SpecialTriggered {
                    at: c(0, 2),
                    lane: Lane::Column,
                    swept: 4,
                },
            ]
        );
        assert_board(
            r.board(),
            &[
                "b . . . . . . . d",
                "e a . . . . . c d",
                "c d d . . . d e a",
                "b e b a . a c c e",
                "a c b 2 c 2 d a d",
            ],
        );
    }

    const CHAINED: [&str; 5] = [
        "B . . . . . . . c",
        "c b . . . . . c a",
        "A c e . . . a e c",
        "a e a c . d d c d",
        "e d e 2 a 2 a a e",
    ];

    fn chained(chain_specials: bool) -> Resolver<RecordingEffects> {
        let mut board = painted(&CHAINED);
        assert!(board.set_charge(c(0, 4), Lane::Falling));
        let rules = CascadeRules {
            chain_specials,
            ..CascadeRules::default()
        };
        let mut r = resolver_with(board, rules);
        r.request_swap(c(1, 2), c(2, 1)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 4);
        r
    }

    #[test]
    fn test_swept_special_is_removed_without_chaining() {
        let mut r = chained(false);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(0, 1), c(0, 2), c(1, 2)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::SpecialTriggered {
                    at: c(0, 2),
                    lane: Lane::Column,
                    swept: 3,
                },
            ]
        );
        assert_board(
            r.board(),
            &[
                "a . . . . . . . c",
                "d e . . . . . c a",
                "c b e . . . a e c",
                "b e c c . d d c d",
                "a d e 2 a 2 a a e",
            ],
        );
    }

    #[test]
    fn test_swept_special_triggers_when_chaining() {
        let mut r = chained(true);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(0, 1), c(0, 2), c(1, 2)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::SpecialTriggered {
                    at: c(0, 2),
                    lane: Lane::Column,
                    swept: 3,
                },
                GameEvent::SpecialTriggered {
                    at: c(0, 4),
                    lane: Lane::Falling,
                    swept: 7,
                },
                GameEvent::GoalDamaged {
                    at: c(5, 0),
                    health: 1,
                },
            ]
        );
        assert_board(
            r.board(),
            &[
                "c . . . . . . . d",
                "c b . . . . . b c",
                "d a a . . . e c a",
                "b e c e . c a e c",
                "a d e 2 d 1 d c d",
            ],
        );
    }

    #[test]
    fn test_lane_mode_special_takes_run_lane_and_sweeps_it() {
        let refills = (0..5).map(ElementId).collect();
        let mut r = Resolver::new(
            painted(&[
                "a . . . . . . . b",
                "d a . . . . . c c",
                "e a e . . . e d d",
                "d e c a . b b c e",
                "d b b 2 a 2 c d e",
            ]),
            ElementCatalog::standard(5).unwrap(),
            Detector::lanes(3, &Lane::STRAIGHT),
            CascadeRules::default(),
            Box::new(ScriptedSource::new(refills)),
            RecordingEffects::new(),
        );

        // Completes the falling lane (0,4) .. (4,0).
        r.request_swap(c(2, 2), c(1, 2)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 4);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(0, 4), c(1, 3), c(2, 2), c(3, 1), c(4, 0)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::GoalDamaged {
                    at: c(3, 0),
                    health: 1,
                },
                GameEvent::GoalDamaged {
                    at: c(5, 0),
                    health: 1,
                },
                GameEvent::GoalDestroyed {
                    at: c(3, 0),
                    delta: GOAL_DELTA,
                },
                GameEvent::SpecialCreated {
                    at: c(2, 2),
                    lane: Lane::Falling,
                },
            ]
        );
        assert_board(
            r.board(),
            &[
                "e . . . . . . . c",
                "a d . . . . . b c",
                "e d b . . . c d d",
                "d e e a . e b c e",
                "d b b c b 1 c d e",
            ],
        );
        // Compaction carried the special down to (3,1).
        let special = r.board().element(c(3, 1)).unwrap();
        assert_eq!(special.kind, ElementId(0));
        assert_eq!(special.charge, Some(Lane::Falling));

        // Line it up on the rising lane (1,1) (2,1) (3,1).
        let red = || Occupant::Element(Element::new(ElementId(0)));
        r.board_mut().set(c(1, 1), red()).unwrap();
        r.board_mut().set(c(2, 0), red()).unwrap();
        r.request_swap(c(2, 0), c(2, 1)).unwrap();
        assert_eq!(r.run_until_idle().unwrap(), 5);
        assert_eq!(
            r.drain_events(),
            vec![
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(1, 1), c(2, 1), c(3, 1)]],
                },
                GameEvent::SuccessfulMove { delta: MOVE_DELTA },
                GameEvent::SpecialTriggered {
                    at: c(3, 1),
                    lane: Lane::Falling,
                    swept: 7,
                },
                GameEvent::GoalDestroyed {
                    at: c(5, 0),
                    delta: GOAL_DELTA,
                },
                GameEvent::AutoMatchesFound {
                    groups: vec![vec![c(0, 2), c(1, 2), c(2, 2)]],
                },
            ]
        );
        assert_board(
            r.board(),
            &[
                "d . . . . . . . a",
                "e c . . . . . d c",
                "b c b . . . b b c",
                "d e d d . e c d d",
                "d b e c c e b c e",
            ],
        );
    }

    #[test]
    fn test_swap_rejected_while_turn_in_flight() {
        let mut r = resolver(&FIRST_FILL);
        r.request_swap(c(0, 1), c(0, 2)).unwrap();
        let err = r.request_swap(c(7, 1), c(8, 1)).unwrap_err();
        assert_eq!(
            err,
            SwapError::StateConflict {
                phase: TurnPhase::Swapping
            }
        );
        r.step().unwrap();
        assert!(r.is_resolving());
        assert!(r.request_swap(c(7, 1), c(8, 1)).is_err());
    }

    #[test]
    fn test_invalid_swap_leaves_turn_idle() {
        let mut r = resolver(&FIRST_FILL);
        let err = r.request_swap(c(0, 0), c(8, 0)).unwrap_err();
        assert!(matches!(err, SwapError::InvalidSwap { .. }));
        assert_eq!(r.phase(), TurnPhase::Idle);
        assert_board(r.board(), &FIRST_FILL);
    }

    #[test]
    fn test_idle_step_is_a_no_op() {
        let mut r = resolver(&FIRST_FILL);
        assert_eq!(r.step().unwrap(), TurnPhase::Idle);
        assert_eq!(r.run_until_idle().unwrap(), 0);
    }

    #[test]
    fn test_initialize_fills_and_settles() {
        let board = Board::new(BoardLayout::diamond(), HexMetrics::default());
        let mut r = Resolver::new(
            board,
            ElementCatalog::standard(5).unwrap(),
            Detector::default(),
            CascadeRules::default(),
            Box::new(ElementQueue::default()),
            RecordingEffects::new(),
        );
        let report = r.initialize().unwrap();
        assert_eq!(report.iterations, 14);
        assert_eq!(r.phase(), TurnPhase::Resolving);
        assert_eq!(r.run_until_idle().unwrap(), 2);
        assert!(r.drain_events().is_empty());
        assert_board(r.board(), &FIRST_FILL);
        assert_eq!(r.effects().live_handles().len(), 29);

        r.reset().unwrap();
        assert_eq!(r.effects().live_handles().len(), 29);
        assert_eq!(r.effects().stale_releases(), 0);
        r.run_until_idle().unwrap();
        assert_board(r.board(), &FIRST_FILL);
    }

    #[test]
    fn test_step_cap_bounds_a_turn() {
        let rules = CascadeRules {
            step_cap: 2,
            ..CascadeRules::default()
        };
        let mut r = resolver_with(painted(&FIRST_FILL), rules);
        r.request_swap(c(1, 0), c(1, 1)).unwrap();
        let err = r.run_until_idle().unwrap_err();
        assert!(matches!(err, ConfigError::CascadeLimit { steps: 2 }));
    }
}

//! Session - move budget, goal counter and the game-over flag around a resolver
//!
//! The session forwards every resolver event to its listeners after applying
//! it to the counters:
//!
//! | Event | Counter |
//! |-------|---------|
//! | `SuccessfulMove { delta }` | `moves_left += delta` |
//! | `GoalDestroyed { delta }` | `goals_left += delta` |
//!
//! The game is won as soon as `goals_left` reaches zero, even in the middle of
//! a cascade. It is lost when a turn settles with no moves left and goals still
//! standing. Either outcome is terminal until [`Session::restart`].
//!
//! A new or restarted session is `Resolving`: the opening board is settled by
//! the first steps, so hosts should run it to idle before accepting input.

use tracing::{info, warn};

use crate::board::Board;
use crate::config::GameConfig;
use crate::effects::{EffectsSink, NullEffects};
use crate::error::{ConfigError, HexMatchError, SwapError};
use crate::events::{EventBus, Listener};
use crate::resolver::Resolver;
use crate::rng::TypeSource;
use crate::snapshot::{BoardSnapshot, SessionSnapshot};
use crate::types::{Coord, GameEvent, GameOutcome, TurnPhase};

pub struct Session<E: EffectsSink> {
    config: GameConfig,
    resolver: Resolver<E>,
    bus: EventBus,
    moves_left: u32,
    goals_left: u32,
    outcome: Option<GameOutcome>,
    episode: u32,
    /// Events published since the last accepted swap
    turn_log: Vec<GameEvent>,
}

impl Session<NullEffects> {
    /// Session without a visual layer
    pub fn headless(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, NullEffects::default())
    }
}

impl<E: EffectsSink> Session<E> {
    /// Session drawing element types from the configured refill policy
    pub fn new(config: GameConfig, effects: E) -> Result<Self, ConfigError> {
        let source = Box::new(config.type_source());
        Self::with_source(config, effects, source)
    }

    /// Session with an explicit type source (replays, fixtures)
    pub fn with_source(
        config: GameConfig,
        effects: E,
        source: Box<dyn TypeSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.layout()?, config.metrics);
        let resolver = Resolver::new(
            board,
            config.catalog()?,
            config.detector(),
            config.cascade_rules(),
            source,
            effects,
        )
        .with_pools(config.pools.clone());

        let mut session = Self {
            moves_left: config.session.move_budget,
            goals_left: config.goal_count()?,
            config,
            resolver,
            bus: EventBus::new(),
            outcome: None,
            episode: 1,
            turn_log: Vec::new(),
        };
        session.resolver.initialize()?;
        info!(
            moves = session.moves_left,
            goals = session.goals_left,
            seed = session.config.refill.seed,
            "session started"
        );
        Ok(session)
    }

    /// Listeners are called in subscription order
    pub fn subscribe(&mut self, listener: impl Listener + 'static) {
        self.bus.subscribe(listener);
    }

    /// Start a turn
    ///
    /// Rejected without side effects when the game is over, a turn is in
    /// flight, or the swap itself is invalid.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<(), SwapError> {
        if let Some(outcome) = self.outcome {
            warn!(%outcome, %a, %b, "swap rejected after game over");
            return Err(SwapError::SessionOver { outcome });
        }
        self.resolver.request_swap(a, b)?;
        self.turn_log.clear();
        Ok(())
    }

    /// Advance the turn by one transition and publish its events
    pub fn step(&mut self) -> Result<TurnPhase, ConfigError> {
        let phase = self.resolver.step()?;
        for event in self.resolver.drain_events() {
            self.dispatch(event);
        }
        if phase == TurnPhase::Idle
            && self.outcome.is_none()
            && self.moves_left == 0
            && self.goals_left > 0
        {
            self.finish(GameOutcome::Lost);
        }
        Ok(phase)
    }

    /// Step until idle; returns the steps taken
    pub fn run_until_idle(&mut self) -> Result<u32, ConfigError> {
        let cap = self.resolver.rules().step_cap;
        let mut steps = 0;
        while self.resolver.is_resolving() {
            if steps >= cap {
                warn!(steps, "turn did not settle");
                return Err(ConfigError::CascadeLimit { steps });
            }
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Swap and resolve the whole turn; returns the events it published
    pub fn play_swap(&mut self, a: Coord, b: Coord) -> Result<Vec<GameEvent>, HexMatchError> {
        self.request_swap(a, b)?;
        self.run_until_idle()?;
        Ok(self.turn_log.clone())
    }

    /// Drop any turn in flight, release every visual and start a new episode
    /// with fresh counters and the same opening board
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.resolver.reset()?;
        self.moves_left = self.config.session.move_budget;
        self.goals_left = self.config.goal_count()?;
        self.outcome = None;
        self.episode += 1;
        self.turn_log.clear();
        info!(episode = self.episode, "session restarted");
        Ok(())
    }

    /// Replace the board contents from a picture (see [`Board::paint`])
    ///
    /// Existing visuals are released; painted cells carry no visual handle.
    /// Only allowed between turns.
    pub fn paint(&mut self, rows: &[&str]) -> Result<(), HexMatchError> {
        if self.resolver.is_resolving() {
            return Err(SwapError::StateConflict {
                phase: self.resolver.phase(),
            }
            .into());
        }
        let mut board = self.resolver.board().clone();
        board.paint(rows)?;
        self.resolver.release_all();
        *self.resolver.board_mut() = board;
        Ok(())
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::SuccessfulMove { delta } => {
                self.moves_left = self.moves_left.saturating_add_signed(delta);
            }
            GameEvent::GoalDestroyed { delta, .. } => {
                self.goals_left = self.goals_left.saturating_add_signed(delta);
            }
            _ => {}
        }
        let goal_destroyed = matches!(event, GameEvent::GoalDestroyed { .. });
        self.publish(event);
        if goal_destroyed && self.goals_left == 0 && self.outcome.is_none() {
            self.finish(GameOutcome::Won);
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
        info!(
            %outcome,
            moves_left = self.moves_left,
            goals_left = self.goals_left,
            episode = self.episode,
            "game over"
        );
        self.publish(GameEvent::GameOver {
            won: outcome.is_win(),
        });
    }

    fn publish(&mut self, event: GameEvent) {
        self.bus.publish(&event);
        self.turn_log.push(event);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        self.resolver.board()
    }

    pub fn resolver(&self) -> &Resolver<E> {
        &self.resolver
    }

    pub fn effects(&self) -> &E {
        self.resolver.effects()
    }

    pub fn effects_mut(&mut self) -> &mut E {
        self.resolver.effects_mut()
    }

    pub fn phase(&self) -> TurnPhase {
        self.resolver.phase()
    }

    /// True while new swap gestures should be ignored
    pub fn is_resolving(&self) -> bool {
        self.resolver.is_resolving()
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn goals_left(&self) -> u32 {
        self.goals_left
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Events published since the last accepted swap (or restart)
    pub fn turn_events(&self) -> &[GameEvent] {
        &self.turn_log
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: BoardSnapshot::from_board(self.board()),
            phase: self.phase(),
            moves_left: self.moves_left,
            goals_left: self.goals_left,
            outcome: self.outcome,
            episode: self.episode,
        }
    }
}

impl<E: EffectsSink> std::fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("resolver", &self.resolver)
            .field("moves_left", &self.moves_left)
            .field("goals_left", &self.goals_left)
            .field("outcome", &self.outcome)
            .field("episode", &self.episode)
            .finish_non_exhaustive()
    }
}

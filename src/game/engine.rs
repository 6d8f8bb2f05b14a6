use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    food,
    state::{GameOverReason, GameState, Phase, Position},
};

/// What happened during one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set when this step ended the game
    pub game_over: Option<GameOverReason>,
}

/// The game engine that handles all game logic
///
/// The engine never owns the game state; every operation takes the state by
/// reference so a front-end can read it between calls. Inputs that arrive in
/// the wrong phase, or that would reverse the snake, are ignored and reported
/// as `false`.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh game, parked on the welcome screen if configured
    pub fn new_game(&mut self) -> GameState {
        let mut state = GameState::new(
            self.config.width,
            self.config.height,
            self.config.unit_size,
            self.config.initial_delay(),
        );
        self.reset(&mut state);

        // A board already full at reset stays over
        if self.config.show_welcome && state.phase == Phase::Running {
            state.phase = Phase::Welcome;
        }
        state
    }

    /// Reset the game to its initial state, reusing the existing buffers
    pub fn reset(&mut self, state: &mut GameState) {
        let unit = state.unit;
        let head = Position::new((state.columns() / 2) * unit, (state.rows() / 2) * unit);
        let length = self.config.initial_length;

        // Lay the body out straight when it fits, otherwise start coiled on
        // the head cell and let it unwind over the first moves.
        let tail_x = head.x - (length.saturating_sub(1) as i32) * unit;
        let spacing = if tail_x >= 0 { unit } else { 0 };
        state.snake.respawn(head, Direction::Right, length, spacing);

        state.score = 0;
        state.steps = 0;
        state.tick_delay = self.config.initial_delay();
        state.phase = Phase::Running;
        state.game_over_reason = None;

        self.place_food(state);
        log::debug!("new game: head at {:?}, length {}", head, state.snake.len());
    }

    /// Leave the welcome screen. Same as `on_start_signal`.
    pub fn start(&mut self, state: &mut GameState) -> bool {
        self.on_start_signal(state)
    }

    /// Drop food on a free cell. Ends the game when there is none left.
    pub fn place_food(&mut self, state: &mut GameState) {
        match food::find_free_cell(&mut self.rng, state) {
            Some(pos) => state.food = pos,
            None => self.end_game(state, GameOverReason::BoardFull),
        }
    }

    /// Interval at which `on_tick` should be driven, or `None` while the
    /// clock must be stopped
    pub fn tick_interval(&self, state: &GameState) -> Option<Duration> {
        (state.phase == Phase::Running).then_some(state.tick_delay)
    }

    /// Advance the simulation by one tick
    pub fn on_tick(&mut self, state: &mut GameState) -> TickOutcome {
        if state.phase != Phase::Running {
            return TickOutcome::default();
        }
        self.step(state)
    }

    /// Try to change the snake's direction
    pub fn on_direction_input(&mut self, state: &mut GameState, direction: Direction) -> bool {
        if state.phase != Phase::Running {
            return false;
        }

        let snake = &state.snake;
        if direction == snake.direction || direction.is_opposite(snake.direction) {
            return false;
        }
        if self.config.guard_neck && direction.is_opposite(snake.heading()) {
            return false;
        }

        state.snake.direction = direction;

        if self.config.step_on_turn {
            self.step(state);
        }
        true
    }

    /// Pause a running game or resume a paused one
    pub fn on_pause_toggle(&mut self, state: &mut GameState) -> bool {
        state.phase = match state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            _ => return false,
        };
        log::debug!("pause toggled, now {:?}", state.phase);
        true
    }

    /// Start over after a game over
    pub fn on_restart_signal(&mut self, state: &mut GameState) -> bool {
        if state.phase != Phase::GameOver {
            return false;
        }
        self.reset(state);
        true
    }

    /// Leave the welcome screen and start the clock
    pub fn on_start_signal(&mut self, state: &mut GameState) -> bool {
        if state.phase != Phase::Welcome {
            return false;
        }
        state.phase = Phase::Running;
        log::debug!("game started");
        true
    }

    /// Dispatch an input to the matching handler
    pub fn handle(&mut self, state: &mut GameState, action: Action) -> bool {
        match action {
            Action::Turn(direction) => self.on_direction_input(state, direction),
            Action::TogglePause => self.on_pause_toggle(state),
            Action::Restart => self.on_restart_signal(state),
            Action::Start => self.on_start_signal(state),
        }
    }

    /// One move, food check and collision check, always in that order
    fn step(&mut self, state: &mut GameState) -> TickOutcome {
        state.snake.advance(state.unit);
        state.steps += 1;

        let ate_food = self.check_food(state);

        if let Some(reason) = Self::check_collision(state) {
            self.end_game(state, reason);
        }

        TickOutcome {
            ate_food,
            game_over: state.game_over_reason,
        }
    }

    fn check_food(&mut self, state: &mut GameState) -> bool {
        if state.snake.head() != state.food {
            return false;
        }

        state.score += 1;
        state.snake.grow();

        let step = Duration::from_millis(self.config.delay_step_ms);
        let floor = Duration::from_millis(self.config.min_delay_ms);
        state.tick_delay = state.tick_delay.saturating_sub(step).max(floor);

        self.place_food(state);
        true
    }

    /// Check the post-move head against the body and the arena
    fn check_collision(state: &GameState) -> Option<GameOverReason> {
        let head = state.snake.head();

        if state.snake.collides_with_body(head) {
            return Some(GameOverReason::SelfCollision);
        }

        if !state.is_in_bounds(head) {
            return Some(GameOverReason::Wall);
        }

        None
    }

    /// Freeze the game. The tick schedule reads the phase, so the clock is
    /// stopped as soon as this returns.
    fn end_game(&mut self, state: &mut GameState, reason: GameOverReason) {
        state.phase = Phase::GameOver;
        state.game_over_reason = Some(reason);
        log::info!(
            "game over ({}): score {}, length {}",
            reason.describe(),
            state.score,
            state.snake.len()
        );
    }
}

use std::time::Duration;

use super::action::Direction;
use super::config::{MAX_CELLS, grid_cells};

/// A position in the arena. Both coordinates are multiples of the unit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `distance` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * distance, dy * distance)
    }
}

/// The snake in the game
///
/// Segments live in a buffer sized for the whole board; only the first `len`
/// entries belong to the snake. The entry right after the tail always holds
/// the tail's previous position so that growing by one needs no copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Position>,
    len: usize,
    /// Direction the next move will take
    pub direction: Direction,
    /// Direction of the last move actually made
    heading: Direction,
}

impl Snake {
    /// Create a one-segment snake at the origin with room for `capacity` segments
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            segments: vec![Position::default(); capacity],
            len: 1,
            direction: Direction::Right,
            heading: Direction::Right,
        }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for
    /// an empty list or one longer than `capacity`.
    pub fn from_segments(
        segments: &[Position],
        direction: Direction,
        capacity: usize,
    ) -> Option<Self> {
        if segments.is_empty() || segments.len() > capacity {
            return None;
        }

        let mut snake = Self::with_capacity(capacity);
        snake.segments[..segments.len()].copy_from_slice(segments);
        let tail = segments[segments.len() - 1];
        snake.segments[segments.len()..].fill(tail);
        snake.len = segments.len();
        snake.direction = direction;
        snake.heading = direction;
        Some(snake)
    }

    /// Re-initialise in place: `length` segments trailing behind `head`,
    /// `spacing` apart. A spacing of zero stacks every segment on the head.
    pub fn respawn(&mut self, head: Position, direction: Direction, length: usize, spacing: i32) {
        let length = length.clamp(1, self.capacity());
        let back = direction.opposite();

        for (i, segment) in self.segments.iter_mut().enumerate() {
            let offset = i.min(length - 1) as i32;
            *segment = head.moved_in_direction(back, offset * spacing);
        }

        self.len = length;
        self.direction = direction;
        self.heading = direction;
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.segments[self.len - 1]
    }

    /// The live segments, head first
    pub fn segments(&self) -> &[Position] {
        &self.segments[..self.len]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..self.len]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position is covered by any live segment
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments().contains(&pos)
    }

    /// Shift every segment into its predecessor's place, then advance the
    /// head one unit in the current direction.
    pub fn advance(&mut self, unit: i32) {
        // Also carries the old tail into the slot just past it.
        let last = self.len.min(self.segments.len() - 1);
        for i in (1..=last).rev() {
            self.segments[i] = self.segments[i - 1];
        }

        self.segments[0] = self.segments[0].moved_in_direction(self.direction, unit);
        self.heading = self.direction;
    }

    /// Add one segment at the tail. Returns false once the board is full.
    pub fn grow(&mut self) -> bool {
        if self.len == self.segments.len() {
            return false;
        }
        self.len += 1;
        true
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the snake is empty (never true; a snake always has a head)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.segments.len()
    }
}

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Start screen shown before the first game
    Welcome,
    Running,
    Paused,
    /// Final state of a session; left only by a restart
    GameOver,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake covers every cell, no room left for food
    BoardFull,
}

impl GameOverReason {
    pub fn describe(&self) -> &'static str {
        match self {
            GameOverReason::Wall => "hit the wall",
            GameOverReason::SelfCollision => "bit its own tail",
            GameOverReason::BoardFull => "filled the board",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) snake: Snake,
    pub(crate) food: Position,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) unit: i32,
    pub(crate) score: u32,
    pub(crate) steps: u32,
    pub(crate) tick_delay: Duration,
    pub(crate) phase: Phase,
    pub(crate) game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// Create a game state for an arena of the given size. The snake is a
    /// placeholder until the engine resets the state.
    ///
    /// Expects dimensions accepted by `GameConfig::validate`; anything larger
    /// is clamped rather than overflowing.
    pub fn new(width: u32, height: u32, unit: u32, tick_delay: Duration) -> Self {
        let unit = unit.max(1);
        let capacity = grid_cells(width, height, unit)
            .unwrap_or(usize::MAX)
            .min(MAX_CELLS);
        let clamp = |value: u32| i32::try_from(value).unwrap_or(i32::MAX);

        Self {
            snake: Snake::with_capacity(capacity),
            food: Position::default(),
            width: clamp(width),
            height: clamp(height),
            unit: clamp(unit),
            score: 0,
            steps: 0,
            tick_delay,
            phase: Phase::Running,
            game_over_reason: None,
        }
    }

    /// Check if a position is within the arena
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn segments(&self) -> &[Position] {
        self.snake.segments()
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks executed since the last reset
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn tick_delay(&self) -> Duration {
        self.tick_delay
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn unit(&self) -> i32 {
        self.unit
    }

    pub fn columns(&self) -> i32 {
        self.width / self.unit
    }

    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }
}

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The direction pointing the other way
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit-less delta (dx, dy) for moving in this direction.
    /// The y axis grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// An input delivered to the engine by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Request a change of direction
    Turn(Direction),
    /// Flip between running and paused
    TogglePause,
    /// Start a new game after game over
    Restart,
    /// Leave the welcome screen
    Start,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Turn(direction)
    }
}

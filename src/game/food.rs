//! Food placement
//!
//! Food is dropped on a uniformly random free cell. Random picks are cheap
//! while the board is mostly empty; once it keeps landing on the snake we
//! switch to choosing directly among the free cells, which always terminates.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{GameState, Position};

/// Random picks tried before falling back to scanning the free cells
pub const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Pick a cell not covered by the snake, or `None` if the snake fills the board
pub fn find_free_cell<R: Rng>(rng: &mut R, state: &GameState) -> Option<Position> {
    let columns = state.columns();
    let rows = state.rows();
    if columns <= 0 || rows <= 0 {
        return None;
    }

    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(0..columns) * state.unit,
            rng.gen_range(0..rows) * state.unit,
        );
        if !state.is_occupied_by_snake(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..rows)
        .flat_map(|row| (0..columns).map(move |col| (col, row)))
        .map(|(col, row)| Position::new(col * state.unit, row * state.unit))
        .filter(|&pos| !state.is_occupied_by_snake(pos))
        .collect();

    log::debug!(
        "food sampling fell back to {} free cells after {} random picks",
        free.len(),
        MAX_SAMPLE_ATTEMPTS
    );

    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn board(width: u32, height: u32) -> GameState {
        GameState::new(width, height, 20, Duration::from_millis(150))
    }

    #[test]
    fn test_food_lands_on_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = board(600, 600);

        for _ in 0..200 {
            let pos = find_free_cell(&mut rng, &state).unwrap();
            assert!(state.is_in_bounds(pos));
            assert_eq!(pos.x % 20, 0);
            assert_eq!(pos.y % 20, 0);
        }
    }

    #[test]
    fn test_last_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = board(100, 20);
        let taken = [
            Position::new(0, 0),
            Position::new(20, 0),
            Position::new(40, 0),
            Position::new(80, 0),
        ];
        state.snake = Snake::from_segments(&taken, Direction::Left, 5).unwrap();

        for _ in 0..20 {
            assert_eq!(find_free_cell(&mut rng, &state), Some(Position::new(60, 0)));
        }
    }

    #[test]
    fn test_full_board_has_no_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = board(40, 20);
        let taken = [Position::new(0, 0), Position::new(20, 0)];
        state.snake = Snake::from_segments(&taken, Direction::Left, 2).unwrap();

        assert_eq!(find_free_cell(&mut rng, &state), None);
    }
}

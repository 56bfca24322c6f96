//! Pure classification of a proposed snake advance.
//!
//! The resolver has no side effects and no knowledge of session state,
//! so it can be exercised directly in tests without constructing a
//! [`World`](crate::World).

use retro_snake_core::{Cell, DeathCause};

/// Outcome of advancing the head into a destination cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    /// The destination is inside the grid and unoccupied.
    None,
    /// The destination lies outside the grid bounds.
    Wall,
    /// The destination is occupied by the snake's own body.
    SelfCollision,
}

impl Collision {
    /// Converts the classification into a death cause, if fatal.
    #[must_use]
    pub const fn death_cause(self) -> Option<DeathCause> {
        match self {
            Collision::None => None,
            Collision::Wall => Some(DeathCause::Wall),
            Collision::SelfCollision => Some(DeathCause::SelfCollision),
        }
    }
}

/// Classifies a proposed advance of the snake's head.
///
/// `destination` is the head's next cell, or `None` when the step
/// already left the grid. `body` is the snake as it exists before the
/// tail is removed this tick: the soon-to-be-vacated tail cell still
/// counts as occupied, so a head entering it is a self collision.
#[must_use]
pub fn classify(destination: Option<Cell>, body: impl IntoIterator<Item = Cell>) -> Collision {
    let Some(destination) = destination else {
        return Collision::Wall;
    };

    if body.into_iter().any(|cell| cell == destination) {
        return Collision::SelfCollision;
    }

    Collision::None
}

#[cfg(test)]
mod tests {
    use super::{classify, Collision};
    use retro_snake_core::{Cell, DeathCause, Direction, GridSize};

    #[test]
    fn off_grid_destination_is_a_wall_hit() {
        let grid = GridSize::new(10, 10);
        let destination = Cell::new(9, 4).step(Direction::Right, grid);
        assert_eq!(classify(destination, []), Collision::Wall);
    }

    #[test]
    fn body_cell_is_a_self_hit() {
        let body = [Cell::new(3, 3), Cell::new(4, 3), Cell::new(5, 3)];
        assert_eq!(
            classify(Some(Cell::new(4, 3)), body),
            Collision::SelfCollision
        );
    }

    #[test]
    fn vacating_tail_cell_still_counts_as_occupied() {
        // The tail is the last body cell; entering it on the same tick
        // it would be vacated is fatal under the pre-move check.
        let body = [Cell::new(3, 3), Cell::new(4, 3), Cell::new(4, 4), Cell::new(3, 4)];
        assert_eq!(
            classify(Some(Cell::new(3, 4)), body),
            Collision::SelfCollision
        );
    }

    #[test]
    fn free_cell_is_no_collision() {
        let body = [Cell::new(3, 3), Cell::new(4, 3)];
        assert_eq!(classify(Some(Cell::new(2, 3)), body), Collision::None);
        assert_eq!(Collision::None.death_cause(), None);
        assert_eq!(Collision::Wall.death_cause(), Some(DeathCause::Wall));
    }
}

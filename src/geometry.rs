//! Board coordinates and the precomputed winning-line masks

use crate::bitboard::BitBoard;
use crate::BOARD_LENGTH;

/// A coordinate on the board
///
/// Squares are indexed row-major: the square at (row, col) has the
/// canonical index `row * BOARD_LENGTH + col`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Self {
        assert!(
            row < BOARD_LENGTH && col < BOARD_LENGTH,
            "square ({}, {}) is outside the {2}x{2} board",
            row,
            col,
            BOARD_LENGTH,
        );
        Self { row, col }
    }

    pub fn from_index(index: usize) -> Self {
        assert!(
            index < BOARD_LENGTH * BOARD_LENGTH,
            "square index {} is outside the {1}x{1} board",
            index,
            BOARD_LENGTH,
        );
        Self {
            row: index / BOARD_LENGTH,
            col: index % BOARD_LENGTH,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// The square's bit position in a [`BitBoard`]
    pub fn index(&self) -> usize {
        self.row * BOARD_LENGTH + self.col
    }
}

/// The fixed shape of the board: every square and every winning line
///
/// Built once by the driver and passed by reference wherever win detection
/// or square enumeration is needed; never mutated after construction.
pub struct BoardGeometry {
    squares: Vec<Square>,
    win_masks: Vec<BitBoard>,
}

impl BoardGeometry {
    pub fn new() -> Self {
        let squares: Vec<Square> = (0..BOARD_LENGTH * BOARD_LENGTH)
            .map(Square::from_index)
            .collect();

        // N rows, N columns and the two full diagonals
        let mut win_masks = Vec::with_capacity(2 * BOARD_LENGTH + 2);
        for i in 0..BOARD_LENGTH {
            win_masks.push(BitBoard::from_squares(
                (0..BOARD_LENGTH).map(|col| Square::new(i, col)),
            ));
            win_masks.push(BitBoard::from_squares(
                (0..BOARD_LENGTH).map(|row| Square::new(row, i)),
            ));
        }
        win_masks.push(BitBoard::from_squares(
            (0..BOARD_LENGTH).map(|i| Square::new(i, i)),
        ));
        win_masks.push(BitBoard::from_squares(
            (0..BOARD_LENGTH).map(|i| Square::new(i, BOARD_LENGTH - 1 - i)),
        ));

        Self { squares, win_masks }
    }

    /// Every board square in index order
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// One mask per winning line
    pub fn win_masks(&self) -> &[BitBoard] {
        &self.win_masks
    }

    /// All squares not set in `occupied`, in index order
    pub fn empty_squares<'a>(&'a self, occupied: BitBoard) -> impl Iterator<Item = Square> + 'a {
        self.squares
            .iter()
            .copied()
            .filter(move |&square| !occupied.is_occupied(square))
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new()
    }
}

//! Positions, the recycle queue and legal successor generation

use anyhow::{anyhow, Result};
use static_assertions::const_assert;

use std::collections::VecDeque;

use crate::bitboard::BitBoard;
use crate::geometry::{BoardGeometry, Square};
use crate::outcome::Player;
use crate::{BOARD_LENGTH, QUEUE_CAPACITY};

// a queue entry is packed into the structural key as index + 1 in this
// many bits, 0 meaning "no entry"
const KEY_SQUARE_BITS: u32 = 7;
const_assert!(BOARD_LENGTH * BOARD_LENGTH < 1usize << KEY_SQUARE_BITS);
// the full key must fit: both bitboards, the turn bit and the queue
const_assert!(
    2 * BOARD_LENGTH * BOARD_LENGTH + 1 + QUEUE_CAPACITY * KEY_SQUARE_BITS as usize <= 128
);

/// Per-square mark, as handed to renderers
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    X,
    O,
    Empty,
}

/// Turn-ordered history of the most recent placements, newest first
///
/// The queue holds at most [`QUEUE_CAPACITY`] squares. While below
/// capacity no recycling occurs; at capacity the oldest entry is the
/// square the side to move must vacate before placing again.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MoveQueue {
    squares: VecDeque<Square>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self {
            squares: VecDeque::with_capacity(QUEUE_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.squares.len() == QUEUE_CAPACITY
    }

    /// The most recently played square
    pub fn newest(&self) -> Option<Square> {
        self.squares.front().copied()
    }

    /// The square due to be recycled next once the queue is full
    pub fn oldest(&self) -> Option<Square> {
        self.squares.back().copied()
    }

    /// Newest-first iteration over the recorded squares
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares.iter().copied()
    }

    fn push_newest(&mut self, square: Square) {
        assert!(
            self.squares.len() < QUEUE_CAPACITY,
            "move queue overflow: capacity is {}",
            QUEUE_CAPACITY,
        );
        self.squares.push_front(square);
    }

    fn pop_oldest(&mut self) -> Option<Square> {
        self.squares.pop_back()
    }
}

impl Default for MoveQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A position: both sides' occupancy, whose turn is next and the queue
///
/// States are immutable once built; successor generation and move
/// application produce new values.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GameState {
    x: BitBoard,
    o: BitBoard,
    x_to_move: bool,
    queue: MoveQueue,
}

impl GameState {
    /// The empty board with X to move
    pub fn initial() -> Self {
        Self::from_parts(BitBoard::new(), BitBoard::new(), true, MoveQueue::new())
    }

    fn from_parts(x: BitBoard, o: BitBoard, x_to_move: bool, queue: MoveQueue) -> Self {
        assert!(
            !x.intersects(o),
            "player bitboards overlap: a square is occupied by both sides",
        );
        Self {
            x,
            o,
            x_to_move,
            queue,
        }
    }

    /// Replays a sequence of (row, col) placements from the empty board
    pub fn from_moves(moves: &[(usize, usize)], geometry: &BoardGeometry) -> Result<Self> {
        let mut state = Self::initial();
        for &(row, col) in moves {
            if row >= BOARD_LENGTH || col >= BOARD_LENGTH {
                return Err(anyhow!(
                    "square ({}, {}) is outside the {2}x{2} board",
                    row,
                    col,
                    BOARD_LENGTH,
                ));
            }
            state = state.play(Square::new(row, col), geometry)?;
        }
        Ok(state)
    }

    pub fn to_move(&self) -> Player {
        if self.x_to_move {
            Player::X
        } else {
            Player::O
        }
    }

    pub fn player_board(&self, player: Player) -> BitBoard {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    /// The side that completed a line with the last placement, if any
    ///
    /// Only the side that just moved can have a finished line, so this
    /// checks nothing else.
    pub fn winner(&self, geometry: &BoardGeometry) -> Option<Player> {
        let last_mover = self.to_move().opponent();
        if self.player_board(last_mover).won(geometry) {
            Some(last_mover)
        } else {
            None
        }
    }

    pub fn is_over(&self, geometry: &BoardGeometry) -> bool {
        self.winner(geometry).is_some()
    }

    /// Structural key for the transposition table
    ///
    /// Packs the two bitboards, the turn flag and the full ordered queue
    /// contents into one integer, so equal keys mean equal states and
    /// comparison is a plain value compare.
    pub fn key(&self) -> u128 {
        let cells = (BOARD_LENGTH * BOARD_LENGTH) as u32;
        let mut key = self.x.value() as u128;
        key |= (self.o.value() as u128) << cells;
        key |= (self.x_to_move as u128) << (2 * cells);
        let mut offset = 2 * cells + 1;
        for square in self.queue.iter() {
            key |= (square.index() as u128 + 1) << offset;
            offset += KEY_SQUARE_BITS;
        }
        key
    }

    /// All legal next positions for the side to move
    ///
    /// If the queue is at capacity the mover's oldest piece comes off the
    /// board first, and the vacated square is not a legal placement for
    /// this move. Callers must not expand terminal positions.
    pub fn successors(&self, geometry: &BoardGeometry) -> Vec<GameState> {
        let mover = self.to_move();
        let mut queue = self.queue.clone();
        let mut mover_board = self.player_board(mover);
        let opponent_board = self.player_board(mover.opponent());

        let recycled = if queue.is_full() {
            queue.pop_oldest()
        } else {
            None
        };
        if let Some(square) = recycled {
            // a full queue always ends with the mover's own piece, placed
            // QUEUE_CAPACITY plies ago
            assert!(
                mover_board.is_occupied(square),
                "recycle square is not owned by the side to move",
            );
            mover_board.toggle(square);
        }

        let occupied = mover_board.union(opponent_board);
        let mut children = Vec::new();
        for square in geometry.empty_squares(occupied) {
            if recycled == Some(square) {
                continue;
            }
            let mut placed = mover_board;
            placed.toggle(square);
            let mut child_queue = queue.clone();
            child_queue.push_newest(square);
            let (x, o) = match mover {
                Player::X => (placed, opponent_board),
                Player::O => (opponent_board, placed),
            };
            children.push(GameState::from_parts(x, o, !self.x_to_move, child_queue));
        }
        children
    }

    /// Applies a placement for the side to move
    ///
    /// Rejects moves into occupied squares, onto the square being vacated
    /// by this same move, and moves in a finished game.
    pub fn play(&self, square: Square, geometry: &BoardGeometry) -> Result<GameState> {
        if self.is_over(geometry) {
            return Err(anyhow!("invalid move, the game is already over"));
        }
        for child in self.successors(geometry) {
            if child.last_move() == Some(square) {
                return Ok(child);
            }
        }
        if self.queue.is_full() && self.queue.oldest() == Some(square) {
            Err(anyhow!(
                "invalid move, square ({}, {}) is being vacated by this placement and cannot be reused",
                square.row(),
                square.col(),
            ))
        } else {
            Err(anyhow!(
                "invalid move, square ({}, {}) is occupied",
                square.row(),
                square.col(),
            ))
        }
    }

    /// The mark on `square`, for rendering
    pub fn cell(&self, square: Square) -> Cell {
        if self.x.is_occupied(square) {
            Cell::X
        } else if self.o.is_occupied(square) {
            Cell::O
        } else {
            Cell::Empty
        }
    }

    /// Row-major grid of marks, for rendering
    pub fn grid(&self, geometry: &BoardGeometry) -> Vec<Cell> {
        geometry
            .squares()
            .iter()
            .map(|&square| self.cell(square))
            .collect()
    }

    pub fn queue(&self) -> &MoveQueue {
        &self.queue
    }

    /// The recorded placements, newest first
    pub fn queue_squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.queue.iter()
    }

    /// The square played by the last move, if any move has been made
    pub fn last_move(&self) -> Option<Square> {
        self.queue.newest()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

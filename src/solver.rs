//! An agent to solve recycle tic-tac-toe positions

use crate::geometry::BoardGeometry;
use crate::outcome::{Outcome, Player};
use crate::state::GameState;
use crate::transposition_table::TranspositionTable;

/// Callback fired each time the search newly decides a position
///
/// Carries the running count of decided positions and the depth budget
/// of the deepening pass that produced the decision. The caller decides
/// how (or whether) to report progress; the solver itself never prints.
pub type ProgressHook = Box<dyn FnMut(usize, u32)>;

/// An agent to solve recycle tic-tac-toe positions
///
/// # Notes
/// The search is a memoized depth-bounded minimax under iterative
/// deepening. Recycling can regenerate an earlier position, so the state
/// graph is cyclic: before a position is expanded an undetermined entry
/// is stored for it, and a same-pass hit on that entry is returned as-is
/// instead of re-expanded. Entries left undetermined by an earlier,
/// shallower pass are re-expanded when the budget has grown.
///
/// # Position Scoring
/// A decided position carries the winning side and the number of plies
/// until the win is realised under best play: the fastest available win
/// for the side to move, or the slowest unavoidable loss.
pub struct Solver {
    root: GameState,
    geometry: BoardGeometry,
    transposition_table: TranspositionTable,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
    decided_count: usize,
    progress_hook: Option<ProgressHook>,
}

impl Solver {
    /// Creates a new `Solver` rooted at a position
    pub fn new(root: GameState) -> Self {
        Self::new_with_transposition_table(root, TranspositionTable::new())
    }

    /// Creates a new `Solver` reusing a previously filled transposition table
    pub fn new_with_transposition_table(
        root: GameState,
        transposition_table: TranspositionTable,
    ) -> Self {
        Self {
            root,
            geometry: BoardGeometry::new(),
            transposition_table,
            node_count: 0,
            decided_count: 0,
            progress_hook: None,
        }
    }

    /// Adds a progress callback to an existing `Solver`
    pub fn with_progress_hook(mut self, hook: ProgressHook) -> Self {
        self.progress_hook = Some(hook);
        self
    }

    pub fn root(&self) -> &GameState {
        &self.root
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Hands the table back for reuse by a later `Solver`
    pub fn into_transposition_table(self) -> TranspositionTable {
        self.transposition_table
    }

    /// Determines the root position's outcome with iterative deepening
    ///
    /// Returns the winning side and the depth to mate. Raises the depth
    /// budget one ply at a time until the root resolves; the state space
    /// is finite, so a decidable root resolves at some finite budget.
    pub fn solve(&mut self) -> (Player, u32) {
        let mut budget = 1;
        loop {
            let root = self.root.clone();
            if let Outcome::Decided {
                winner,
                depth_to_mate,
            } = self.evaluate(&root, 0, budget)
            {
                return (winner, depth_to_mate);
            }
            budget += 1;
        }
    }

    /// Performs the depth-bounded game tree search
    fn evaluate(&mut self, state: &GameState, depth: u32, budget: u32) -> Outcome {
        self.node_count += 1;
        let key = state.key();

        // the side that is not about to move has just completed a line
        if let Some(winner) = state.winner(&self.geometry) {
            let outcome = Outcome::Decided {
                winner,
                depth_to_mate: 0,
            };
            self.store(key, outcome, budget);
            return outcome;
        }

        if let Some(entry) = self.transposition_table.get(key) {
            if entry.outcome.is_decided() {
                return entry.outcome;
            }
            // same-pass undetermined entries are either an ancestor still
            // being expanded or a horizon cutoff from this pass; older
            // ones are stale and get re-expanded below
            if entry.budget == budget {
                return Outcome::Undetermined;
            }
        }

        if depth > budget {
            self.store(key, Outcome::Undetermined, budget);
            return Outcome::Undetermined;
        }

        // sentinel: recycling can regenerate an ancestor of this very
        // expansion, which must read as undetermined rather than recurse
        self.store(key, Outcome::Undetermined, budget);

        let mover = state.to_move();
        let mut best: Option<Outcome> = None;
        for child in state.successors(&self.geometry) {
            let child_outcome = self.evaluate(&child, depth + 1, budget);
            best = match best {
                None => Some(child_outcome),
                Some(held) if held.prefer_other(&child_outcome, mover) => Some(child_outcome),
                Some(held) => Some(held),
            };
        }

        // the fold settles the classification: a win for the mover in any
        // child decides for the mover; a loss surviving the fold means
        // every child was one, deciding for the opponent
        let outcome = match best {
            Some(Outcome::Decided {
                winner,
                depth_to_mate,
            }) => Outcome::Decided {
                winner,
                depth_to_mate: depth_to_mate + 1,
            },
            _ => Outcome::Undetermined,
        };
        self.store(key, outcome, budget);
        outcome
    }

    fn store(&mut self, key: u128, outcome: Outcome, budget: u32) {
        let newly_decided = outcome.is_decided()
            && self
                .transposition_table
                .get(key)
                .map_or(true, |entry| !entry.outcome.is_decided());
        self.transposition_table.set(key, outcome, budget);
        if newly_decided {
            self.decided_count += 1;
            if let Some(hook) = self.progress_hook.as_mut() {
                hook(self.decided_count, budget);
            }
        }
    }

    /// The stored evaluation of a position, without expanding it
    fn node_outcome(&self, state: &GameState) -> Outcome {
        if let Some(winner) = state.winner(&self.geometry) {
            return Outcome::Decided {
                winner,
                depth_to_mate: 0,
            };
        }
        match self.transposition_table.get(state.key()) {
            Some(entry) if entry.outcome.is_decided() => entry.outcome,
            _ => Outcome::Undetermined,
        }
    }

    /// Reconstructs best play from the root to the forced end
    ///
    /// Solves first if the root is not yet decided. At each node the next
    /// state is the successor decided for the same winner as the node
    /// itself with a depth to mate of exactly one less, until the depth
    /// reaches zero.
    pub fn principal_line(&mut self) -> Vec<GameState> {
        self.solve();

        let mut line = vec![self.root.clone()];
        let mut current = self.root.clone();
        while let Outcome::Decided {
            winner,
            depth_to_mate,
        } = self.node_outcome(&current)
        {
            if depth_to_mate == 0 {
                break;
            }
            let target = Outcome::Decided {
                winner,
                depth_to_mate: depth_to_mate - 1,
            };
            let next = current
                .successors(&self.geometry)
                .into_iter()
                .find(|child| self.node_outcome(child) == target);
            match next {
                Some(child) => {
                    line.push(child.clone());
                    current = child;
                }
                None => break,
            }
        }
        line
    }
}

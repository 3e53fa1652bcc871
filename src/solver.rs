//! Optimal solutions and hints with iterative deepening A*.
//!
//! The heuristic is the Manhattan distance of every tile to its origin plus two slides for
//! each tile that must leave its goal row or column to let another one pass (linear
//! conflicts). Both parts never overestimate, so the first path found is a shortest one.

use log::debug;
use thiserror::Error;

use crate::grid::GridSize;
use crate::puzzle::{is_solvable, Puzzle, Slide};

/// Positions examined before giving up, enough for any 3x3 board and most 4x4 boards.
pub const DEFAULT_NODE_BUDGET: usize = 20_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("the arrangement cannot be reached from the solved puzzle")]
    Unsolvable,

    #[error("search gave up after examining {0} positions")]
    SearchExhausted(usize),
}

/// Shortest sequence of slides that solves `puzzle`. Empty when it is already solved.
pub fn solve(puzzle: &Puzzle) -> Result<Vec<Slide>, SolveError> {
    solve_with_budget(puzzle, DEFAULT_NODE_BUDGET)
}

/// First slide of a shortest solution, or `None` when the puzzle is solved.
pub fn hint(puzzle: &Puzzle) -> Result<Option<Slide>, SolveError> {
    Ok(solve(puzzle)?.first().copied())
}

pub fn solve_with_budget(puzzle: &Puzzle, budget: usize) -> Result<Vec<Slide>, SolveError> {
    if !is_solvable(puzzle.board(), puzzle.grid()) {
        return Err(SolveError::Unsolvable);
    }

    let mut search = Search {
        puzzle: puzzle.clone(),
        path: Vec::new(),
        nodes: 0,
        budget,
    };
    let mut bound = heuristic(&search.puzzle);

    loop {
        match search.descend(0, bound, None)? {
            Step::Found => {
                debug!(
                    "Solved {} puzzle in {} slides ({} positions examined)",
                    puzzle.grid(),
                    search.path.len(),
                    search.nodes
                );
                return Ok(search.path);
            }
            Step::Exceeded(next) => {
                if next == usize::MAX {
                    return Err(SolveError::Unsolvable);
                }
                debug!("Raising search bound from {bound} to {next}");
                bound = next;
            }
        }
    }
}

enum Step {
    Found,
    Exceeded(usize),
}

struct Search {
    puzzle: Puzzle,
    path: Vec<Slide>,
    nodes: usize,
    budget: usize,
}

impl Search {
    fn descend(
        &mut self,
        g: usize,
        bound: usize,
        last: Option<Slide>,
    ) -> Result<Step, SolveError> {
        self.nodes += 1;
        if self.nodes > self.budget {
            return Err(SolveError::SearchExhausted(self.budget));
        }

        let f = g + heuristic(&self.puzzle);
        if f > bound {
            return Ok(Step::Exceeded(f));
        }
        if self.puzzle.is_solved() {
            return Ok(Step::Found);
        }

        let mut min = usize::MAX;
        for slide in Slide::ALL {
            // undoing the previous slide never helps
            if last == Some(slide.opposite()) {
                continue;
            }
            if !self.puzzle.slide(slide).is_legal() {
                continue;
            }

            self.path.push(slide);
            match self.descend(g + 1, bound, Some(slide))? {
                Step::Found => return Ok(Step::Found),
                Step::Exceeded(t) => min = min.min(t),
            }
            self.path.pop();
            self.puzzle.slide(slide.opposite());
        }

        Ok(Step::Exceeded(min))
    }
}

fn heuristic(puzzle: &Puzzle) -> usize {
    manhattan_distance(puzzle) + 2 * linear_conflicts(puzzle)
}

fn manhattan_distance(puzzle: &Puzzle) -> usize {
    let grid = puzzle.grid();
    let blank_index = grid.blank_index();

    puzzle
        .board()
        .iter()
        .enumerate()
        .filter(|&(_, &origin)| origin != blank_index)
        .map(|(position, &origin)| {
            grid.row(position).abs_diff(grid.row(origin))
                + grid.col(position).abs_diff(grid.col(origin))
        })
        .sum()
}

/// Tiles that must step out of their goal line, summed over every row and column.
fn linear_conflicts(puzzle: &Puzzle) -> usize {
    let grid = puzzle.grid();
    let n = grid.get();
    let blank_index = grid.blank_index();
    let board = puzzle.board();
    let mut conflicts = 0;

    for line in 0..n {
        // goal columns of the tiles already in their goal row, left to right
        let row: Vec<usize> = (0..n)
            .map(|col| board[grid.position(line, col)])
            .filter(|&origin| origin != blank_index && grid.row(origin) == line)
            .map(|origin| grid.col(origin))
            .collect();
        conflicts += row.len() - longest_increasing(&row);

        let col: Vec<usize> = (0..n)
            .map(|row| board[grid.position(row, line)])
            .filter(|&origin| origin != blank_index && grid.col(origin) == line)
            .map(|origin| grid.row(origin))
            .collect();
        conflicts += col.len() - longest_increasing(&col);
    }

    conflicts
}

fn longest_increasing(values: &[usize]) -> usize {
    let mut best = vec![1; values.len()];
    for i in 0..values.len() {
        for j in 0..i {
            if values[j] < values[i] {
                best[i] = best[i].max(best[j] + 1);
            }
        }
    }
    best.into_iter().max().unwrap_or(0)
}

/// Grid sizes for which a hint is expected to come back quickly.
pub fn hint_supported(grid: GridSize) -> bool {
    grid.get() <= 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn grid(n: usize) -> GridSize {
        GridSize::new(n).unwrap()
    }

    fn replay(puzzle: &Puzzle, path: &[Slide]) -> Puzzle {
        let mut replayed = puzzle.clone();
        for &slide in path {
            assert!(replayed.slide(slide).is_legal(), "{slide} is not legal");
        }
        replayed
    }

    #[test]
    fn solved_puzzle_needs_no_slides() {
        let puzzle = Puzzle::new(grid(3));
        assert_eq!(solve(&puzzle), Ok(Vec::new()));
        assert_eq!(hint(&puzzle), Ok(None));
    }

    #[test]
    fn finds_shortest_path_back() {
        let mut puzzle = Puzzle::new(grid(3));
        for slide in [Slide::Down, Slide::Right, Slide::Down, Slide::Left] {
            assert!(puzzle.slide(slide).is_legal());
        }

        let path = solve(&puzzle).unwrap();
        assert_eq!(path, vec![Slide::Right, Slide::Up, Slide::Left, Slide::Up]);
        assert!(replay(&puzzle, &path).is_solved());
        assert_eq!(hint(&puzzle), Ok(Some(Slide::Right)));
    }

    #[test]
    fn solves_shuffled_three_by_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..5 {
            let mut puzzle = Puzzle::new(grid(3));
            puzzle.shuffle_with(&mut rng);
            let path = solve(&puzzle).unwrap();
            assert!(!path.is_empty());
            assert!(path.len() <= 31);
            assert!(replay(&puzzle, &path).is_solved());
        }
    }

    #[test]
    fn solves_scrambled_four_by_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut puzzle = Puzzle::new(grid(4));
        for _ in 0..30 {
            let moves = puzzle.legal_moves();
            let position = moves[rng.gen_range(0..moves.len())];
            puzzle.move_tile(position);
        }
        let path = solve(&puzzle).unwrap();
        assert!(path.len() <= 30);
        assert!(replay(&puzzle, &path).is_solved());
    }

    #[test]
    fn rejects_unsolvable_arrangement() {
        let puzzle = Puzzle::from_board(vec![1, 0, 2, 3, 4, 5, 6, 7, 8], grid(3)).unwrap();
        assert_eq!(solve(&puzzle), Err(SolveError::Unsolvable));
    }

    #[test]
    fn gives_up_when_budget_is_spent() {
        let mut puzzle = Puzzle::new(grid(3));
        puzzle.shuffle_with(&mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(
            solve_with_budget(&puzzle, 1),
            Err(SolveError::SearchExhausted(1))
        );
    }

    #[test]
    fn linear_conflicts_count_reversed_pairs() {
        // row 0 holds 1 0 2: one tile has to step aside
        let puzzle = Puzzle::from_board(vec![1, 0, 2, 3, 4, 5, 6, 7, 8], grid(3)).unwrap();
        assert_eq!(linear_conflicts(&puzzle), 1);
        assert_eq!(manhattan_distance(&puzzle), 2);
        assert_eq!(heuristic(&puzzle), 4);
    }

    #[test]
    fn longest_increasing_subsequence() {
        assert_eq!(longest_increasing(&[]), 0);
        assert_eq!(longest_increasing(&[2, 0, 1]), 2);
        assert_eq!(longest_increasing(&[3, 2, 1, 0]), 1);
        assert_eq!(longest_increasing(&[0, 1, 2]), 3);
    }
}

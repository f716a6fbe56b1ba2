use std::collections::{BTreeMap, BTreeSet};

use strum::{Display, VariantArray};
use thiserror::Error;

use crate::env::{DiscreteActionSpace, Environment, Report};

/// A cell in the grid as `(row, col)`
pub type Pos = (i32, i32);

#[derive(VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    #[strum(serialize = "U")]
    Up,
    #[strum(serialize = "D")]
    Down,
    #[strum(serialize = "L")]
    Left,
    #[strum(serialize = "R")]
    Right,
}

impl Action {
    /// Row and column displacement of the move
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}

fn shift(pos: Pos, delta: (i32, i32)) -> Pos {
    (pos.0 + delta.0, pos.1 + delta.1)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("cell {0:?} is outside the {1}x{2} grid")]
    OutOfBounds(Pos, i32, i32),
    #[error("start cell {0:?} is terminal")]
    TerminalStart(Pos),
    #[error("moving {1:?} from {0:?} leads to unknown cell {2:?}")]
    DanglingMove(Pos, Action, Pos),
}

/// A deterministic grid world with per-cell rewards and per-cell legal moves
///
/// Any cell without an entry in the action map is terminal.
#[derive(Debug, Clone)]
pub struct GridWorld {
    rows: i32,
    cols: i32,
    start: Pos,
    pos: Pos,
    rewards: BTreeMap<Pos, f32>,
    actions: BTreeMap<Pos, Vec<Action>>,
    pub report: Report,
}

impl GridWorld {
    /// Build a grid from its reward map and legal-action map
    ///
    /// Every cell named in either map must lie inside the grid, the start must not be
    /// terminal, and every legal move must land on a cell named in one of the maps.
    pub fn new(
        rows: i32,
        cols: i32,
        start: Pos,
        rewards: BTreeMap<Pos, f32>,
        actions: BTreeMap<Pos, Vec<Action>>,
    ) -> Result<Self, GridError> {
        let grid = Self {
            rows,
            cols,
            start,
            pos: start,
            rewards,
            actions,
            report: Report::new(vec!["reward", "steps"]),
        };
        grid.validate()?;
        Ok(grid)
    }

    fn validate(&self) -> Result<(), GridError> {
        let states = self.all_states();
        for &s in states.iter().chain([&self.start]) {
            if !self.in_bounds(s) {
                return Err(GridError::OutOfBounds(s, self.rows, self.cols));
            }
        }
        if self.is_terminal(self.start) {
            return Err(GridError::TerminalStart(self.start));
        }
        for (&s, moves) in &self.actions {
            for &a in moves {
                let dest = shift(s, a.delta());
                if !states.contains(&dest) {
                    return Err(GridError::DanglingMove(s, a, dest));
                }
            }
        }
        Ok(())
    }

    /// The 3x4 grid with a +1 exit at (0,3), a -1 exit at (1,3) and a wall at (1,1)
    ///
    /// ```text
    ///  .  .  .  +1
    ///  .  #  .  -1
    ///  S  .  .  .
    /// ```
    pub fn standard() -> Self {
        use Action::*;

        let rewards = BTreeMap::from([
            ((0, 0), 0.0),
            ((0, 1), 0.0),
            ((0, 2), 0.0),
            ((0, 3), 1.0),
            ((1, 0), 0.0),
            ((1, 2), 0.0),
            ((1, 3), -1.0),
            ((2, 0), 0.0),
            ((2, 1), 0.0),
            ((2, 2), 0.0),
            ((2, 3), 0.0),
        ]);
        let actions = BTreeMap::from([
            ((0, 0), vec![Right, Down]),
            ((0, 1), vec![Right, Left]),
            ((0, 2), vec![Right, Left, Down]),
            ((1, 0), vec![Up, Down]),
            ((1, 2), vec![Up, Right, Down]),
            ((2, 0), vec![Up, Right]),
            ((2, 1), vec![Left, Right]),
            ((2, 2), vec![Left, Right, Up]),
            ((2, 3), vec![Left, Up]),
        ]);

        Self::new(3, 4, (2, 0), rewards, actions).expect("standard grid is well formed")
    }

    /// The standard grid with `step_cost` as the reward for entering any non-terminal cell
    pub fn negative(step_cost: f32) -> Self {
        let mut grid = Self::standard();
        let cells: Vec<Pos> = grid.actions.keys().copied().collect();
        for s in cells {
            grid.rewards.insert(s, step_cost);
        }
        grid
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn current_state(&self) -> Pos {
        self.pos
    }

    /// Overwrite the agent position without any check
    pub fn set_state(&mut self, state: Pos) {
        self.pos = state;
    }

    /// A state is terminal exactly when it has no entry in the action map
    pub fn is_terminal(&self, state: Pos) -> bool {
        !self.actions.contains_key(&state)
    }

    pub fn game_over(&self) -> bool {
        self.is_terminal(self.pos)
    }

    /// Moves available from `state`, empty if terminal
    pub fn legal_actions(&self, state: Pos) -> &[Action] {
        self.actions.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reward for entering `state`, zero if it has none
    pub fn reward(&self, state: Pos) -> f32 {
        self.rewards.get(&state).copied().unwrap_or(0.0)
    }

    /// Apply `action` if it is legal from the current position
    ///
    /// **Returns** the reward of the cell entered. An illegal action leaves the position
    /// untouched and returns 0.
    pub fn take_action(&mut self, action: Action) -> f32 {
        if !self.legal_actions(self.pos).contains(&action) {
            return 0.0;
        }
        self.pos = shift(self.pos, action.delta());
        self.reward(self.pos)
    }

    /// Reverse the displacement of `action`
    ///
    /// **Panics** if the resulting position is not a known state
    pub fn undo_move(&mut self, action: Action) {
        let (dr, dc) = action.delta();
        self.pos = shift(self.pos, (-dr, -dc));
        assert!(
            self.all_states().contains(&self.pos),
            "Undoing {action:?} left the agent at unknown cell {:?}",
            self.pos
        );
    }

    /// Every cell named in the reward map or the action map
    pub fn all_states(&self) -> BTreeSet<Pos> {
        self.rewards
            .keys()
            .chain(self.actions.keys())
            .copied()
            .collect()
    }

    /// Non-terminal states, in row-major order
    pub fn active_states(&self) -> Vec<Pos> {
        self.actions.keys().copied().collect()
    }

    fn in_bounds(&self, (row, col): Pos) -> bool {
        (0..self.rows).contains(&row) && (0..self.cols).contains(&col)
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn is_active(&self) -> bool {
        !self.game_over()
    }

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32) {
        let reward = self.take_action(action);

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report
            .entry("reward")
            .and_modify(|x| *x += reward as f64);

        if self.game_over() {
            (None, reward)
        } else {
            (Some(self.pos), reward)
        }
    }

    fn reset(&mut self) -> Self::State {
        self.pos = self.start;
        self.pos
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_iff_missing_from_action_map() {
        let grid = GridWorld::standard();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let s = (row, col);
                assert_eq!(grid.is_terminal(s), grid.legal_actions(s).is_empty());
            }
        }
        assert!(grid.is_terminal((0, 3)));
        assert!(grid.is_terminal((1, 3)));
        assert!(grid.is_terminal((1, 1)), "The wall has no moves");
        assert!(!grid.is_terminal((2, 0)));
    }

    #[test]
    fn illegal_moves_are_no_ops() {
        let mut grid = GridWorld::negative(-0.1);
        for s in grid.active_states() {
            for &a in Action::VARIANTS {
                if grid.legal_actions(s).contains(&a) {
                    continue;
                }
                grid.set_state(s);
                assert_eq!(grid.take_action(a), 0.0, "{a:?} from {s:?}");
                assert_eq!(grid.current_state(), s, "{a:?} from {s:?}");
            }
        }
    }

    #[test]
    fn legal_moves_displace() {
        let mut grid = GridWorld::standard();

        grid.set_state((2, 0));
        grid.take_action(Action::Up);
        assert_eq!(grid.current_state(), (1, 0), "Up works");

        grid.take_action(Action::Down);
        assert_eq!(grid.current_state(), (2, 0), "Down works");

        grid.take_action(Action::Right);
        assert_eq!(grid.current_state(), (2, 1), "Right works");

        grid.take_action(Action::Left);
        assert_eq!(grid.current_state(), (2, 0), "Left works");
    }

    #[test]
    fn rewards_on_entry() {
        let mut grid = GridWorld::negative(-0.1);
        grid.set_state((0, 2));
        assert_eq!(grid.take_action(Action::Right), 1.0);
        assert!(grid.game_over());

        grid.set_state((1, 2));
        assert_eq!(grid.take_action(Action::Right), -1.0);
        assert!(grid.game_over());

        grid.set_state((2, 2));
        assert_eq!(grid.take_action(Action::Left), -0.1);
        assert!(!grid.game_over());
    }

    #[test]
    fn negative_grid_keeps_exits() {
        let grid = GridWorld::negative(-0.25);
        assert_eq!(grid.reward((0, 3)), 1.0);
        assert_eq!(grid.reward((1, 3)), -1.0);
        assert_eq!(grid.reward((2, 0)), -0.25);
        assert_eq!(grid.reward((1, 1)), 0.0);
    }

    #[test]
    fn all_states_is_union_of_maps() {
        let grid = GridWorld::standard();
        let states = grid.all_states();
        assert_eq!(states.len(), 11);
        assert!(!states.contains(&(1, 1)));
        assert!(states.contains(&(0, 3)));
    }

    #[test]
    fn undo_reverses_move() {
        let mut grid = GridWorld::standard();
        grid.set_state((2, 2));
        grid.take_action(Action::Up);
        grid.undo_move(Action::Up);
        assert_eq!(grid.current_state(), (2, 2));
    }

    #[test]
    #[should_panic(expected = "unknown cell")]
    fn undo_into_wall_panics() {
        let mut grid = GridWorld::standard();
        grid.set_state((2, 1));
        grid.undo_move(Action::Down);
    }

    #[test]
    fn step_reports_episode_stats() {
        let mut grid = GridWorld::negative(-0.1);
        assert_eq!(grid.reset(), (2, 0));

        assert_eq!(grid.step(Action::Up), (Some((1, 0)), -0.1));
        assert_eq!(grid.step(Action::Left), (Some((1, 0)), 0.0));
        assert_eq!(grid.step(Action::Up), (Some((0, 0)), -0.1));
        assert_eq!(grid.step(Action::Right), (Some((0, 1)), -0.1));
        assert_eq!(grid.step(Action::Right), (Some((0, 2)), -0.1));
        assert_eq!(grid.step(Action::Right), (None, 1.0));
        assert!(!grid.is_active());

        let report = grid.report.take();
        assert_eq!(report["steps"], 6.0);
        assert!((report["reward"] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn validation_rejects_bad_layouts() {
        let rewards = BTreeMap::from([((0, 0), 0.0), ((0, 1), 1.0)]);

        let actions = BTreeMap::from([((0, 0), vec![Action::Right])]);
        assert!(GridWorld::new(1, 2, (0, 0), rewards.clone(), actions.clone()).is_ok());

        assert_eq!(
            GridWorld::new(1, 2, (0, 1), rewards.clone(), actions.clone()).unwrap_err(),
            GridError::TerminalStart((0, 1))
        );

        let dangling = BTreeMap::from([((0, 0), vec![Action::Down])]);
        assert_eq!(
            GridWorld::new(1, 2, (0, 0), rewards.clone(), dangling).unwrap_err(),
            GridError::DanglingMove((0, 0), Action::Down, (1, 0))
        );

        assert_eq!(
            GridWorld::new(1, 1, (0, 0), rewards, actions).unwrap_err(),
            GridError::OutOfBounds((0, 1), 1, 1)
        );
    }
}

use std::{collections::BTreeMap, fmt::Display};

use burn::prelude::*;

use crate::{
    algo::LinearModel,
    env::DiscreteActionSpace,
    gym::{Action, GridFeatures, GridWorld, Pos},
};

const DIVIDER: &str = "---------------------------";

/// Greedy value and action of every non-terminal cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub values: BTreeMap<Pos, f32>,
    pub policy: BTreeMap<Pos, Action>,
}

/// Evaluate the greedy action of `model` in every non-terminal cell of `env`
pub fn greedy_tables<B: Backend>(model: &LinearModel<B, GridFeatures>, env: &GridWorld) -> Tables {
    let actions = env.actions();
    let mut tables = Tables::default();
    for s in env.active_states() {
        let (a, v) = model.greedy(&s, &actions);
        tables.values.insert(s, v);
        tables.policy.insert(s, a);
    }
    tables
}

fn render_grid<T>(
    cells: &BTreeMap<Pos, T>,
    rows: i32,
    cols: i32,
    row_end: &str,
    cell: impl Fn(Option<&T>) -> String,
) -> String {
    let mut out = String::new();
    for i in 0..rows {
        out.push_str(DIVIDER);
        out.push('\n');
        let line = (0..cols)
            .map(|j| cell(cells.get(&(i, j))))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push_str(row_end);
    }
    out
}

/// Render values as a grid, two decimals per cell; cells without a value show 0.00
pub fn render_values(values: &BTreeMap<Pos, f32>, rows: i32, cols: i32) -> String {
    render_grid(values, rows, cols, "\n", |v| {
        let v = v.copied().unwrap_or(0.0);
        // The minus sign takes the leading column
        if v >= 0.0 {
            format!(" {v:.2}|")
        } else {
            format!("{v:.2}|")
        }
    })
}

/// Render one label per cell; cells without a label are blank and rows are followed by an
/// empty line
pub fn render_policy<T: Display>(policy: &BTreeMap<Pos, T>, rows: i32, cols: i32) -> String {
    render_grid(policy, rows, cols, "\n\n", |a| match a {
        Some(a) => format!("  {a}  |"),
        None => "     |".to_string(),
    })
}

use burn::config::Config;

use crate::algo::linear::FeatureMap;

use super::grid_world::{Action, Pos};

/// Number of basis features in each action block
const BASIS: usize = 6;

/// Number of action blocks
const BLOCKS: usize = 4;

/// Centering and scaling of the coordinate basis
///
/// The defaults normalize the basis over the 3x4 grid.
#[derive(Config, Debug)]
pub struct BasisConfig {
    #[config(default = 1.0)]
    pub row_center: f32,
    #[config(default = 1.5)]
    pub col_center: f32,
    #[config(default = 3.0)]
    pub cross_center: f32,
    #[config(default = 3.0)]
    pub cross_scale: f32,
    #[config(default = 2.0)]
    pub row_sq_center: f32,
    #[config(default = 2.0)]
    pub row_sq_scale: f32,
    #[config(default = 4.5)]
    pub col_sq_center: f32,
    #[config(default = 4.5)]
    pub col_sq_scale: f32,
}

/// Quadratic coordinate features, one block per action plus a shared bias
///
/// For a state `(r, c)` the block of the chosen action holds
/// `[r - 1, c - 1.5, (rc - 3)/3, (r² - 2)/2, (c² - 4.5)/4.5, 1]` (with the default
/// [`BasisConfig`]); every other block is zero and the last entry is always 1.
#[derive(Debug, Clone)]
pub struct GridFeatures {
    basis: BasisConfig,
}

impl GridFeatures {
    pub fn new(basis: BasisConfig) -> Self {
        Self { basis }
    }

    /// Position of the block owned by `action`
    pub fn block(action: Action) -> usize {
        match action {
            Action::Up => 0,
            Action::Down => 1,
            Action::Right => 2,
            Action::Left => 3,
        }
    }

    fn write_basis(&self, (row, col): Pos, out: &mut [f32]) {
        let b = &self.basis;
        let (r, c) = (row as f32, col as f32);
        out[0] = r - b.row_center;
        out[1] = c - b.col_center;
        out[2] = (r * c - b.cross_center) / b.cross_scale;
        out[3] = (r * r - b.row_sq_center) / b.row_sq_scale;
        out[4] = (c * c - b.col_sq_center) / b.col_sq_scale;
        out[5] = 1.0;
    }
}

impl Default for GridFeatures {
    fn default() -> Self {
        Self::new(BasisConfig::new())
    }
}

impl FeatureMap for GridFeatures {
    type State = Pos;
    type Action = Action;

    fn len(&self) -> usize {
        BASIS * BLOCKS + 1
    }

    fn features(&self, state: &Pos, action: &Action) -> Vec<f32> {
        let mut x = vec![0.0; self.len()];
        let offset = Self::block(*action) * BASIS;
        self.write_basis(*state, &mut x[offset..offset + BASIS]);
        x[BASIS * BLOCKS] = 1.0;
        x
    }
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use super::*;

    #[test]
    fn features_have_one_active_block() {
        let map = GridFeatures::default();
        assert_eq!(map.len(), 25);

        for row in 0..3 {
            for col in 0..4 {
                for &a in Action::VARIANTS {
                    let x = map.features(&(row, col), &a);
                    let block = GridFeatures::block(a);
                    for (i, &v) in x[..24].iter().enumerate() {
                        if i / BASIS != block {
                            assert_eq!(v, 0.0, "entry {i} for {a:?} at ({row}, {col})");
                        }
                    }
                    assert_eq!(x[24], 1.0, "Trailing bias is always set");
                    assert_eq!(x[block * BASIS + 5], 1.0, "Block bias is always set");
                }
            }
        }
    }

    #[test]
    fn basis_values_match_reference() {
        let map = GridFeatures::default();
        let x = map.features(&(2, 3), &Action::Right);
        let block = &x[12..18];
        assert_eq!(block, &[1.0, 1.5, 1.0, 1.0, 1.0, 1.0]);

        let x = map.features(&(0, 0), &Action::Left);
        let block = &x[18..24];
        assert_eq!(block, &[-1.0, -1.5, -1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn basis_divisions_are_not_truncated() {
        let map = GridFeatures::default();
        let x = map.features(&(1, 2), &Action::Up);
        let want: [f32; 6] = [0.0, 0.5, -1.0 / 3.0, -0.5, -1.0 / 9.0, 1.0];
        for (got, want) in x[..6].iter().zip(want) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
    }

    #[test]
    fn blocks_are_distinct() {
        let mut blocks: Vec<usize> = Action::VARIANTS
            .iter()
            .map(|&a| GridFeatures::block(a))
            .collect();
        blocks.sort();
        assert_eq!(blocks, vec![0, 1, 2, 3]);
    }
}

use serde::{Deserialize, Serialize};
use tsify::Tsify;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Tsify)]
pub enum Tetromino {
    I,
    O,
    T,
    L,
    J,
    Z,
    S,
}

impl Tetromino {
    pub fn all() -> [Tetromino; 7] {
        [
            Tetromino::I,
            Tetromino::O,
            Tetromino::T,
            Tetromino::L,
            Tetromino::J,
            Tetromino::Z,
            Tetromino::S,
        ]
    }

    /// Spawn orientation of this piece.
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::T => &[&[1, 1, 1], &[0, 1, 0]],
            Tetromino::L => &[&[1, 1, 1], &[1, 0, 0]],
            Tetromino::J => &[&[1, 1, 1], &[0, 0, 1]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
        };
        Shape::from_rows(rows)
    }
}

/// Rectangular occupancy matrix for one orientation of a piece.
///
/// Shapes are values: rotating produces a new matrix and never touches the
/// templates returned by [`Tetromino::shape`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from 0/1 rows. Rows are expected to share one width.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_filled(&self, dx: usize, dy: usize) -> bool {
        self.rows
            .get(dy)
            .and_then(|row| row.get(dx))
            .copied()
            .unwrap_or(false)
    }

    /// Offsets `(dx, dy)` of every occupied cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }

    pub fn rotate_cw(&self) -> Shape {
        rotate_cw(self)
    }
}

/// 90° clockwise rotation: `rotated[i][j] = shape[h - 1 - j][i]`.
pub fn rotate_cw(shape: &Shape) -> Shape {
    let h = shape.height();
    let rows = (0..shape.width())
        .map(|i| (0..h).map(|j| shape.rows[h - 1 - j][i]).collect())
        .collect();
    Shape { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_four_cells() {
        for piece in Tetromino::all() {
            assert_eq!(piece.shape().cells().count(), 4, "{:?}", piece);
        }
    }

    #[test]
    fn i_piece_turns_vertical() {
        let rotated = rotate_cw(&Tetromino::I.shape());
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 4);
        assert_eq!(rotated.cells().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn t_piece_rotates_clockwise() {
        // ###      .#
        // .#   ->  ##
        //          .#
        let rotated = Tetromino::T.shape().rotate_cw();
        assert_eq!(rotated, Shape::from_rows(&[&[0, 1], &[1, 1], &[0, 1]]));
    }

    #[test]
    fn l_piece_rotation_matches_transpose_then_reverse() {
        let rotated = Tetromino::L.shape().rotate_cw();
        assert_eq!(rotated, Shape::from_rows(&[&[1, 1], &[0, 1], &[0, 1]]));
    }

    #[test]
    fn four_rotations_return_to_template() {
        for piece in Tetromino::all() {
            let template = piece.shape();
            let spun = template.rotate_cw().rotate_cw().rotate_cw().rotate_cw();
            assert_eq!(spun, template);
        }
    }

    #[test]
    fn rotation_leaves_template_untouched() {
        let template = Tetromino::S.shape();
        let _ = template.rotate_cw();
        assert_eq!(template, Tetromino::S.shape());
    }

    #[test]
    fn o_piece_is_rotation_invariant() {
        let o = Tetromino::O.shape();
        assert_eq!(o.rotate_cw(), o);
    }
}

//! Cell navigation logic
//!
//! Pure functions over the grid shape. Only editable columns take part:
//! ArrowLeft/ArrowRight loop within a row, Tab/Shift+Tab walk row to row and
//! stop at the first/last cell of the grid, ArrowUp/ArrowDown keep the column.

use crate::column::ColumnDef;

/// Position of a cell (row index, column index)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

/// Outcome of a vertical move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    /// Move to this cell
    To(CellPosition),
    /// Already on the first row; nothing happens
    Top,
    /// Already on the last row; ArrowDown arms the new-row gesture
    PastEnd,
}

/// Indices of the editable columns, in display order
pub fn editable_columns(columns: &[ColumnDef]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.editable)
        .map(|(i, _)| i)
        .collect()
}

/// First editable column, if any
pub fn first_editable(editable: &[usize]) -> Option<usize> {
    editable.first().copied()
}

/// One row up (`delta < 0`) or down, same column, no wraparound
pub fn vertical(pos: CellPosition, delta: i32, row_count: usize) -> Vertical {
    if delta < 0 {
        if pos.row == 0 {
            Vertical::Top
        } else {
            Vertical::To(CellPosition::new(pos.row - 1, pos.col))
        }
    } else if pos.row + 1 >= row_count {
        Vertical::PastEnd
    } else {
        Vertical::To(CellPosition::new(pos.row + 1, pos.col))
    }
}

/// Next/previous editable column in the same row, wrapping first <-> last
pub fn horizontal_loop(pos: CellPosition, dir: Horizontal, editable: &[usize]) -> CellPosition {
    if editable.is_empty() {
        return pos;
    }
    let n = editable.len();
    let idx = match editable.iter().position(|c| *c == pos.col) {
        Some(i) => match dir {
            Horizontal::Right => (i + 1) % n,
            Horizontal::Left => (i + n - 1) % n,
        },
        // Started on a read-only column: enter the loop at the nearest side
        None => match dir {
            Horizontal::Right => editable.iter().position(|c| *c > pos.col).unwrap_or(0),
            Horizontal::Left => editable.iter().rposition(|c| *c < pos.col).unwrap_or(n - 1),
        },
    };
    CellPosition::new(pos.row, editable[idx])
}

/// Tab (forward) or Shift+Tab (backward) among editable columns
///
/// Crosses to the next/previous row at row boundaries and stays put at the
/// very first or last editable cell of the grid.
pub fn tab(pos: CellPosition, backward: bool, editable: &[usize], row_count: usize) -> CellPosition {
    let (Some(&first), Some(&last)) = (editable.first(), editable.last()) else {
        return pos;
    };

    if backward {
        if let Some(&prev) = editable.iter().rev().find(|c| **c < pos.col) {
            CellPosition::new(pos.row, prev)
        } else if pos.row > 0 {
            CellPosition::new(pos.row - 1, last)
        } else {
            CellPosition::new(pos.row, first)
        }
    } else if let Some(&next) = editable.iter().find(|c| **c > pos.col) {
        CellPosition::new(pos.row, next)
    } else if pos.row + 1 < row_count {
        CellPosition::new(pos.row + 1, first)
    } else {
        CellPosition::new(pos.row, last)
    }
}

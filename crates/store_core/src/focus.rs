//! Index arithmetic for directional focus movement.
//!
//! Targets are addressed by their position in the backing collection. A
//! [`Layout`] gives that index space a shape; [`next_index`] maps the current
//! position and a direction to the position that should receive focus, or
//! [`Move::NoMove`] when the input has to bubble to an enclosing scope.
//!
//! # Vertical movement
//!
//! Two vertical rules exist for grids:
//!
//! - [`VerticalNavigation::AsShipped`] keeps the behavior the store has always
//!   had: `Down`/`Up` share the `Right` boundary guard
//!   (`col < columns - 1 && current < len - 1`) and land on
//!   `current + columns - 1` / `current - columns + 1`. This produces diagonal
//!   jumps and no vertical movement from the last column.
//! - [`VerticalNavigation::RowAligned`] moves straight down or up one row,
//!   guarded on `current + columns < len` / `current >= columns`.
//!
//! With either rule a landing index outside `[0, len)` is reported as
//! [`Move::NoMove`].

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalNavigation {
    #[default]
    AsShipped,
    RowAligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Grid { columns: usize, item_count: usize },
    /// Single horizontal strip; vertical input always leaves it.
    Row { item_count: usize },
}

impl Layout {
    pub fn grid(columns: usize, item_count: usize) -> Result<Self> {
        if columns == 0 {
            return Err(StoreError::InvalidLayout { columns });
        }
        Ok(Layout::Grid {
            columns,
            item_count,
        })
    }

    pub fn row(item_count: usize) -> Self {
        Layout::Row { item_count }
    }

    /// Rejects a grid built by hand with zero columns.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Layout::Grid { columns: 0, .. } => Err(StoreError::InvalidLayout { columns: 0 }),
            Layout::Grid { .. } | Layout::Row { .. } => Ok(()),
        }
    }

    pub fn item_count(&self) -> usize {
        match *self {
            Layout::Grid { item_count, .. } | Layout::Row { item_count } => item_count,
        }
    }

    pub fn columns(&self) -> usize {
        match *self {
            Layout::Grid { columns, .. } => columns,
            Layout::Row { item_count } => item_count.max(1),
        }
    }

    pub fn col_of(&self, index: usize) -> usize {
        index % self.columns()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    To(usize),
    NoMove,
}

impl Move {
    fn landing(target: Option<usize>, item_count: usize) -> Self {
        match target {
            Some(index) if index < item_count => Move::To(index),
            _ => Move::NoMove,
        }
    }
}

pub fn next_index(
    current: usize,
    direction: Direction,
    layout: Layout,
    vertical: VerticalNavigation,
) -> Result<Move> {
    layout.validate()?;
    let len = layout.item_count();
    if current >= len {
        return Err(StoreError::InvalidIndex {
            index: current,
            len,
        });
    }

    let columns = layout.columns();
    let col = layout.col_of(current);
    let can_step_right = col + 1 < columns && current + 1 < len;

    let target = match (direction, layout) {
        (Direction::Left, _) => (col > 0).then(|| current - 1),
        (Direction::Right, _) => can_step_right.then(|| current + 1),
        (Direction::Up | Direction::Down, Layout::Row { .. }) => None,
        (Direction::Down, Layout::Grid { .. }) => match vertical {
            VerticalNavigation::AsShipped => can_step_right.then(|| current + columns - 1),
            VerticalNavigation::RowAligned => Some(current + columns),
        },
        (Direction::Up, Layout::Grid { .. }) => match vertical {
            VerticalNavigation::AsShipped => can_step_right
                .then(|| (current + 1).checked_sub(columns))
                .flatten(),
            VerticalNavigation::RowAligned => current.checked_sub(columns),
        },
    };

    Ok(Move::landing(target, len))
}

#[cfg(test)]
#[path = "tests/focus_tests.rs"]
mod tests;

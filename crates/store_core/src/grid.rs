use shared::domain::Item;
use tracing::debug;

use crate::{
    error::{Result, StoreError},
    focus::{next_index, Layout, Move, VerticalNavigation},
    hooks::FocusTarget,
    input::{Input, InputOutcome},
};

/// Binds the focus index model to one collection of tiles.
///
/// The controller exclusively owns the collection's focus position. The
/// position is remembered while another scope holds focus so that returning
/// to the collection restores it.
pub struct GridNavigationController<T> {
    items: Vec<Item>,
    targets: Vec<T>,
    layout: Layout,
    vertical: VerticalNavigation,
    position: Option<usize>,
    has_focus: bool,
}

impl<T: FocusTarget> GridNavigationController<T> {
    pub fn grid(
        items: Vec<Item>,
        targets: Vec<T>,
        columns: usize,
        vertical: VerticalNavigation,
    ) -> Result<Self> {
        let layout = Layout::grid(columns, items.len())?;
        Self::with_layout(items, targets, layout, vertical)
    }

    pub fn row(items: Vec<Item>, targets: Vec<T>) -> Result<Self> {
        let layout = Layout::row(items.len());
        Self::with_layout(items, targets, layout, VerticalNavigation::default())
    }

    fn with_layout(
        items: Vec<Item>,
        targets: Vec<T>,
        layout: Layout,
        vertical: VerticalNavigation,
    ) -> Result<Self> {
        ensure_targets_match(&items, &targets)?;
        let position = (!items.is_empty()).then_some(0);
        Ok(Self {
            items,
            targets,
            layout,
            vertical,
            position,
            has_focus: false,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remembered focus position, `None` only for an empty collection.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Index of the target currently holding input focus.
    pub fn focused(&self) -> Option<usize> {
        self.position.filter(|_| self.has_focus)
    }

    pub fn focused_item(&self) -> Option<&Item> {
        self.focused().map(|index| &self.items[index])
    }

    /// Moves input focus to `index`, blurring the previously focused tile first.
    pub fn focus(&mut self, index: usize) -> Result<()> {
        let len = self.items.len();
        if index >= len {
            return Err(StoreError::InvalidIndex { index, len });
        }
        if let Some(previous) = self.focused() {
            if previous != index {
                self.targets[previous].blur();
            }
        }
        self.position = Some(index);
        self.has_focus = true;
        self.targets[index].focus();
        debug!(index, len, "grid focus moved");
        Ok(())
    }

    /// Gives focus back to the remembered position. Returns false when the
    /// collection is empty and nothing can take focus.
    pub fn restore_focus(&mut self) -> bool {
        match self.position {
            Some(index) => self.focus(index).is_ok(),
            None => false,
        }
    }

    pub fn blur(&mut self) {
        if let Some(index) = self.focused() {
            self.targets[index].blur();
        }
        self.has_focus = false;
    }

    /// Seeds the remembered position without focusing, clamped into range.
    pub fn set_position(&mut self, index: usize) {
        self.position = clamp_position(Some(index), self.items.len());
    }

    /// Handles an input addressed to the focused tile.
    pub fn handle_input(
        &mut self,
        input: Input,
        on_select: &mut dyn FnMut(&Item),
    ) -> Result<InputOutcome> {
        match self.focused() {
            Some(index) => self.handle_input_at(index, input, on_select),
            None => Ok(InputOutcome::NotConsumed),
        }
    }

    /// Handles an input delivered to the tile at `index`.
    pub fn handle_input_at(
        &mut self,
        index: usize,
        input: Input,
        on_select: &mut dyn FnMut(&Item),
    ) -> Result<InputOutcome> {
        if input == Input::Confirm {
            let item = self.items.get(index).ok_or(StoreError::InvalidIndex {
                index,
                len: self.items.len(),
            })?;
            on_select(item);
            return Ok(InputOutcome::Consumed);
        }

        let Some(direction) = input.direction() else {
            return Ok(InputOutcome::NotConsumed);
        };

        match next_index(index, direction, self.layout, self.vertical)? {
            Move::To(target) => {
                self.focus(target)?;
                Ok(InputOutcome::Consumed)
            }
            Move::NoMove => {
                debug!(index, ?direction, "grid boundary, input bubbles out");
                Ok(InputOutcome::NotConsumed)
            }
        }
    }
}

fn ensure_targets_match<T>(items: &[Item], targets: &[T]) -> Result<()> {
    if items.len() != targets.len() {
        return Err(StoreError::InvalidState(format!(
            "{} focus targets supplied for {} items",
            targets.len(),
            items.len()
        )));
    }
    Ok(())
}

fn clamp_position(position: Option<usize>, len: usize) -> Option<usize> {
    match (position, len) {
        (_, 0) => None,
        (Some(index), len) => Some(index.min(len - 1)),
        (None, _) => Some(0),
    }
}

#[cfg(test)]
#[path = "tests/grid_tests.rs"]
mod tests;

use shared::domain::TabItem;
use tracing::debug;

use crate::{
    error::{Result, StoreError},
    hooks::{BackNavigator, FocusTarget},
    input::{Input, InputOutcome},
};

/// Closed ring of tabs. Cycling couples focus and the active selection:
/// the tab that receives focus also becomes active.
pub struct TabRingController<T> {
    tabs: Vec<TabItem>,
    targets: Vec<T>,
    active_id: String,
    focused: usize,
    has_focus: bool,
}

impl<T: FocusTarget> TabRingController<T> {
    pub fn new(tabs: Vec<TabItem>, targets: Vec<T>, active_id: impl Into<String>) -> Result<Self> {
        if tabs.is_empty() {
            return Err(StoreError::InvalidState("tab ring needs at least one tab".into()));
        }
        if tabs.len() != targets.len() {
            return Err(StoreError::InvalidState(format!(
                "{} focus targets supplied for {} tabs",
                targets.len(),
                tabs.len()
            )));
        }
        let active_id = active_id.into();
        let focused = position_of(&tabs, &active_id)?;
        Ok(Self {
            tabs,
            targets,
            active_id,
            focused,
            has_focus: false,
        })
    }

    pub fn tabs(&self) -> &[TabItem] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active_index(&self) -> Result<usize> {
        position_of(&self.tabs, &self.active_id)
    }

    pub fn active_tab(&self) -> Result<&TabItem> {
        Ok(&self.tabs[self.active_index()?])
    }

    pub fn focused(&self) -> Option<usize> {
        self.has_focus.then_some(self.focused)
    }

    pub fn focus(&mut self, index: usize) -> Result<()> {
        let len = self.tabs.len();
        if index >= len {
            return Err(StoreError::InvalidIndex { index, len });
        }
        if self.has_focus && self.focused != index {
            self.targets[self.focused].blur();
        }
        self.focused = index;
        self.has_focus = true;
        self.targets[index].focus();
        Ok(())
    }

    /// Focuses the active tab, used when focus enters the tab strip.
    pub fn focus_active(&mut self) -> Result<()> {
        let index = self.active_index()?;
        self.focus(index)
    }

    pub fn blur(&mut self) {
        if self.has_focus {
            self.targets[self.focused].blur();
        }
        self.has_focus = false;
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        position_of(&self.tabs, id)?;
        if self.active_id != id {
            debug!(from = %self.active_id, to = id, "active tab changed");
            self.active_id = id.to_string();
        }
        Ok(())
    }

    pub fn handle_input(&mut self, input: Input, back: &dyn BackNavigator) -> Result<InputOutcome> {
        // Surfaces a broken invariant before acting on it.
        self.active_index()?;
        let len = self.tabs.len();
        match input {
            Input::PreviousGroup => self.cycle_to((self.focused + len - 1) % len),
            Input::NextGroup => self.cycle_to((self.focused + 1) % len),
            Input::Confirm => {
                let id = self.tabs[self.focused].id.clone();
                self.select(&id)?;
                Ok(InputOutcome::Consumed)
            }
            Input::Cancel => {
                back.navigate_back();
                Ok(InputOutcome::Consumed)
            }
            Input::Up | Input::Down | Input::Left | Input::Right => Ok(InputOutcome::NotConsumed),
        }
    }

    fn cycle_to(&mut self, index: usize) -> Result<InputOutcome> {
        self.focus(index)?;
        let id = self.tabs[index].id.clone();
        self.select(&id)?;
        Ok(InputOutcome::Consumed)
    }
}

fn position_of(tabs: &[TabItem], id: &str) -> Result<usize> {
    tabs.iter()
        .position(|tab| tab.id == id)
        .ok_or_else(|| StoreError::InvalidState(format!("active tab `{id}` is not in the ring")))
}

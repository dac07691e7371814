use std::ops::Range;

use crate::error::{Result, StoreError};

/// Keeps the focused carousel item centered in a fixed-width viewport.
///
/// Purely reactive: the current index is owned elsewhere and fed in through
/// [`CarouselAutoscroll::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselAutoscroll {
    item_count: usize,
    visible: usize,
    first_visible: usize,
    current: usize,
}

impl CarouselAutoscroll {
    pub fn new(item_count: usize, visible: usize) -> Self {
        Self {
            item_count,
            visible: visible.max(1),
            first_visible: 0,
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.first_visible..(self.first_visible + self.visible).min(self.item_count)
    }

    /// Reacts to a new current index. Returns the new first visible slot when
    /// the viewport had to scroll.
    pub fn sync(&mut self, current: usize) -> Result<Option<usize>> {
        if current >= self.item_count {
            return Err(StoreError::InvalidIndex {
                index: current,
                len: self.item_count,
            });
        }
        self.current = current;
        let max_first = self.item_count.saturating_sub(self.visible);
        let first = current.saturating_sub(self.visible / 2).min(max_first);
        if first == self.first_visible {
            return Ok(None);
        }
        self.first_visible = first;
        Ok(Some(first))
    }

    /// One page-indicator dot per item, lit for the current one.
    pub fn indicators(&self) -> Vec<bool> {
        (0..self.item_count).map(|i| i == self.current).collect()
    }
}

//! Seams to the collaborators the core does not own: the rendering layer's
//! focus targets, the item-open action and back-navigation.

use shared::domain::{BucketKind, Item, TabItem};

/// A tile or tab that can hold input focus. Inputs addressed to the target
/// are delivered to the owning controller, which reports whether they were
/// consumed.
pub trait FocusTarget {
    fn focus(&mut self);

    fn blur(&mut self) {}
}

pub trait ItemOpener: Send + Sync {
    fn open_item(&self, target_url: &str);
}

pub trait BackNavigator: Send + Sync {
    fn navigate_back(&self);
}

/// Supplies a focus target for every tab and tile the composer displays.
pub trait TargetRegistry {
    type Target: FocusTarget;

    fn tab_target(&mut self, tab: &TabItem) -> Self::Target;

    fn tile_target(&mut self, bucket: BucketKind, index: usize, item: &Item) -> Self::Target;
}

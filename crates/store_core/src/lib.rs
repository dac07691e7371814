//! Directional focus navigation and catalog aggregation for the gamepad store view.

pub mod carousel;
pub mod composer;
pub mod error;
pub mod focus;
pub mod grid;
pub mod hooks;
pub mod input;
pub mod orchestrator;
pub mod tabs;

pub use carousel::CarouselAutoscroll;
pub use composer::{
    default_tabs, ComposerOptions, FocusScope, ReadyView, SectionKind, SectionView,
    StoreView, StoreViewComposer, TabView, TileView,
};
pub use error::{Result, StoreError};
pub use focus::{next_index, Direction, Layout, Move, VerticalNavigation};
pub use grid::GridNavigationController;
pub use hooks::{BackNavigator, FocusTarget, ItemOpener, TargetRegistry};
pub use input::{Input, InputOutcome};
pub use orchestrator::{
    CatalogBuckets, CatalogFetchOrchestrator, CatalogSource, CatalogState, LoadOutcome,
    FETCH_FAILURE_MESSAGE,
};
pub use tabs::TabRingController;

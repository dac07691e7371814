//! Top-level store view: owns the aggregate catalog state, the tab ring and
//! the visible sections, and routes inputs between them.
//!
//! The view is an ordered list of focus scopes, `[tabs, section 0, ...]`.
//! Inputs go to the scope holding focus first; a `Down`/`Up` it does not
//! consume moves focus to the next/previous non-empty scope. Tab cycling and
//! back-navigation are available from every scope.

use std::{collections::HashMap, ops::Range, sync::Arc};

use shared::domain::{BucketKind, Item, TabItem};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    carousel::CarouselAutoscroll,
    error::{Result, StoreError},
    focus::{next_index, Layout, Move, VerticalNavigation},
    grid::GridNavigationController,
    hooks::{BackNavigator, FocusTarget, ItemOpener, TargetRegistry},
    input::{Input, InputOutcome},
    orchestrator::{CatalogBuckets, CatalogFetchOrchestrator, CatalogState, LoadOutcome},
    tabs::TabRingController,
};

pub const STORE_TITLE: &str = "Anker Game Store";
pub const ALL_TAB_ID: &str = "all";
pub const LOADING_MESSAGE: &str = "Loading Anker Games...";
pub const RETRY_LABEL: &str = "Retry";
pub const FOOTER_LEGENDS: [&str; 4] = [
    "A: Select Game",
    "D-pad: Navigate",
    "LB/RB: Switch Tab",
    "B: Back to Menu",
];

pub fn default_tabs() -> Vec<TabItem> {
    vec![
        TabItem::new(ALL_TAB_ID, "All Games"),
        TabItem::new("trending", "Trending"),
        TabItem::new("upcoming", "Upcoming"),
        TabItem::new("latest", "Latest"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerOptions {
    pub columns: usize,
    /// Items per section on the "All Games" tab.
    pub preview_limit: usize,
    pub carousel_visible: usize,
    pub vertical: VerticalNavigation,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            columns: 5,
            preview_limit: 8,
            carousel_visible: 3,
            vertical: VerticalNavigation::AsShipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Carousel,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusScope {
    Tabs,
    Section(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreView {
    Loading {
        message: &'static str,
    },
    Failed {
        message: String,
        retry_label: &'static str,
    },
    Ready(ReadyView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyView {
    pub title: &'static str,
    pub tabs: Vec<TabView>,
    pub sections: Vec<SectionView>,
    pub footer: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: String,
    pub label: String,
    pub active: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub bucket: BucketKind,
    pub kind: SectionKind,
    pub title: &'static str,
    pub tiles: Vec<TileView>,
    /// Carousel viewport; the whole section for grids.
    pub visible: Range<usize>,
    pub indicators: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub title: String,
    pub image: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub focused: bool,
}

struct Section<T> {
    bucket: BucketKind,
    kind: SectionKind,
    nav: GridNavigationController<T>,
    autoscroll: Option<CarouselAutoscroll>,
}

impl<T: FocusTarget> Section<T> {
    fn sync_autoscroll(&mut self) -> Result<()> {
        let (Some(autoscroll), Some(index)) = (self.autoscroll.as_mut(), self.nav.focused()) else {
            return Ok(());
        };
        if let Some(first) = autoscroll.sync(index)? {
            debug!(bucket = %self.bucket, index, first, "carousel scrolled");
        }
        Ok(())
    }
}

pub struct StoreViewComposer<R: TargetRegistry> {
    orchestrator: Arc<CatalogFetchOrchestrator>,
    catalog: watch::Receiver<CatalogState>,
    current: CatalogState,
    cancel: CancellationToken,
    pending: Option<JoinHandle<LoadOutcome>>,
    registry: R,
    tabs: TabRingController<R::Target>,
    sections: Vec<Section<R::Target>>,
    /// Last focus position per bucket, kept across tab switches.
    positions: HashMap<BucketKind, usize>,
    scope: FocusScope,
    options: ComposerOptions,
    opener: Arc<dyn ItemOpener>,
    back: Arc<dyn BackNavigator>,
}

impl<R: TargetRegistry> StoreViewComposer<R> {
    pub fn new(
        orchestrator: Arc<CatalogFetchOrchestrator>,
        mut registry: R,
        opener: Arc<dyn ItemOpener>,
        back: Arc<dyn BackNavigator>,
        options: ComposerOptions,
    ) -> Result<Self> {
        Layout::grid(options.columns, 0)?;

        let tab_items = default_tabs();
        let targets = tab_items
            .iter()
            .map(|tab| registry.tab_target(tab))
            .collect();
        let tabs = TabRingController::new(tab_items, targets, ALL_TAB_ID)?;
        let mut catalog = orchestrator.subscribe();
        let initial = catalog.borrow_and_update().clone();

        let mut composer = Self {
            orchestrator,
            catalog,
            current: CatalogState::Loading,
            cancel: CancellationToken::new(),
            pending: None,
            registry,
            tabs,
            sections: Vec::new(),
            positions: HashMap::new(),
            scope: FocusScope::Tabs,
            options,
            opener,
            back,
        };
        composer.apply_state(initial)?;
        Ok(composer)
    }

    /// Starts a fresh catalog load, abandoning any load still in flight.
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        let orchestrator = Arc::clone(&self.orchestrator);
        let cancel = self.cancel.clone();
        debug!("queued catalog load");
        self.pending = Some(tokio::spawn(async move {
            orchestrator.load(&cancel).await
        }));
    }

    pub fn retry(&mut self) {
        info!("retrying catalog load");
        self.mount();
    }

    /// Tears the view down. Results of loads still in flight are dropped.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        self.blur_scope();
        info!("store view unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Waits for the most recent load to settle and applies its result.
    pub async fn wait_for_load(&mut self) -> Result<Option<LoadOutcome>> {
        let Some(handle) = self.pending.take() else {
            return Ok(None);
        };
        let outcome = handle
            .await
            .map_err(|err| StoreError::InvalidState(format!("catalog load task failed: {err}")))?;
        self.sync()?;
        Ok(Some(outcome))
    }

    /// Applies a catalog state published since the last call. Returns
    /// whether anything changed. A torn-down view never changes.
    pub fn sync(&mut self) -> Result<bool> {
        if !self.is_mounted() {
            return Ok(false);
        }
        if !self.catalog.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        let state = self.catalog.borrow_and_update().clone();
        self.apply_state(state)?;
        Ok(true)
    }

    pub fn catalog_state(&self) -> &CatalogState {
        &self.current
    }

    pub fn focus_scope(&self) -> FocusScope {
        self.scope
    }

    pub fn active_tab(&self) -> Result<&TabItem> {
        self.tabs.active_tab()
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn focused_item(&self) -> Option<&Item> {
        match self.scope {
            FocusScope::Tabs => None,
            FocusScope::Section(index) => self.sections.get(index)?.nav.focused_item(),
        }
    }

    pub fn handle_input(&mut self, input: Input) -> Result<InputOutcome> {
        self.sync()?;
        match self.current {
            CatalogState::Loading => match input {
                Input::Cancel => self.navigate_back(),
                _ => Ok(InputOutcome::NotConsumed),
            },
            CatalogState::Failed { .. } => match input {
                Input::Confirm => {
                    self.retry();
                    Ok(InputOutcome::Consumed)
                }
                Input::Cancel => self.navigate_back(),
                _ => Ok(InputOutcome::NotConsumed),
            },
            CatalogState::Ready(_) => self.handle_ready_input(input),
        }
    }

    pub fn view(&self) -> StoreView {
        match &self.current {
            CatalogState::Loading => StoreView::Loading {
                message: LOADING_MESSAGE,
            },
            CatalogState::Failed { message } => StoreView::Failed {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            },
            CatalogState::Ready(_) => StoreView::Ready(self.ready_view()),
        }
    }

    fn ready_view(&self) -> ReadyView {
        let focused_tab = self.tabs.focused();
        let tabs = self
            .tabs
            .tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| TabView {
                id: tab.id.clone(),
                label: tab.label.clone(),
                active: tab.id == self.tabs.active_id(),
                focused: focused_tab == Some(index),
            })
            .collect();

        let sections = self
            .sections
            .iter()
            .map(|section| {
                let focused = section.nav.focused();
                let tiles: Vec<TileView> = section
                    .nav
                    .items()
                    .iter()
                    .enumerate()
                    .map(|(index, item)| TileView {
                        title: item.title.clone(),
                        image: item.image_or_placeholder(false).to_string(),
                        version: item.version.clone(),
                        description: item.description.clone(),
                        focused: focused == Some(index),
                    })
                    .collect();
                let (visible, indicators) = match &section.autoscroll {
                    Some(autoscroll) => (autoscroll.visible_range(), autoscroll.indicators()),
                    None => (0..tiles.len(), Vec::new()),
                };
                SectionView {
                    bucket: section.bucket,
                    kind: section.kind,
                    title: section.bucket.section_title(),
                    tiles,
                    visible,
                    indicators,
                }
            })
            .collect();

        ReadyView {
            title: STORE_TITLE,
            tabs,
            sections,
            footer: &FOOTER_LEGENDS,
        }
    }

    fn apply_state(&mut self, state: CatalogState) -> Result<()> {
        self.blur_scope();
        self.scope = FocusScope::Tabs;
        self.current = state;
        match self.current {
            CatalogState::Ready(_) => {
                self.rebuild_sections()?;
                self.tabs.focus_active()?;
            }
            CatalogState::Loading => {
                self.sections.clear();
                self.positions.clear();
            }
            CatalogState::Failed { ref message } => {
                warn!(%message, "store view showing load failure");
                self.sections.clear();
                self.positions.clear();
            }
        }
        Ok(())
    }

    fn handle_ready_input(&mut self, input: Input) -> Result<InputOutcome> {
        match input {
            Input::Cancel => return self.navigate_back(),
            Input::PreviousGroup | Input::NextGroup => {
                self.enter_tabs()?;
                return self.route_to_tabs(input);
            }
            _ => {}
        }

        let outcome = match self.scope {
            FocusScope::Tabs => self.route_to_tabs(input)?,
            FocusScope::Section(index) => self.route_to_section(index, input)?,
        };
        if outcome.is_consumed() {
            return Ok(outcome);
        }

        match (self.scope, input) {
            (_, Input::Down) => self.move_scope(true),
            (_, Input::Up) => self.move_scope(false),
            (FocusScope::Tabs, Input::Left | Input::Right) => self.walk_tab_strip(input),
            _ => Ok(InputOutcome::NotConsumed),
        }
    }

    fn navigate_back(&self) -> Result<InputOutcome> {
        info!("navigating back from store");
        self.back.navigate_back();
        Ok(InputOutcome::Consumed)
    }

    fn route_to_tabs(&mut self, input: Input) -> Result<InputOutcome> {
        let before = self.tabs.active_id().to_string();
        let back = Arc::clone(&self.back);
        let outcome = self.tabs.handle_input(input, back.as_ref())?;
        if self.tabs.active_id() != before {
            info!(tab = self.tabs.active_id(), "switched tab");
            self.rebuild_sections()?;
        }
        Ok(outcome)
    }

    fn route_to_section(&mut self, index: usize, input: Input) -> Result<InputOutcome> {
        let opener = Arc::clone(&self.opener);
        let section = self
            .sections
            .get_mut(index)
            .ok_or_else(|| StoreError::InvalidState(format!("no section at scope {index}")))?;
        let outcome = section.nav.handle_input(input, &mut |item: &Item| {
            info!(title = %item.title, "selected game");
            opener.open_item(&item.target_url);
        })?;
        section.sync_autoscroll()?;
        Ok(outcome)
    }

    /// Left/Right along the tab strip move focus without activating.
    fn walk_tab_strip(&mut self, input: Input) -> Result<InputOutcome> {
        let (Some(direction), Some(current)) = (input.direction(), self.tabs.focused()) else {
            return Ok(InputOutcome::NotConsumed);
        };
        let layout = Layout::row(self.tabs.len());
        match next_index(current, direction, layout, self.options.vertical)? {
            Move::To(index) => {
                self.tabs.focus(index)?;
                Ok(InputOutcome::Consumed)
            }
            Move::NoMove => Ok(InputOutcome::NotConsumed),
        }
    }

    fn move_scope(&mut self, forward: bool) -> Result<InputOutcome> {
        // Scope 0 is the tab strip, scope n + 1 is section n.
        let mut position = match self.scope {
            FocusScope::Tabs => 0,
            FocusScope::Section(index) => index + 1,
        };
        loop {
            position = if forward {
                position + 1
            } else {
                match position.checked_sub(1) {
                    Some(previous) => previous,
                    None => return Ok(InputOutcome::NotConsumed),
                }
            };

            if position == 0 {
                self.enter_tabs()?;
                return Ok(InputOutcome::Consumed);
            }

            let index = position - 1;
            let Some(section) = self.sections.get(index) else {
                return Ok(InputOutcome::NotConsumed);
            };
            if section.nav.is_empty() {
                continue;
            }

            self.blur_scope();
            let section = &mut self.sections[index];
            section.nav.restore_focus();
            section.sync_autoscroll()?;
            self.scope = FocusScope::Section(index);
            debug!(section = index, bucket = %section.bucket, "focus entered section");
            return Ok(InputOutcome::Consumed);
        }
    }

    fn enter_tabs(&mut self) -> Result<()> {
        if self.scope != FocusScope::Tabs {
            self.blur_scope();
            self.scope = FocusScope::Tabs;
        }
        if self.tabs.focused().is_none() {
            self.tabs.focus_active()?;
        }
        Ok(())
    }

    fn blur_scope(&mut self) {
        match self.scope {
            FocusScope::Tabs => self.tabs.blur(),
            FocusScope::Section(index) => {
                if let Some(section) = self.sections.get_mut(index) {
                    section.nav.blur();
                }
            }
        }
    }

    fn rebuild_sections(&mut self) -> Result<()> {
        let buckets: Arc<CatalogBuckets> = match &self.current {
            CatalogState::Ready(buckets) => Arc::clone(buckets),
            CatalogState::Loading | CatalogState::Failed { .. } => {
                self.sections.clear();
                return Ok(());
            }
        };

        for section in &self.sections {
            if let Some(position) = section.nav.position() {
                self.positions.insert(section.bucket, position);
            }
        }
        if let FocusScope::Section(_) = self.scope {
            self.blur_scope();
            self.scope = FocusScope::Tabs;
        }

        let mut sections = Vec::new();
        for (bucket, kind, preview) in section_plan(self.tabs.active_id())? {
            let all = buckets.get(bucket);
            let shown = if preview {
                &all[..all.len().min(self.options.preview_limit)]
            } else {
                all
            };
            let items = shown.to_vec();
            let registry = &mut self.registry;
            let targets = items
                .iter()
                .enumerate()
                .map(|(index, item)| registry.tile_target(bucket, index, item))
                .collect();
            let mut nav = match kind {
                SectionKind::Carousel => GridNavigationController::row(items, targets)?,
                SectionKind::Grid => GridNavigationController::grid(
                    items,
                    targets,
                    self.options.columns,
                    self.options.vertical,
                )?,
            };
            if let Some(position) = self.positions.get(&bucket) {
                nav.set_position(*position);
            }
            let autoscroll = match kind {
                SectionKind::Carousel => {
                    let mut autoscroll =
                        CarouselAutoscroll::new(nav.items().len(), self.options.carousel_visible);
                    if let Some(position) = nav.position() {
                        autoscroll.sync(position)?;
                    }
                    Some(autoscroll)
                }
                SectionKind::Grid => None,
            };
            sections.push(Section {
                bucket,
                kind,
                nav,
                autoscroll,
            });
        }
        self.sections = sections;
        Ok(())
    }
}

fn section_plan(tab_id: &str) -> Result<Vec<(BucketKind, SectionKind, bool)>> {
    let plan = match tab_id {
        ALL_TAB_ID => vec![
            (BucketKind::Carousel, SectionKind::Carousel, false),
            (BucketKind::Trending, SectionKind::Grid, true),
            (BucketKind::Upcoming, SectionKind::Grid, true),
            (BucketKind::Latest, SectionKind::Grid, true),
        ],
        "trending" => vec![(BucketKind::Trending, SectionKind::Grid, false)],
        "upcoming" => vec![(BucketKind::Upcoming, SectionKind::Grid, false)],
        "latest" => vec![(BucketKind::Latest, SectionKind::Grid, false)],
        other => {
            return Err(StoreError::InvalidState(format!(
                "no sections defined for tab `{other}`"
            )))
        }
    };
    Ok(plan)
}

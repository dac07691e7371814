use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use shared::{
    domain::{BucketKind, Item, TabItem},
    error::{FetchError, FetchErrorKind},
};
use store_core::{
    BackNavigator, CatalogFetchOrchestrator, CatalogSource, CatalogState, ComposerOptions,
    FocusScope, FocusTarget, Input, InputOutcome, ItemOpener, LoadOutcome, SectionKind,
    StoreView, StoreViewComposer, TargetRegistry, VerticalNavigation, FETCH_FAILURE_MESSAGE,
};
use tokio::sync::Semaphore;

fn bucket_items(bucket: BucketKind, count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            Item::new(
                format!("{bucket}-{i}"),
                format!("https://cdn.example/{bucket}/{i}.jpg"),
                format!("https://store.example/{bucket}/{i}"),
            )
        })
        .collect()
}

struct ScriptedSource {
    latest_failures: AtomicUsize,
    gate: Option<Semaphore>,
    empty: Option<BucketKind>,
}

impl ScriptedSource {
    fn healthy() -> Self {
        Self {
            latest_failures: AtomicUsize::new(0),
            gate: None,
            empty: None,
        }
    }

    fn failing_latest_once() -> Self {
        Self {
            latest_failures: AtomicUsize::new(1),
            ..Self::healthy()
        }
    }

    fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::healthy()
        }
    }

    fn with_empty(bucket: BucketKind) -> Self {
        Self {
            empty: Some(bucket),
            ..Self::healthy()
        }
    }

    fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(BucketKind::ALL.len());
        }
    }

    async fn fetch(&self, bucket: BucketKind, count: usize) -> Result<Vec<Item>, FetchError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        if bucket == BucketKind::Latest
            && self
                .latest_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok()
        {
            return Err(FetchError::new(FetchErrorKind::Status, bucket, "HTTP 503"));
        }
        if self.empty == Some(bucket) {
            return Ok(Vec::new());
        }
        Ok(bucket_items(bucket, count))
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_carousel(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Carousel, 5).await
    }

    async fn fetch_trending(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Trending, 12).await
    }

    async fn fetch_upcoming(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Upcoming, 3).await
    }

    async fn fetch_latest(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Latest, 9).await
    }
}

#[derive(Clone, Default)]
struct FocusLog(Arc<Mutex<Vec<String>>>);

struct Target {
    name: String,
    log: FocusLog,
}

impl FocusTarget for Target {
    fn focus(&mut self) {
        self.log.0.lock().expect("log").push(format!("focus {}", self.name));
    }

    fn blur(&mut self) {
        self.log.0.lock().expect("log").push(format!("blur {}", self.name));
    }
}

#[derive(Default)]
struct Registry {
    log: FocusLog,
}

impl Registry {
    /// Targets holding focus after replaying the log.
    fn focused(&self) -> Vec<String> {
        let mut focused: Vec<String> = Vec::new();
        for entry in self.log.0.lock().expect("log").iter() {
            if let Some(name) = entry.strip_prefix("focus ") {
                if !focused.iter().any(|f| f == name) {
                    focused.push(name.to_string());
                }
            } else if let Some(name) = entry.strip_prefix("blur ") {
                focused.retain(|f| f != name);
            }
        }
        focused
    }
}

impl TargetRegistry for Registry {
    type Target = Target;

    fn tab_target(&mut self, tab: &TabItem) -> Target {
        Target {
            name: format!("tab:{}", tab.id),
            log: self.log.clone(),
        }
    }

    fn tile_target(&mut self, bucket: BucketKind, index: usize, _item: &Item) -> Target {
        Target {
            name: format!("{bucket}:{index}"),
            log: self.log.clone(),
        }
    }
}

#[derive(Default)]
struct Opened(Mutex<Vec<String>>);

impl ItemOpener for Opened {
    fn open_item(&self, target_url: &str) {
        self.0.lock().expect("opened").push(target_url.to_string());
    }
}

#[derive(Default)]
struct Back(AtomicUsize);

impl BackNavigator for Back {
    fn navigate_back(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    composer: StoreViewComposer<Registry>,
    opened: Arc<Opened>,
    back: Arc<Back>,
}

impl Harness {
    fn new(source: Arc<ScriptedSource>, options: ComposerOptions) -> Self {
        let orchestrator = Arc::new(CatalogFetchOrchestrator::new(source));
        let opened = Arc::new(Opened::default());
        let back = Arc::new(Back::default());
        let composer = StoreViewComposer::new(
            orchestrator,
            Registry::default(),
            opened.clone(),
            back.clone(),
            options,
        )
        .expect("composer");
        Self {
            composer,
            opened,
            back,
        }
    }

    fn press(&mut self, input: Input) -> InputOutcome {
        self.composer.handle_input(input).expect("input")
    }

    fn focused_title(&self) -> Option<String> {
        self.composer.focused_item().map(|item| item.title.clone())
    }

    fn opened(&self) -> Vec<String> {
        self.opened.0.lock().expect("opened").clone()
    }
}

async fn mounted(source: ScriptedSource, options: ComposerOptions) -> Harness {
    let mut harness = Harness::new(Arc::new(source), options);
    harness.composer.mount();
    harness.composer.wait_for_load().await.expect("load");
    harness
}

#[tokio::test]
async fn ready_view_composes_all_tab_with_previews() {
    let harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;

    let StoreView::Ready(view) = harness.composer.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.title, "Anker Game Store");
    let active: Vec<&str> = view.tabs.iter().filter(|t| t.active).map(|t| t.id.as_str()).collect();
    assert_eq!(active, vec!["all"]);
    assert!(view.tabs[0].focused);

    let shape: Vec<(BucketKind, SectionKind, usize)> = view
        .sections
        .iter()
        .map(|s| (s.bucket, s.kind, s.tiles.len()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (BucketKind::Carousel, SectionKind::Carousel, 5),
            (BucketKind::Trending, SectionKind::Grid, 8),
            (BucketKind::Upcoming, SectionKind::Grid, 3),
            (BucketKind::Latest, SectionKind::Grid, 8),
        ]
    );
    assert_eq!(view.sections[0].title, "Featured Games");
    assert_eq!(view.sections[0].indicators, vec![true, false, false, false, false]);
    assert_eq!(view.footer.len(), 4);
    assert_eq!(harness.composer.registry().focused(), vec!["tab:all".to_string()]);
}

#[tokio::test]
async fn dpad_walks_from_tabs_through_sections_and_confirm_opens_item() {
    let mut harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;

    assert_eq!(harness.press(Input::Down), InputOutcome::Consumed);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Section(0));
    assert_eq!(harness.focused_title().as_deref(), Some("carousel-0"));

    harness.press(Input::Right);
    harness.press(Input::Right);
    assert_eq!(harness.focused_title().as_deref(), Some("carousel-2"));
    let StoreView::Ready(view) = harness.composer.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.sections[0].visible, 1..4);

    harness.press(Input::Down);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Section(1));
    assert_eq!(harness.focused_title().as_deref(), Some("trending-0"));

    for _ in 0..3 {
        harness.press(Input::Right);
    }
    assert_eq!(harness.press(Input::Down), InputOutcome::Consumed);
    assert_eq!(harness.focused_title().as_deref(), Some("trending-7"));
    assert!(harness.opened().is_empty());

    assert_eq!(harness.press(Input::Confirm), InputOutcome::Consumed);
    assert_eq!(harness.opened(), vec!["https://store.example/trending/7".to_string()]);
    assert_eq!(
        harness.composer.registry().focused(),
        vec!["trending:7".to_string()]
    );
}

#[tokio::test]
async fn up_from_first_section_returns_to_tab_strip() {
    let mut harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;
    harness.press(Input::Down);
    assert_eq!(harness.press(Input::Up), InputOutcome::Consumed);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Tabs);
    assert_eq!(harness.press(Input::Up), InputOutcome::NotConsumed);
}

#[tokio::test]
async fn tab_cycling_keeps_and_clamps_section_positions() {
    let options = ComposerOptions {
        vertical: VerticalNavigation::RowAligned,
        ..ComposerOptions::default()
    };
    let mut harness = mounted(ScriptedSource::healthy(), options).await;

    harness.press(Input::NextGroup);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "trending");
    assert_eq!(harness.composer.focus_scope(), FocusScope::Tabs);

    harness.press(Input::Down);
    harness.press(Input::Down);
    harness.press(Input::Down);
    harness.press(Input::Right);
    assert_eq!(harness.focused_title().as_deref(), Some("trending-11"));

    assert_eq!(harness.press(Input::PreviousGroup), InputOutcome::Consumed);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "all");
    assert_eq!(harness.composer.focus_scope(), FocusScope::Tabs);

    harness.press(Input::Down);
    harness.press(Input::Down);
    assert_eq!(harness.focused_title().as_deref(), Some("trending-7"));

    harness.press(Input::PreviousGroup);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "latest");
    assert_eq!(harness.composer.registry().focused(), vec!["tab:latest".to_string()]);
}

#[tokio::test]
async fn positions_survive_a_round_trip_through_another_tab() {
    let mut harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;

    harness.press(Input::Down);
    for _ in 0..3 {
        harness.press(Input::Right);
    }
    assert_eq!(harness.focused_title().as_deref(), Some("carousel-3"));

    harness.press(Input::NextGroup);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "trending");
    harness.press(Input::PreviousGroup);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "all");

    harness.press(Input::Down);
    assert_eq!(harness.focused_title().as_deref(), Some("carousel-3"));
    let StoreView::Ready(view) = harness.composer.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.sections[0].visible, 2..5);
}

#[tokio::test]
async fn scope_navigation_passes_over_empty_sections() {
    let mut harness = mounted(
        ScriptedSource::with_empty(BucketKind::Upcoming),
        ComposerOptions::default(),
    )
    .await;

    let StoreView::Ready(view) = harness.composer.view() else {
        panic!("expected ready view");
    };
    assert!(view.sections[2].tiles.is_empty());

    harness.press(Input::Down);
    harness.press(Input::Down);
    for _ in 0..4 {
        harness.press(Input::Right);
    }
    assert_eq!(harness.focused_title().as_deref(), Some("trending-4"));

    // Last column: Down leaves the grid and lands past the empty section.
    assert_eq!(harness.press(Input::Down), InputOutcome::Consumed);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Section(3));
    assert_eq!(harness.focused_title().as_deref(), Some("latest-0"));

    assert_eq!(harness.press(Input::Up), InputOutcome::Consumed);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Section(1));
    assert_eq!(harness.focused_title().as_deref(), Some("trending-4"));

    harness.press(Input::NextGroup);
    harness.press(Input::NextGroup);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "upcoming");
    assert_eq!(harness.press(Input::Down), InputOutcome::NotConsumed);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Tabs);
    assert_eq!(harness.composer.registry().focused(), vec!["tab:upcoming".to_string()]);
}

#[tokio::test]
async fn tab_strip_focus_moves_without_activation_until_confirm() {
    let mut harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;

    assert_eq!(harness.press(Input::Left), InputOutcome::NotConsumed);
    assert_eq!(harness.press(Input::Right), InputOutcome::Consumed);
    assert_eq!(harness.press(Input::Right), InputOutcome::Consumed);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "all");

    harness.press(Input::Confirm);
    assert_eq!(harness.composer.active_tab().expect("tab").id, "upcoming");
    let StoreView::Ready(view) = harness.composer.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].title, "Upcoming Games");
}

#[tokio::test]
async fn cancel_navigates_back_from_any_scope() {
    let mut harness = mounted(ScriptedSource::healthy(), ComposerOptions::default()).await;
    assert_eq!(harness.press(Input::Cancel), InputOutcome::Consumed);
    harness.press(Input::Down);
    assert_eq!(harness.press(Input::Cancel), InputOutcome::Consumed);
    assert_eq!(harness.back.0.load(Ordering::SeqCst), 2);
    assert_eq!(harness.composer.focus_scope(), FocusScope::Section(0));
}

#[tokio::test]
async fn failed_load_shows_error_and_retry_reloads_everything() {
    let mut harness = mounted(ScriptedSource::failing_latest_once(), ComposerOptions::default()).await;

    assert_eq!(
        harness.composer.view(),
        StoreView::Failed {
            message: FETCH_FAILURE_MESSAGE.to_string(),
            retry_label: "Retry",
        }
    );
    assert_eq!(harness.press(Input::Down), InputOutcome::NotConsumed);

    assert_eq!(harness.press(Input::Confirm), InputOutcome::Consumed);
    let outcome = harness.composer.wait_for_load().await.expect("retry");
    assert_eq!(outcome, Some(LoadOutcome::Ready));
    assert!(matches!(harness.composer.catalog_state(), CatalogState::Ready(_)));
}

#[tokio::test]
async fn unmounted_view_ignores_late_results() {
    let source = Arc::new(ScriptedSource::gated());
    let mut harness = Harness::new(source.clone(), ComposerOptions::default());
    harness.composer.mount();
    tokio::task::yield_now().await;

    harness.composer.unmount();
    source.open_gate();

    let outcome = harness.composer.wait_for_load().await.expect("settle");
    assert_eq!(outcome, Some(LoadOutcome::Suppressed));
    assert_eq!(harness.composer.catalog_state(), &CatalogState::Loading);
    assert!(matches!(harness.composer.view(), StoreView::Loading { .. }));
    assert!(!harness.composer.sync().expect("sync"));
}

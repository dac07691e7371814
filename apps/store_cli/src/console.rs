//! Console stand-ins for the rendering layer and navigation collaborators.

use std::{
    fmt::Write as _,
    sync::atomic::{AtomicBool, Ordering},
};

use shared::domain::{BucketKind, Item, TabItem};
use store_core::{
    BackNavigator, FocusTarget, ItemOpener, SectionKind, StoreView, TargetRegistry,
};
use tracing::{debug, info};

pub struct ConsoleTarget {
    label: String,
}

impl FocusTarget for ConsoleTarget {
    fn focus(&mut self) {
        debug!(target = %self.label, "focus");
    }

    fn blur(&mut self) {
        debug!(target = %self.label, "blur");
    }
}

pub struct ConsoleRegistry;

impl TargetRegistry for ConsoleRegistry {
    type Target = ConsoleTarget;

    fn tab_target(&mut self, tab: &TabItem) -> ConsoleTarget {
        ConsoleTarget {
            label: format!("tab {}", tab.label),
        }
    }

    fn tile_target(&mut self, bucket: BucketKind, index: usize, item: &Item) -> ConsoleTarget {
        ConsoleTarget {
            label: format!("{bucket}[{index}] {}", item.title),
        }
    }
}

/// Prints the target instead of launching anything.
pub struct ConsoleOpener;

impl ItemOpener for ConsoleOpener {
    fn open_item(&self, target_url: &str) {
        info!(url = target_url, "open item requested");
        println!("open {target_url}");
    }
}

#[derive(Default)]
pub struct ConsoleBack {
    requested: AtomicBool,
}

impl ConsoleBack {
    pub fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl BackNavigator for ConsoleBack {
    fn navigate_back(&self) {
        self.requested.store(true, Ordering::SeqCst);
        println!("back to menu");
    }
}

pub fn render(view: &StoreView) -> String {
    let mut out = String::new();
    match view {
        StoreView::Loading { message } => {
            let _ = writeln!(out, "{message}");
        }
        StoreView::Failed {
            message,
            retry_label,
        } => {
            let _ = writeln!(out, "x {message}");
            let _ = writeln!(out, "[{retry_label}]");
        }
        StoreView::Ready(ready) => {
            let _ = writeln!(out, "{}", ready.title);
            let tabs: Vec<String> = ready
                .tabs
                .iter()
                .map(|tab| {
                    let marker = if tab.focused { ">" } else { " " };
                    if tab.active {
                        format!("{marker}[{}]", tab.label)
                    } else {
                        format!("{marker} {} ", tab.label)
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", tabs.join(" "));

            for section in &ready.sections {
                let _ = writeln!(out, "\n== {} ==", section.title);
                for (index, tile) in section.tiles.iter().enumerate() {
                    if section.kind == SectionKind::Carousel && !section.visible.contains(&index) {
                        continue;
                    }
                    let marker = if tile.focused { ">" } else { " " };
                    let version = tile
                        .version
                        .as_deref()
                        .map(|v| format!(" ({v})"))
                        .unwrap_or_default();
                    let _ = writeln!(out, "{marker} {}{version}", tile.title);
                }
                if !section.indicators.is_empty() {
                    let dots: String = section
                        .indicators
                        .iter()
                        .map(|lit| if *lit { '*' } else { '.' })
                        .collect();
                    let _ = writeln!(out, "  {dots}");
                }
            }

            let _ = writeln!(out, "\n{}", ready.footer.join(" | "));
        }
    }
    out
}

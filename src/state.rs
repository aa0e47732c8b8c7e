use std::path::PathBuf;
use std::sync::Arc;

use crate::data::DataLoader;
use crate::pages::{build_page, AppContext, Page, PageView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loader, view settings and session inputs handed to page builders.
    pub context: AppContext,

    /// Page selected in the navigation panel.
    pub current_page: Page,

    /// Built view of `current_page`, or the error it failed with.
    /// `None` until the page is (re)built.
    pub view: Option<Result<PageView, String>>,
}

impl AppState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            current_page: Page::default(),
            view: None,
        }
    }

    /// Switch pages. Visiting a page always rebuilds its derived views.
    pub fn select_page(&mut self, page: Page) {
        if self.current_page != page {
            log::debug!("navigating to {:?}", page);
        }
        self.current_page = page;
        self.view = None;
    }

    /// Update the catalogue search and rebuild the view.
    pub fn set_catalogue_query(&mut self, query: String) {
        self.context.catalogue_query = query;
        self.view = None;
    }

    /// Point the dashboard at another output directory with an empty cache.
    pub fn set_output_dir(&mut self, dir: PathBuf) {
        log::info!("Switching output directory to {}", dir.display());
        self.context.loader = Arc::new(DataLoader::new(dir));
        self.view = None;
    }

    /// The current page's view, building it on first access after a change.
    ///
    /// Build errors are logged and kept as text so the page shows them in
    /// place of its charts; navigation keeps working.
    pub fn current_view(&mut self) -> &Result<PageView, String> {
        let page = self.current_page;
        let context = &self.context;
        self.view.get_or_insert_with(|| {
            build_page(page, context).map_err(|e| {
                if e.is_not_found() {
                    log::warn!("'{}' is missing a dataset: {e}", page.title());
                } else {
                    log::error!("Failed to render '{}': {e}", page.title());
                }
                e.to_string()
            })
        })
    }
}

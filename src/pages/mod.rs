//! Page registry and page builders.
//!
//! A page builder turns cached tables into a [`PageView`]: plain data that
//! `ui::page` draws. Builders never touch egui, so they run in tests without
//! a window.

use std::sync::Arc;

use crate::chart::BarChartSpec;
use crate::config::DashboardConfig;
use crate::data::{CellValue, DataLoader, DataResult, Table};

pub mod catalogue;
pub mod genres;
pub mod overview;

// ---------------------------------------------------------------------------
// Navigation registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Overview,
    GenresAndYears,
    Catalogue,
}

#[derive(Debug, Clone, Copy)]
pub struct PageEntry {
    pub page: Page,
    pub title: &'static str,
    pub icon: &'static str,
}

impl PageEntry {
    pub fn label(&self) -> String {
        format!("{}  {}", self.icon, self.title)
    }
}

pub static PAGES: [PageEntry; 3] = [
    PageEntry {
        page: Page::Overview,
        title: "General analysis",
        icon: "🎬",
    },
    PageEntry {
        page: Page::GenresAndYears,
        title: "Genres & years",
        icon: "📊",
    },
    PageEntry {
        page: Page::Catalogue,
        title: "Movie catalogue",
        icon: "🔎",
    },
];

impl Page {
    pub fn entry(self) -> &'static PageEntry {
        PAGES
            .iter()
            .find(|e| e.page == self)
            .unwrap_or(&PAGES[0])
    }

    pub fn title(self) -> &'static str {
        self.entry().title
    }
}

// ---------------------------------------------------------------------------
// Application context
// ---------------------------------------------------------------------------

/// How many rows each derived view keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub top_genres: usize,
    pub top_users: usize,
    pub top_movies: usize,
    pub rating_bins: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            top_genres: 10,
            top_users: 10,
            top_movies: 20,
            rating_bins: 10,
        }
    }
}

impl From<&DashboardConfig> for ViewSettings {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            top_genres: cfg.top_genres,
            top_users: cfg.top_users,
            top_movies: cfg.top_movies,
            rating_bins: cfg.rating_bins,
        }
    }
}

/// Everything a page builder may read: the shared loader, view settings and
/// the session's catalogue search.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub loader: Arc<DataLoader>,
    pub settings: ViewSettings,
    pub catalogue_query: String,
}

impl AppContext {
    pub fn new(loader: DataLoader, settings: ViewSettings) -> Self {
        Self {
            loader: Arc::new(loader),
            settings,
            catalogue_query: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Page view model
// ---------------------------------------------------------------------------

/// Rows of a table rendered as text, ready for a grid widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub id: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Selected `columns` of the given `rows` of `table`, in that order.
    pub fn from_table(
        id: &str,
        table: &Table,
        rows: &[usize],
        columns: &[&str],
    ) -> DataResult<Self> {
        let idx = columns
            .iter()
            .map(|c| table.column_index(c))
            .collect::<DataResult<Vec<_>>>()?;
        Ok(Self {
            id: id.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|&r| idx.iter().map(|&c| display_cell(&table.cell(r, c))).collect())
                .collect(),
        })
    }

    /// Two-column view of grouped counts.
    pub fn from_counts(id: &str, key: &str, count: &str, counts: &[(CellValue, usize)]) -> Self {
        Self {
            id: id.to_string(),
            columns: vec![key.to_string(), count.to_string()],
            rows: counts
                .iter()
                .map(|(k, n)| vec![display_cell(k), n.to_string()])
                .collect(),
        }
    }
}

fn display_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Note(String),
    Chart(BarChartSpec),
    Table(TableView),
    /// Side-by-side blocks; `ratio` is the left column's share of the width.
    Columns {
        ratio: f32,
        left: Vec<Block>,
        right: Vec<Block>,
    },
    Divider,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl PageView {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// All charts on the page, including those nested in columns.
    pub fn charts(&self) -> Vec<&BarChartSpec> {
        fn walk<'a>(blocks: &'a [Block], out: &mut Vec<&'a BarChartSpec>) {
            for block in blocks {
                match block {
                    Block::Chart(c) => out.push(c),
                    Block::Columns { left, right, .. } => {
                        walk(left, out);
                        walk(right, out);
                    }
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &mut out);
        out
    }

    pub fn chart(&self, id: &str) -> Option<&BarChartSpec> {
        self.charts().into_iter().find(|c| c.id == id)
    }

    pub fn tables(&self) -> Vec<&TableView> {
        fn walk<'a>(blocks: &'a [Block], out: &mut Vec<&'a TableView>) {
            for block in blocks {
                match block {
                    Block::Table(t) => out.push(t),
                    Block::Columns { left, right, .. } => {
                        walk(left, out);
                        walk(right, out);
                    }
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &mut out);
        out
    }
}

/// Build the view for `page`. Errors propagate untouched to the shell.
pub fn build_page(page: Page, ctx: &AppContext) -> DataResult<PageView> {
    match page {
        Page::Overview => overview::build(ctx),
        Page::GenresAndYears => genres::build(ctx),
        Page::Catalogue => catalogue::build(ctx),
    }
}

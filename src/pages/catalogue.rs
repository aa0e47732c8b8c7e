use std::collections::HashSet;

use crate::chart::BarChartSpec;
use crate::data::summary::{sort_rows_ascending, title_matches, top_n_desc};
use crate::data::{DataResult, DatasetName, Table};

use super::{AppContext, Block, PageView, TableView};

const COLUMNS: [&str; 3] = ["title", "rating_count", "avg_rating"];

/// Bars for the given rows, drawn smallest `rating_count` first and shaded
/// by `avg_rating`.
fn ascending_chart(table: &Table, rows: &[usize], title: &str) -> DataResult<BarChartSpec> {
    let ascending = sort_rows_ascending(table, "rating_count", rows)?;
    Ok(BarChartSpec::categories(
        "top_movies",
        title,
        table,
        &ascending,
        "title",
        "rating_count",
        Some("avg_rating"),
    )?
    .with_axes("Number of ratings", "Movie title")
    .with_height(700.0))
}

/// The `n` most rated movies.
pub fn top_movies_chart(top_movies: &Table, n: usize) -> DataResult<BarChartSpec> {
    let rows = top_n_desc(top_movies, "rating_count", n)?;
    ascending_chart(
        top_movies,
        &rows,
        &format!("Top {} movies by number of ratings", rows.len()),
    )
}

/// Rows whose title matches `query`, most rated first.
pub fn search(top_movies: &Table, query: &str) -> DataResult<Vec<usize>> {
    let matches: HashSet<usize> = title_matches(top_movies, "title", query)?
        .into_iter()
        .collect();
    let mut ranked = top_n_desc(top_movies, "rating_count", top_movies.len())?;
    ranked.retain(|r| matches.contains(r));
    Ok(ranked)
}

/// Searchable list of the most rated movies; does not need the raw ratings.
pub fn build(ctx: &AppContext) -> DataResult<PageView> {
    let top_movies = ctx.loader.load(DatasetName::TopMoviesByRating)?;
    let query = ctx.catalogue_query.trim();

    let mut rows = search(&top_movies, query)?;
    rows.truncate(ctx.settings.top_movies);

    let mut view = PageView::new("Movie catalogue");
    if rows.is_empty() {
        view.push(Block::Note(format!("No movie matches “{query}”.")));
        return Ok(view);
    }

    let title = if query.is_empty() {
        format!("Top {} movies by number of ratings", rows.len())
    } else {
        format!("Movies matching “{query}”")
    };

    view.push(Block::Columns {
        ratio: 0.5,
        left: vec![Block::Table(TableView::from_table(
            "catalogue_table",
            &top_movies,
            &rows,
            &COLUMNS,
        )?)],
        right: vec![Block::Chart(ascending_chart(&top_movies, &rows, &title)?)],
    });
    Ok(view)
}

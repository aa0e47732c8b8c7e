use crate::chart::BarChartSpec;
use crate::data::summary::{histogram, value_counts};
use crate::data::{CellValue, DataResult, DatasetName, Table};

use super::catalogue::top_movies_chart;
use super::genres::{movies_by_year_chart, top_genres_chart};
use super::{AppContext, Block, PageView, TableView};

/// Users with the most ratings, most active first.
pub fn top_users(ratings: &Table, n: usize) -> DataResult<Vec<(CellValue, usize)>> {
    let mut counts = value_counts(ratings, "userId")?;
    counts.truncate(n);
    Ok(counts)
}

fn top_users_chart(top: &[(CellValue, usize)]) -> BarChartSpec {
    let pairs: Vec<(String, f64)> = top.iter().map(|(u, n)| (u.to_string(), *n as f64)).collect();
    BarChartSpec::from_pairs(
        "top_users",
        &format!("Top {} users by number of ratings", top.len()),
        &pairs,
    )
    .reversed()
    .with_axes("Number of ratings", "User")
}

fn rating_distribution_chart(ratings: &Table, bins: usize) -> DataResult<BarChartSpec> {
    let hist = histogram(ratings, "rating", bins)?;
    Ok(BarChartSpec::histogram(
        "rating_distribution",
        &format!("Distribution of the {} ratings given by users", hist.total()),
        &hist,
    )
    .with_axes("Rating", "Number of ratings"))
}

/// Everything at once: genres, ratings, users, top movies and films per year.
///
/// Group-bys over the raw ratings are recomputed on each visit; only the
/// tables themselves come from the cache.
pub fn build(ctx: &AppContext) -> DataResult<PageView> {
    let s = &ctx.settings;
    let genres = ctx.loader.load(DatasetName::GenreSummary)?;
    let by_year = ctx.loader.load(DatasetName::MoviesByYear)?;
    let top_movies = ctx.loader.load(DatasetName::TopMoviesByRating)?;
    let ratings = ctx.loader.load(DatasetName::Ratings)?;

    let users = top_users(&ratings, s.top_users)?;

    let mut view = PageView::new("General analysis of films and ratings");
    view.push(Block::Heading("Raw data – top users".to_string()));
    view.push(Block::Table(TableView::from_counts(
        "top_users_table",
        "userId",
        "rating_count",
        &users,
    )));
    view.push(Block::Columns {
        ratio: 1.0 / 3.0,
        left: vec![
            Block::Chart(top_genres_chart(&genres, s.top_genres)?),
            Block::Chart(rating_distribution_chart(&ratings, s.rating_bins)?),
            Block::Chart(top_users_chart(&users)),
        ],
        right: vec![Block::Chart(top_movies_chart(&top_movies, s.top_movies)?)],
    });
    view.push(Block::Divider);
    view.push(Block::Chart(movies_by_year_chart(&by_year)?));
    Ok(view)
}

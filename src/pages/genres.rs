use crate::chart::BarChartSpec;
use crate::data::summary::top_n_desc;
use crate::data::{DataResult, DatasetName, Table};

use super::{AppContext, Block, PageView, TableView};

/// The `n` genres with the most films, largest first.
pub fn top_genres(genres: &Table, n: usize) -> DataResult<Vec<(String, f64)>> {
    let rows = top_n_desc(genres, "count", n)?;
    let labels = genres.values("genre")?;
    let counts = genres.f64_values("count")?;
    Ok(rows
        .into_iter()
        .map(|r| (labels[r].to_string(), counts[r].unwrap_or(0.0)))
        .collect())
}

/// Horizontal bars, biggest genre at the top.
pub fn top_genres_chart(genres: &Table, n: usize) -> DataResult<BarChartSpec> {
    let top = top_genres(genres, n)?;
    let title = format!("Top {} genres by number of films", top.len());
    Ok(
        BarChartSpec::from_pairs("top_genres", &title, &top)
            .reversed()
            .with_axes("Number of films", "Genre"),
    )
}

pub fn movies_by_year_chart(by_year: &Table) -> DataResult<BarChartSpec> {
    Ok(BarChartSpec::numeric(
        "movies_by_year",
        "Total number of films per year (from the title)",
        by_year,
        "year",
        "movie_count",
    )?
    .with_axes("Year", "Number of films")
    .with_height(500.0))
}

/// Genre and release-year statistics; does not need the raw ratings.
pub fn build(ctx: &AppContext) -> DataResult<PageView> {
    let genres = ctx.loader.load(DatasetName::GenreSummary)?;
    let by_year = ctx.loader.load(DatasetName::MoviesByYear)?;

    let all_genres = top_n_desc(&genres, "count", genres.len())?;

    let mut view = PageView::new("Genres & years");
    view.push(Block::Columns {
        ratio: 0.5,
        left: vec![Block::Chart(top_genres_chart(&genres, ctx.settings.top_genres)?)],
        right: vec![
            Block::Heading("All genres".to_string()),
            Block::Table(TableView::from_table(
                "genre_table",
                &genres,
                &all_genres,
                &["genre", "count"],
            )?),
        ],
    });
    view.push(Block::Divider);
    view.push(Block::Chart(movies_by_year_chart(&by_year)?));
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, DataError, DataLoader};
    use crate::pages::ViewSettings;
    use tempfile::tempdir;

    fn context_with_genres(rows: &[(&str, i64)]) -> (tempfile::TempDir, AppContext) {
        let dir = tempdir().unwrap();
        fixtures::write_genres(&dir.path().join(DatasetName::GenreSummary.file_name()), rows);
        fixtures::write_movies_by_year(
            &dir.path().join(DatasetName::MoviesByYear.file_name()),
            &[(1995, 12)],
        );
        let ctx = AppContext::new(DataLoader::new(dir.path()), ViewSettings::default());
        (dir, ctx)
    }

    #[test]
    fn top_genre_view_starts_with_largest_genre() {
        let (_dir, ctx) = context_with_genres(&[("Drama", 120), ("Comedy", 80)]);
        let genres = ctx.loader.load(DatasetName::GenreSummary).unwrap();

        let top = top_genres(&genres, 10).unwrap();
        assert_eq!(top[0], ("Drama".to_string(), 120.0));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn genre_chart_draws_largest_bar_furthest_from_origin() {
        let (_dir, ctx) = context_with_genres(&[("Comedy", 80), ("Drama", 120), ("Horror", 15)]);
        let view = build(&ctx).unwrap();

        let chart = view.chart("top_genres").unwrap();
        assert_eq!(chart.title, "Top 3 genres by number of films");
        assert_eq!(chart.labels(), vec!["Horror", "Comedy", "Drama"]);
        assert_eq!(chart.bars[2].position, 2.0);

        let table = view.tables()[0];
        assert_eq!(table.rows[0], vec!["Drama", "120"]);
    }

    #[test]
    fn genre_file_without_count_column_is_missing_column() {
        let dir = tempdir().unwrap();
        fixtures::write_movies_by_year(
            &dir.path().join(DatasetName::GenreSummary.file_name()),
            &[(1995, 12)],
        );
        fixtures::write_movies_by_year(
            &dir.path().join(DatasetName::MoviesByYear.file_name()),
            &[(1995, 12)],
        );
        let ctx = AppContext::new(DataLoader::new(dir.path()), ViewSettings::default());

        assert!(matches!(build(&ctx), Err(DataError::MissingColumn { .. })));
    }
}

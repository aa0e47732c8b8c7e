use eframe::egui::Color32;

use crate::color::{ColorScale, DEFAULT_BAR_COLOR};
use crate::data::summary::Histogram;
use crate::data::{DataResult, Table};

// ---------------------------------------------------------------------------
// Bar chart description (plain data, drawn by ui::plot)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x, values grow upwards.
    Vertical,
    /// Categories along y, values grow to the right.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    /// Position along the category axis. Category charts use 0, 1, 2, ...
    /// so the first bar sits nearest the origin.
    pub position: f64,
    pub value: f64,
    /// Value driving the continuous colour scale, if the chart is shaded.
    pub shade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub orientation: Orientation,
    pub bar_width: f64,
    pub height: f32,
    /// Category axis shows bar labels instead of numbers.
    pub categorical: bool,
    pub bars: Vec<ChartBar>,
}

impl BarChartSpec {
    fn empty(id: &str, title: &str, orientation: Orientation) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: String::new(),
            y_label: String::new(),
            orientation,
            bar_width: 0.7,
            height: 350.0,
            categorical: false,
            bars: Vec::new(),
        }
    }

    /// Horizontal category chart over the given rows, in the given order.
    ///
    /// `rows` are indices into `table`, typically produced by one of the
    /// `data::summary` orderings.
    pub fn categories(
        id: &str,
        title: &str,
        table: &Table,
        rows: &[usize],
        label_column: &str,
        value_column: &str,
        shade_column: Option<&str>,
    ) -> DataResult<Self> {
        let labels = table.values(label_column)?;
        let values = table.f64_values(value_column)?;
        let shades = shade_column.map(|c| table.f64_values(c)).transpose()?;

        let bars = rows
            .iter()
            .enumerate()
            .map(|(pos, &row)| ChartBar {
                label: labels[row].to_string(),
                position: pos as f64,
                value: values[row].unwrap_or(0.0),
                shade: shades.as_ref().and_then(|s| s[row]),
            })
            .collect();

        Ok(Self {
            categorical: true,
            bars,
            ..Self::empty(id, title, Orientation::Horizontal)
        })
    }

    /// Horizontal category chart from precomputed `(label, value)` pairs,
    /// shaded by the value itself.
    pub fn from_pairs(id: &str, title: &str, pairs: &[(String, f64)]) -> Self {
        let bars = pairs
            .iter()
            .enumerate()
            .map(|(pos, (label, value))| ChartBar {
                label: label.clone(),
                position: pos as f64,
                value: *value,
                shade: Some(*value),
            })
            .collect();
        Self {
            categorical: true,
            bars,
            ..Self::empty(id, title, Orientation::Horizontal)
        }
    }

    /// Vertical chart with numeric x positions taken from `x_column`.
    pub fn numeric(
        id: &str,
        title: &str,
        table: &Table,
        x_column: &str,
        y_column: &str,
    ) -> DataResult<Self> {
        let xs = table.f64_values(x_column)?;
        let ys = table.f64_values(y_column)?;

        let bars = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| {
                let x = (*x)?;
                Some(ChartBar {
                    label: format!("{x}"),
                    position: x,
                    value: y.unwrap_or(0.0),
                    shade: None,
                })
            })
            .collect();

        Ok(Self {
            bar_width: 0.8,
            bars,
            ..Self::empty(id, title, Orientation::Vertical)
        })
    }

    /// Vertical chart with one bar per histogram bin.
    pub fn histogram(id: &str, title: &str, hist: &Histogram) -> Self {
        let bar_width = hist.bins.first().map(|b| b.width()).unwrap_or(1.0);
        let bars = hist
            .bins
            .iter()
            .map(|b| ChartBar {
                label: format!("{:.2} – {:.2}", b.start, b.end),
                position: b.center(),
                value: b.count as f64,
                shade: None,
            })
            .collect();
        Self {
            bar_width,
            height: 400.0,
            bars,
            ..Self::empty(id, title, Orientation::Vertical)
        }
    }

    pub fn with_axes(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Reverse the bar order, keeping positions 0, 1, 2, ... from the origin.
    pub fn reversed(mut self) -> Self {
        self.bars.reverse();
        if self.categorical {
            for (pos, bar) in self.bars.iter_mut().enumerate() {
                bar.position = pos as f64;
            }
        }
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.bars.iter().map(|b| b.label.clone()).collect()
    }

    /// One fill colour per bar.
    pub fn colors(&self) -> Vec<Color32> {
        if self.bars.iter().all(|b| b.shade.is_none()) {
            return vec![DEFAULT_BAR_COLOR; self.bars.len()];
        }
        let scale = ColorScale::viridis(self.bars.iter().filter_map(|b| b.shade));
        self.bars
            .iter()
            .map(|b| b.shade.map(|s| scale.color_for(s)).unwrap_or(DEFAULT_BAR_COLOR))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::{histogram, sort_ascending};
    use crate::data::CellValue;

    fn top_movies() -> Table {
        Table::from_rows(
            vec!["title".into(), "rating_count".into(), "avg_rating".into()],
            vec![
                vec!["Heat".into(), 40i64.into(), 4.1f64.into()],
                vec!["Alien".into(), 55i64.into(), 4.3f64.into()],
                vec!["Fargo".into(), 25i64.into(), CellValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn ascending_rows_render_smallest_nearest_origin() {
        let table = top_movies();
        let rows = sort_ascending(&table, "rating_count").unwrap();
        let chart = BarChartSpec::categories(
            "top",
            "Top movies",
            &table,
            &rows,
            "title",
            "rating_count",
            Some("avg_rating"),
        )
        .unwrap();

        assert_eq!(chart.labels(), vec!["Fargo", "Heat", "Alien"]);
        let positions: Vec<f64> = chart.bars.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0.0, 1.0, 2.0]);
        assert_eq!(chart.bars[0].value, 25.0);
        assert_eq!(chart.bars[0].shade, None);
        assert_eq!(chart.colors()[0], DEFAULT_BAR_COLOR);
    }

    #[test]
    fn reversing_keeps_positions_from_origin() {
        let pairs = vec![("Drama".to_string(), 120.0), ("Comedy".to_string(), 80.0)];
        let chart = BarChartSpec::from_pairs("g", "Genres", &pairs).reversed();
        assert_eq!(chart.labels(), vec!["Comedy", "Drama"]);
        assert_eq!(chart.bars[0].position, 0.0);
        assert_eq!(chart.bars[1].value, 120.0);
    }

    #[test]
    fn numeric_chart_uses_x_values_as_positions() {
        let table = Table::from_rows(
            vec!["year".into(), "movie_count".into()],
            vec![vec![1995i64.into(), 12i64.into()], vec![1996i64.into(), 30i64.into()]],
        )
        .unwrap();
        let chart = BarChartSpec::numeric("y", "By year", &table, "year", "movie_count").unwrap();
        assert_eq!(chart.orientation, Orientation::Vertical);
        assert_eq!(chart.bars[1].position, 1996.0);
        assert_eq!(chart.bars[1].value, 30.0);
    }

    #[test]
    fn histogram_bars_sit_on_bin_centers() {
        let table = Table::from_rows(
            vec!["rating".into()],
            vec![vec![1.0f64.into()], vec![2.0f64.into()], vec![3.0f64.into()]],
        )
        .unwrap();
        let hist = histogram(&table, "rating", 2).unwrap();
        let chart = BarChartSpec::histogram("h", "Ratings", &hist);
        assert_eq!(chart.bar_width, 1.0);
        assert_eq!(chart.bars[0].position, 1.5);
        assert_eq!(chart.bars[1].value, 2.0);
    }
}

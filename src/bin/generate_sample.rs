//! Writes a synthetic output directory with the four tables the dashboard
//! reads, so it can be tried without the real batch job.
//!
//! Usage: `cargo run --bin generate_sample [DIR]` (default `output`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const GENRES: [(&str, f64); 12] = [
    ("Drama", 0.45),
    ("Comedy", 0.38),
    ("Thriller", 0.19),
    ("Romance", 0.16),
    ("Action", 0.15),
    ("Crime", 0.11),
    ("Horror", 0.10),
    ("Documentary", 0.05),
    ("Adventure", 0.09),
    ("Sci-Fi", 0.07),
    ("Animation", 0.04),
    ("Western", 0.02),
];

const TITLE_WORDS: [&str; 16] = [
    "Shadow", "River", "Night", "Empire", "Silent", "Golden", "Last", "Storm", "Heart", "City",
    "Winter", "Ghost", "Road", "Star", "Iron", "Garden",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Ratings come in half-star steps between 0.5 and 5.0.
fn half_star(raw: f64) -> f64 {
    ((raw * 2.0).round() / 2.0).clamp(0.5, 5.0)
}

fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) -> Result<()> {
    let batch = RecordBatch::try_from_iter(columns).context("building record batch")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "output".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let n_movies: usize = 2_000;
    let n_users: u64 = 300;
    let n_ratings: usize = 50_000;

    // ---- Genre summary ----
    let genre_counts: Vec<i64> = GENRES
        .iter()
        .map(|&(_, share)| (share * n_movies as f64 + rng.gauss(0.0, 10.0)).max(1.0) as i64)
        .collect();
    write_parquet(
        &out_dir.join("genre_df.parquet"),
        vec![
            (
                "genre",
                Arc::new(StringArray::from_iter_values(GENRES.iter().map(|g| g.0))) as ArrayRef,
            ),
            ("count", Arc::new(Int64Array::from(genre_counts)) as ArrayRef),
        ],
    )?;

    // ---- Movies per year: slow growth with noise ----
    let years: Vec<i64> = (1950..=2018).collect();
    let per_year: Vec<i64> = years
        .iter()
        .map(|&y| {
            let trend = 5.0 + (y - 1950) as f64 * 0.9;
            (trend + rng.gauss(0.0, 4.0)).max(0.0) as i64
        })
        .collect();
    write_parquet(
        &out_dir.join("movies_by_year.parquet"),
        vec![
            ("year", Arc::new(Int64Array::from(years)) as ArrayRef),
            ("movie_count", Arc::new(Int64Array::from(per_year)) as ArrayRef),
        ],
    )?;

    // ---- Raw ratings: a few heavy users, popular movies rated more ----
    let mut user_ids = Vec::with_capacity(n_ratings);
    let mut movie_ids = Vec::with_capacity(n_ratings);
    let mut ratings = Vec::with_capacity(n_ratings);
    let mut timestamps = Vec::with_capacity(n_ratings);
    let mut per_movie: Vec<(u64, f64)> = vec![(0, 0.0); n_movies];

    for _ in 0..n_ratings {
        let u = rng.next_f64();
        let user = 1 + ((u * u * u) * n_users as f64) as i64;
        let m = rng.next_f64();
        let movie = ((m * m) * n_movies as f64) as usize;
        let quality = 2.8 + (movie % 7) as f64 * 0.2;
        let rating = half_star(rng.gauss(quality, 0.9));

        per_movie[movie].0 += 1;
        per_movie[movie].1 += rating;
        user_ids.push(user);
        movie_ids.push(movie as i64 + 1);
        ratings.push(rating);
        timestamps.push(964_982_703 + rng.below(600_000_000) as i64);
    }
    write_parquet(
        &out_dir.join("ratings.parquet"),
        vec![
            ("userId", Arc::new(Int64Array::from(user_ids)) as ArrayRef),
            ("movieId", Arc::new(Int64Array::from(movie_ids)) as ArrayRef),
            ("rating", Arc::new(Float64Array::from(ratings)) as ArrayRef),
            ("timestamp", Arc::new(Int64Array::from(timestamps)) as ArrayRef),
        ],
    )?;

    // ---- Top movies by number of ratings ----
    let mut ranked: Vec<usize> = (0..n_movies).filter(|&m| per_movie[m].0 > 0).collect();
    ranked.sort_by(|&a, &b| per_movie[b].0.cmp(&per_movie[a].0));
    ranked.truncate(20);

    let titles: Vec<String> = ranked
        .iter()
        .map(|&m| {
            let a = TITLE_WORDS[m % TITLE_WORDS.len()];
            let b = TITLE_WORDS[(m / TITLE_WORDS.len()) % TITLE_WORDS.len()];
            format!("The {a} {b} ({})", 1950 + m % 69)
        })
        .collect();
    let counts: Vec<i64> = ranked.iter().map(|&m| per_movie[m].0 as i64).collect();
    let averages: Vec<f64> = ranked
        .iter()
        .map(|&m| per_movie[m].1 / per_movie[m].0 as f64)
        .collect();
    write_parquet(
        &out_dir.join("top_movies_by_ratings.parquet"),
        vec![
            (
                "title",
                Arc::new(StringArray::from_iter_values(titles.iter().map(|t| t.as_str())))
                    as ArrayRef,
            ),
            ("rating_count", Arc::new(Int64Array::from(counts)) as ArrayRef),
            ("avg_rating", Arc::new(Float64Array::from(averages)) as ArrayRef),
        ],
    )?;

    println!(
        "Wrote {} genres, {} years, {n_ratings} ratings and the top 20 movies to {}",
        GENRES.len(),
        1 + 2018 - 1950,
        out_dir.display()
    );
    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use recommender::{RecommendError, Recommender};
use std::path::PathBuf;
use std::process::ExitCode;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How many near-miss titles to offer when a lookup fails
const SUGGESTION_LIMIT: usize = 5;

/// movie-recs - find movies similar to one you liked
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommend similar movies from a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Directory holding movies.{json,dat} and similar.{json,txt}
    #[arg(short, long, global = true, default_value = "output")]
    data_dir: PathBuf,

    /// Movie table file (overrides the one in --data-dir)
    #[arg(long, global = true)]
    movies: Option<PathBuf>,

    /// Similarity matrix file (overrides the one in --data-dir)
    #[arg(long, global = true)]
    similarity: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// The title of the movie to base recommendations on
        movie: String,

        /// Number of recommendations to return
        #[arg(long, alias = "top_n", default_value = "5")]
        top_n: usize,

        /// Also print each similarity score
        #[arg(long)]
        scores: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        /// Maximum number of matches to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Time lookups for randomly chosen titles
    Benchmark {
        /// Number of lookups to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Recommendations requested per lookup
        #[arg(long, default_value = "5")]
        top_n: usize,
    },
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let catalog = Arc::new(load_catalog(&cli)?);
    tracing::info!("Loaded {} movies in {:?}", catalog.len(), start.elapsed());

    let recommender = Recommender::new(catalog);

    match cli.command {
        Commands::Recommend {
            movie,
            top_n,
            scores,
        } => handle_recommend(&recommender, &movie, top_n, scores),
        Commands::Search { title, limit } => {
            handle_search(&recommender, &title, limit);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Benchmark { requests, top_n } => {
            handle_benchmark(&recommender, requests, top_n)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load from --data-dir, letting --movies / --similarity override either file
fn load_catalog(cli: &Cli) -> Result<Catalog> {
    Catalog::load_with_overrides(
        &cli.data_dir,
        cli.movies.as_deref(),
        cli.similarity.as_deref(),
    )
    .with_context(|| {
        format!(
            "Failed to load recommendation artifacts from {}",
            cli.data_dir.display()
        )
    })
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &Recommender,
    movie: &str,
    top_n: usize,
    scores: bool,
) -> Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();
    if write_recommendations(&mut stdout, recommender, movie, top_n, scores)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Render a lookup to `out`; returns false when the title was not found
fn write_recommendations(
    out: &mut impl Write,
    recommender: &Recommender,
    movie: &str,
    top_n: usize,
    scores: bool,
) -> Result<bool> {
    writeln!(out, "{}", format!("Recommended for '{}':", movie).bold().blue())?;

    match recommender.recommend_scored(movie, top_n) {
        Ok(recommendations) => {
            if recommendations.is_empty() {
                writeln!(out, "  (nothing to recommend)")?;
            }
            for rec in recommendations {
                if scores {
                    writeln!(out, "- {} {}", rec.title, format!("({:.3})", rec.score).dimmed())?;
                } else {
                    writeln!(out, "- {}", rec.title)?;
                }
            }
            Ok(true)
        }
        Err(err @ RecommendError::NotFound { .. }) => {
            writeln!(out, "{}", err.to_string().red())?;

            let suggestions = recommender.search(movie, SUGGESTION_LIMIT);
            if !suggestions.is_empty() {
                writeln!(out, "Did you mean:")?;
                for (_, candidate) in suggestions {
                    writeln!(out, "  {} {}", "•".yellow(), candidate.title)?;
                }
            }
            Ok(false)
        }
    }
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str, limit: usize) {
    let matches = recommender.search(title, limit);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return;
    }

    for (index, movie) in matches {
        let index = index.to_string();
        match movie.movie_id {
            Some(id) => println!("{}: {} (id {})", index.green(), movie.title, id),
            None => println!("{}: {}", index.green(), movie.title),
        }
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(recommender: &Recommender, requests: usize, top_n: usize) -> Result<()> {
    let catalog = recommender.catalog();
    if catalog.is_empty() {
        bail!("Cannot benchmark an empty catalog");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let titles: Vec<&str> = (0..requests)
        .filter_map(|_| catalog.title(rand::random_range(0..catalog.len())))
        .collect();

    let mut timings: Vec<Duration> = Vec::with_capacity(titles.len());
    for title in &titles {
        let start = Instant::now();
        recommender.recommend(title, top_n)?;
        timings.push(start.elapsed());
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[((timings.len() as f32 * 0.95) as usize).min(timings.len() - 1)];
    let p99 = timings[((timings.len() as f32 * 0.99) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Lookups: {}", timings.len());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

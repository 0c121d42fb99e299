//! Parsers for the two upstream artifacts.
//!
//! The format is chosen from the file extension:
//! - movies.json: `[{"movie_id": 19995, "title": "Avatar", "tags": "..."}, ...]`
//! - movies.dat: one movie per line, `movieId::title` or a bare `title`
//! - similar.json: `[[1.0, 0.2, ...], [0.2, 1.0, ...], ...]`
//! - similar.txt / similar.csv: one row per line, scores separated by
//!   commas and/or whitespace
//!
//! Blank lines are skipped in the line-based formats. Line numbers in
//! errors are 1-based and count blank lines.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Short name used in error messages
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn read_to_string(path: &Path) -> Result<String> {
    let mut file = open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

fn json_error(file: &str, e: serde_json::Error) -> DataLoadError {
    DataLoadError::ParseError {
        file: file.to_string(),
        line: e.line(),
        reason: e.to_string(),
    }
}

/// Parse the movie table, picking the format from the extension
pub fn parse_movies(path: &Path) -> Result<MovieTable> {
    let file = file_label(path);
    if is_json(path) {
        let reader = BufReader::new(open(path)?);
        serde_json::from_reader(reader).map_err(|e| json_error(&file, e))
    } else {
        parse_movies_dat(&read_to_string(path)?, &file)
    }
}

/// Parse the line-based movie format
///
/// Format: movieId::title, or just title
fn parse_movies_dat(content: &str, file: &str) -> Result<MovieTable> {
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let movie = match line_trimmed.split_once("::") {
            Some((movie_id, title)) => Movie {
                movie_id: Some(movie_id.trim().parse().map_err(|e| {
                    DataLoadError::ParseError {
                        file: file.to_string(),
                        line: line_no,
                        reason: format!("Invalid movieId: {}", e),
                    }
                })?),
                title: title.to_string(),
                tags: None,
            },
            None => Movie::titled(line_trimmed),
        };

        if movie.title.trim().is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        movies.push(movie);
    }

    Ok(movies)
}

/// Parse the similarity matrix, picking the format from the extension
///
/// Only decoding happens here; shape checks belong to `Catalog::new`.
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let file = file_label(path);
    if is_json(path) {
        let reader = BufReader::new(open(path)?);
        serde_json::from_reader(reader).map_err(|e| json_error(&file, e))
    } else {
        parse_similarity_text(&read_to_string(path)?, &file)
    }
}

fn parse_similarity_text(content: &str, file: &str) -> Result<SimilarityMatrix> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let row = line_trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("Invalid score in column {}: {}", col, e),
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        rows.push(row);
    }

    Ok(SimilarityMatrix::from_rows(rows))
}

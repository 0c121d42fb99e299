//! Catalog construction, validation and loading.
//!
//! Building a catalog:
//! 1. Parse the movie table and the similarity matrix (in parallel)
//! 2. Validate that the matrix is square, matches the table, and is finite
//! 3. Build the normalized-title index used for lookups

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Candidate file names inside a data directory, in preference order
const MOVIE_FILES: [&str; 2] = ["movies.json", "movies.dat"];
const SIMILARITY_FILES: [&str; 2] = ["similar.json", "similar.txt"];

impl Catalog {
    /// Pair a movie table with its similarity matrix
    ///
    /// Fails if the two disagree in shape or any score is not finite.
    pub fn new(movies: MovieTable, similarity: SimilarityMatrix) -> Result<Self> {
        validate(&movies, &similarity)?;

        let mut catalog = Self {
            movies,
            similarity,
            title_index: HashMap::new(),
        };
        catalog.build_title_index();
        Ok(catalog)
    }

    /// Load both artifacts from explicit paths
    ///
    /// The two files are parsed concurrently with `rayon::join`.
    pub fn load_from_files(movies_path: &Path, similarity_path: &Path) -> Result<Self> {
        info!(
            movies = %movies_path.display(),
            similarity = %similarity_path.display(),
            "Loading catalog"
        );

        let (movies, similarity) = rayon::join(
            || parser::parse_movies(movies_path),
            || parser::parse_similarity(similarity_path),
        );
        let movies = movies?;
        let similarity = similarity?;

        info!(
            "Parsed {} movies and a {}-row similarity matrix",
            movies.len(),
            similarity.len()
        );

        let catalog = Self::new(movies, similarity)?;
        info!("Catalog built and validated ({} titles indexed)", catalog.title_index.len());
        Ok(catalog)
    }

    /// Load from a directory holding `movies.{json,dat}` and `similar.{json,txt}`
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_with_overrides(data_dir, None, None)
    }

    /// Load from `data_dir`, with either artifact optionally taken from an
    /// explicit path instead
    ///
    /// A side without an override goes through the same file-name fallback
    /// as [`load_from_dir`](Self::load_from_dir).
    pub fn load_with_overrides(
        data_dir: &Path,
        movies: Option<&Path>,
        similarity: Option<&Path>,
    ) -> Result<Self> {
        let movies_path = match movies {
            Some(path) => path.to_path_buf(),
            None => resolve_artifact(data_dir, &MOVIE_FILES)?,
        };
        let similarity_path = match similarity {
            Some(path) => path.to_path_buf(),
            None => resolve_artifact(data_dir, &SIMILARITY_FILES)?,
        };
        Self::load_from_files(&movies_path, &similarity_path)
    }

    /// Map each normalized title to the first index carrying it
    fn build_title_index(&mut self) {
        for (index, movie) in self.movies.iter().enumerate() {
            self.title_index
                .entry(normalize_title(&movie.title))
                .or_insert(index);
        }
    }
}

/// Pick the first existing candidate file in `data_dir`
fn resolve_artifact(data_dir: &Path, candidates: &[&str]) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| DataLoadError::FileNotFound {
            path: data_dir.join(candidates[0]).display().to_string(),
        })
}

/// Check the matrix is square, sized to the table, and finite
fn validate(movies: &MovieTable, similarity: &SimilarityMatrix) -> Result<()> {
    if similarity.len() != movies.len() {
        return Err(DataLoadError::DimensionMismatch {
            what: "similarity rows vs movie count".to_string(),
            expected: movies.len(),
            found: similarity.len(),
        });
    }

    for (i, row) in similarity.rows().enumerate() {
        if row.len() != movies.len() {
            return Err(DataLoadError::DimensionMismatch {
                what: format!("similarity row {}", i),
                expected: movies.len(),
                found: row.len(),
            });
        }
        if let Some(j) = row.iter().position(|score| !score.is_finite()) {
            return Err(DataLoadError::InvalidValue {
                field: format!("similarity[{}][{}]", i, j),
                value: row[j].to_string(),
            });
        }
    }

    Ok(())
}

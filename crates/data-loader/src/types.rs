//! Core domain types for the recommendation artifacts.
//!
//! Two artifacts are produced upstream and only read here:
//! - a movie table, whose row order defines every movie's index
//! - a square similarity matrix aligned to that same order
//!
//! `Catalog` pairs them after checking they agree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier assigned by the upstream producer (e.g. a TMDB id)
pub type MovieId = u32;

/// Position of a movie in the table, and of its row/column in the matrix
pub type MovieIndex = usize;

// =============================================================================
// Movie Table
// =============================================================================

/// A single movie record.
///
/// Only `title` takes part in lookups. The other fields are carried
/// through so callers can display them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub movie_id: Option<MovieId>,
    pub title: String,
    /// Free-text tags the similarity matrix was built from
    #[serde(default)]
    pub tags: Option<String>,
}

impl Movie {
    /// Create a record with just a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            movie_id: None,
            title: title.into(),
            tags: None,
        }
    }
}

/// Ordered movie records. Index `i` here is row/column `i` of the matrix.
pub type MovieTable = Vec<Movie>;

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of pairwise similarity scores.
///
/// Stored row-major as nested vectors, the shape the upstream producer
/// serializes. `rows[i][j]` is the similarity of movie `i` to movie `j`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores of movie `index` against every movie, itself included
    pub fn row(&self, index: MovieIndex) -> Option<&[f32]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

// =============================================================================
// Catalog - validated pairing of both artifacts
// =============================================================================

/// Movie table plus similarity matrix, known to agree in shape.
///
/// Built through `Catalog::new` (see `index.rs`), which validates the
/// pairing and builds the normalized-title index. Immutable afterwards.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: MovieTable,
    pub(crate) similarity: SimilarityMatrix,

    /// Normalized title -> lowest index carrying that title
    pub(crate) title_index: HashMap<String, MovieIndex>,
}

impl Catalog {
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Number of movies (also the matrix dimension)
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get_movie(&self, index: MovieIndex) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn title(&self, index: MovieIndex) -> Option<&str> {
        self.movies.get(index).map(|m| m.title.as_str())
    }

    /// Similarity row for a movie
    pub fn row(&self, index: MovieIndex) -> Option<&[f32]> {
        self.similarity.row(index)
    }

    /// Look up an already-normalized title
    ///
    /// Callers normalize with [`normalize_title`]; on duplicate titles the
    /// first occurrence in the table wins.
    pub fn find_title(&self, normalized: &str) -> Option<MovieIndex> {
        self.title_index.get(normalized).copied()
    }
}

/// Canonical form used for title comparison: trimmed, then lowercased
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  The Dark Knight "), "the dark knight");
        assert_eq!(normalize_title("AVATAR"), "avatar");
        assert_eq!(normalize_title("\tUp\n"), "up");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn test_movie_json_optional_fields() {
        let movie: Movie = serde_json::from_str(r#"{"title": "Avatar"}"#).unwrap();
        assert_eq!(movie, Movie::titled("Avatar"));

        let movie: Movie =
            serde_json::from_str(r#"{"movie_id": 19995, "title": "Avatar", "tags": "alien"}"#)
                .unwrap();
        assert_eq!(movie.movie_id, Some(19995));
        assert_eq!(movie.tags.as_deref(), Some("alien"));
    }

    #[test]
    fn test_matrix_is_transparent() {
        let matrix: SimilarityMatrix = serde_json::from_str("[[1.0, 0.5], [0.5, 1.0]]").unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.row(1), Some(&[0.5, 1.0][..]));
        assert!(matrix.row(2).is_none());
    }
}

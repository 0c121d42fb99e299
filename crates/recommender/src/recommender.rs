//! Title lookup and similarity ranking.
//!
//! ## Algorithm
//! 1. Normalize the query (trim, lowercase)
//! 2. Resolve it to the first movie with the same normalized title
//! 3. Read that movie's similarity row
//! 4. Stable-sort column indices by score, highest first
//! 5. Skip the movie itself and keep the next `top_n`

use crate::error::{RecommendError, Result};
use data_loader::{normalize_title, Catalog, Movie, MovieIndex};
use std::sync::Arc;
use tracing::{debug, instrument};

/// One ranked result
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Row/column of the recommended movie
    pub index: MovieIndex,
    pub title: String,
    /// Similarity to the queried movie
    pub score: f32,
}

/// Recommends movies similar to a given title.
///
/// Holds a shared, read-only catalog, so one instance can be cloned
/// across threads cheaply.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Index of the first movie whose title matches, ignoring case and
    /// surrounding whitespace
    pub fn resolve(&self, title: &str) -> Option<MovieIndex> {
        self.catalog.find_title(&normalize_title(title))
    }

    /// Titles of the `top_n` movies most similar to `title`, best first
    ///
    /// Returns fewer than `top_n` titles when the catalog is smaller, and
    /// [`RecommendError::NotFound`] when no title matches.
    pub fn recommend(&self, title: &str, top_n: usize) -> Result<Vec<String>> {
        Ok(self
            .recommend_scored(title, top_n)?
            .into_iter()
            .map(|rec| rec.title)
            .collect())
    }

    /// Same as [`recommend`](Self::recommend), keeping index and score
    #[instrument(skip(self))]
    pub fn recommend_scored(&self, title: &str, top_n: usize) -> Result<Vec<Recommendation>> {
        let normalized = normalize_title(title);
        let idx = self
            .catalog
            .find_title(&normalized)
            .ok_or(RecommendError::NotFound { title: normalized })?;

        // Catalog guarantees a full row for every indexed movie
        let scores = self.catalog.row(idx).unwrap_or(&[]);

        let mut ranked: Vec<(MovieIndex, f32)> = scores.iter().copied().enumerate().collect();
        // sort_by is stable: equal scores keep ascending column order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .filter(|&(j, _)| j != idx)
            .take(top_n)
            .filter_map(|(j, score)| {
                self.catalog.title(j).map(|t| Recommendation {
                    index: j,
                    title: t.to_string(),
                    score,
                })
            })
            .collect();

        debug!(
            "Resolved '{}' to index {} ({} recommendations)",
            title.trim(),
            idx,
            recommendations.len()
        );
        Ok(recommendations)
    }

    /// Movies whose title contains `query`, case-insensitively, with their
    /// own row index
    ///
    /// Exact normalized matches come first, then substring matches, each
    /// group in table order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(MovieIndex, &Movie)> {
        let needle = normalize_title(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let (mut exact, partial): (Vec<_>, Vec<_>) = self
            .catalog
            .movies()
            .iter()
            .enumerate()
            .filter(|(_, m)| normalize_title(&m.title).contains(&needle))
            .partition(|(_, m)| normalize_title(&m.title) == needle);

        exact.extend(partial);
        exact.truncate(limit);
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::SimilarityMatrix;

    fn create_test_recommender() -> Recommender {
        let movies = vec![
            Movie::titled("Avatar"),
            Movie::titled("Titanic"),
            Movie::titled("Inception"),
        ];
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.2, 0.5],
            vec![0.2, 1.0, 0.1],
            vec![0.5, 0.1, 1.0],
        ]);
        Recommender::new(Arc::new(Catalog::new(movies, similarity).unwrap()))
    }

    #[test]
    fn test_recommend_orders_by_score() {
        let recommender = create_test_recommender();
        let recs = recommender.recommend("avatar", 2).unwrap();
        assert_eq!(recs, vec!["Inception", "Titanic"]);
    }

    #[test]
    fn test_recommend_normalizes_query() {
        let recommender = create_test_recommender();
        assert_eq!(recommender.recommend("Avatar  ", 1).unwrap(), vec!["Inception"]);
        assert_eq!(recommender.recommend("  tItAnIc", 1).unwrap(), vec!["Avatar"]);
    }

    #[test]
    fn test_recommend_not_found() {
        let recommender = create_test_recommender();
        let err = recommender.recommend("Nonexistent Movie", 5).unwrap_err();
        assert_eq!(
            err,
            RecommendError::NotFound {
                title: "nonexistent movie".to_string()
            }
        );
        assert_eq!(err.to_string(), "Movie 'nonexistent movie' not found in the dataset.");
    }

    #[test]
    fn test_recommend_truncates_and_zero() {
        let recommender = create_test_recommender();
        assert_eq!(recommender.recommend("Avatar", 10).unwrap().len(), 2);
        assert!(recommender.recommend("Avatar", 0).unwrap().is_empty());
    }

    #[test]
    fn test_recommend_scored_carries_scores() {
        let recommender = create_test_recommender();
        let recs = recommender.recommend_scored("Inception", 2).unwrap();
        assert_eq!(
            recs,
            vec![
                Recommendation { index: 0, title: "Avatar".to_string(), score: 0.5 },
                Recommendation { index: 1, title: "Titanic".to_string(), score: 0.1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_column_order() {
        let movies = vec![
            Movie::titled("A"),
            Movie::titled("B"),
            Movie::titled("C"),
            Movie::titled("D"),
        ];
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.3, 0.3, 0.3],
            vec![0.3, 1.0, 0.0, 0.0],
            vec![0.3, 0.0, 1.0, 0.0],
            vec![0.3, 0.0, 0.0, 1.0],
        ]);
        let recommender = Recommender::new(Arc::new(Catalog::new(movies, similarity).unwrap()));

        for _ in 0..5 {
            assert_eq!(recommender.recommend("a", 3).unwrap(), vec!["B", "C", "D"]);
        }
    }

    #[test]
    fn test_self_excluded_even_when_not_top() {
        // Another movie outscores the query's own self-similarity
        let movies = vec![Movie::titled("Heat"), Movie::titled("Heat 2")];
        let similarity = SimilarityMatrix::from_rows(vec![vec![0.9, 1.0], vec![1.0, 0.9]]);
        let recommender = Recommender::new(Arc::new(Catalog::new(movies, similarity).unwrap()));

        assert_eq!(recommender.recommend("heat", 5).unwrap(), vec!["Heat 2"]);
    }

    #[test]
    fn test_resolve() {
        let recommender = create_test_recommender();
        assert_eq!(recommender.resolve(" INCEPTION "), Some(2));
        assert_eq!(recommender.resolve("Incep"), None);
    }

    #[test]
    fn test_search() {
        let movies = vec![
            Movie::titled("Avatar 2"),
            Movie::titled("Titanic"),
            Movie::titled("Avatar"),
        ];
        let similarity = SimilarityMatrix::from_rows(vec![vec![1.0; 3]; 3]);
        let recommender = Recommender::new(Arc::new(Catalog::new(movies, similarity).unwrap()));

        let hits: Vec<(MovieIndex, &str)> = recommender
            .search("avatar", 10)
            .into_iter()
            .map(|(i, m)| (i, m.title.as_str()))
            .collect();
        assert_eq!(hits, vec![(2, "Avatar"), (0, "Avatar 2")]);

        assert_eq!(recommender.search("AVA", 1).len(), 1);
        assert!(recommender.search("   ", 10).is_empty());
        assert!(recommender.search("zzz", 10).is_empty());
    }

    #[test]
    fn test_search_duplicate_titles_keep_own_index() {
        let movies = vec![
            Movie::titled("Heat"),
            Movie::titled("Up"),
            Movie::titled("heat "),
        ];
        let similarity = SimilarityMatrix::from_rows(vec![vec![1.0; 3]; 3]);
        let recommender = Recommender::new(Arc::new(Catalog::new(movies, similarity).unwrap()));

        let indices: Vec<MovieIndex> = recommender
            .search("HEAT", 10)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        // lookups still go to the first occurrence
        assert_eq!(recommender.resolve("heat"), Some(0));
    }
}

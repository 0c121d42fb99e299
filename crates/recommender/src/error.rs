//! Errors returned by recommendation lookups.

use thiserror::Error;

/// A lookup that could not produce recommendations
///
/// Kept separate from an empty result: `Ok(vec![])` means the title was
/// found but nothing was asked for (or nothing else exists).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// No movie matches the title after normalization
    #[error("Movie '{title}' not found in the dataset.")]
    NotFound {
        /// The normalized query
        title: String,
    },
}

pub type Result<T> = std::result::Result<T, RecommendError>;

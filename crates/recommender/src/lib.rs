//! Content-based movie recommendations over a precomputed similarity matrix.
//!
//! The heavy lifting (computing similarities) happens upstream; this crate
//! only resolves a title and ranks its row of scores.
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::Catalog;
//! use recommender::{Recommender, RecommendError};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_dir(Path::new("output"))?);
//! let recommender = Recommender::new(catalog);
//!
//! match recommender.recommend("Avatar", 5) {
//!     Ok(titles) => titles.iter().for_each(|t| println!("- {t}")),
//!     Err(RecommendError::NotFound { title }) => eprintln!("no match for {title}"),
//! }
//! ```

pub mod error;
pub mod recommender;

pub use error::{RecommendError, Result};
pub use recommender::{Recommendation, Recommender};

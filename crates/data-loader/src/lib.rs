//! # Data Loader Crate
//!
//! Loads the two precomputed recommendation artifacts and pairs them into
//! a validated, immutable [`Catalog`].
//!
//! ## Main Components
//!
//! - **types**: Movie, MovieTable, SimilarityMatrix, Catalog
//! - **parser**: Decode the JSON and line-based artifact formats
//! - **index**: Validate the pairing and build the title index
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, normalize_title};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("output"))?;
//!
//! let idx = catalog.find_title(&normalize_title(" Avatar ")).unwrap();
//! let scores = catalog.row(idx).unwrap();
//! println!("{} has {} scores", catalog.title(idx).unwrap(), scores.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use types::{
    normalize_title,
    Catalog,
    Movie,
    MovieId,
    MovieIndex,
    MovieTable,
    SimilarityMatrix,
};

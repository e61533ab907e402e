//! # Trie-Structured Product Listing Matcher
//!
//! ## Overview
//! This library resolves free-text product listings (titles scraped from
//! retailer feeds) to canonical catalog products by exact substring matching
//! against manufacturer and model vocabularies derived from the catalog.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `text_processing`: normalization and tokenization of raw strings
//! - `trie`: shared-trie index over candidate substrings
//! - `indexing`: catalog indexer deriving substrings per product field
//! - `matching`: multi-cursor matcher resolving a field to candidate products
//! - `pipeline`: per-listing orchestration (manufacturer gate, model match)
//! - `ingestion`: JSON-lines catalog/listing readers and the result writer
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: catalog records and listing records (JSON objects, one per line)
//! - **Output**: listings augmented with the resolved product, or reported
//!   unmatched when no unique match exists
//! - **Guarantee**: deterministic results; a listing maps to at most one product
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use listing_matcher::indexing::ProductIndexer;
//! use listing_matcher::pipeline::ResolutionPipeline;
//! use listing_matcher::{Config, Product};
//!
//! fn main() -> listing_matcher::Result<()> {
//!     let config = Config::from_file("config.toml")?;
//!     let mut indexer = ProductIndexer::new();
//!     indexer.index(&Arc::new(Product {
//!         name: "Canon EOS 7D".into(),
//!         manufacturer: "Canon".into(),
//!         model: "7D".into(),
//!         family: Some("EOS".into()),
//!         announced_date: "2009-09-01T00:00:00.000-05:00".into(),
//!     }));
//!     let pipeline = ResolutionPipeline::new(indexer, config.matching);
//!     let product = pipeline.resolve("Canon", "Canon EOS 7D Body");
//!     println!("resolved: {:?}", product.map(|p| p.name.clone()));
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod indexing;
pub mod ingestion;
pub mod matching;
pub mod pipeline;
pub mod text_processing;
pub mod trie;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use errors::{MatchError, Result};
pub use pipeline::{PipelineStats, ResolutionPipeline};

// Core types used throughout the system
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a catalog product. Products are loaded once and shared
/// read-only between the catalog, the trie association lists, and match
/// results; set and map operations hash and compare the underlying record.
pub type ProductRef = Arc<Product>;

/// A canonical catalog product record. Identity is value equality on all
/// fields, so a product can serve directly as a map or set key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Display name of the product
    #[serde(rename = "product_name")]
    pub name: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Model designation
    pub model: String,
    /// Product family or line, when the catalog provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Announcement date, carried through as an opaque string
    #[serde(rename = "announced-date", default)]
    pub announced_date: String,
}

/// Which catalog field an indexed string segment was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductField {
    Manufacturer,
    Model,
}

/// A single accepted association between an indexed substring and a
/// product/field combination. Two matches compare equal when their products
/// are equal, regardless of the originating field.
#[derive(Debug, Clone)]
pub struct CandidateMatch {
    /// The associated product
    pub product: ProductRef,
    /// The catalog field the indexed substring came from
    pub field: ProductField,
}

impl CandidateMatch {
    /// Create a new association for `product` derived from `field`
    pub fn new(product: ProductRef, field: ProductField) -> Self {
        Self { product, field }
    }
}

impl PartialEq for CandidateMatch {
    fn eq(&self, other: &Self) -> bool {
        self.product == other.product
    }
}

impl Eq for CandidateMatch {}

impl Hash for CandidateMatch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product.hash(state);
    }
}

/// A raw listing record as supplied by a listing source. Fields beyond the
/// two the matcher reads are preserved verbatim for the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Free-text listing title
    pub title: String,
    /// Free-text manufacturer field
    pub manufacturer: String,
    /// Passthrough fields carried unchanged into the output
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

//! # Resolution Pipeline Module
//!
//! ## Purpose
//! Orchestrates the per-listing resolution flow: strip accessory wording
//! from the title, match the manufacturer field, then match the title
//! against the model vocabulary restricted to the manufacturer's products.
//! A listing resolves only when that second match names exactly one product.
//!
//! ## Input/Output Specification
//! - **Input**: a fully built [`ProductIndexer`] and listing records
//! - **Output**: at most one catalog product per listing
//! - **Concurrency**: the index is read-only after construction, so listings
//!   may be fanned out across threads; every match call owns its cursor
//!   state and output order always equals input order

use crate::config::MatchingConfig;
use crate::indexing::ProductIndexer;
use crate::matching;
use crate::{Listing, ProductField, ProductRef};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Resolves listings against an indexed catalog
pub struct ResolutionPipeline {
    indexer: ProductIndexer,
    accessory_clauses: Vec<Regex>,
    config: MatchingConfig,
}

impl ResolutionPipeline {
    /// Create a pipeline around a built index
    pub fn new(indexer: ProductIndexer, config: MatchingConfig) -> Self {
        // Trailing "for ..." / "pour ..." phrases usually name the product
        // an accessory is compatible with, not the product being sold.
        let accessory_clauses = vec![
            Regex::new(r" for .*").unwrap(),
            Regex::new(r" pour .*").unwrap(),
        ];
        Self {
            indexer,
            accessory_clauses,
            config,
        }
    }

    /// The underlying index
    pub fn indexer(&self) -> &ProductIndexer {
        &self.indexer
    }

    /// Drop the first accessory clause from a title, when stripping is
    /// enabled
    pub fn strip_accessory_clause<'a>(&self, title: &'a str) -> Cow<'a, str> {
        if !self.config.strip_accessory_clause {
            return Cow::Borrowed(title);
        }
        let mut stripped = Cow::Borrowed(title);
        for clause in &self.accessory_clauses {
            if clause.is_match(&stripped) {
                stripped = Cow::Owned(clause.replace(&stripped, "").into_owned());
            }
        }
        stripped
    }

    /// Resolve one listing to at most one catalog product.
    ///
    /// The manufacturer field gates everything: when it matches no known
    /// manufacturer vocabulary the listing is unmatched without looking at
    /// the title. Otherwise the title is matched against the model
    /// vocabulary restricted to the manufacturer's candidates, and only a
    /// unique outcome resolves.
    pub fn resolve(&self, manufacturer: &str, title: &str) -> Option<ProductRef> {
        let manufacturer_matches = matching::match_products(
            self.indexer.manufacturer_trie(),
            manufacturer,
            None,
            ProductField::Manufacturer,
        )?;

        let stripped = self.strip_accessory_clause(title);
        let resolved = matching::match_one(
            self.indexer.model_trie(),
            &stripped,
            Some(&manufacturer_matches),
            ProductField::Model,
        );
        if resolved.is_none() {
            debug!(manufacturer, title, "no unique model match");
        }
        resolved
    }

    /// Resolve a batch of listings, preserving input order. Fans out over
    /// the rayon thread pool unless the configuration asks for a sequential
    /// pass.
    pub fn resolve_all(&self, listings: &[Listing]) -> Vec<Option<ProductRef>> {
        if self.config.parallel {
            listings
                .par_iter()
                .map(|l| self.resolve(&l.manufacturer, &l.title))
                .collect()
        } else {
            listings
                .iter()
                .map(|l| self.resolve(&l.manufacturer, &l.title))
                .collect()
        }
    }
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Listings read, malformed ones excluded
    pub listings_total: usize,
    /// Listings resolved to a unique product
    pub matched: usize,
    /// Listings with no unique match
    pub unmatched: usize,
    /// Catalog and listing lines skipped as malformed
    pub malformed: usize,
    /// Wall-clock matching time in milliseconds
    pub elapsed_ms: u64,
}

impl PipelineStats {
    /// Matching throughput; zero when the run was instantaneous
    pub fn listings_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            0.0
        } else {
            self.listings_total as f64 * 1000.0 / self.elapsed_ms as f64
        }
    }
}

//! # Catalog Indexing Module
//!
//! ## Purpose
//! Builds the manufacturer and model vocabularies from catalog records. Each
//! product contributes the concatenation of every contiguous token run of its
//! relevant fields, filtered to suppress substrings judged likely to produce
//! false positives.
//!
//! ## Input/Output Specification
//! - **Input**: catalog products, one at a time, in catalog order
//! - **Output**: two populated tries whose nodes carry product associations
//! - **Guarantee**: indexing never fails; an empty field contributes nothing
//!
//! ## Field Sources
//! - manufacturer trie: the manufacturer field
//! - model trie: the display name, the model field, and (when a family is
//!   present) the family concatenated with the model. Catalogs are
//!   inconsistent about where the family ends up, so all three are indexed;
//!   these only mark strings that *might* identify the product, so there is
//!   no harm in recording too much here.

use crate::text_processing;
use crate::trie::Trie;
use crate::{CandidateMatch, ProductField, ProductRef};
use tracing::debug;

/// Builds the substring vocabularies for a product catalog. Feed every
/// product through [`ProductIndexer::index`], then hand the indexer to the
/// resolution pipeline; the tries are read-only from then on.
#[derive(Debug, Default)]
pub struct ProductIndexer {
    manufacturer: Trie,
    model: Trie,
    indexed: usize,
}

impl ProductIndexer {
    /// Create an indexer with empty vocabularies
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one catalog product to the vocabularies
    pub fn index(&mut self, product: &ProductRef) {
        self.process_field(product, ProductField::Manufacturer, &product.manufacturer);

        self.process_field(product, ProductField::Model, &product.name);
        self.process_field(product, ProductField::Model, &product.model);
        if let Some(family) = &product.family {
            let family_model = format!("{} {}", family, product.model);
            self.process_field(product, ProductField::Model, &family_model);
        }

        self.indexed += 1;
        debug!(product = %product.name, "indexed catalog product");
    }

    /// The manufacturer vocabulary
    pub fn manufacturer_trie(&self) -> &Trie {
        &self.manufacturer
    }

    /// The model vocabulary
    pub fn model_trie(&self) -> &Trie {
        &self.model
    }

    /// Number of products indexed so far
    pub fn product_count(&self) -> usize {
        self.indexed
    }

    /// Total node count across both vocabularies
    pub fn node_count(&self) -> usize {
        self.manufacturer.len() + self.model.len()
    }

    /// Insert every accepted token-run concatenation of `value` into the
    /// trie for `field` and associate `product` with the terminal nodes.
    fn process_field(&mut self, product: &ProductRef, field: ProductField, value: &str) {
        let words = text_processing::tokenize(value);
        if words.is_empty() {
            return;
        }
        let trie = match field {
            ProductField::Manufacturer => &mut self.manufacturer,
            ProductField::Model => &mut self.model,
        };

        let n = words.len();
        for i in 0..n {
            let mut span = String::new();
            for j in i..n {
                span.push_str(&words[j]);

                // A match on the entire string is always accepted; partial
                // spans go through the false-positive filters.
                let full = i == 0 && j == n - 1;
                if !full && !accept_span(field, &span) {
                    continue;
                }

                let node = trie.insert(&span);

                // Products are processed one at a time, so checking the most
                // recently appended entry is enough to keep one field pass
                // from recording the same product twice at a node.
                let duplicate = trie
                    .matches(node)
                    .last()
                    .is_some_and(|m| m.product == *product);
                if !duplicate {
                    trie.push_match(node, CandidateMatch::new(product.clone(), field));
                }
            }
        }
    }
}

/// Filter rules for partial spans:
/// - single characters match far too eagerly ("Pentax K-r" must not match
///   on "k" or "r" alone)
/// - four or more letters with no digit in a model field is likely an
///   ordinary dictionary word ("Digital"); short all-letter model names such
///   as IXUS or ELPH still pass
/// - short all-digit strings collide with unrelated numbers in titles
fn accept_span(field: ProductField, span: &str) -> bool {
    if span.len() <= 1 {
        return false;
    }
    if field == ProductField::Model && span.len() > 3 && !span.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if span.len() < 4 && span.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    true
}

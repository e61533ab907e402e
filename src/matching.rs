//! # Listing Matching Module
//!
//! ## Purpose
//! Resolves a free-text field against a vocabulary trie. A breadth-first set
//! of cursors tracks every substring match in progress, longer matches
//! supersede the prefixes they extend, and the surviving matches are reduced
//! to a candidate product set with singleton precedence.
//!
//! ## Input/Output Specification
//! - **Input**: a built trie, raw text, an optional candidate filter, the
//!   field tag the caller requires
//! - **Output**: `None` when nothing matched, otherwise the candidate set
//!   (possibly emptied by filtering)
//! - **Performance**: linear in listing length times trie depth
//!
//! ## Algorithm
//! For each word of the normalized text, a fresh cursor starts at the root
//! while every surviving cursor advances along the word's characters. A
//! cursor landing on a node with associations records that node's product
//! set and evicts any set recorded at a strict-prefix ancestor, so the
//! longest match along a cursor chain wins. Resolution then intersects
//! singleton sets when any exist (a node naming exactly one product is
//! decisive) and all sets otherwise.

use crate::text_processing;
use crate::trie::{NodeId, Trie};
use crate::{ProductField, ProductRef};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// Set of candidate products, hashed and compared by record value
pub type ProductSet = HashSet<ProductRef>;

/// Products recorded at one matched node
struct NodeMatch {
    /// All associated products that survived the filter
    products: ProductSet,
    /// The subset with at least one association carrying the required tag
    tagged: ProductSet,
}

/// Match `text` against the vocabulary rooted in `trie`.
///
/// When `filter` is present, only products it contains are considered. The
/// result is additionally restricted to products backed by at least one
/// association tagged `tag` among the surviving matched nodes. Returns
/// `None` when no word matched anything, an empty set when filtering
/// eliminated every candidate, and a set of one or more products otherwise.
pub fn match_products(
    trie: &Trie,
    text: &str,
    filter: Option<&ProductSet>,
    tag: ProductField,
) -> Option<ProductSet> {
    let words = text_processing::tokenize(text);

    let mut cursors: VecDeque<NodeId> = VecDeque::new();
    let mut matches: HashMap<NodeId, NodeMatch> = HashMap::new();

    for word in &words {
        // A fresh match may start at every word; cursors pushed while
        // processing this word wait for the next one.
        cursors.push_back(trie.root());
        let pending = cursors.len();
        for _ in 0..pending {
            let Some(cursor) = cursors.pop_front() else {
                break;
            };
            let Some(node) = trie.find_descendant(cursor, word) else {
                continue;
            };
            if !trie.matches(node).is_empty() {
                let mut products = ProductSet::new();
                let mut tagged = ProductSet::new();
                for candidate in trie.matches(node) {
                    if filter.is_some_and(|f| !f.contains(&candidate.product)) {
                        continue;
                    }
                    if candidate.field == tag {
                        tagged.insert(candidate.product.clone());
                    }
                    products.insert(candidate.product.clone());
                }
                if !products.is_empty() {
                    // Longest match wins: evict anything recorded at a
                    // strict-prefix ancestor of this node.
                    let mut ancestor = trie.parent(node);
                    while let Some(a) = ancestor {
                        matches.remove(&a);
                        ancestor = trie.parent(a);
                    }
                    matches.insert(node, NodeMatch { products, tagged });
                }
            }
            cursors.push_back(node);
        }
    }

    if matches.is_empty() {
        trace!(text, "no vocabulary match");
        return None;
    }
    Some(resolve(matches.into_values().collect()))
}

/// Match `text` and accept the outcome only when it names exactly one
/// product.
pub fn match_one(
    trie: &Trie,
    text: &str,
    filter: Option<&ProductSet>,
    tag: ProductField,
) -> Option<ProductRef> {
    let result = match_products(trie, text, filter, tag)?;
    if result.len() == 1 {
        result.into_iter().next()
    } else {
        None
    }
}

/// Reduce the per-node product sets to one candidate set.
///
/// A node whose set names exactly one product is decisive; when any exist,
/// the result is the intersection of the singleton sets only. Otherwise
/// every recorded set is intersected. The result is finally restricted to
/// products holding the required tag at some surviving node.
fn resolve(node_matches: Vec<NodeMatch>) -> ProductSet {
    let singletons: Vec<&ProductSet> = node_matches
        .iter()
        .map(|m| &m.products)
        .filter(|p| p.len() == 1)
        .collect();
    let contributing: Vec<&ProductSet> = if singletons.is_empty() {
        node_matches.iter().map(|m| &m.products).collect()
    } else {
        singletons
    };

    let mut result = contributing[0].clone();
    for set in &contributing[1..] {
        result.retain(|p| set.contains(p));
    }

    let mut tagged = ProductSet::new();
    for m in &node_matches {
        tagged.extend(m.tagged.iter().cloned());
    }
    result.retain(|p| tagged.contains(p));
    result
}

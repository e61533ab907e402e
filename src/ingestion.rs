//! # Ingestion Module
//!
//! ## Purpose
//! JSON-lines adapters around the matching core: the catalog reader feeding
//! the indexer, the listing reader, and the result writer. The core never
//! touches I/O; these collaborators hand it plain records and take back
//! plain results.
//!
//! ## Input/Output Specification
//! - **Input**: one JSON object per line (catalog products or listings)
//! - **Output**: matched listings augmented with `product_name` and `model`;
//!   unmatched listings pass through unchanged when the sink is configured
//!   for it
//! - **Policy**: a line that fails to parse or misses a required field is a
//!   malformed record; it is logged and skipped, and never aborts the run

use crate::errors::{MatchError, Result};
use crate::{Listing, Product, ProductRef};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::warn;

/// Catalog records read from one source, with the count of skipped lines
#[derive(Debug, Default)]
pub struct CatalogBatch {
    /// Products in file order
    pub products: Vec<ProductRef>,
    /// Lines skipped as malformed
    pub malformed: usize,
}

/// Listing records read from one source, with the count of skipped lines
#[derive(Debug, Default)]
pub struct ListingBatch {
    /// Listings in file order
    pub listings: Vec<Listing>,
    /// Lines skipped as malformed
    pub malformed: usize,
}

fn parse_record<T: DeserializeOwned>(line: &str, number: usize) -> Result<T> {
    serde_json::from_str(line).map_err(|e| MatchError::MalformedRecord {
        line: number,
        details: e.to_string(),
    })
}

/// Read a catalog, one JSON product per line, in file order. Blank lines are
/// ignored; malformed lines are logged and counted but never fatal.
pub fn read_catalog<R: BufRead>(reader: R) -> Result<CatalogBatch> {
    let mut batch = CatalogBatch::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record::<Product>(&line, index + 1) {
            Ok(product) => batch.products.push(Arc::new(product)),
            Err(e) => {
                warn!(category = e.category(), error = %e, "skipping catalog record");
                batch.malformed += 1;
            }
        }
    }
    Ok(batch)
}

/// Read listings, one JSON object per line. Fields beyond `title` and
/// `manufacturer` are preserved verbatim on each record.
pub fn read_listings<R: BufRead>(reader: R) -> Result<ListingBatch> {
    let mut batch = ListingBatch::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record::<Listing>(&line, index + 1) {
            Ok(listing) => batch.listings.push(listing),
            Err(e) => {
                warn!(category = e.category(), error = %e, "skipping listing record");
                batch.malformed += 1;
            }
        }
    }
    Ok(batch)
}

/// JSON-lines result sink. Matched listings are written augmented with the
/// resolved product's name and model; unmatched listings are dropped unless
/// pass-through is enabled.
pub struct ResultWriter<W: Write> {
    out: W,
    emit_unmatched: bool,
}

impl<W: Write> ResultWriter<W> {
    /// Create a writer over `out`; `emit_unmatched` selects the pass-through
    /// policy for unresolved listings
    pub fn new(out: W, emit_unmatched: bool) -> Self {
        Self { out, emit_unmatched }
    }

    /// Write the outcome for one listing
    pub fn write(&mut self, listing: &Listing, resolved: Option<&Product>) -> Result<()> {
        let record = match resolved {
            Some(product) => {
                let mut value = serde_json::to_value(listing)?;
                if let Some(object) = value.as_object_mut() {
                    object.insert("product_name".into(), Value::String(product.name.clone()));
                    object.insert("model".into(), Value::String(product.model.clone()));
                }
                Some(value)
            }
            None if self.emit_unmatched => Some(serde_json::to_value(listing)?),
            None => None,
        };
        if let Some(record) = record {
            serde_json::to_writer(&mut self.out, &record)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_catalog_in_file_order() {
        let input = concat!(
            r#"{"product_name":"Canon EOS 7D","manufacturer":"Canon","model":"7D","family":"EOS","announced-date":"2009-09-01T00:00:00.000-05:00"}"#,
            "\n",
            r#"{"product_name":"Pentax WG-1","manufacturer":"Pentax","model":"WG-1","announced-date":"2011-02-07T00:00:00.000-05:00"}"#,
            "\n",
        );
        let batch = read_catalog(Cursor::new(input)).unwrap();
        assert_eq!(batch.malformed, 0);
        let names: Vec<_> = batch.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Canon EOS 7D", "Pentax WG-1"]);
        assert_eq!(batch.products[0].family.as_deref(), Some("EOS"));
        assert_eq!(batch.products[1].family, None);
    }

    #[test]
    fn malformed_catalog_lines_are_skipped_not_fatal() {
        let input = concat!(
            r#"{"product_name":"Canon EOS 7D","manufacturer":"Canon","model":"7D"}"#,
            "\n",
            r#"{"product_name":"No Model Here","manufacturer":"Canon"}"#,
            "\n",
            "not json at all\n",
            "\n",
            r#"{"product_name":"Pentax WG-1","manufacturer":"Pentax","model":"WG-1"}"#,
            "\n",
        );
        let batch = read_catalog(Cursor::new(input)).unwrap();
        assert_eq!(batch.products.len(), 2);
        assert_eq!(batch.malformed, 2);
    }

    #[test]
    fn listings_preserve_passthrough_fields() {
        let input = concat!(
            r#"{"title":"Canon EOS 7D Body","manufacturer":"Canon","currency":"CAD","price":"1899.99"}"#,
            "\n",
            r#"{"manufacturer":"Canon","price":"12.00"}"#,
            "\n",
        );
        let batch = read_listings(Cursor::new(input)).unwrap();
        assert_eq!(batch.listings.len(), 1);
        assert_eq!(batch.malformed, 1);

        let listing = &batch.listings[0];
        assert_eq!(listing.title, "Canon EOS 7D Body");
        assert_eq!(listing.extra["currency"], "CAD");
        assert_eq!(listing.extra["price"], "1899.99");
    }

    #[test]
    fn writer_augments_matched_listings() {
        let listing = Listing {
            title: "Canon EOS 7D Body".into(),
            manufacturer: "Canon".into(),
            extra: serde_json::Map::from_iter([(
                "price".to_string(),
                Value::String("1899.99".into()),
            )]),
        };
        let product = Product {
            name: "Canon EOS 7D".into(),
            manufacturer: "Canon".into(),
            model: "7D".into(),
            family: Some("EOS".into()),
            announced_date: String::new(),
        };

        let mut writer = ResultWriter::new(Vec::new(), false);
        writer.write(&listing, Some(&product)).unwrap();
        writer.flush().unwrap();

        let out = writer.out;
        let written: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(written["title"], "Canon EOS 7D Body");
        assert_eq!(written["price"], "1899.99");
        assert_eq!(written["product_name"], "Canon EOS 7D");
        assert_eq!(written["model"], "7D");
    }

    #[test]
    fn unmatched_listings_follow_the_sink_policy() {
        let listing = Listing {
            title: "Mystery Gadget".into(),
            manufacturer: "Nobody".into(),
            extra: serde_json::Map::new(),
        };

        let mut silent = ResultWriter::new(Vec::new(), false);
        silent.write(&listing, None).unwrap();
        assert!(silent.out.is_empty());

        let mut passthrough = ResultWriter::new(Vec::new(), true);
        passthrough.write(&listing, None).unwrap();
        let written: Value = serde_json::from_slice(&passthrough.out).unwrap();
        assert_eq!(written["title"], "Mystery Gadget");
        assert!(written.get("product_name").is_none());
    }
}

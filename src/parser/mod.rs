pub mod clean;
pub mod document;
pub mod locate;
pub mod rows;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::index::{DestinationIndex, DestinationSet};
use document::{Outline, Table};
use locate::StrategySet;
use rows::{ResetPolicy, RowClassifier, RowVerdict};

/// Knobs for the table heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub reset: ResetPolicy,
    #[serde(default)]
    pub strategies: StrategySet,
}

/// Extract passenger destinations per airline from article HTML with the
/// default options.
pub fn build_destination_index(html: &str) -> DestinationIndex {
    build_destination_index_with(html, &ParseOptions::default())
}

/// Pipeline: HTML → outline → candidate tables → rows → cleaned
/// destinations. Never fails; no qualifying tables gives an empty index.
pub fn build_destination_index_with(html: &str, opts: &ParseOptions) -> DestinationIndex {
    let outline = Outline::parse(html);
    let candidates = locate::locate_tables(&outline, opts.strategies);
    info!(
        data_tables = outline.tables.len(),
        candidates = candidates.len(),
        "Located passenger tables"
    );

    let airlines = candidates
        .into_iter()
        .fold(BTreeMap::new(), |acc, (i, table)| absorb_table(acc, i, table, opts.reset));

    let index = DestinationIndex::from_airlines(airlines);
    match index.aggregate() {
        Some(all) => info!(
            airlines = index.len() - 1,
            destinations = all.len(),
            "Collected destinations"
        ),
        None => warn!("No passenger destination data extracted from HTML"),
    }
    index
}

/// Fold one table's rows into the per-airline map.
fn absorb_table(
    mut acc: BTreeMap<String, DestinationSet>,
    table_idx: usize,
    table: &Table,
    reset: ResetPolicy,
) -> BTreeMap<String, DestinationSet> {
    let mut classifier = RowClassifier::new(reset);

    for (row_idx, cells) in table.rows.iter().enumerate() {
        let airline = match classifier.classify(row_idx, cells) {
            RowVerdict::Airline(a) => a,
            RowVerdict::Skip => continue,
            RowVerdict::EndOfTable => {
                debug!(
                    table = table_idx,
                    row = row_idx,
                    airline = cells.first().map_or("", |c| c.trim()),
                    "Airline order reset, leaving table"
                );
                break;
            }
        };

        let dests = clean::clean_destinations(&cells[1]);
        if dests.is_empty() {
            continue;
        }
        debug!(table = table_idx, row = row_idx, airline, destinations = ?dests, "Row accepted");
        acc.entry(airline.to_string()).or_default().extend(dests);
    }
    acc
}

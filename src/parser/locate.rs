use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::{Outline, Table};

const ANCHOR: &str = "airlines and destinations";
const PASSENGER: &str = "passenger";

/// One way of deciding which data tables list passenger destinations.
pub trait LocateStrategy {
    fn name(&self) -> &'static str;

    /// Indices into [`Outline::tables`] this strategy accepts.
    fn locate(&self, outline: &Outline) -> BTreeSet<usize>;
}

/// Find the "Airlines and destinations" heading, then its "Passenger"
/// subsection, and take the tables in that subsection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingScope;

impl LocateStrategy for HeadingScope {
    fn name(&self) -> &'static str {
        "heading_scope"
    }

    fn locate(&self, outline: &Outline) -> BTreeSet<usize> {
        let headings = &outline.headings;
        let Some(anchor) = headings
            .iter()
            .position(|h| h.text.to_lowercase().contains(ANCHOR))
        else {
            return BTreeSet::new();
        };
        let anchor_level = headings[anchor].level;

        for h in &headings[anchor + 1..] {
            if h.level <= anchor_level {
                debug!(heading = %h.text.trim(), "Left destinations section before a passenger heading");
                break;
            }
            let text = h.text.to_lowercase();
            if text.contains("cargo") || text.contains("freight") {
                debug!(heading = %h.text.trim(), "Reached cargo heading before a passenger heading");
                break;
            }
            if text.contains(PASSENGER) {
                return h.tables.iter().copied().collect();
            }
        }
        BTreeSet::new()
    }
}

/// Accept a table whose caption mentions passengers or, when it has no
/// caption, whose nearby preceding heading does.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionProximity;

impl LocateStrategy for CaptionProximity {
    fn name(&self) -> &'static str {
        "caption"
    }

    fn locate(&self, outline: &Outline) -> BTreeSet<usize> {
        outline
            .tables
            .iter()
            .enumerate()
            .filter(|(_, t)| mentions_passenger(t))
            .map(|(i, _)| i)
            .collect()
    }
}

fn mentions_passenger(table: &Table) -> bool {
    match table.caption.as_deref().map(str::trim) {
        Some(caption) if !caption.is_empty() => caption.to_lowercase().contains(PASSENGER),
        _ => table
            .preceding_heading
            .as_ref()
            .is_some_and(|h| h.to_lowercase().contains(PASSENGER)),
    }
}

/// Which strategies the locator runs. A table is kept when any selected
/// strategy accepts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySet {
    #[default]
    Union,
    HeadingScope,
    Caption,
}

impl StrategySet {
    fn strategies(self) -> Vec<Box<dyn LocateStrategy>> {
        match self {
            StrategySet::Union => vec![Box::new(HeadingScope), Box::new(CaptionProximity)],
            StrategySet::HeadingScope => vec![Box::new(HeadingScope)],
            StrategySet::Caption => vec![Box::new(CaptionProximity)],
        }
    }
}

impl FromStr for StrategySet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "union" | "all" => Ok(Self::Union),
            "heading_scope" | "heading" => Ok(Self::HeadingScope),
            "caption" => Ok(Self::Caption),
            other => Err(format!("unknown table strategy: {other}")),
        }
    }
}

/// Candidate tables in document order, each with its index in the outline.
pub fn locate_tables(outline: &Outline, set: StrategySet) -> Vec<(usize, &Table)> {
    let mut accepted = BTreeSet::new();
    for strategy in set.strategies() {
        let found = strategy.locate(outline);
        debug!(strategy = strategy.name(), tables = ?found, "Strategy result");
        accepted.extend(found);
    }
    accepted
        .into_iter()
        .filter_map(|i| outline.tables.get(i).map(|t| (i, t)))
        .collect()
}

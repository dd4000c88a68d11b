use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

pub type DestinationSet = BTreeSet<String>;

/// Display name of the row holding every destination regardless of airline.
pub const AGGREGATE_LABEL: &str = "All Airlines";

static EMPTY: DestinationSet = BTreeSet::new();

/// Destinations per airline for one article, plus their union.
///
/// The union is kept apart from the airline keys so no airline name can
/// collide with it. It is present only when at least one airline has a
/// destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DestinationIndex {
    airlines: BTreeMap<String, DestinationSet>,
    aggregate: DestinationSet,
}

impl DestinationIndex {
    /// Build an index from per-airline sets. Airlines with no destinations
    /// are dropped and the aggregate is derived from the rest.
    pub fn from_airlines(airlines: BTreeMap<String, DestinationSet>) -> Self {
        let airlines: BTreeMap<_, _> = airlines.into_iter().filter(|(_, d)| !d.is_empty()).collect();
        let aggregate = airlines.values().flatten().cloned().collect();
        Self { airlines, aggregate }
    }

    /// Number of keys, counting the aggregate as one. Zero means no data.
    pub fn len(&self) -> usize {
        self.airlines.len() + usize::from(!self.aggregate.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn airline(&self, name: &str) -> Option<&DestinationSet> {
        self.airlines.get(name)
    }

    pub fn airlines(&self) -> impl Iterator<Item = (&str, &DestinationSet)> {
        self.airlines.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn aggregate(&self) -> Option<&DestinationSet> {
        (!self.aggregate.is_empty()).then_some(&self.aggregate)
    }
}

/// One airline's destinations split three ways between airports A and B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub airline: String,
    #[serde(skip)]
    pub aggregate: bool,
    pub common: Vec<String>,
    pub only_a: Vec<String>,
    pub only_b: Vec<String>,
}

impl ComparisonRow {
    /// Partition `a ∪ b`. Returns `None` when both sets are empty.
    pub fn compare(airline: &str, a: &DestinationSet, b: &DestinationSet) -> Option<Self> {
        let common: Vec<String> = a.intersection(b).cloned().collect();
        let only_a: Vec<String> = a.difference(b).cloned().collect();
        let only_b: Vec<String> = b.difference(a).cloned().collect();
        if common.is_empty() && only_a.is_empty() && only_b.is_empty() {
            return None;
        }
        Some(Self {
            airline: airline.to_string(),
            aggregate: false,
            common,
            only_a,
            only_b,
        })
    }
}

/// Compare two indices airline by airline.
///
/// The aggregate row comes first when either side has data; the remaining
/// rows are ordered by airline name, ignoring case first. Destination lists
/// come out sorted because the sets are ordered.
pub fn merge_indices(a: &DestinationIndex, b: &DestinationIndex) -> Vec<ComparisonRow> {
    let mut rows = Vec::new();

    if let Some(mut row) = ComparisonRow::compare(
        AGGREGATE_LABEL,
        a.aggregate().unwrap_or(&EMPTY),
        b.aggregate().unwrap_or(&EMPTY),
    ) {
        row.aggregate = true;
        rows.push(row);
    }

    let names: BTreeSet<&str> = a
        .airlines
        .keys()
        .chain(b.airlines.keys())
        .map(String::as_str)
        .collect();

    let mut airline_rows: Vec<ComparisonRow> = names
        .into_iter()
        .filter_map(|name| {
            ComparisonRow::compare(
                name,
                a.airline(name).unwrap_or(&EMPTY),
                b.airline(name).unwrap_or(&EMPTY),
            )
        })
        .collect();
    airline_rows.sort_by(|x, y| compare_names(&x.airline, &y.airline));

    rows.extend(airline_rows);
    rows
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

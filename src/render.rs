use std::fmt::Write;

use crate::index::{ComparisonRow, DestinationIndex, DestinationSet, AGGREGATE_LABEL};

pub const NO_DATA: &str = "No passenger destination data found for either airport.";
pub const NO_COMPARABLE: &str = "No comparable airline data found between the two airports.";
pub const SOURCE_NOTE: &str = "Note: Data is sourced from Wikipedia passenger destination tables. \
Results depend on the completeness of Wikipedia data.";

const EMPTY_CELL: &str = "None";

/// Plain-text comparison report: a table with columns
/// `Airline | Common | Only at <A> | Only at <B>`.
pub fn comparison_text(code_a: &str, code_b: &str, rows: &[ComparisonRow]) -> String {
    let header = [
        "Airline".to_string(),
        "Common".to_string(),
        format!("Only at {code_a}"),
        format!("Only at {code_b}"),
    ];
    let body: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.airline.clone(),
                join_or_none(&row.common),
                join_or_none(&row.only_a),
                join_or_none(&row.only_b),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for cells in std::iter::once(&header).chain(&body) {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let title = format!("Destination Comparison: {code_a} vs {code_b}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}\n", "=".repeat(title.chars().count()));

    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for cells in &body {
        push_row(&mut out, cells, &widths);
    }

    let _ = writeln!(out, "\n{SOURCE_NOTE}");
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

/// JSON array of rows (`airline`, `common`, `only_a`, `only_b`).
pub fn comparison_json(rows: &[ComparisonRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Listing of one index, aggregate first.
pub fn index_text(index: &DestinationIndex) -> String {
    let mut out = String::new();
    if let Some(all) = index.aggregate() {
        push_entry(&mut out, AGGREGATE_LABEL, all);
    }
    for (airline, dests) in index.airlines() {
        push_entry(&mut out, airline, dests);
    }
    out
}

fn push_entry(out: &mut String, name: &str, dests: &DestinationSet) {
    let list: Vec<&str> = dests.iter().map(String::as_str).collect();
    let _ = writeln!(out, "{name} ({}): {}", dests.len(), list.join(", "));
}

fn join_or_none(list: &[String]) -> String {
    if list.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        list.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::index::merge_indices;

    fn index(airline: &str, dests: &[&str]) -> DestinationIndex {
        let mut map = BTreeMap::new();
        map.insert(
            airline.to_string(),
            dests.iter().map(|d| d.to_string()).collect(),
        );
        DestinationIndex::from_airlines(map)
    }

    #[test]
    fn text_report_lists_every_column() {
        let rows = merge_indices(
            &index("KLM", &["Amsterdam", "Paris"]),
            &index("KLM", &["Amsterdam"]),
        );
        let text = comparison_text("LHR", "JFK", &rows);
        assert!(text.starts_with("Destination Comparison: LHR vs JFK\n"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[2..6],
            &[
                "",
                "Airline      | Common    | Only at LHR | Only at JFK",
                "-------------+-----------+-------------+------------",
                "All Airlines | Amsterdam | Paris       | None",
            ]
        );
        assert_eq!(lines[6], "KLM          | Amsterdam | Paris       | None");
        assert!(text.trim_end().ends_with("completeness of Wikipedia data."));
    }

    #[test]
    fn json_rows() {
        let rows = merge_indices(&index("KLM", &["Oslo"]), &DestinationIndex::default());
        let json: serde_json::Value = serde_json::from_str(&comparison_json(&rows).unwrap()).unwrap();
        assert_eq!(json[0]["airline"], "All Airlines");
        assert_eq!(json[1]["airline"], "KLM");
        assert_eq!(json[1]["only_a"][0], "Oslo");
    }

    #[test]
    fn index_listing_aggregate_first() {
        let text = index_text(&index("SAS", &["Oslo", "Bergen"]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["All Airlines (2): Bergen, Oslo", "SAS (2): Bergen, Oslo"]);
    }
}

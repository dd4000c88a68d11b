use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// When to treat a drop in airline ordering as the end of the passenger
/// listing within a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Stop at the first row whose airline starts with a letter that sorts
    /// before the previous accepted airline's first letter.
    #[default]
    FirstLetter,
    /// Read every row.
    Off,
}

impl FromStr for ResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "first_letter" => Ok(Self::FirstLetter),
            "off" | "none" => Ok(Self::Off),
            other => Err(format!("unknown reset policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict<'a> {
    /// A data row; carries the trimmed airline name.
    Airline(&'a str),
    /// Not a data row. Later rows are still considered.
    Skip,
    /// This row and every later row in the table are rejected.
    EndOfTable,
}

/// Per-table row state. Create one for each table.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    policy: ResetPolicy,
    last_letter: Option<char>,
    ended: bool,
}

impl RowClassifier {
    pub fn new(policy: ResetPolicy) -> Self {
        Self {
            policy,
            last_letter: None,
            ended: false,
        }
    }

    /// Classify row `index` (0 is the header row) given its cell texts.
    pub fn classify<'a>(&mut self, index: usize, cells: &'a [String]) -> RowVerdict<'a> {
        if self.ended {
            return RowVerdict::EndOfTable;
        }
        if index == 0 || cells.len() < 2 {
            return RowVerdict::Skip;
        }

        let airline = cells[0].trim();
        if airline.chars().count() < 2 || airline.chars().all(|c| c.is_ascii_digit()) {
            return RowVerdict::Skip;
        }

        if self.policy == ResetPolicy::FirstLetter {
            if let Some(letter) = first_letter(airline) {
                if self.last_letter.is_some_and(|last| letter < last) {
                    self.ended = true;
                    return RowVerdict::EndOfTable;
                }
                self.last_letter = Some(letter);
            }
        }

        RowVerdict::Airline(airline)
    }
}

/// Lowercased first letter folded to its base form (`É` → `e`). Names whose
/// first character has no ASCII base letter take no part in the ordering
/// check.
fn first_letter(airline: &str) -> Option<char> {
    let c = airline.chars().next()?;
    let base = std::iter::once(c).nfd().next()?;
    base.is_ascii_alphabetic().then(|| base.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(airline: &str) -> Vec<String> {
        vec![airline.to_string(), "Somewhere".to_string()]
    }

    fn accepted(policy: ResetPolicy, airlines: &[&str]) -> Vec<String> {
        let rows: Vec<Vec<String>> = std::iter::once(vec!["Airlines".into(), "Destinations".into()])
            .chain(airlines.iter().map(|a| row(a)))
            .collect();
        let mut classifier = RowClassifier::new(policy);
        let mut out = Vec::new();
        for (i, cells) in rows.iter().enumerate() {
            match classifier.classify(i, cells) {
                RowVerdict::Airline(a) => out.push(a.to_string()),
                RowVerdict::Skip => {}
                RowVerdict::EndOfTable => break,
            }
        }
        out
    }

    #[test]
    fn header_row_rejected() {
        let mut c = RowClassifier::new(ResetPolicy::FirstLetter);
        assert_eq!(c.classify(0, &row("Aegean")), RowVerdict::Skip);
    }

    #[test]
    fn needs_two_cells() {
        let mut c = RowClassifier::new(ResetPolicy::FirstLetter);
        assert_eq!(c.classify(1, &["Aegean".to_string()]), RowVerdict::Skip);
        assert_eq!(c.classify(2, &[]), RowVerdict::Skip);
    }

    #[test]
    fn airline_name_guards() {
        let mut c = RowClassifier::new(ResetPolicy::FirstLetter);
        assert_eq!(c.classify(1, &row("   ")), RowVerdict::Skip);
        assert_eq!(c.classify(1, &row("X")), RowVerdict::Skip);
        assert_eq!(c.classify(1, &row("2019")), RowVerdict::Skip);
        assert_eq!(c.classify(1, &row("  Qantas \n")), RowVerdict::Airline("Qantas"));
    }

    #[test]
    fn alphabetical_reset_ends_table() {
        let got = accepted(
            ResetPolicy::FirstLetter,
            &["Aegean", "British", "Zeta", "Apple", "Beta"],
        );
        assert_eq!(got, vec!["Aegean", "British", "Zeta"]);
    }

    #[test]
    fn reset_is_case_insensitive_and_allows_ties() {
        let got = accepted(ResetPolicy::FirstLetter, &["aer Lingus", "Air France", "bmi"]);
        assert_eq!(got, vec!["aer Lingus", "Air France", "bmi"]);
    }

    #[test]
    fn ended_classifier_stays_ended() {
        let mut c = RowClassifier::new(ResetPolicy::FirstLetter);
        assert!(matches!(c.classify(1, &row("Zeta")), RowVerdict::Airline(_)));
        assert_eq!(c.classify(2, &row("Alpha")), RowVerdict::EndOfTable);
        assert_eq!(c.classify(3, &row("Zulu")), RowVerdict::EndOfTable);
    }

    #[test]
    fn non_letter_names_skip_ordering() {
        let got = accepted(ResetPolicy::FirstLetter, &["Wizz Air", "9 Air", "Xiamen Airlines"]);
        assert_eq!(got, vec!["Wizz Air", "9 Air", "Xiamen Airlines"]);
    }

    #[test]
    fn accented_initials_sort_by_base_letter() {
        let got = accepted(
            ResetPolicy::FirstLetter,
            &["Aegean", "Édelweiss", "Finnair", "Øresund Air", "KLM", "Émeraude"],
        );
        assert_eq!(
            got,
            vec!["Aegean", "Édelweiss", "Finnair", "Øresund Air", "KLM"]
        );
        assert_eq!(first_letter("Çorlu Air"), Some('c'));
        assert_eq!(first_letter("Øresund Air"), None);
    }

    #[test]
    fn reset_off_reads_everything() {
        let got = accepted(ResetPolicy::Off, &["Zeta", "Apple"]);
        assert_eq!(got, vec!["Zeta", "Apple"]);
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("first-letter".parse::<ResetPolicy>(), Ok(ResetPolicy::FirstLetter));
        assert_eq!("OFF".parse::<ResetPolicy>(), Ok(ResetPolicy::Off));
        assert!("sometimes".parse::<ResetPolicy>().is_err());
    }
}

use std::cmp::Ordering;

use bincode::{Decode, Encode};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::chemistry::formula::Formula;

/// Whether a fragment match hit a reference product ion or a reference
/// neutral loss.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize, Encode, Decode)]
pub enum FragmentKind {
    ProductIon,
    NeutralLoss,
}

/// One observed MS2 fragment or loss matched against the reference
/// ontology database.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct FragmentMatch {
    pub kind: FragmentKind,
    pub observed_mz: f64,
    pub intensity: f64,
    pub reference_mass: f64,
    pub reference_formula: String,
    pub ontology: String,
}

/// A scored formula candidate as handed to downstream consumers.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct FormulaCandidate {
    /// Enumerated composition, derivative counts included.
    pub formula: Formula,
    /// Underivatized composition used for validity, isotope ratios and
    /// database lookups. Equal to `formula` outside derivative mode.
    pub converted_formula: Formula,
    pub formula_string: String,
    pub mass: f64,
    /// Signed difference `formula mass - target mass`.
    pub mass_error: f64,
    pub mass_accuracy_score: f64,
    pub isotope_score: f64,
    pub product_ion_score: f64,
    pub neutral_loss_score: f64,
    pub total_score: f64,
    /// Existence-database annotation; empty when the formula is unknown.
    pub resource_names: Vec<String>,
    pub resource_records: u32,
    pub database_ids: Vec<String>,
    pub fragment_matches: Vec<FragmentMatch>,
    pub is_selected: bool,
}

impl FormulaCandidate {
    /// Descending |total score| with a lexicographic formula-string
    /// tie-break. The tie-break keeps result order deterministic and
    /// independent of which worker produced a candidate first.
    pub fn ranking_cmp(&self, other: &FormulaCandidate) -> Ordering {
        OrderedFloat(other.total_score.abs())
            .cmp(&OrderedFloat(self.total_score.abs()))
            .then_with(|| self.formula_string.cmp(&other.formula_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(total_score: f64, formula_string: &str) -> FormulaCandidate {
        let formula = Formula::new(1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        FormulaCandidate {
            formula,
            converted_formula: formula,
            formula_string: formula_string.to_string(),
            mass: formula.monoisotopic_mass(),
            mass_error: 0.0,
            mass_accuracy_score: 0.0,
            isotope_score: 0.0,
            product_ion_score: 0.0,
            neutral_loss_score: 0.0,
            total_score,
            resource_names: Vec::new(),
            resource_records: 0,
            database_ids: Vec::new(),
            fragment_matches: Vec::new(),
            is_selected: false,
        }
    }

    #[test]
    fn test_ranking_orders_by_score_then_formula() {
        let high = candidate(0.9, "C2H6");
        let low = candidate(0.5, "C2H4");
        assert_eq!(high.ranking_cmp(&low), Ordering::Less);

        let a = candidate(0.5, "C2H4");
        let b = candidate(0.5, "C2H6");
        assert_eq!(a.ranking_cmp(&b), Ordering::Less);
        assert_eq!(b.ranking_cmp(&a), Ordering::Greater);
    }
}

use itertools::izip;
use statrs::distribution::{Continuous, Normal};

use crate::algorithm::isotope::theoretical_isotope_ratios;
use crate::chemistry::formula::Formula;
use crate::data::candidate::{FormulaCandidate, FragmentKind, FragmentMatch};
use crate::data::configuration::{MassTolerance, SearchConfiguration};
use crate::data::existence::ExistenceDatabase;
use crate::data::spectrum::{mass_window, IsotopeObservation, Ms2Data, NeutralLossReference, PeakList, ProductIonReference};

// Default component weights of the total score. All components carry
// equal weight; absent MS2 components are left out of the aggregate
// instead of contributing zero.
pub const WEIGHT_MASS: f64 = 1.0;
pub const WEIGHT_ISOTOPE: f64 = 1.0;
pub const WEIGHT_PRODUCT_ION: f64 = 1.0;
pub const WEIGHT_NEUTRAL_LOSS: f64 = 1.0;

/// Isotope score reported when isotope checking is disabled or no
/// observed pattern was supplied.
pub const NEUTRAL_ISOTOPE_SCORE: f64 = 0.5;

/// Scores fully-enumerated candidate formulas against the query
/// evidence. Built once per search and shared read-only by all workers.
pub struct CandidateScorer<'a> {
    target_mass: f64,
    tolerance: f64,
    isotope_enabled: bool,
    isotope_tolerance: f64,
    existence_tolerance: f64,
    ms2_tolerance: MassTolerance,
    observed_isotopes: Option<IsotopeObservation>,
    ms2: Option<&'a Ms2Data>,
    product_ions: &'a [ProductIonReference],
    neutral_losses: &'a [NeutralLossReference],
    existence: &'a ExistenceDatabase,
}

impl<'a> CandidateScorer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &SearchConfiguration,
        target_mass: f64,
        tolerance: f64,
        observed_isotopes: Option<IsotopeObservation>,
        ms2: Option<&'a Ms2Data>,
        product_ions: &'a [ProductIonReference],
        neutral_losses: &'a [NeutralLossReference],
        existence: &'a ExistenceDatabase,
    ) -> Self {
        CandidateScorer {
            target_mass,
            tolerance,
            isotope_enabled: config.isotope_enabled,
            isotope_tolerance: config.isotope_tolerance,
            existence_tolerance: config.existence_tolerance,
            ms2_tolerance: config.ms2_tolerance,
            observed_isotopes,
            ms2,
            product_ions,
            neutral_losses,
            existence,
        }
    }

    /// Score one candidate. `formula` is the enumerated composition,
    /// `converted` the underivatized one; they are the same value
    /// outside derivative mode.
    pub fn score(&self, formula: Formula, converted: Formula) -> FormulaCandidate {
        let mass = formula.monoisotopic_mass();
        let mass_error = mass - self.target_mass;
        let mass_accuracy_score = self.mass_accuracy_score(mass_error);
        let isotope_score = self.isotope_score(&converted);

        let mut weight_sum = WEIGHT_MASS + WEIGHT_ISOTOPE;
        let mut score_sum = WEIGHT_MASS * mass_accuracy_score + WEIGHT_ISOTOPE * isotope_score;

        let mut product_ion_score = 0.0;
        let mut neutral_loss_score = 0.0;
        let mut fragment_matches = Vec::new();

        if let Some(ms2) = self.ms2 {
            let (ion_score, mut ion_matches) = self.fragment_agreement(
                &ms2.peaks,
                &converted,
                FragmentKind::ProductIon,
            );
            let (loss_score, mut loss_matches) = self.fragment_agreement(
                &ms2.losses,
                &converted,
                FragmentKind::NeutralLoss,
            );
            product_ion_score = ion_score;
            neutral_loss_score = loss_score;
            fragment_matches.append(&mut ion_matches);
            fragment_matches.append(&mut loss_matches);

            score_sum += WEIGHT_PRODUCT_ION * product_ion_score + WEIGHT_NEUTRAL_LOSS * neutral_loss_score;
            weight_sum += WEIGHT_PRODUCT_ION + WEIGHT_NEUTRAL_LOSS;
        }

        let total_score = score_sum / weight_sum;

        let mut candidate = FormulaCandidate {
            formula,
            converted_formula: converted,
            formula_string: formula.formula_string(),
            mass,
            mass_error,
            mass_accuracy_score,
            isotope_score,
            product_ion_score,
            neutral_loss_score,
            total_score,
            resource_names: Vec::new(),
            resource_records: 0,
            database_ids: Vec::new(),
            fragment_matches,
            is_selected: false,
        };

        if let Some(record) = self.existence.lookup(&converted, self.existence_tolerance) {
            candidate.resource_names = record.resource_names.clone();
            candidate.resource_records = record.resource_records;
            candidate.database_ids = record.database_ids.clone();
        }

        candidate
    }

    /// Gaussian-shaped agreement between candidate and target mass,
    /// one at zero error and decaying to ~0.14 at the tolerance edge.
    fn mass_accuracy_score(&self, mass_error: f64) -> f64 {
        let sigma = self.tolerance / 2.0;
        let normal = Normal::new(0.0, sigma).unwrap();
        normal.pdf(mass_error) / normal.pdf(0.0)
    }

    fn isotope_score(&self, converted: &Formula) -> f64 {
        let observed = match (self.isotope_enabled, self.observed_isotopes) {
            (true, Some(observed)) => observed,
            _ => return NEUTRAL_ISOTOPE_SCORE,
        };

        let (theoretical_m1, theoretical_m2) = theoretical_isotope_ratios(&converted.atomic_composition());
        let m1_agreement = 1.0 - (observed.m_plus_one - theoretical_m1).abs() / self.isotope_tolerance;
        let m2_agreement = 1.0 - (observed.m_plus_two - theoretical_m2).abs() / self.isotope_tolerance;
        (0.5 * m1_agreement.clamp(0.0, 1.0)) + (0.5 * m2_agreement.clamp(0.0, 1.0))
    }

    /// Matched-peak fraction and matched-intensity fraction against the
    /// reference ontology records whose composition fits inside the
    /// candidate's elemental budget.
    fn fragment_agreement(&self, peaks: &PeakList, budget: &Formula, kind: FragmentKind) -> (f64, Vec<FragmentMatch>) {
        if peaks.is_empty() {
            return (0.0, Vec::new());
        }

        let mut matches = Vec::new();
        let mut matched_count = 0usize;
        let mut matched_intensity = 0.0;

        for (mz, intensity) in izip!(peaks.mz.iter(), peaks.intensity.iter()) {
            let hit = match kind {
                FragmentKind::ProductIon => {
                    mass_window(self.product_ions, |r| r.mass, *mz, self.ms2_tolerance)
                        .iter()
                        .filter(|r| r.formula.fits_within(budget))
                        .min_by(|a, b| (a.mass - mz).abs().partial_cmp(&(b.mass - mz).abs()).unwrap())
                        .map(|r| (r.mass, r.formula, r.ontology.clone()))
                }
                FragmentKind::NeutralLoss => {
                    mass_window(self.neutral_losses, |r| r.mass, *mz, self.ms2_tolerance)
                        .iter()
                        .filter(|r| r.formula.fits_within(budget))
                        .min_by(|a, b| (a.mass - mz).abs().partial_cmp(&(b.mass - mz).abs()).unwrap())
                        .map(|r| (r.mass, r.formula, r.ontology.clone()))
                }
            };

            if let Some((reference_mass, reference_formula, ontology)) = hit {
                matched_count += 1;
                matched_intensity += intensity;
                matches.push(FragmentMatch {
                    kind,
                    observed_mz: *mz,
                    intensity: *intensity,
                    reference_mass,
                    reference_formula: reference_formula.formula_string(),
                    ontology,
                });
            }
        }

        let count_fraction = matched_count as f64 / peaks.len() as f64;
        let intensity_fraction = matched_intensity / peaks.total_intensity().max(f64::MIN_POSITIVE);
        (0.5 * (count_fraction + intensity_fraction), matches)
    }
}

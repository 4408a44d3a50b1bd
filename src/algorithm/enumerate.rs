use crate::algorithm::bounds::SearchBounds;
use crate::algorithm::scoring::CandidateScorer;
use crate::algorithm::search::SearchDeadline;
use crate::algorithm::validity::is_chemically_valid;
use crate::chemistry::adduct::AdductIon;
use crate::chemistry::constants::MASS_C;
use crate::chemistry::elements::ENUMERATION_ORDER;
use crate::chemistry::formula::Formula;
use crate::data::collector::BoundedRankedCollector;
use crate::data::configuration::{CoverageProfile, DerivativeSetting};

/// Depth-first enumeration of every element combination for one fixed
/// carbon count whose mass lands in the query window.
///
/// Levels follow [`ENUMERATION_ORDER`], heaviest element first, and each
/// level carries the running cumulative mass. Two bound tests prune the
/// tree: a branch whose best case (running mass plus every lighter
/// element at its maximum) stays below the window is skipped but the
/// loop continues, while a running mass above the window ends the loop,
/// since mass only grows with the count.
pub struct FormulaEnumerator<'a> {
    bounds: &'a SearchBounds,
    window_lo: f64,
    window_hi: f64,
    adduct: &'a AdductIon,
    profile: CoverageProfile,
    derivative: Option<DerivativeSetting>,
    scorer: &'a CandidateScorer<'a>,
    deadline: &'a SearchDeadline,
}

impl<'a> FormulaEnumerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bounds: &'a SearchBounds,
        target_mass: f64,
        tolerance: f64,
        adduct: &'a AdductIon,
        profile: CoverageProfile,
        derivative: Option<DerivativeSetting>,
        scorer: &'a CandidateScorer<'a>,
        deadline: &'a SearchDeadline,
    ) -> Self {
        FormulaEnumerator {
            bounds,
            window_lo: target_mass - tolerance,
            window_hi: target_mass + tolerance,
            adduct,
            profile,
            derivative,
            scorer,
            deadline,
        }
    }

    /// Enumerate into `collector`. Returns `false` when the deadline
    /// expired mid-way; everything collected so far remains valid.
    pub fn run(&self, collector: &mut BoundedRankedCollector) -> bool {
        let mut counts = [0i32; 10];
        let carbon_mass = self.bounds.carbon as f64 * MASS_C;
        self.descend(0, carbon_mass, &mut counts, collector)
    }

    fn descend(&self, level: usize, running: f64, counts: &mut [i32; 10], collector: &mut BoundedRankedCollector) -> bool {
        if level == ENUMERATION_ORDER.len() {
            return self.emit(counts, running, collector);
        }

        let (min_count, max_count) = self.bounds.count_ranges[level];
        let element_mass = ENUMERATION_ORDER[level].monoisotopic_mass();

        for count in min_count..=max_count {
            let with_element = running + count as f64 * element_mass;
            if with_element > self.window_hi {
                break;
            }
            if with_element + self.bounds.lighter_max_mass[level] < self.window_lo {
                continue;
            }
            counts[level] = count;
            if !self.descend(level + 1, with_element, counts, collector) {
                counts[level] = 0;
                return false;
            }
        }

        counts[level] = 0;
        true
    }

    fn emit(&self, counts: &[i32; 10], mass: f64, collector: &mut BoundedRankedCollector) -> bool {
        // cost guard: one wall-clock check per fully-formed combination
        if self.deadline.expired() {
            return false;
        }
        debug_assert!(mass >= self.window_lo && mass <= self.window_hi);

        let formula = Formula::from_counts(self.bounds.carbon, counts);
        match self.derivative {
            None => {
                if is_chemically_valid(&formula, self.adduct, self.profile) {
                    collector.offer(self.scorer.score(formula, formula));
                }
            }
            Some(setting) => {
                // every silicon is assumed to enter through a TMS group
                let tms = formula.si;
                if tms < setting.min_tms {
                    return true;
                }
                for meox in setting.min_meox..=formula.n {
                    let reported = formula.with_derivatives(tms, meox);
                    if let Some(converted) = reported.converted() {
                        if is_chemically_valid(&converted, self.adduct, self.profile) {
                            collector.offer(self.scorer.score(reported, converted));
                        }
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::configuration::SearchConfiguration;
    use crate::data::existence::ExistenceDatabase;

    fn run_for_carbon(config: &SearchConfiguration, target_mass: f64, carbon: i32) -> Vec<String> {
        let adduct = AdductIon::protonated();
        let tolerance = config.tolerance.absolute(target_mass);
        let existence = ExistenceDatabase::new();
        let scorer = CandidateScorer::new(config, target_mass, tolerance, None, None, &[], &[], &existence);
        let deadline = SearchDeadline::new(config.timeout);
        let bounds = SearchBounds::new(config, &adduct, carbon);
        let enumerator = FormulaEnumerator::new(
            &bounds,
            target_mass,
            tolerance,
            &adduct,
            config.profile,
            config.derivative,
            &scorer,
            &deadline,
        );
        let mut collector = BoundedRankedCollector::new(config.max_report_count);
        assert!(enumerator.run(&mut collector));
        collector.drain(0).into_iter().map(|c| c.formula_string).collect()
    }

    #[test]
    fn test_finds_glucose_at_its_own_mass() {
        let config = SearchConfiguration::default();
        let glucose = Formula::new(6, 12, 0, 6, 0, 0, 0, 0, 0, 0, 0);
        let found = run_for_carbon(&config, glucose.monoisotopic_mass(), 6);
        assert!(found.contains(&"C6H12O6".to_string()));
    }

    #[test]
    fn test_no_leaf_outside_window() {
        let config = SearchConfiguration::default();
        let target = 120.0;
        let tolerance = config.tolerance.absolute(target);
        for carbon in 1..=10 {
            let adduct = AdductIon::protonated();
            let existence = ExistenceDatabase::new();
            let scorer = CandidateScorer::new(&config, target, tolerance, None, None, &[], &[], &existence);
            let deadline = SearchDeadline::new(config.timeout);
            let bounds = SearchBounds::new(&config, &adduct, carbon);
            let enumerator =
                FormulaEnumerator::new(&bounds, target, tolerance, &adduct, config.profile, None, &scorer, &deadline);
            let mut collector = BoundedRankedCollector::new(1000);
            enumerator.run(&mut collector);
            for candidate in collector.drain(0) {
                assert!((candidate.mass - target).abs() <= tolerance + 1e-9);
                assert_eq!(candidate.formula.c, carbon);
            }
        }
    }

    #[test]
    fn test_derivative_mode_reports_raw_and_converted() {
        let mut config = SearchConfiguration::default();
        config.elements.si = true;
        config.derivative = Some(DerivativeSetting { min_tms: 1, min_meox: 0 });

        // alanine carrying two TMS groups
        let derivatized = Formula::new(9, 23, 1, 2, 0, 0, 0, 0, 0, 0, 2);
        let target = derivatized.monoisotopic_mass();

        let adduct = AdductIon::protonated();
        let tolerance = config.tolerance.absolute(target);
        let existence = ExistenceDatabase::new();
        let scorer = CandidateScorer::new(&config, target, tolerance, None, None, &[], &[], &existence);
        let deadline = SearchDeadline::new(config.timeout);
        let bounds = SearchBounds::new(&config, &adduct, 9);
        let enumerator =
            FormulaEnumerator::new(&bounds, target, tolerance, &adduct, config.profile, config.derivative, &scorer, &deadline);
        let mut collector = BoundedRankedCollector::new(100);
        assert!(enumerator.run(&mut collector));

        let candidates = collector.drain(0);
        let hit = candidates
            .iter()
            .find(|c| c.formula_string == "C9H23NO2Si2·2TMS")
            .expect("derivatized alanine not found");
        assert_eq!(hit.formula.tms, 2);
        assert_eq!(hit.converted_formula, Formula::new(3, 7, 1, 2, 0, 0, 0, 0, 0, 0, 0));
        // raw counts stay untouched on the reported formula
        assert_eq!(hit.formula.si, 2);
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chemistry::adduct::AdductIon;
use crate::chemistry::elements::Element;

/// Mass tolerance, absolute or relative. Relative tolerances are
/// resolved to an absolute window at the query mass before the search
/// starts.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MassTolerance {
    Da(f64),
    Ppm(f64),
}

impl MassTolerance {
    pub fn absolute(&self, at_mass: f64) -> f64 {
        match self {
            MassTolerance::Da(tolerance) => *tolerance,
            MassTolerance::Ppm(ppm) => at_mass * ppm / 1e6,
        }
    }
}

/// Named element-ratio coverage presets bounding how many atoms of each
/// element a candidate may carry per carbon.
///
/// Narrow covers the ratio ranges of common natural products, extended
/// relaxes them for exotic compounds, wide is close to unconstrained.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CoverageProfile {
    Narrow,
    Extended,
    Wide,
}

impl CoverageProfile {
    /// Maximum atom count per carbon for each element. Hydrogen is
    /// bounded separately through `SearchConfiguration::hydrogen_fold_max`.
    pub fn fold(&self, element: Element) -> f64 {
        match self {
            CoverageProfile::Narrow => match element {
                Element::N => 1.3,
                Element::O => 1.2,
                Element::P => 0.3,
                Element::S => 0.8,
                Element::F => 1.5,
                Element::Cl => 0.8,
                Element::Br => 0.8,
                Element::I => 0.5,
                Element::Si => 0.5,
                Element::C | Element::H => 1.0,
            },
            CoverageProfile::Extended => match element {
                Element::N => 4.0,
                Element::O => 3.0,
                Element::P => 2.0,
                Element::S => 3.0,
                Element::F => 6.0,
                Element::Cl => 2.0,
                Element::Br => 2.0,
                Element::I => 1.0,
                Element::Si => 1.0,
                Element::C | Element::H => 1.0,
            },
            CoverageProfile::Wide => match element {
                Element::N => 6.0,
                Element::O => 6.0,
                Element::P => 4.0,
                Element::S => 6.0,
                Element::F => 8.0,
                Element::Cl => 4.0,
                Element::Br => 4.0,
                Element::I => 2.0,
                Element::Si => 2.0,
                Element::C | Element::H => 1.0,
            },
        }
    }
}

/// Which heteroatoms the search may assign. Carbon and hydrogen are
/// always part of the search space.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ElementSelection {
    pub n: bool,
    pub o: bool,
    pub p: bool,
    pub s: bool,
    pub f: bool,
    pub cl: bool,
    pub br: bool,
    pub i: bool,
    pub si: bool,
}

impl ElementSelection {
    pub fn is_enabled(&self, element: Element) -> bool {
        match element {
            Element::C | Element::H => true,
            Element::N => self.n,
            Element::O => self.o,
            Element::P => self.p,
            Element::S => self.s,
            Element::F => self.f,
            Element::Cl => self.cl,
            Element::Br => self.br,
            Element::I => self.i,
            Element::Si => self.si,
        }
    }

    /// C, H, N, O, P and S only.
    pub fn chnops() -> Self {
        ElementSelection {
            n: true,
            o: true,
            p: true,
            s: true,
            f: false,
            cl: false,
            br: false,
            i: false,
            si: false,
        }
    }

    pub fn all() -> Self {
        ElementSelection {
            n: true,
            o: true,
            p: true,
            s: true,
            f: true,
            cl: true,
            br: true,
            i: true,
            si: true,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.n || self.o || self.p || self.s || self.f || self.cl || self.br || self.i || self.si
    }
}

impl Default for ElementSelection {
    fn default() -> Self {
        ElementSelection::chnops()
    }
}

/// Exact atom count required for one element, from an isotope-labeling
/// experiment. The count refers to a single molecule; multimer adducts
/// scale it through `AdductIon::xmer_scaled`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LabelingConstraint {
    pub element: Element,
    pub count: i32,
}

impl LabelingConstraint {
    pub fn new(element: Element, count: i32) -> Self {
        LabelingConstraint { element, count }
    }

    pub fn scaled_for(&self, adduct: &AdductIon) -> i32 {
        adduct.xmer_scaled(self.count)
    }
}

/// Derivatized-workflow settings: minimum trimethylsilyl and methoxime
/// substituent counts expected on every candidate.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct DerivativeSetting {
    pub min_tms: i32,
    pub min_meox: i32,
}

impl Default for DerivativeSetting {
    fn default() -> Self {
        DerivativeSetting { min_tms: 1, min_meox: 0 }
    }
}

/// Per-search parameters. Built once per request, immutable while the
/// search runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfiguration {
    pub elements: ElementSelection,
    pub profile: CoverageProfile,
    /// Upper bound on hydrogen per carbon.
    pub hydrogen_fold_max: f64,
    /// Lower bound on hydrogen per carbon.
    pub hydrogen_fold_min: f64,
    /// MS1 tolerance around the target mass.
    pub tolerance: MassTolerance,
    /// Tolerance for matching MS2 fragments and neutral losses.
    pub ms2_tolerance: MassTolerance,
    /// Mass window for existence-database annotation.
    pub existence_tolerance: f64,
    pub isotope_enabled: bool,
    /// Allowed deviation of M+1 and M+2 relative abundances.
    pub isotope_tolerance: f64,
    /// Maximum number of candidates kept and reported.
    pub max_report_count: usize,
    /// How many of the top candidates are flagged selected.
    pub selected_count: usize,
    pub timeout: Duration,
    pub labeling: Vec<LabelingConstraint>,
    pub derivative: Option<DerivativeSetting>,
    /// Worker threads for the carbon fan-out, 0 for automatic.
    pub num_threads: usize,
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        SearchConfiguration {
            elements: ElementSelection::default(),
            profile: CoverageProfile::Extended,
            hydrogen_fold_max: 4.0,
            hydrogen_fold_min: 0.0,
            tolerance: MassTolerance::Da(0.005),
            ms2_tolerance: MassTolerance::Da(0.01),
            existence_tolerance: 0.005,
            isotope_enabled: true,
            isotope_tolerance: 0.02,
            max_report_count: 100,
            selected_count: 5,
            timeout: Duration::from_secs(60),
            labeling: Vec::new(),
            derivative: None,
            num_threads: 0,
        }
    }
}

impl SearchConfiguration {
    pub fn narrow() -> Self {
        SearchConfiguration {
            profile: CoverageProfile::Narrow,
            hydrogen_fold_max: 3.1,
            ..SearchConfiguration::default()
        }
    }

    pub fn extended() -> Self {
        SearchConfiguration::default()
    }

    pub fn wide() -> Self {
        SearchConfiguration {
            elements: ElementSelection::all(),
            profile: CoverageProfile::Wide,
            hydrogen_fold_max: 6.0,
            ..SearchConfiguration::default()
        }
    }

    /// Maximum fold ratio for one element under this configuration.
    pub fn max_fold(&self, element: Element) -> f64 {
        match element {
            Element::H => self.hydrogen_fold_max,
            _ => self.profile.fold(element),
        }
    }

    /// Fail-fast sanity checks, meant to run in the configuration layer
    /// before a search is launched. The hot loop never re-validates.
    pub fn validate(&self) -> Result<(), String> {
        match self.tolerance {
            MassTolerance::Da(t) if t <= 0.0 => return Err("mass tolerance must be positive".to_string()),
            MassTolerance::Ppm(t) if t <= 0.0 => return Err("mass tolerance must be positive".to_string()),
            _ => {}
        }
        if self.max_report_count == 0 {
            return Err("maximum report count must be positive".to_string());
        }
        if self.selected_count > self.max_report_count {
            return Err("selected count cannot exceed the report count".to_string());
        }
        if self.hydrogen_fold_max <= 0.0 && !self.elements.any_enabled() {
            return Err("all elements are disabled".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_resolution() {
        let tolerance = MassTolerance::Ppm(10.0);
        assert!((tolerance.absolute(500.0) - 0.005).abs() < 1e-12);
        assert_eq!(MassTolerance::Da(0.01).absolute(500.0), 0.01);
    }

    #[test]
    fn test_profiles_are_nested() {
        for element in [Element::N, Element::O, Element::P, Element::S, Element::Cl] {
            let narrow = CoverageProfile::Narrow.fold(element);
            let extended = CoverageProfile::Extended.fold(element);
            let wide = CoverageProfile::Wide.fold(element);
            assert!(narrow <= extended && extended <= wide);
        }
    }

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(SearchConfiguration::default().validate().is_ok());
        assert!(SearchConfiguration::narrow().validate().is_ok());
        assert!(SearchConfiguration::wide().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = SearchConfiguration::default();
        config.tolerance = MassTolerance::Da(0.0);
        assert!(config.validate().is_err());

        let mut config = SearchConfiguration::default();
        config.max_report_count = 0;
        assert!(config.validate().is_err());

        let mut config = SearchConfiguration::default();
        config.selected_count = config.max_report_count + 1;
        assert!(config.validate().is_err());
    }
}

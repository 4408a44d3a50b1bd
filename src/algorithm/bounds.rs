use crate::chemistry::adduct::AdductIon;
use crate::chemistry::elements::{Element, ENUMERATION_ORDER};
use crate::data::configuration::SearchConfiguration;

/// Per-carbon-count search bounds for the inner element enumeration.
///
/// For every enumeration level this precomputes the allowed count range
/// and the maximum mass still obtainable from all lighter levels, which
/// the enumerator uses as its branch-pruning upper bound.
#[derive(Clone, Debug)]
pub struct SearchBounds {
    pub carbon: i32,
    /// Inclusive count range per enumeration level. Labeling constraints
    /// collapse a range to a single required value.
    pub count_ranges: [(i32, i32); 10],
    /// Maximum mass contribution of every level after this one.
    pub lighter_max_mass: [f64; 10],
}

impl SearchBounds {
    /// Derive the bounds for one trial carbon count.
    ///
    /// Arguments:
    ///
    /// * `config` - immutable search configuration
    /// * `adduct` - ion species, scales labeling constraints to the multimer
    /// * `carbon` - trial carbon count of the outer search dimension
    pub fn new(config: &SearchConfiguration, adduct: &AdductIon, carbon: i32) -> Self {
        let mut count_ranges = [(0, 0); 10];

        for (level, element) in ENUMERATION_ORDER.iter().enumerate() {
            let max = if config.elements.is_enabled(*element) {
                (carbon as f64 * config.max_fold(*element)).ceil() as i32
            } else {
                0
            };
            let min = if *element == Element::H {
                (carbon as f64 * config.hydrogen_fold_min).floor() as i32
            } else {
                0
            };
            count_ranges[level] = (min.min(max), max);
        }

        // exact labeling counts override the fold-derived range
        for constraint in &config.labeling {
            if let Some(level) = ENUMERATION_ORDER.iter().position(|e| *e == constraint.element) {
                let required = constraint.scaled_for(adduct);
                count_ranges[level] = (required, required);
            }
        }

        let mut lighter_max_mass = [0.0; 10];
        let mut cumulative = 0.0;
        for level in (0..ENUMERATION_ORDER.len()).rev() {
            lighter_max_mass[level] = cumulative;
            cumulative += count_ranges[level].1 as f64 * ENUMERATION_ORDER[level].monoisotopic_mass();
        }

        SearchBounds {
            carbon,
            count_ranges,
            lighter_max_mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::elements::Element;
    use crate::data::configuration::LabelingConstraint;

    fn level_of(element: Element) -> usize {
        ENUMERATION_ORDER.iter().position(|e| *e == element).unwrap()
    }

    #[test]
    fn test_disabled_elements_have_zero_range() {
        let mut config = SearchConfiguration::default();
        config.elements.p = false;
        config.elements.s = false;
        let bounds = SearchBounds::new(&config, &AdductIon::protonated(), 10);
        assert_eq!(bounds.count_ranges[level_of(Element::P)], (0, 0));
        assert_eq!(bounds.count_ranges[level_of(Element::S)], (0, 0));
        assert!(bounds.count_ranges[level_of(Element::O)].1 > 0);
    }

    #[test]
    fn test_fold_scaling_uses_ceiling() {
        let config = SearchConfiguration::default();
        let bounds = SearchBounds::new(&config, &AdductIon::protonated(), 7);
        // extended profile allows 3 oxygen per carbon
        assert_eq!(bounds.count_ranges[level_of(Element::O)].1, 21);
        assert_eq!(bounds.count_ranges[level_of(Element::H)].1, 28);
    }

    #[test]
    fn test_labeling_constraint_fixes_count() {
        let mut config = SearchConfiguration::default();
        config.labeling.push(LabelingConstraint::new(Element::N, 2));
        let mut adduct = AdductIon::protonated();
        adduct.mer = 2;
        let bounds = SearchBounds::new(&config, &adduct, 10);
        assert_eq!(bounds.count_ranges[level_of(Element::N)], (4, 4));
    }

    #[test]
    fn test_lighter_max_mass_decreases_towards_hydrogen() {
        let config = SearchConfiguration::default();
        let bounds = SearchBounds::new(&config, &AdductIon::protonated(), 10);
        for level in 0..9 {
            assert!(bounds.lighter_max_mass[level] >= bounds.lighter_max_mass[level + 1]);
        }
        assert_eq!(bounds.lighter_max_mass[9], 0.0);
    }
}

use crate::chemistry::adduct::AdductIon;
use crate::chemistry::elements::{Element, ENUMERATION_ORDER};
use crate::chemistry::formula::Formula;
use crate::data::configuration::CoverageProfile;

/// Chemical plausibility checks applied to every enumerated composition
/// before scoring: valence bookkeeping plus element-ratio heuristics for
/// natural organic compounds. Deterministic, side-effect free, cheap
/// relative to the enumeration itself.
pub fn is_chemically_valid(formula: &Formula, adduct: &AdductIon, profile: CoverageProfile) -> bool {
    if formula.c <= 0 || formula.atom_count() <= 0 {
        return false;
    }
    valence_ok(formula, adduct) && element_ratios_ok(formula, profile) && heteroatoms_plausible(formula)
}

/// Ring-plus-double-bond equivalents from the standard bonding valences.
pub fn ring_double_bond_equivalents(formula: &Formula) -> f64 {
    let mut sum = formula.c * (Element::C.valence() - 2);
    for element in ENUMERATION_ORDER {
        sum += formula.count(element) * (element.valence() - 2);
    }
    1.0 + sum as f64 / 2.0
}

fn valence_ok(formula: &Formula, adduct: &AdductIon) -> bool {
    let rdbe = ring_double_bond_equivalents(formula);
    if rdbe < 0.0 {
        return false;
    }

    // even-electron species must leave an integer ring/double-bond count
    if adduct.even_electron {
        let doubled = (rdbe * 2.0).round() as i64;
        if doubled % 2 != 0 {
            return false;
        }
    }

    // Senior: the valence sum must allow a connected graph
    let valence_sum: i32 = formula.c * Element::C.valence()
        + ENUMERATION_ORDER
            .iter()
            .map(|e| formula.count(*e) * e.valence())
            .sum::<i32>();
    valence_sum >= 2 * (formula.atom_count() - 1)
}

struct RatioLimits {
    h_min: f64,
    h_max: f64,
    n: f64,
    o: f64,
    p: f64,
    s: f64,
    f: f64,
    cl: f64,
    br: f64,
    i: f64,
    si: f64,
}

/// Heteroatom-to-carbon ratio ranges per coverage profile. The narrow
/// ranges cover the overwhelming majority of known natural products,
/// the wider presets trade precision for exotic chemistry.
fn ratio_limits(profile: CoverageProfile) -> RatioLimits {
    match profile {
        CoverageProfile::Narrow => RatioLimits {
            h_min: 0.2,
            h_max: 3.1,
            n: 1.3,
            o: 1.2,
            p: 0.3,
            s: 0.8,
            f: 1.5,
            cl: 0.8,
            br: 0.8,
            i: 0.5,
            si: 0.5,
        },
        CoverageProfile::Extended => RatioLimits {
            h_min: 0.1,
            h_max: 6.0,
            n: 4.0,
            o: 3.0,
            p: 2.0,
            s: 3.0,
            f: 6.0,
            cl: 2.0,
            br: 2.0,
            i: 1.0,
            si: 1.0,
        },
        CoverageProfile::Wide => RatioLimits {
            h_min: 0.0,
            h_max: 9.0,
            n: 6.0,
            o: 6.0,
            p: 4.0,
            s: 6.0,
            f: 8.0,
            cl: 4.0,
            br: 4.0,
            i: 2.0,
            si: 2.0,
        },
    }
}

fn element_ratios_ok(formula: &Formula, profile: CoverageProfile) -> bool {
    let limits = ratio_limits(profile);
    let carbon = formula.c as f64;
    let ratio = |count: i32| count as f64 / carbon;

    let h_ratio = ratio(formula.h);
    if formula.h > 0 && (h_ratio < limits.h_min || h_ratio > limits.h_max) {
        return false;
    }
    ratio(formula.n) <= limits.n
        && ratio(formula.o) <= limits.o
        && ratio(formula.p) <= limits.p
        && ratio(formula.s) <= limits.s
        && ratio(formula.f) <= limits.f
        && ratio(formula.cl) <= limits.cl
        && ratio(formula.br) <= limits.br
        && ratio(formula.i) <= limits.i
        && ratio(formula.si) <= limits.si
}

/// Probabilistic multi-heteroatom check: compositions that are
/// simultaneously rich in N, O, P and S are vanishingly rare in nature
/// and get rejected outright.
fn heteroatoms_plausible(formula: &Formula) -> bool {
    let (n, o, p, s) = (formula.n, formula.o, formula.p, formula.s);

    if n > 1 && o > 1 && p > 1 && s > 1 && !(n < 10 && o < 20 && p < 4 && s < 3) {
        return false;
    }
    if n > 3 && o > 3 && p > 3 && !(n < 11 && o < 22 && p < 6) {
        return false;
    }
    if o > 1 && p > 1 && s > 1 && !(o < 14 && p < 3 && s < 3) {
        return false;
    }
    if n > 1 && p > 1 && s > 1 && !(n < 4 && p < 3 && s < 3) {
        return false;
    }
    if n > 6 && o > 6 && s > 6 && !(n < 19 && o < 14 && s < 8) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_electron() -> AdductIon {
        AdductIon::protonated()
    }

    #[test]
    fn test_rdbe_of_known_molecules() {
        let benzene = Formula::new(6, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert_eq!(ring_double_bond_equivalents(&benzene), 4.0);
        let methane = Formula::new(1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert_eq!(ring_double_bond_equivalents(&methane), 0.0);
    }

    #[test]
    fn test_valence_parity_rejects_radicals() {
        // the methyl radical has a half-integer ring/double-bond count
        let radical = Formula::new(1, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert!(!is_chemically_valid(&radical, &even_electron(), CoverageProfile::Wide));

        let methane = Formula::new(1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert!(is_chemically_valid(&methane, &even_electron(), CoverageProfile::Wide));
    }

    #[test]
    fn test_negative_rdbe_rejected() {
        let impossible = Formula::new(1, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert!(!is_chemically_valid(&impossible, &even_electron(), CoverageProfile::Wide));
    }

    #[test]
    fn test_ratio_limits_scale_with_profile() {
        // H/C of 4.0 is beyond the narrow ceiling but fine extended
        let methane = Formula::new(1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert!(!element_ratios_ok(&methane, CoverageProfile::Narrow));
        assert!(element_ratios_ok(&methane, CoverageProfile::Extended));
    }

    #[test]
    fn test_common_metabolites_pass_narrow() {
        let glucose = Formula::new(6, 12, 0, 6, 0, 0, 0, 0, 0, 0, 0);
        assert!(is_chemically_valid(&glucose, &even_electron(), CoverageProfile::Narrow));
        let caffeine = Formula::new(8, 10, 4, 2, 0, 0, 0, 0, 0, 0, 0);
        assert!(is_chemically_valid(&caffeine, &even_electron(), CoverageProfile::Narrow));
    }

    #[test]
    fn test_nops_rich_compositions_rejected() {
        let implausible = Formula::new(12, 24, 10, 21, 4, 3, 0, 0, 0, 0, 0);
        assert!(!heteroatoms_plausible(&implausible));
        let glutathione = Formula::new(10, 17, 3, 6, 0, 1, 0, 0, 0, 0, 0);
        assert!(heteroatoms_plausible(&glutathione));
    }
}

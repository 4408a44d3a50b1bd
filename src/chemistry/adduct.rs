use serde::{Deserialize, Serialize};

use crate::chemistry::constants::MASS_PROTON;

/// The ion species a neutral-mass query was derived from.
///
/// The search itself runs on the neutral monoisotopic mass; the adduct is
/// consulted for multimer stoichiometry (labeling constraints) and for the
/// electron parity expected by the validity checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdductIon {
    pub name: String,
    /// Multimer count, 1 for [M+H]+, 2 for [2M+H]+.
    pub mer: i32,
    pub charge: i32,
    pub mass_shift: f64,
    /// True when the ionized species keeps an even electron count.
    pub even_electron: bool,
}

impl AdductIon {
    pub fn protonated() -> Self {
        AdductIon {
            name: "[M+H]+".to_string(),
            mer: 1,
            charge: 1,
            mass_shift: MASS_PROTON,
            even_electron: true,
        }
    }

    pub fn deprotonated() -> Self {
        AdductIon {
            name: "[M-H]-".to_string(),
            mer: 1,
            charge: -1,
            mass_shift: -MASS_PROTON,
            even_electron: true,
        }
    }

    /// Molecular radical ion as produced by electron ionization.
    pub fn molecular_radical() -> Self {
        AdductIon {
            name: "[M]+.".to_string(),
            mer: 1,
            charge: 1,
            mass_shift: 0.0,
            even_electron: false,
        }
    }

    /// Scale a per-molecule atom count to the multimer observed by the
    /// instrument, e.g. a 15N2 label on a [2M+H]+ ion fixes four nitrogen.
    pub fn xmer_scaled(&self, count: i32) -> i32 {
        count * self.mer
    }

    /// m/z of this adduct for a given neutral monoisotopic mass.
    pub fn ion_mz(&self, neutral_mass: f64) -> f64 {
        let charge = self.charge.unsigned_abs().max(1) as f64;
        (self.mer as f64 * neutral_mass + self.mass_shift) / charge
    }
}

impl Default for AdductIon {
    fn default() -> Self {
        AdductIon::protonated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protonated_mz() {
        let adduct = AdductIon::protonated();
        assert!((adduct.ion_mz(180.0633881) - 181.0706646).abs() < 1e-5);
    }

    #[test]
    fn test_xmer_scaling() {
        let mut adduct = AdductIon::protonated();
        adduct.mer = 2;
        assert_eq!(adduct.xmer_scaled(2), 4);
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chemistry::constants::{
    MASS_BR, MASS_C, MASS_CL, MASS_F, MASS_H, MASS_I, MASS_N, MASS_O, MASS_P, MASS_S, MASS_SI,
};

/// The elements considered by the formula search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Element {
    C,
    H,
    N,
    O,
    P,
    S,
    F,
    Cl,
    Br,
    I,
    Si,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::C => "C",
            Element::H => "H",
            Element::N => "N",
            Element::O => "O",
            Element::P => "P",
            Element::S => "S",
            Element::F => "F",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
            Element::Si => "Si",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Element> {
        match symbol {
            "C" => Some(Element::C),
            "H" => Some(Element::H),
            "N" => Some(Element::N),
            "O" => Some(Element::O),
            "P" => Some(Element::P),
            "S" => Some(Element::S),
            "F" => Some(Element::F),
            "Cl" => Some(Element::Cl),
            "Br" => Some(Element::Br),
            "I" => Some(Element::I),
            "Si" => Some(Element::Si),
            _ => None,
        }
    }

    pub fn monoisotopic_mass(&self) -> f64 {
        match self {
            Element::C => MASS_C,
            Element::H => MASS_H,
            Element::N => MASS_N,
            Element::O => MASS_O,
            Element::P => MASS_P,
            Element::S => MASS_S,
            Element::F => MASS_F,
            Element::Cl => MASS_CL,
            Element::Br => MASS_BR,
            Element::I => MASS_I,
            Element::Si => MASS_SI,
        }
    }

    /// Standard bonding valence, used by the chemical validity checks.
    pub fn valence(&self) -> i32 {
        match self {
            Element::C => 4,
            Element::H => 1,
            Element::N => 3,
            Element::O => 2,
            Element::P => 3,
            Element::S => 2,
            Element::F => 1,
            Element::Cl => 1,
            Element::Br => 1,
            Element::I => 1,
            Element::Si => 4,
        }
    }
}

/// Inner enumeration order of the formula search, heaviest to lightest.
/// Carbon spans the outer search dimension and is not part of this order.
pub const ENUMERATION_ORDER: [Element; 10] = [
    Element::I,
    Element::Br,
    Element::Cl,
    Element::S,
    Element::P,
    Element::Si,
    Element::F,
    Element::O,
    Element::N,
    Element::H,
];

pub fn atoms_isotopic_weights() -> HashMap<&'static str, Vec<f64>> {
    let mut map = HashMap::new();
    map.insert("H", vec![1.00782503223, 2.01410177812]);
    map.insert("C", vec![12.0000000, 13.00335483507]);
    map.insert("N", vec![14.00307400443, 15.00010889888]);
    map.insert("O", vec![15.99491461957, 16.99913175650, 17.99915961286]);
    map.insert("F", vec![18.99840316273]);
    map.insert("Si", vec![27.97692653465, 28.97649466490, 29.973770136]);
    map.insert("P", vec![30.97376199842]);
    map.insert("S", vec![31.9720711744, 32.9714589098, 33.967867004]);
    map.insert("Cl", vec![34.968852682, 36.965902602]);
    map.insert("Br", vec![78.9183376, 80.9162897]);
    map.insert("I", vec![126.904473]);

    map
}

pub fn isotopic_abundance() -> HashMap<&'static str, Vec<f64>> {
    let mut map = HashMap::new();
    map.insert("H", vec![0.999885, 0.000115]);
    map.insert("C", vec![0.9893, 0.0107]);
    map.insert("N", vec![0.99632, 0.00368]);
    map.insert("O", vec![0.99757, 0.00038, 0.00205]);
    map.insert("F", vec![1.0]);
    map.insert("Si", vec![0.9223, 0.0467, 0.0310]);
    map.insert("P", vec![1.0]);
    map.insert("S", vec![0.9493, 0.0076, 0.0429]);
    map.insert("Cl", vec![0.7578, 0.2422]);
    map.insert("Br", vec![0.5069, 0.4931]);
    map.insert("I", vec![1.0]);

    map
}

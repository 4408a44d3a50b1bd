use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use bincode::{Decode, Encode};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chemistry::elements::{Element, ENUMERATION_ORDER};

/// An elemental composition with optional derivatization counts.
///
/// The element counts always describe the species as it is measured. In
/// derivatized workflows `tms` and `meox` record how many trimethylsilyl
/// and methoxime groups those counts include; [`Formula::converted`]
/// strips the groups out again to recover the underivatized compound.
/// All counts are non-negative and the monoisotopic mass is a pure
/// function of the counts.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct Formula {
    pub c: i32,
    pub h: i32,
    pub n: i32,
    pub o: i32,
    pub p: i32,
    pub s: i32,
    pub f: i32,
    pub cl: i32,
    pub br: i32,
    pub i: i32,
    pub si: i32,
    pub tms: i32,
    pub meox: i32,
}

impl Formula {
    #[allow(clippy::too_many_arguments)]
    pub fn new(c: i32, h: i32, n: i32, o: i32, p: i32, s: i32, f: i32, cl: i32, br: i32, i: i32, si: i32) -> Self {
        Formula { c, h, n, o, p, s, f, cl, br, i, si, tms: 0, meox: 0 }
    }

    /// Build a formula from a carbon count plus the inner enumeration
    /// levels, ordered as [`ENUMERATION_ORDER`].
    pub fn from_counts(c: i32, counts: &[i32; 10]) -> Self {
        let mut formula = Formula::new(c, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        for (level, element) in ENUMERATION_ORDER.iter().enumerate() {
            formula.set_count(*element, counts[level]);
        }
        formula
    }

    pub fn with_derivatives(mut self, tms: i32, meox: i32) -> Self {
        self.tms = tms;
        self.meox = meox;
        self
    }

    pub fn count(&self, element: Element) -> i32 {
        match element {
            Element::C => self.c,
            Element::H => self.h,
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

    fn set_count(&mut self, element: Element, count: i32) {
        match element {
            Element::C => self.c = count,
            Element::H => self.h = count,
            Element::N => self.n = count,
            Element::O => self.o = count,
            Element::P => self.p = count,
            Element::S => self.s = count,
            Element::F => self.f = count,
            Element::Cl => self.cl = count,
            Element::Br => self.br = count,
            Element::I => self.i = count,
            Element::Si => self.si = count,
        }
    }

    pub fn atom_count(&self) -> i32 {
        self.c + self.h + self.n + self.o + self.p + self.s + self.f + self.cl + self.br + self.i + self.si
    }

    pub fn monoisotopic_mass(&self) -> f64 {
        let mut mass = self.c as f64 * Element::C.monoisotopic_mass();
        for element in ENUMERATION_ORDER {
            mass += self.count(element) as f64 * element.monoisotopic_mass();
        }
        mass
    }

    /// Atomic composition for the isotope distribution generator,
    /// zero counts omitted.
    pub fn atomic_composition(&self) -> HashMap<&'static str, i32> {
        let mut composition = HashMap::new();
        if self.c > 0 {
            composition.insert("C", self.c);
        }
        for element in ENUMERATION_ORDER {
            let count = self.count(element);
            if count > 0 {
                composition.insert(element.symbol(), count);
            }
        }
        composition
    }

    /// Canonical Hill-order formula string: C, H, then the remaining
    /// elements alphabetically. Derivative counts are rendered as a
    /// suffix only when present.
    pub fn formula_string(&self) -> String {
        let mut out = String::new();
        let hill_order = [
            (Element::C, self.c),
            (Element::H, self.h),
            (Element::Br, self.br),
            (Element::Cl, self.cl),
            (Element::F, self.f),
            (Element::I, self.i),
            (Element::N, self.n),
            (Element::O, self.o),
            (Element::P, self.p),
            (Element::S, self.s),
            (Element::Si, self.si),
        ];
        for (element, count) in hill_order {
            match count {
                0 => {}
                1 => out.push_str(element.symbol()),
                _ => out.push_str(&format!("{}{}", element.symbol(), count)),
            }
        }
        if self.tms > 0 {
            out.push_str(&format!("·{}TMS", self.tms));
        }
        if self.meox > 0 {
            out.push_str(&format!("·{}MeOx", self.meox));
        }
        out
    }

    /// Parse an elemental formula string such as `C6H12O6`.
    ///
    /// Returns an error for unknown element symbols or any characters
    /// that do not belong to a `SymbolCount` token.
    pub fn parse(formula: &str) -> Result<Formula, String> {
        let pattern = Regex::new(r"([A-Z][a-z]?)(\d*)").unwrap();
        let mut result = Formula::new(0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        let mut consumed = 0;

        for captures in pattern.captures_iter(formula) {
            let symbol = captures.get(1).unwrap().as_str();
            let count: i32 = match captures.get(2).unwrap().as_str() {
                "" => 1,
                digits => digits.parse().map_err(|_| format!("Invalid count in formula: {}", formula))?,
            };
            let element = Element::from_symbol(symbol).ok_or(format!("Unknown element: {}", symbol))?;
            result.set_count(element, result.count(element) + count);
            consumed += captures.get(0).unwrap().len();
        }

        if consumed != formula.len() {
            return Err(format!("Malformed formula: {}", formula));
        }
        Ok(result)
    }

    /// Strip the derivatization groups and return the underivatized
    /// composition as a new value. Returns `None` when the recorded
    /// derivative counts do not fit the element counts.
    pub fn converted(&self) -> Option<Formula> {
        let converted = Formula::new(
            self.c - 3 * self.tms - self.meox,
            self.h - 8 * self.tms - 3 * self.meox,
            self.n - self.meox,
            self.o,
            self.p,
            self.s,
            self.f,
            self.cl,
            self.br,
            self.i,
            self.si - self.tms,
        );
        let non_negative = converted.c >= 0
            && converted.h >= 0
            && converted.n >= 0
            && converted.si >= 0;
        if non_negative {
            Some(converted)
        } else {
            None
        }
    }

    /// True when every element count of `self` fits inside `budget`.
    /// Used to restrict fragment references to a candidate's elements.
    pub fn fits_within(&self, budget: &Formula) -> bool {
        self.c <= budget.c
            && self.h <= budget.h
            && self.n <= budget.n
            && self.o <= budget.o
            && self.p <= budget.p
            && self.s <= budget.s
            && self.f <= budget.f
            && self.cl <= budget.cl
            && self.br <= budget.br
            && self.i <= budget.i
            && self.si <= budget.si
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula_string())
    }
}

use bincode::{Decode, Encode};
use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::chemistry::formula::Formula;
use crate::data::configuration::MassTolerance;

/// A centroided peak list with paired m/z and intensity values.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct PeakList {
    pub mz: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl PeakList {
    pub fn new(mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        PeakList { mz, intensity }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    pub fn base_peak_intensity(&self) -> f64 {
        self.intensity.iter().cloned().fold(0.0, f64::max)
    }

    pub fn total_intensity(&self) -> f64 {
        self.intensity.iter().sum()
    }

    /// Drop peaks below a fraction of the base peak intensity.
    pub fn relative_abundance_filter(&self, min_fraction: f64) -> PeakList {
        let cutoff = self.base_peak_intensity() * min_fraction;
        let mut mz_vec: Vec<f64> = Vec::new();
        let mut intensity_vec: Vec<f64> = Vec::new();

        for (mz, intensity) in izip!(self.mz.iter(), self.intensity.iter()) {
            if *intensity >= cutoff {
                mz_vec.push(*mz);
                intensity_vec.push(*intensity);
            }
        }
        PeakList::new(mz_vec, intensity_vec)
    }

    /// Precursor-derived neutral losses: for every fragment below the
    /// precursor, the mass difference to the precursor with the fragment
    /// intensity attached.
    pub fn neutral_losses(&self, precursor_mz: f64) -> PeakList {
        let mut loss_mz: Vec<f64> = Vec::new();
        let mut loss_intensity: Vec<f64> = Vec::new();

        for (mz, intensity) in izip!(self.mz.iter(), self.intensity.iter()) {
            let loss = precursor_mz - mz;
            if loss > 0.0 {
                loss_mz.push(loss);
                loss_intensity.push(*intensity);
            }
        }
        PeakList::new(loss_mz, loss_intensity)
    }
}

/// MS2 evidence for one query: filtered product ions and the
/// precursor-derived neutral losses, both centroided.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct Ms2Data {
    pub peaks: PeakList,
    pub losses: PeakList,
}

impl Ms2Data {
    pub fn new(peaks: PeakList, losses: PeakList) -> Self {
        Ms2Data { peaks, losses }
    }

    /// Standard preprocessing for a raw centroided spectrum: relative
    /// abundance filter, then neutral-loss derivation.
    pub fn preprocess(raw: &PeakList, precursor_mz: f64, min_fraction: f64) -> Self {
        let peaks = raw.relative_abundance_filter(min_fraction);
        let losses = peaks.neutral_losses(precursor_mz);
        Ms2Data { peaks, losses }
    }
}

/// Observed M+1 and M+2 intensities relative to the monoisotopic peak.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct IsotopeObservation {
    pub m_plus_one: f64,
    pub m_plus_two: f64,
}

impl IsotopeObservation {
    pub fn new(m_plus_one: f64, m_plus_two: f64) -> Self {
        IsotopeObservation { m_plus_one, m_plus_two }
    }
}

/// Reference product ion from the fragment ontology database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductIonReference {
    pub mass: f64,
    pub formula: Formula,
    pub ontology: String,
}

impl ProductIonReference {
    pub fn new(formula: Formula, ontology: &str) -> Self {
        ProductIonReference {
            mass: formula.monoisotopic_mass(),
            formula,
            ontology: ontology.to_string(),
        }
    }
}

/// Reference neutral loss from the fragment ontology database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NeutralLossReference {
    pub mass: f64,
    pub formula: Formula,
    pub ontology: String,
}

impl NeutralLossReference {
    pub fn new(formula: Formula, ontology: &str) -> Self {
        NeutralLossReference {
            mass: formula.monoisotopic_mass(),
            formula,
            ontology: ontology.to_string(),
        }
    }
}

/// Slice of `records` whose mass lies inside the tolerance window around
/// `mass`. Expects the records sorted ascending by the key.
pub fn mass_window<T>(records: &[T], mass_of: impl Fn(&T) -> f64, mass: f64, tolerance: MassTolerance) -> &[T] {
    let tol = tolerance.absolute(mass);
    let start = records.partition_point(|r| mass_of(r) < mass - tol);
    let end = records.partition_point(|r| mass_of(r) <= mass + tol);
    &records[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_abundance_filter() {
        let peaks = PeakList::new(vec![50.0, 60.0, 70.0], vec![1000.0, 5.0, 100.0]);
        let filtered = peaks.relative_abundance_filter(0.05);
        assert_eq!(filtered.mz, vec![50.0, 70.0]);
        assert_eq!(filtered.intensity, vec![1000.0, 100.0]);
    }

    #[test]
    fn test_neutral_losses() {
        let peaks = PeakList::new(vec![60.0, 120.0, 200.0], vec![10.0, 20.0, 30.0]);
        let losses = peaks.neutral_losses(180.0);
        assert_eq!(losses.mz, vec![120.0, 60.0]);
        assert_eq!(losses.intensity, vec![10.0, 20.0]);
    }

    #[test]
    fn test_mass_window() {
        let records = vec![10.0, 10.004, 10.02, 11.0];
        let window = mass_window(&records, |m| *m, 10.003, MassTolerance::Da(0.005));
        assert_eq!(window, &records[0..2]);
        let empty = mass_window(&records, |m| *m, 12.0, MassTolerance::Da(0.005));
        assert!(empty.is_empty());
    }
}

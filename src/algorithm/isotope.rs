use std::collections::{BTreeMap, HashMap};

use crate::chemistry::elements::{atoms_isotopic_weights, isotopic_abundance};

/// convolve two distributions of masses and abundances
///
/// Arguments:
///
/// * `dist_a` - first distribution of masses and abundances
/// * `dist_b` - second distribution of masses and abundances
/// * `mass_tolerance` - mass tolerance for combining peaks
/// * `abundance_threshold` - minimum abundance for a peak to be included in the result
/// * `max_results` - maximum number of peaks to include in the result
///
/// Returns:
///
/// * `Vec<(f64, f64)>` - combined distribution of masses and abundances
pub fn convolve(dist_a: &[(f64, f64)], dist_b: &[(f64, f64)], mass_tolerance: f64, abundance_threshold: f64, max_results: usize) -> Vec<(f64, f64)> {
    let mut result: Vec<(f64, f64)> = Vec::new();

    for (mass_a, abundance_a) in dist_a {
        for (mass_b, abundance_b) in dist_b {
            let combined_mass = mass_a + mass_b;
            let combined_abundance = abundance_a * abundance_b;

            if combined_abundance < abundance_threshold {
                continue;
            }

            if let Some(entry) = result.iter_mut().find(|(m, _)| (*m - combined_mass).abs() < mass_tolerance) {
                entry.1 += combined_abundance;
            } else {
                result.push((combined_mass, combined_abundance));
            }
        }
    }

    // keep the most abundant peaks, then restore mass order
    result.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    if result.len() > max_results {
        result.truncate(max_results);
    }
    result.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    result
}

/// convolve a distribution with itself n times
///
/// Arguments:
///
/// * `dist` - distribution of masses and abundances
/// * `n` - number of times to convolve the distribution with itself
///
/// Returns:
///
/// * `Vec<(f64, f64)>` - distribution of masses and abundances
pub fn convolve_pow(dist: &[(f64, f64)], n: i32) -> Vec<(f64, f64)> {
    if n == 0 {
        return vec![(0.0, 1.0)]; // Return the delta distribution
    }
    if n == 1 {
        return dist.to_vec();
    }

    let mut result = dist.to_vec();
    let mut power = 2;

    while power <= n {
        result = convolve(&result, &result, 1e-6, 1e-12, 200); // Square the result to get the next power of 2
        power *= 2;
    }

    // If n is not a power of 2, recursively fill in the remainder
    if power / 2 < n {
        result = convolve(&result, &convolve_pow(dist, n - power / 2), 1e-6, 1e-12, 200);
    }

    result
}

/// generate the isotope distribution for a given atomic composition
///
/// Arguments:
///
/// * `atomic_composition` - element symbols mapped to atom counts
/// * `mass_tolerance` - mass tolerance for combining peaks
/// * `abundance_threshold` - minimum abundance for a peak to be included in the result
/// * `max_result` - maximum number of peaks to include in the result
///
/// Returns:
///
/// * `Vec<(f64, f64)>` - distribution of masses and abundances, ascending in mass,
///   normalized to a total abundance of one
pub fn generate_isotope_distribution(
    atomic_composition: &HashMap<&'static str, i32>,
    mass_tolerance: f64,
    abundance_threshold: f64,
    max_result: i32,
) -> Vec<(f64, f64)> {
    let mut cumulative_distribution: Option<Vec<(f64, f64)>> = None;
    let isotopic_weights = atoms_isotopic_weights();
    let isotope_abundances = isotopic_abundance();

    // fixed element order keeps repeated runs bit-identical
    let mut composition: Vec<(&'static str, i32)> = atomic_composition.iter().map(|(k, v)| (*k, *v)).collect();
    composition.sort_unstable();

    for (element, count) in composition {
        if count <= 0 {
            continue;
        }
        let weights = isotopic_weights.get(element).expect("Element not found in isotopic weights table");
        let abundances = isotope_abundances.get(element).expect("Element not found in isotopic abundance table");

        let element_distribution: Vec<(f64, f64)> =
            weights.iter().zip(abundances.iter()).map(|(&mass, &abundance)| (mass, abundance)).collect();

        let element_power_distribution = if count > 1 {
            convolve_pow(&element_distribution, count)
        } else {
            element_distribution
        };

        cumulative_distribution = match cumulative_distribution {
            Some(cum_dist) => Some(convolve(
                &cum_dist,
                &element_power_distribution,
                mass_tolerance,
                abundance_threshold,
                max_result as usize,
            )),
            None => Some(element_power_distribution),
        };
    }

    let final_distribution = cumulative_distribution.expect("Composition has no elements");
    let total_abundance: f64 = final_distribution.iter().map(|&(_, abundance)| abundance).sum();
    let result: Vec<_> = final_distribution.into_iter().map(|(mass, abundance)| (mass, abundance / total_abundance)).collect();

    let mut sort_map: BTreeMap<i64, f64> = BTreeMap::new();
    let quantize = |mz: f64| -> i64 { (mz * 1_000_000.0).round() as i64 };

    for (mz, intensity) in result {
        let key = quantize(mz);
        sort_map.entry(key).and_modify(|e| *e += intensity).or_insert(intensity);
    }

    sort_map.into_iter().map(|(key, intensity)| (key as f64 / 1_000_000.0, intensity)).collect()
}

/// M+1 and M+2 abundances relative to the monoisotopic peak, aggregated
/// on nucleon number. This is what the isotope score compares against
/// the observed pattern.
pub fn theoretical_isotope_ratios(atomic_composition: &HashMap<&'static str, i32>) -> (f64, f64) {
    let distribution = generate_isotope_distribution(atomic_composition, 1e-3, 1e-12, 200);
    let mono_mass = distribution[0].0;
    let mono_abundance = distribution[0].1;

    let mut bins = [0.0; 3];
    for (mass, abundance) in &distribution {
        let offset = (mass - mono_mass).round() as usize;
        if offset < bins.len() {
            bins[offset] += abundance;
        }
    }

    (bins[1] / mono_abundance.max(f64::MIN_POSITIVE), bins[2] / mono_abundance.max(f64::MIN_POSITIVE))
}

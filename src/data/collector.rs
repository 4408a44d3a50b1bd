use std::cmp::Ordering;

use crate::data::candidate::FormulaCandidate;

/// A capacity-bounded candidate list kept in descending score order.
///
/// While filling, offers are appended unconditionally; the list is
/// sorted once when the capacity is reached. Once full, an offer that
/// ranks behind the current worst candidate is discarded, everything
/// else is placed by binary search and the evicted tail dropped, so the
/// list stays sorted without a full re-sort per insertion.
#[derive(Clone, Debug)]
pub struct BoundedRankedCollector {
    capacity: usize,
    sorted: bool,
    items: Vec<FormulaCandidate>,
}

impl BoundedRankedCollector {
    pub fn new(capacity: usize) -> Self {
        BoundedRankedCollector {
            capacity,
            sorted: false,
            items: Vec::with_capacity(capacity.min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offer(&mut self, candidate: FormulaCandidate) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() < self.capacity {
            self.items.push(candidate);
            if self.items.len() == self.capacity {
                self.sort();
            }
            return;
        }

        let worst = self.items.last().expect("full collector cannot be empty");
        if candidate.ranking_cmp(worst) != Ordering::Less {
            return;
        }

        let index = self.items.partition_point(|item| item.ranking_cmp(&candidate) != Ordering::Greater);
        self.items.insert(index, candidate);
        self.items.pop();
    }

    /// Fold another collector's contents into this one. The ranking is a
    /// total order, so merging is commutative and the outcome does not
    /// depend on worker completion order.
    pub fn merge(&mut self, other: BoundedRankedCollector) {
        for candidate in other.items {
            self.offer(candidate);
        }
    }

    /// Final descending candidate list with the top `selected_count`
    /// flagged. Consumes the collector.
    pub fn drain(mut self, selected_count: usize) -> Vec<FormulaCandidate> {
        self.sort();
        for candidate in self.items.iter_mut().take(selected_count) {
            candidate.is_selected = true;
        }
        self.items
    }

    fn sort(&mut self) {
        if !self.sorted {
            self.items.sort_by(|a, b| a.ranking_cmp(b));
            self.sorted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use crate::chemistry::formula::Formula;

    fn candidate(total_score: f64, tag: usize) -> FormulaCandidate {
        let formula = Formula::new(tag as i32 + 1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        FormulaCandidate {
            formula,
            converted_formula: formula,
            formula_string: format!("C{}H4", tag + 1),
            mass: formula.monoisotopic_mass(),
            mass_error: 0.0,
            mass_accuracy_score: 0.0,
            isotope_score: 0.0,
            product_ion_score: 0.0,
            neutral_loss_score: 0.0,
            total_score,
            resource_names: Vec::new(),
            resource_records: 0,
            database_ids: Vec::new(),
            fragment_matches: Vec::new(),
            is_selected: false,
        }
    }

    #[test]
    fn test_fills_then_sorts() {
        let mut collector = BoundedRankedCollector::new(3);
        collector.offer(candidate(0.2, 0));
        collector.offer(candidate(0.9, 1));
        collector.offer(candidate(0.5, 2));
        let drained = collector.drain(1);
        let scores: Vec<f64> = drained.iter().map(|c| c.total_score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.2]);
        assert!(drained[0].is_selected);
        assert!(!drained[1].is_selected);
    }

    #[test]
    fn test_eviction_keeps_best() {
        let mut collector = BoundedRankedCollector::new(2);
        collector.offer(candidate(0.2, 0));
        collector.offer(candidate(0.4, 1));
        collector.offer(candidate(0.3, 2));
        collector.offer(candidate(0.1, 3));
        let scores: Vec<f64> = collector.drain(0).iter().map(|c| c.total_score).collect();
        assert_eq!(scores, vec![0.4, 0.3]);
    }

    #[test]
    fn test_matches_brute_force_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut candidates: Vec<FormulaCandidate> =
            (0..200).map(|tag| candidate((tag % 37) as f64 / 37.0, tag)).collect();
        candidates.shuffle(&mut rng);

        let mut reference = candidates.clone();
        reference.sort_by(|a, b| a.ranking_cmp(b));
        reference.truncate(20);

        let mut collector = BoundedRankedCollector::new(20);
        for c in candidates {
            collector.offer(c);
        }
        let retained: Vec<String> = collector.drain(0).into_iter().map(|c| c.formula_string).collect();
        let expected: Vec<String> = reference.into_iter().map(|c| c.formula_string).collect();
        assert_eq!(retained, expected);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let all: Vec<FormulaCandidate> = (0..50).map(|tag| candidate((tag % 11) as f64 / 11.0, tag)).collect();

        let mut left = BoundedRankedCollector::new(10);
        let mut right = BoundedRankedCollector::new(10);
        for (index, c) in all.iter().enumerate() {
            if index % 2 == 0 {
                left.offer(c.clone());
            } else {
                right.offer(c.clone());
            }
        }

        let mut forward = left.clone();
        forward.merge(right.clone());
        let mut backward = right;
        backward.merge(left);

        let forward: Vec<String> = forward.drain(0).into_iter().map(|c| c.formula_string).collect();
        let backward: Vec<String> = backward.drain(0).into_iter().map(|c| c.formula_string).collect();
        assert_eq!(forward, backward);
    }
}

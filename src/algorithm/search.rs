use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::algorithm::bounds::SearchBounds;
use crate::algorithm::enumerate::FormulaEnumerator;
use crate::algorithm::scoring::CandidateScorer;
use crate::chemistry::adduct::AdductIon;
use crate::chemistry::constants::MASS_C;
use crate::chemistry::elements::Element;
use crate::data::candidate::FormulaCandidate;
use crate::data::collector::BoundedRankedCollector;
use crate::data::configuration::SearchConfiguration;
use crate::data::existence::ExistenceDatabase;
use crate::data::spectrum::{IsotopeObservation, Ms2Data, NeutralLossReference, ProductIonReference};

/// Shared wall-clock budget of one search. Workers poll it at least once
/// per fully-built candidate; the first observer of the elapsed deadline
/// latches the stop flag so every other worker backs off without
/// re-reading the clock.
pub struct SearchDeadline {
    deadline: Instant,
    stopped: AtomicBool,
}

impl SearchDeadline {
    pub fn new(timeout: Duration) -> Self {
        SearchDeadline {
            deadline: Instant::now() + timeout,
            stopped: AtomicBool::new(false),
        }
    }

    /// Check the deadline, latching the stop flag on expiry.
    pub fn expired(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if Instant::now() >= self.deadline {
            self.stopped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// True once any worker has observed the elapsed deadline.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// One formula-search request: the neutral monoisotopic target mass plus
/// whatever optional evidence the instrument provided.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub target_mass: f64,
    pub adduct: AdductIon,
    pub observed_isotopes: Option<IsotopeObservation>,
    pub ms2: Option<Ms2Data>,
}

impl SearchQuery {
    pub fn new(target_mass: f64) -> Self {
        SearchQuery {
            target_mass,
            adduct: AdductIon::protonated(),
            observed_isotopes: None,
            ms2: None,
        }
    }

    pub fn with_adduct(mut self, adduct: AdductIon) -> Self {
        self.adduct = adduct;
        self
    }

    pub fn with_isotopes(mut self, observed: IsotopeObservation) -> Self {
        self.observed_isotopes = Some(observed);
        self
    }

    pub fn with_ms2(mut self, ms2: Ms2Data) -> Self {
        self.ms2 = Some(ms2);
        self
    }
}

/// Search result: candidates in descending score order, capped to the
/// configured report count, top candidates flagged selected. A search
/// that ran out of wall-clock time reports `timed_out` and returns what
/// it found, it does not fail.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub candidates: Vec<FormulaCandidate>,
    pub timed_out: bool,
}

/// Runs the formula enumeration across the carbon dimension on a rayon
/// pool. Each carbon count is an independent task with its own bounded
/// collector; the per-worker results are merged by a fork-join
/// reduction, so no lock sits in the hot loop and the outcome is
/// independent of task completion order.
pub struct FormulaSearchEngine {
    config: SearchConfiguration,
    existence: ExistenceDatabase,
    product_ions: Vec<ProductIonReference>,
    neutral_losses: Vec<NeutralLossReference>,
}

impl FormulaSearchEngine {
    pub fn new(config: SearchConfiguration) -> Self {
        FormulaSearchEngine {
            config,
            existence: ExistenceDatabase::new(),
            product_ions: Vec::new(),
            neutral_losses: Vec::new(),
        }
    }

    pub fn with_databases(
        config: SearchConfiguration,
        existence: ExistenceDatabase,
        mut product_ions: Vec<ProductIonReference>,
        mut neutral_losses: Vec<NeutralLossReference>,
    ) -> Self {
        product_ions.sort_by(|a, b| a.mass.partial_cmp(&b.mass).unwrap());
        neutral_losses.sort_by(|a, b| a.mass.partial_cmp(&b.mass).unwrap());
        FormulaSearchEngine {
            config,
            existence,
            product_ions,
            neutral_losses,
        }
    }

    pub fn config(&self) -> &SearchConfiguration {
        &self.config
    }

    /// Execute the search for one query.
    ///
    /// Arguments:
    ///
    /// * `query` - target mass plus optional isotope and MS2 evidence
    ///
    /// Returns:
    ///
    /// * `SearchOutcome` - ranked candidates and the soft-truncation flag
    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let tolerance = self.config.tolerance.absolute(query.target_mass);
        let max_carbon = ((query.target_mass / MASS_C).floor() as i32).max(1);

        // a carbon labeling constraint pins the outer dimension itself
        let carbon_range = match self
            .config
            .labeling
            .iter()
            .find(|constraint| constraint.element == Element::C)
            .map(|constraint| constraint.scaled_for(&query.adduct))
        {
            Some(required) if (1..=max_carbon).contains(&required) => required..=required,
            Some(_) => 1..=0,
            None => 1..=max_carbon,
        };

        let deadline = SearchDeadline::new(self.config.timeout);
        let scorer = CandidateScorer::new(
            &self.config,
            query.target_mass,
            tolerance,
            query.observed_isotopes,
            query.ms2.as_ref(),
            &self.product_ions,
            &self.neutral_losses,
            &self.existence,
        );

        let pool = ThreadPoolBuilder::new().num_threads(self.config.num_threads).build().unwrap();
        let merged = pool.install(|| {
            carbon_range
                .into_par_iter()
                .map(|carbon| {
                    let mut local = BoundedRankedCollector::new(self.config.max_report_count);
                    // stop taking carbon tasks once the budget is gone
                    if deadline.expired() {
                        return local;
                    }
                    let bounds = SearchBounds::new(&self.config, &query.adduct, carbon);
                    let enumerator = FormulaEnumerator::new(
                        &bounds,
                        query.target_mass,
                        tolerance,
                        &query.adduct,
                        self.config.profile,
                        self.config.derivative,
                        &scorer,
                        &deadline,
                    );
                    enumerator.run(&mut local);
                    local
                })
                .reduce(
                    || BoundedRankedCollector::new(self.config.max_report_count),
                    |mut left, right| {
                        left.merge(right);
                        left
                    },
                )
        });

        SearchOutcome {
            candidates: merged.drain(self.config.selected_count),
            timed_out: deadline.is_stopped(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::chemistry::formula::Formula;

/// One formula known to the literature or to external compound
/// databases, with its cross-reference metadata. Read-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExistenceRecord {
    pub formula: Formula,
    pub mass: f64,
    pub resource_names: Vec<String>,
    pub resource_records: u32,
    pub database_ids: Vec<String>,
}

impl ExistenceRecord {
    pub fn new(formula: Formula, resource_names: Vec<String>, database_ids: Vec<String>) -> Self {
        ExistenceRecord {
            mass: formula.monoisotopic_mass(),
            resource_records: resource_names.len() as u32,
            formula,
            resource_names,
            database_ids,
        }
    }
}

/// Mass-sorted index over the existence records.
///
/// Lookups binary-search to the lower tolerance bound and scan forward
/// until the upper bound, comparing exact elemental composition. The
/// index only annotates candidates, it never gates them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExistenceDatabase {
    records: Vec<ExistenceRecord>,
}

impl ExistenceDatabase {
    pub fn new() -> Self {
        ExistenceDatabase { records: Vec::new() }
    }

    pub fn from_records(mut records: Vec<ExistenceRecord>) -> Self {
        records.sort_by(|a, b| a.mass.partial_cmp(&b.mass).unwrap());
        ExistenceDatabase { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, formula: &Formula, tolerance: f64) -> Option<&ExistenceRecord> {
        let target = formula.monoisotopic_mass();
        let start = self.records.partition_point(|record| record.mass < target - tolerance);
        self.records[start..]
            .iter()
            .take_while(|record| record.mass <= target + tolerance)
            .find(|record| record.formula == *formula)
    }
}

use fxhash::FxHashMap;

use crate::discretizer::DiscreteState;
use crate::error::InputError;

/// Action-value estimates keyed by discrete state. States are populated
/// lazily; unseen states read as all-zero rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    default: Vec<f64>,
    values: FxHashMap<DiscreteState, Vec<f64>>,
}

impl ValueTable {
    pub fn new(num_of_action: usize) -> Self {
        Self {
            default: vec![0.0; num_of_action],
            values: FxHashMap::default(),
        }
    }

    pub fn num_of_action(&self) -> usize {
        self.default.len()
    }

    pub fn get(&self, state: &DiscreteState) -> &[f64] {
        self.values
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&self.default)
    }

    pub fn get_mut(&mut self, state: &DiscreteState) -> &mut Vec<f64> {
        self.values
            .entry(state.clone())
            .or_insert_with(|| self.default.clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot as (state, row) pairs sorted by state, so serialized output
    /// is stable across runs.
    pub fn entries(&self) -> Vec<(DiscreteState, Vec<f64>)> {
        let mut entries: Vec<(DiscreteState, Vec<f64>)> = self
            .values
            .iter()
            .map(|(state, row)| (state.clone(), row.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn from_entries(
        num_of_action: usize,
        entries: Vec<(DiscreteState, Vec<f64>)>,
    ) -> Result<Self, InputError> {
        let mut table = Self::new(num_of_action);
        for (state, row) in entries {
            if row.len() != num_of_action {
                return Err(InputError::TableWidth {
                    expected: num_of_action,
                    got: row.len(),
                });
            }
            table.values.insert(state, row);
        }
        Ok(table)
    }
}

/// State-action visit counter, same shape as a [`ValueTable`]. Counts only
/// ever grow; Monte-Carlo uses them as running-average denominators.
#[derive(Debug, Clone)]
pub struct VisitCountTable {
    default: Vec<u32>,
    counts: FxHashMap<DiscreteState, Vec<u32>>,
}

impl VisitCountTable {
    pub fn new(num_of_action: usize) -> Self {
        Self {
            default: vec![0; num_of_action],
            counts: FxHashMap::default(),
        }
    }

    pub fn get(&self, state: &DiscreteState, action: usize) -> u32 {
        self.counts.get(state).map(|row| row[action]).unwrap_or(0)
    }

    /// Bumps the pair's count and returns the new value.
    pub fn increment(&mut self, state: &DiscreteState, action: usize) -> u32 {
        let row = self
            .counts
            .entry(state.clone())
            .or_insert_with(|| self.default.clone());
        row[action] += 1;
        row[action]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_states_read_as_zero_rows() {
        let table = ValueTable::new(3);
        assert_eq!(table.get(&vec![4, -2]), &[0.0, 0.0, 0.0]);
        assert!(table.is_empty());
    }

    #[test]
    fn get_mut_materializes_the_row() {
        let mut table = ValueTable::new(2);
        table.get_mut(&vec![1, 1])[0] = 0.5;
        assert_eq!(table.get(&vec![1, 1]), &[0.5, 0.0]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn entries_are_sorted_by_state() {
        let mut table = ValueTable::new(1);
        table.get_mut(&vec![3])[0] = 3.0;
        table.get_mut(&vec![-1])[0] = -1.0;
        table.get_mut(&vec![0])[0] = 0.0;
        let states: Vec<DiscreteState> =
            table.entries().into_iter().map(|(s, _)| s).collect();
        assert_eq!(states, vec![vec![-1], vec![0], vec![3]]);
    }

    #[test]
    fn from_entries_round_trips() {
        let mut table = ValueTable::new(2);
        table.get_mut(&vec![0, 1])[1] = 2.0;
        let rebuilt = ValueTable::from_entries(2, table.entries()).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn from_entries_rejects_bad_row_width() {
        let err = ValueTable::from_entries(2, vec![(vec![0], vec![1.0])]).unwrap_err();
        assert_eq!(err, InputError::TableWidth { expected: 2, got: 1 });
    }

    #[test]
    fn visit_counts_accumulate() {
        let mut counts = VisitCountTable::new(2);
        assert_eq!(counts.get(&vec![0], 1), 0);
        assert_eq!(counts.increment(&vec![0], 1), 1);
        assert_eq!(counts.increment(&vec![0], 1), 2);
        assert_eq!(counts.get(&vec![0], 0), 0);
    }
}

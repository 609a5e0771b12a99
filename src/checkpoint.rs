use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::discretizer::DiscreteState;
use crate::error::InputError;
use crate::value_table::ValueTable;

/// Serialized form of an agent's value tables: one sorted entry list per
/// table, which keeps the JSON stable across runs and independent of the
/// map's key type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub num_of_action: usize,
    pub tables: Vec<Vec<(DiscreteState, Vec<f64>)>>,
}

impl Checkpoint {
    pub fn of(agent: &impl Agent) -> Self {
        let mut tables = vec![agent.values().entries()];
        if let Some(second) = agent.secondary_values() {
            tables.push(second.entries());
        }
        Self {
            num_of_action: agent.action_space().size,
            tables,
        }
    }

    pub fn into_tables(self) -> Result<Vec<ValueTable>, InputError> {
        let num_of_action = self.num_of_action;
        self.tables
            .into_iter()
            .map(|entries| ValueTable::from_entries(num_of_action, entries))
            .collect()
    }
}

pub fn save(path: &Path, agent: &impl Agent) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating checkpoint {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &Checkpoint::of(agent))?;
    debug!("saved checkpoint to {}", path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<Checkpoint> {
    let file = File::open(path)
        .with_context(|| format!("opening checkpoint {}", path.display()))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Loads a checkpoint and installs its tables into the agent.
pub fn restore(path: &Path, agent: &mut impl Agent) -> Result<()> {
    let checkpoint = load(path)?;
    agent.restore(checkpoint.into_tables()?)?;
    debug!("restored checkpoint from {}", path.display());
    Ok(())
}

//! Model-independent view over the decay and cooling operations.
//!
//! Presentation layers list, describe and solve operations through
//! [`Operation`] without matching on the model themselves.

use crate::{CoolingOperation, DecayOperation, Knowns, Model, Result, Solution, Variable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Decay(DecayOperation),
    Cooling(CoolingOperation),
}

impl Operation {
    /// All operations of `model`, in menu order
    pub fn for_model(model: Model) -> Vec<Operation> {
        match model {
            Model::Decay => DecayOperation::ALL.into_iter().map(Operation::Decay).collect(),
            Model::Cooling => CoolingOperation::ALL
                .into_iter()
                .map(Operation::Cooling)
                .collect(),
        }
    }

    pub fn model(self) -> Model {
        match self {
            Operation::Decay(_) => Model::Decay,
            Operation::Cooling(_) => Model::Cooling,
        }
    }

    pub fn unknown(self) -> Variable {
        match self {
            Operation::Decay(op) => op.unknown(),
            Operation::Cooling(op) => op.unknown(),
        }
    }

    pub fn inputs(self) -> &'static [Variable] {
        match self {
            Operation::Decay(op) => op.inputs(),
            Operation::Cooling(op) => op.inputs(),
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            Operation::Decay(op) => op.formula(),
            Operation::Cooling(op) => op.formula(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Operation::Decay(op) => op.title(),
            Operation::Cooling(op) => op.title(),
        }
    }

    pub fn solve(self, knowns: &Knowns) -> Result<Solution> {
        match self {
            Operation::Decay(op) => op.solve(knowns),
            Operation::Cooling(op) => op.solve(knowns),
        }
    }
}

impl From<DecayOperation> for Operation {
    fn from(op: DecayOperation) -> Self {
        Operation::Decay(op)
    }
}

impl From<CoolingOperation> for Operation {
    fn from(op: CoolingOperation) -> Self {
        Operation::Cooling(op)
    }
}

// Copyright 2025 Horizen Labs, Inc.
// SPDX-License-Identifier: Apache-2.0 or MIT

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Arithmetic circuit descriptions and witness calculation.
//!
//! A circuit is a straight-line list of two-input gates over named signals. The JSON
//! description doubles as the witness-calculator artifact: both proof backends
//! arithmetise it and compute the full signal assignment from the named inputs.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use ark_ff::AdditiveGroup;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::{
    canonical::{canonicalize, Value},
    errors::GenerationError,
    utils::biguint_from_field,
    Fr,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Gate {
    /// `out = left * right`
    Mul {
        left: String,
        right: String,
        out: String,
    },
    /// `out = left + right`
    Add {
        left: String,
        right: String,
        out: String,
    },
    /// `left == right`
    AssertEq { left: String, right: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateKind {
    Mul,
    Add,
    AssertEq,
}

/// A gate with its operands resolved to signal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexedGate {
    pub(crate) kind: GateKind,
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) out: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub name: String,
    pub inputs: Vec<String>,
    pub gates: Vec<Gate>,
    /// Public outputs, in the order they appear among the public signals.
    pub outputs: Vec<String>,
}

impl Circuit {
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let circuit: Circuit =
            serde_json::from_str(json).map_err(|e| GenerationError::InvalidCircuit {
                message: e.to_string(),
            })?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Loads and validates a circuit artifact.
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let json = std::fs::read_to_string(path).map_err(|e| GenerationError::ArtifactMissing {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let circuit: Circuit =
            serde_json::from_str(&json).map_err(|e| GenerationError::ArtifactCorrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// All signals: inputs first, then gate outputs in gate order.
    pub fn signals(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .map(String::as_str)
            .chain(self.gates.iter().filter_map(|gate| match gate {
                Gate::Mul { out, .. } | Gate::Add { out, .. } => Some(out.as_str()),
                Gate::AssertEq { .. } => None,
            }))
            .collect()
    }

    pub fn num_public_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, GenerationError> {
        serde_json::to_value(self).map_err(|e| GenerationError::InvalidCircuit {
            message: e.to_string(),
        })
    }

    /// Keccak-256 of the canonical JSON form, binding keys to this circuit.
    pub fn digest(&self) -> Result<Vec<u8>, GenerationError> {
        let json = serde_json::to_vec(self).map_err(|e| GenerationError::InvalidCircuit {
            message: e.to_string(),
        })?;
        Ok(Keccak256::digest(json).to_vec())
    }

    fn signal_indices(&self) -> HashMap<&str, usize> {
        self.signals()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect()
    }

    /// Checks single assignment and that every operand is assigned before use.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |message: String| GenerationError::InvalidCircuit { message };

        let mut assigned: HashSet<&str> = HashSet::new();
        for input in &self.inputs {
            if !assigned.insert(input) {
                return Err(invalid(format!("signal '{input}' is declared twice")));
            }
        }

        for gate in &self.gates {
            let (left, right, out) = match gate {
                Gate::Mul { left, right, out } | Gate::Add { left, right, out } => {
                    (left, right, Some(out))
                }
                Gate::AssertEq { left, right } => (left, right, None),
            };
            for operand in [left, right] {
                if !assigned.contains(operand.as_str()) {
                    return Err(GenerationError::UnassignedSignal {
                        signal: operand.clone(),
                    });
                }
            }
            if let Some(out) = out {
                if !assigned.insert(out) {
                    return Err(invalid(format!("signal '{out}' is assigned twice")));
                }
            }
        }

        let mut seen_outputs: HashSet<&str> = HashSet::new();
        for output in &self.outputs {
            if !assigned.contains(output.as_str()) {
                return Err(GenerationError::UnassignedSignal {
                    signal: output.clone(),
                });
            }
            if !seen_outputs.insert(output) {
                return Err(invalid(format!("output '{output}' is declared twice")));
            }
        }

        Ok(())
    }

    /// Gates with operands resolved to signal indices. Fails on a circuit that does
    /// not pass [`Circuit::validate`].
    pub(crate) fn indexed_gates(&self) -> Result<Vec<IndexedGate>, GenerationError> {
        self.validate()?;
        let indices = self.signal_indices();
        let index = |name: &String| {
            indices
                .get(name.as_str())
                .copied()
                .ok_or_else(|| GenerationError::UnassignedSignal {
                    signal: name.clone(),
                })
        };
        self.gates
            .iter()
            .map(|gate| {
                Ok(match gate {
                    Gate::Mul { left, right, out } => IndexedGate {
                        kind: GateKind::Mul,
                        left: index(left)?,
                        right: index(right)?,
                        out: Some(index(out)?),
                    },
                    Gate::Add { left, right, out } => IndexedGate {
                        kind: GateKind::Add,
                        left: index(left)?,
                        right: index(right)?,
                        out: Some(index(out)?),
                    },
                    Gate::AssertEq { left, right } => IndexedGate {
                        kind: GateKind::AssertEq,
                        left: index(left)?,
                        right: index(right)?,
                        out: None,
                    },
                })
            })
            .collect()
    }

    pub(crate) fn output_indices(&self) -> Result<Vec<usize>, GenerationError> {
        self.validate()?;
        let indices = self.signal_indices();
        self.outputs
            .iter()
            .map(|name| {
                indices
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| GenerationError::UnassignedSignal {
                        signal: name.clone(),
                    })
            })
            .collect()
    }

    /// Computes every signal from the named inputs.
    ///
    /// Input values are reduced into the scalar field. Missing or unknown inputs and
    /// failing assertions are generation failures.
    pub fn calculate_witness(&self, input: &WitnessInput) -> Result<Witness, GenerationError> {
        let indexed_gates = self.indexed_gates()?;
        let output_indices = self.output_indices()?;
        for name in input.names() {
            if !self.inputs.iter().any(|declared| declared == name) {
                return Err(GenerationError::UnknownInput {
                    signal: name.to_string(),
                    circuit: self.name.clone(),
                });
            }
        }

        let mut values = Vec::with_capacity(self.signals().len());
        for name in &self.inputs {
            let value = input.get(name).ok_or_else(|| GenerationError::MissingInput {
                signal: name.clone(),
            })?;
            values.push(Fr::from(value.clone()));
        }

        for (gate, indexed) in self.gates.iter().zip(indexed_gates) {
            let left = values[indexed.left];
            let right = values[indexed.right];
            match indexed.kind {
                GateKind::Mul => values.push(left * right),
                GateKind::Add => values.push(left + right),
                GateKind::AssertEq => {
                    if left != right {
                        let Gate::AssertEq { left, right } = gate else {
                            unreachable!("indexed gates follow the gate list")
                        };
                        return Err(GenerationError::AssertionFailed {
                            left: left.clone(),
                            right: right.clone(),
                        });
                    }
                }
            }
        }

        let public = output_indices.into_iter().map(|i| values[i]).collect();

        Ok(Witness { values, public })
    }
}

/// Named input values for one scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessInput(BTreeMap<String, BigUint>);

impl WitnessInput {
    pub fn new<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<BigUint>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Reads `{"a": "3", "b": 6, "c": "0x9"}`-style input through the canonicaliser.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, GenerationError> {
        let tree = canonicalize(&Value::from(json.clone()));
        let Value::Mapping(entries) = tree else {
            return Err(GenerationError::InvalidInputValue {
                signal: "<root>".to_string(),
            });
        };
        entries
            .into_iter()
            .map(|(name, value)| match value {
                Value::Integer(n) => Ok((name, n)),
                _ => Err(GenerationError::InvalidInputValue { signal: name }),
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    pub fn get(&self, name: &str) -> Option<&BigUint> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Full signal assignment, indexed like [`Circuit::signals`].
#[derive(Debug, Clone, PartialEq)]
pub struct Witness {
    pub(crate) values: Vec<Fr>,
    pub(crate) public: Vec<Fr>,
}

impl Witness {
    pub fn value(&self, index: usize) -> Fr {
        self.values.get(index).copied().unwrap_or(Fr::ZERO)
    }

    pub fn public_inputs(&self) -> &[Fr] {
        &self.public
    }

    pub fn public_signals(&self) -> Vec<BigUint> {
        self.public.iter().copied().map(biguint_from_field).collect()
    }
}

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

//! Rank-1 constraint system for a [`Circuit`].
//!
//! Public outputs become instance variables in declared order, every other signal a
//! witness variable. Each gate maps to one constraint:
//!
//! * `mul`: `left * right = out`
//! * `add`: `(left + right) * 1 = out`
//! * `assert_eq`: `left * 1 = right`

use ark_relations::{
    lc,
    r1cs::{
        ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError, Variable,
    },
};
use tracing::debug;

use crate::{
    circuit::{Circuit, GateKind, Witness},
    errors::GenerationError,
    Fr,
};

#[derive(Clone, Copy)]
pub(crate) struct R1csCircuit<'a> {
    circuit: &'a Circuit,
    witness: Option<&'a Witness>,
}

impl<'a> R1csCircuit<'a> {
    /// Shape only, for key generation.
    pub(crate) fn shape(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            witness: None,
        }
    }

    pub(crate) fn assigned(circuit: &'a Circuit, witness: &'a Witness) -> Self {
        Self {
            circuit,
            witness: Some(witness),
        }
    }

    fn value(&self, index: usize) -> Result<Fr, SynthesisError> {
        self.witness
            .map(|witness| witness.value(index))
            .ok_or(SynthesisError::AssignmentMissing)
    }

    /// Synthesises against a fresh constraint system and checks the assignment.
    pub(crate) fn check_satisfied(self) -> Result<(), GenerationError> {
        self.circuit.validate()?;
        let cs = ConstraintSystem::<Fr>::new_ref();
        self.generate_constraints(cs.clone())
            .map_err(synthesis_error)?;
        debug!(
            constraints = cs.num_constraints(),
            instances = cs.num_instance_variables(),
            witnesses = cs.num_witness_variables(),
            "synthesised r1cs"
        );
        match cs.is_satisfied() {
            Ok(true) => Ok(()),
            Ok(false) => Err(GenerationError::UnsatisfiedConstraints),
            Err(e) => Err(synthesis_error(e)),
        }
    }
}

pub(crate) fn synthesis_error(e: SynthesisError) -> GenerationError {
    GenerationError::Synthesis {
        message: e.to_string(),
    }
}

impl ConstraintSynthesizer<Fr> for R1csCircuit<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Callers validate first; an invalid circuit has no constraint system.
        let outputs = self
            .circuit
            .output_indices()
            .map_err(|_| SynthesisError::Unsatisfiable)?;
        let gates = self
            .circuit
            .indexed_gates()
            .map_err(|_| SynthesisError::Unsatisfiable)?;
        let num_signals = self.circuit.signals().len();
        let mut variables: Vec<Option<Variable>> = vec![None; num_signals];

        for index in outputs {
            variables[index] = Some(cs.new_input_variable(|| self.value(index))?);
        }
        for (index, slot) in variables.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(cs.new_witness_variable(|| self.value(index))?);
            }
        }
        let variables: Vec<Variable> = variables.into_iter().flatten().collect();

        for gate in gates {
            let left = variables[gate.left];
            let right = variables[gate.right];
            match (gate.kind, gate.out) {
                (GateKind::Mul, Some(out)) => {
                    cs.enforce_constraint(lc!() + left, lc!() + right, lc!() + variables[out])?
                }
                (GateKind::Add, Some(out)) => cs.enforce_constraint(
                    lc!() + left + right,
                    lc!() + Variable::One,
                    lc!() + variables[out],
                )?,
                (GateKind::AssertEq, _) => {
                    cs.enforce_constraint(lc!() + left, lc!() + Variable::One, lc!() + right)?
                }
                (_, None) => return Err(SynthesisError::Unsatisfiable),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::circuit::WitnessInput;
    use ark_relations::r1cs::SynthesisMode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn multiplier3() -> Circuit {
        Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap()
    }

    #[rstest]
    fn emit_one_constraint_per_gate(multiplier3: Circuit) {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        R1csCircuit::shape(&multiplier3)
            .generate_constraints(cs.clone())
            .unwrap();

        assert_eq!(cs.num_constraints(), multiplier3.gates.len());
        // the constant one plus one public output
        assert_eq!(cs.num_instance_variables(), 2);
        assert_eq!(cs.num_witness_variables(), multiplier3.signals().len() - 1);
    }

    #[rstest]
    fn be_satisfied_by_the_computed_witness(multiplier3: Circuit) {
        let witness = multiplier3
            .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
            .unwrap();

        assert_eq!(R1csCircuit::assigned(&multiplier3, &witness).check_satisfied(), Ok(()));
    }

    mod reject {
        use super::*;

        #[rstest]
        fn a_tampered_witness(multiplier3: Circuit) {
            let mut witness = multiplier3
                .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
                .unwrap();
            witness.values[3] += Fr::from(1u64);

            assert_eq!(
                R1csCircuit::assigned(&multiplier3, &witness).check_satisfied(),
                Err(GenerationError::UnsatisfiedConstraints)
            );
        }

        #[rstest]
        fn synthesis_without_an_assignment(multiplier3: Circuit) {
            assert!(matches!(
                R1csCircuit::shape(&multiplier3).check_satisfied(),
                Err(GenerationError::Synthesis { .. })
            ));
        }
    }
}

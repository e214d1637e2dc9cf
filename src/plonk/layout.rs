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

//! Arithmetisation of a [`Circuit`] into PLONK rows.
//!
//! Every row satisfies `q_l·a + q_r·b + q_o·c + q_m·a·b + q_c + PI = 0`. Public outputs
//! occupy the first rows (`a = output`, `q_l = 1`, `PI = -output`), each gate one row
//! after them, and the domain is padded with all-zero rows. Wire slots that hold a
//! signal are tied together through the copy permutation; unused slots map to
//! themselves.

use ark_ff::{AdditiveGroup, Field};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use crate::{
    circuit::{Circuit, GateKind, Witness},
    constants::{K1, K2, NUM_WIRES},
    errors::GenerationError,
    Fr,
};

pub(crate) type Domain = Radix2EvaluationDomain<Fr>;

// Smallest domain keeps the blinded quotient well defined.
const MIN_DOMAIN_SIZE: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Selectors {
    pub(crate) q_l: Vec<Fr>,
    pub(crate) q_r: Vec<Fr>,
    pub(crate) q_o: Vec<Fr>,
    pub(crate) q_m: Vec<Fr>,
    pub(crate) q_c: Vec<Fr>,
}

impl Selectors {
    fn with_size(n: usize) -> Self {
        Self {
            q_l: vec![Fr::ZERO; n],
            q_r: vec![Fr::ZERO; n],
            q_o: vec![Fr::ZERO; n],
            q_m: vec![Fr::ZERO; n],
            q_c: vec![Fr::ZERO; n],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub(crate) domain: Domain,
    pub(crate) num_public_inputs: usize,
    pub(crate) selectors: Selectors,
    /// Signal index held by each `(row, column)` slot.
    pub(crate) wires: Vec<[Option<usize>; NUM_WIRES]>,
    /// Evaluations of `σ_1, σ_2, σ_3` over the domain.
    pub(crate) sigmas: [Vec<Fr>; NUM_WIRES],
}

impl Layout {
    pub(crate) fn new(circuit: &Circuit) -> Result<Self, GenerationError> {
        let outputs = circuit.output_indices()?;
        let gates = circuit.indexed_gates()?;
        let rows = outputs.len() + gates.len();
        let domain = domain_for_rows(rows)?;
        let n = domain.size();

        let mut selectors = Selectors::with_size(n);
        let mut wires = vec![[None; NUM_WIRES]; n];

        for (row, output) in outputs.iter().enumerate() {
            selectors.q_l[row] = Fr::ONE;
            wires[row] = [Some(*output), None, None];
        }
        for (offset, gate) in gates.iter().enumerate() {
            let row = outputs.len() + offset;
            wires[row] = [Some(gate.left), Some(gate.right), gate.out];
            match gate.kind {
                GateKind::Mul => {
                    selectors.q_m[row] = Fr::ONE;
                    selectors.q_o[row] = -Fr::ONE;
                }
                GateKind::Add => {
                    selectors.q_l[row] = Fr::ONE;
                    selectors.q_r[row] = Fr::ONE;
                    selectors.q_o[row] = -Fr::ONE;
                }
                GateKind::AssertEq => {
                    selectors.q_l[row] = Fr::ONE;
                    selectors.q_r[row] = -Fr::ONE;
                }
            }
        }

        let sigmas = copy_permutation(&domain, &wires, circuit.signals().len());

        Ok(Self {
            domain,
            num_public_inputs: outputs.len(),
            selectors,
            wires,
            sigmas,
        })
    }

    pub(crate) fn domain_size(&self) -> usize {
        self.domain.size()
    }

    /// Wire evaluations `a, b, c` for a full assignment.
    pub(crate) fn wire_values(&self, witness: &Witness) -> [Vec<Fr>; NUM_WIRES] {
        core::array::from_fn(|col| {
            self.wires
                .iter()
                .map(|slots| slots[col].map_or(Fr::ZERO, |signal| witness.value(signal)))
                .collect()
        })
    }

    /// Evaluations of `PI(X)` over the domain.
    pub(crate) fn public_input_values(&self, public_inputs: &[Fr]) -> Vec<Fr> {
        let mut values = vec![Fr::ZERO; self.domain_size()];
        for (value, input) in values.iter_mut().zip(public_inputs) {
            *value = -*input;
        }
        values
    }
}

pub(crate) fn domain_for_rows(rows: usize) -> Result<Domain, GenerationError> {
    let size = rows.max(MIN_DOMAIN_SIZE).next_power_of_two();
    Domain::new(size).ok_or_else(|| GenerationError::InvalidCircuit {
        message: format!("{rows} rows exceed the largest evaluation domain"),
    })
}

/// Coset representative of each wire column.
pub(crate) fn column_shifts() -> [Fr; NUM_WIRES] {
    [Fr::ONE, K1, K2]
}

fn copy_permutation(
    domain: &Domain,
    wires: &[[Option<usize>; NUM_WIRES]],
    num_signals: usize,
) -> [Vec<Fr>; NUM_WIRES] {
    let shifts = column_shifts();
    let label = |col: usize, row: usize| shifts[col] * domain.element(row);

    let mut sigmas: [Vec<Fr>; NUM_WIRES] =
        core::array::from_fn(|col| (0..wires.len()).map(|row| label(col, row)).collect());

    let mut cycles: Vec<Vec<(usize, usize)>> = vec![Vec::new(); num_signals];
    for (row, slots) in wires.iter().enumerate() {
        for (col, slot) in slots.iter().enumerate() {
            if let Some(signal) = slot {
                cycles[*signal].push((col, row));
            }
        }
    }

    for cycle in cycles.iter().filter(|cycle| cycle.len() > 1) {
        for (k, &(col, row)) in cycle.iter().enumerate() {
            let (next_col, next_row) = cycle[(k + 1) % cycle.len()];
            sigmas[col][row] = label(next_col, next_row);
        }
    }

    sigmas
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::circuit::WitnessInput;
    use rstest::{fixture, rstest};

    #[fixture]
    fn multiplier3() -> Circuit {
        Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap()
    }

    fn gate_holds(layout: &Layout, wires: &[Vec<Fr>; NUM_WIRES], pi: &[Fr], row: usize) -> bool {
        let s = &layout.selectors;
        let [a, b, c] = wires;
        s.q_l[row] * a[row]
            + s.q_r[row] * b[row]
            + s.q_o[row] * c[row]
            + s.q_m[row] * a[row] * b[row]
            + s.q_c[row]
            + pi[row]
            == Fr::ZERO
    }

    #[rstest]
    fn pad_to_a_power_of_two(multiplier3: Circuit) {
        let layout = Layout::new(&multiplier3).unwrap();
        assert_eq!(layout.domain_size(), 4);
        assert_eq!(layout.num_public_inputs, 1);
        assert_eq!(domain_for_rows(5).unwrap().size(), 8);
        assert_eq!(domain_for_rows(0).unwrap().size(), MIN_DOMAIN_SIZE);
    }

    #[rstest]
    fn satisfy_every_row_with_the_computed_witness(multiplier3: Circuit) {
        let layout = Layout::new(&multiplier3).unwrap();
        let witness = multiplier3
            .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
            .unwrap();
        let wires = layout.wire_values(&witness);
        let pi = layout.public_input_values(witness.public_inputs());

        for row in 0..layout.domain_size() {
            assert!(gate_holds(&layout, &wires, &pi, row), "row {row}");
        }
    }

    #[rstest]
    fn preserve_wire_values_along_the_permutation(multiplier3: Circuit) {
        let layout = Layout::new(&multiplier3).unwrap();
        let witness = multiplier3
            .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
            .unwrap();
        let wires = layout.wire_values(&witness);
        let shifts = column_shifts();

        // Map every label back to its slot and compare the values at both ends.
        let n = layout.domain_size();
        let slot_of = |label: Fr| {
            (0..NUM_WIRES)
                .flat_map(|col| (0..n).map(move |row| (col, row)))
                .find(|&(col, row)| shifts[col] * layout.domain.element(row) == label)
                .unwrap()
        };
        for col in 0..NUM_WIRES {
            for row in 0..n {
                let (to_col, to_row) = slot_of(layout.sigmas[col][row]);
                assert_eq!(wires[col][row], wires[to_col][to_row]);
            }
        }
    }

    #[rstest]
    fn link_the_public_row_to_the_gate_output(multiplier3: Circuit) {
        let layout = Layout::new(&multiplier3).unwrap();
        // Output `d` sits at (a, row 0) and is produced at (c, row 2).
        assert_eq!(layout.sigmas[0][0], K2 * layout.domain.element(2));
        assert_eq!(layout.sigmas[2][2], layout.domain.element(0));
    }

    mod reject {
        use super::*;

        #[rstest]
        fn a_tampered_wire_value(multiplier3: Circuit) {
            let layout = Layout::new(&multiplier3).unwrap();
            let witness = multiplier3
                .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
                .unwrap();
            let mut wires = layout.wire_values(&witness);
            wires[2][2] += Fr::ONE;
            let pi = layout.public_input_values(witness.public_inputs());

            assert!(!gate_holds(&layout, &wires, &pi, 2));
        }
    }
}

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

use snafu::Snafu;

use crate::{
    constants::{NUM_OPENED_AT_ZETA, PLONK_PROOF_SIZE},
    errors::{FieldError, GroupError},
    utils::{read_fr, read_g1, write_fr, write_g1},
    Fr, G1,
};

#[derive(Debug, PartialEq, Snafu)]
pub enum ProofError {
    #[snafu(display("Incorrect buffer size. Expected: {expected_size}; Got: {actual_size}",))]
    IncorrectBufferSize {
        expected_size: usize,
        actual_size: usize,
    },
    #[snafu(display("Group element conversion error for '{field}': {conv_error}"))]
    GroupConversionError {
        field: &'static str,
        conv_error: GroupError,
    },
    #[snafu(display("Field element conversion error for '{field}': {conv_error}"))]
    FieldConversionError {
        field: &'static str,
        conv_error: FieldError,
    },
}

/// Claimed openings. Everything is opened at `ζ` except `z_omega = z(ζω)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluations {
    pub a: Fr,
    pub b: Fr,
    pub c: Fr,
    pub q_l: Fr,
    pub q_r: Fr,
    pub q_o: Fr,
    pub q_m: Fr,
    pub q_c: Fr,
    pub s_1: Fr,
    pub s_2: Fr,
    pub s_3: Fr,
    pub z: Fr,
    pub t: Fr,
    pub z_omega: Fr,
}

impl Evaluations {
    /// Openings at `ζ` in batching order.
    pub(crate) fn at_zeta(&self) -> [Fr; NUM_OPENED_AT_ZETA] {
        [
            self.a, self.b, self.c, self.q_l, self.q_r, self.q_o, self.q_m, self.q_c, self.s_1,
            self.s_2, self.s_3, self.z, self.t,
        ]
    }

    /// Serialisation and transcript order.
    pub(crate) fn all(&self) -> impl Iterator<Item = Fr> {
        self.at_zeta().into_iter().chain([self.z_omega])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlonkProof {
    // Wire commitments
    pub a: G1,
    pub b: G1,
    pub c: G1,
    // Grand product
    pub z: G1,
    // Quotient
    pub t: G1,
    // Opening witnesses
    pub w_zeta: G1,
    pub w_zeta_omega: G1,
    pub evaluations: Evaluations,
}

impl PlonkProof {
    pub(crate) fn commitments(&self) -> [(&'static str, &G1); 7] {
        [
            ("a", &self.a),
            ("b", &self.b),
            ("c", &self.c),
            ("z", &self.z),
            ("t", &self.t),
            ("w_zeta", &self.w_zeta),
            ("w_zeta_omega", &self.w_zeta_omega),
        ]
    }

    /// Points as `x ‖ y` big-endian words, then the evaluations.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PLONK_PROOF_SIZE);
        for (_, point) in self.commitments() {
            write_g1(point, &mut out);
        }
        for evaluation in self.evaluations.all() {
            write_fr(&evaluation, &mut out);
        }
        out
    }
}

fn g1(field: &'static str, data: &mut &[u8]) -> Result<G1, ProofError> {
    let (point, rest) =
        read_g1(data).map_err(|conv_error| ProofError::GroupConversionError { field, conv_error })?;
    *data = rest;
    Ok(point)
}

fn fr(field: &'static str, data: &mut &[u8]) -> Result<Fr, ProofError> {
    let (value, rest) =
        read_fr(data).map_err(|conv_error| ProofError::FieldConversionError { field, conv_error })?;
    *data = rest;
    Ok(value)
}

impl TryFrom<&[u8]> for PlonkProof {
    type Error = ProofError;

    fn try_from(proof: &[u8]) -> Result<Self, Self::Error> {
        if proof.len() != PLONK_PROOF_SIZE {
            return Err(ProofError::IncorrectBufferSize {
                expected_size: PLONK_PROOF_SIZE,
                actual_size: proof.len(),
            });
        }

        let mut data = proof;
        let a = g1("a", &mut data)?;
        let b = g1("b", &mut data)?;
        let c = g1("c", &mut data)?;
        let z = g1("z", &mut data)?;
        let t = g1("t", &mut data)?;
        let w_zeta = g1("w_zeta", &mut data)?;
        let w_zeta_omega = g1("w_zeta_omega", &mut data)?;

        let evaluations = Evaluations {
            a: fr("a_eval", &mut data)?,
            b: fr("b_eval", &mut data)?,
            c: fr("c_eval", &mut data)?,
            q_l: fr("q_l_eval", &mut data)?,
            q_r: fr("q_r_eval", &mut data)?,
            q_o: fr("q_o_eval", &mut data)?,
            q_m: fr("q_m_eval", &mut data)?,
            q_c: fr("q_c_eval", &mut data)?,
            s_1: fr("s_1_eval", &mut data)?,
            s_2: fr("s_2_eval", &mut data)?,
            s_3: fr("s_3_eval", &mut data)?,
            z: fr("z_eval", &mut data)?,
            t: fr("t_eval", &mut data)?,
            z_omega: fr("z_omega_eval", &mut data)?,
        };

        Ok(Self {
            a,
            b,
            c,
            z,
            t,
            w_zeta,
            w_zeta_omega,
            evaluations,
        })
    }
}

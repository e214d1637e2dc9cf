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

//! Fiat-Shamir transcript.
//!
//! Each round hashes the previous challenge together with the round's messages using
//! Keccak-256; the digest, read big-endian and reduced mod r, is the next challenge.
//! Round 0 additionally binds the verification key and the public inputs.

use ark_ff::PrimeField;
use sha3::{Digest, Keccak256};

use crate::{
    utils::{write_g1, IntoBEBytes32},
    Fr, G1,
};

use super::{
    key::VerificationKey,
    proof::{Evaluations, PlonkProof},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Challenges {
    pub(crate) beta: Fr,
    pub(crate) gamma: Fr,
    pub(crate) alpha: Fr,
    pub(crate) zeta: Fr,
    pub(crate) v: Fr,
    pub(crate) u: Fr,
}

#[derive(Clone)]
pub(crate) struct Transcript {
    round: Keccak256,
}

impl Transcript {
    pub(crate) fn new(vk: &VerificationKey, public_inputs: &[Fr]) -> Self {
        let mut transcript = Self {
            round: Keccak256::new()
                .chain_update(vk.domain_size.into_be_bytes32())
                .chain_update(vk.num_public_inputs.into_be_bytes32()),
        };
        for commitment in vk.commitments() {
            transcript.absorb_point(commitment);
        }
        for input in public_inputs {
            transcript.absorb_scalar(input);
        }
        transcript
    }

    pub(crate) fn absorb_point(&mut self, point: &G1) {
        let mut bytes = Vec::with_capacity(64);
        write_g1(point, &mut bytes);
        self.round.update(&bytes);
    }

    pub(crate) fn absorb_scalar(&mut self, value: &Fr) {
        self.round.update(value.into_be_bytes32());
    }

    /// Closes the round. The challenge opens the next one.
    pub(crate) fn challenge(&mut self) -> Fr {
        let hash: [u8; 32] = core::mem::take(&mut self.round).finalize().into();
        let challenge = Fr::from_be_bytes_mod_order(&hash);
        self.round.update(challenge.into_be_bytes32());
        challenge
    }

    pub(crate) fn absorb_evaluations(&mut self, evaluations: &Evaluations) {
        for evaluation in evaluations.all() {
            self.absorb_scalar(&evaluation);
        }
    }
}

/// Replays the prover's transcript for `proof`.
pub(crate) fn generate_challenges(
    vk: &VerificationKey,
    public_inputs: &[Fr],
    proof: &PlonkProof,
) -> Challenges {
    let mut transcript = Transcript::new(vk, public_inputs);

    // Round 1
    transcript.absorb_point(&proof.a);
    transcript.absorb_point(&proof.b);
    transcript.absorb_point(&proof.c);
    let beta = transcript.challenge();
    let gamma = transcript.challenge();

    // Round 2
    transcript.absorb_point(&proof.z);
    let alpha = transcript.challenge();

    // Round 3
    transcript.absorb_point(&proof.t);
    let zeta = transcript.challenge();

    // Round 4
    transcript.absorb_evaluations(&proof.evaluations);
    let v = transcript.challenge();

    // Round 5
    transcript.absorb_point(&proof.w_zeta);
    transcript.absorb_point(&proof.w_zeta_omega);
    let u = transcript.challenge();

    Challenges {
        beta,
        gamma,
        alpha,
        zeta,
        v,
        u,
    }
}

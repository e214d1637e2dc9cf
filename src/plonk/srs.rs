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

//! Structured reference string for KZG commitments over BN254.

use ark_bn254::G1Projective;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::{errors::GenerationError, Fr, G1, G2};

/// Powers `[τ^i]₁` plus `[1]₂` and `[τ]₂`. Circuit independent: any circuit whose
/// domain fits can be preprocessed against the same string.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Srs {
    pub powers_of_g: Vec<G1>,
    pub g2: G2,
    pub x_g2: G2,
}

impl Srs {
    /// Samples a fresh toxic secret and discards it.
    pub fn setup<R: RngCore + CryptoRng>(max_powers: usize, rng: &mut R) -> Self {
        Self::from_secret(max_powers, Fr::rand(rng))
    }

    pub(crate) fn from_secret(max_powers: usize, tau: Fr) -> Self {
        let mut scalars = Vec::with_capacity(max_powers);
        let mut power = Fr::ONE;
        for _ in 0..max_powers {
            scalars.push(power);
            power *= tau;
        }

        let g = G1::generator().into_group();
        let powers = scalars.iter().map(|s| g * s).collect::<Vec<_>>();
        debug!(powers = max_powers, "sampled srs");

        Self {
            powers_of_g: G1Projective::normalize_batch(&powers),
            g2: G2::generator(),
            x_g2: (G2::generator() * tau).into_affine(),
        }
    }

    pub fn max_powers(&self) -> usize {
        self.powers_of_g.len()
    }

    /// Keeps the first `powers` powers.
    pub fn trim(&self, powers: usize) -> Result<Self, GenerationError> {
        if powers > self.max_powers() {
            return Err(GenerationError::SrsTooSmall {
                required: powers,
                available: self.max_powers(),
            });
        }
        Ok(Self {
            powers_of_g: self.powers_of_g[..powers].to_vec(),
            g2: self.g2,
            x_g2: self.x_g2,
        })
    }
}

/// `Σ coeffs[i]·[τ^i]₁`.
pub(crate) fn commit(powers_of_g: &[G1], coeffs: &[Fr]) -> Result<G1, GenerationError> {
    if coeffs.len() > powers_of_g.len() {
        return Err(GenerationError::SrsTooSmall {
            required: coeffs.len(),
            available: powers_of_g.len(),
        });
    }
    Ok(G1Projective::msm_unchecked(&powers_of_g[..coeffs.len()], coeffs).into_affine())
}

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

use ark_poly::{DenseUVPolynomial, EvaluationDomain};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::info;

use crate::{
    circuit::Circuit,
    constants::srs_powers_for_domain,
    errors::GenerationError,
    Fr, G1, G2,
};

use super::{
    layout::Layout,
    poly::Poly,
    srs::{commit, Srs},
};

#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerificationKey {
    // Misc Params
    pub domain_size: u64,
    pub num_public_inputs: u64,
    // Selectors
    pub q_l: G1,
    pub q_r: G1,
    pub q_o: G1,
    pub q_m: G1,
    pub q_c: G1,
    // Copy Constraints
    pub s_1: G1,
    pub s_2: G1,
    pub s_3: G1,
    // SRS
    pub g2: G2,
    pub x_g2: G2,
}

impl VerificationKey {
    /// Selector and permutation commitments in transcript order.
    pub(crate) fn commitments(&self) -> [&G1; 8] {
        [
            &self.q_l, &self.q_r, &self.q_o, &self.q_m, &self.q_c, &self.s_1, &self.s_2, &self.s_3,
        ]
    }
}

/// Preprocessed circuit: coefficient forms of the selector and permutation
/// polynomials plus the SRS prefix needed to commit during proving.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey {
    pub vk: VerificationKey,
    pub circuit_digest: Vec<u8>,
    pub q_l: Vec<Fr>,
    pub q_r: Vec<Fr>,
    pub q_o: Vec<Fr>,
    pub q_m: Vec<Fr>,
    pub q_c: Vec<Fr>,
    pub s_1: Vec<Fr>,
    pub s_2: Vec<Fr>,
    pub s_3: Vec<Fr>,
    pub powers_of_g: Vec<G1>,
}

impl ProvingKey {
    pub(crate) fn poly(coeffs: &[Fr]) -> Poly {
        Poly::from_coefficients_slice(coeffs)
    }

    /// Fails unless this key was preprocessed from `circuit`.
    pub(crate) fn check_circuit(&self, circuit: &Circuit, layout: &Layout) -> Result<(), GenerationError> {
        if self.circuit_digest != circuit.digest()? {
            return Err(GenerationError::KeyMismatch {
                message: format!("key was not preprocessed from circuit '{}'", circuit.name),
            });
        }
        if self.vk.domain_size != layout.domain_size() as u64
            || self.vk.num_public_inputs != layout.num_public_inputs as u64
        {
            return Err(GenerationError::KeyMismatch {
                message: format!(
                    "key describes {} rows and {} public inputs, circuit '{}' needs {} and {}",
                    self.vk.domain_size,
                    self.vk.num_public_inputs,
                    circuit.name,
                    layout.domain_size(),
                    layout.num_public_inputs
                ),
            });
        }
        Ok(())
    }
}

/// Interpolates and commits the circuit polynomials against `srs`.
pub fn preprocess(circuit: &Circuit, srs: &Srs) -> Result<(ProvingKey, VerificationKey), GenerationError> {
    let layout = Layout::new(circuit)?;
    let n = layout.domain_size();
    let srs = srs.trim(srs_powers_for_domain(n))?;

    let ifft = |evals: &[Fr]| layout.domain.ifft(evals);
    let selectors = &layout.selectors;
    let [sigma_1, sigma_2, sigma_3] = &layout.sigmas;
    let (q_l, q_r, q_o, q_m, q_c) = (
        ifft(&selectors.q_l),
        ifft(&selectors.q_r),
        ifft(&selectors.q_o),
        ifft(&selectors.q_m),
        ifft(&selectors.q_c),
    );
    let (s_1, s_2, s_3) = (ifft(sigma_1), ifft(sigma_2), ifft(sigma_3));

    let powers = &srs.powers_of_g;
    let vk = VerificationKey {
        domain_size: n as u64,
        num_public_inputs: layout.num_public_inputs as u64,
        q_l: commit(powers, &q_l)?,
        q_r: commit(powers, &q_r)?,
        q_o: commit(powers, &q_o)?,
        q_m: commit(powers, &q_m)?,
        q_c: commit(powers, &q_c)?,
        s_1: commit(powers, &s_1)?,
        s_2: commit(powers, &s_2)?,
        s_3: commit(powers, &s_3)?,
        g2: srs.g2,
        x_g2: srs.x_g2,
    };
    info!(circuit = %circuit.name, domain_size = n, "preprocessed plonk circuit");

    let pk = ProvingKey {
        vk: vk.clone(),
        circuit_digest: circuit.digest()?,
        q_l,
        q_r,
        q_o,
        q_m,
        q_c,
        s_1,
        s_2,
        s_3,
        powers_of_g: srs.powers_of_g,
    };

    Ok((pk, vk))
}

#[cfg(test)]
mod should {
    use super::*;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_ff::Field;
    use rstest::{fixture, rstest};

    #[fixture]
    fn multiplier3() -> Circuit {
        Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap()
    }

    #[rstest]
    fn size_the_key_to_the_circuit(multiplier3: Circuit) {
        let srs = Srs::from_secret(64, Fr::from(3u64));
        let (pk, vk) = preprocess(&multiplier3, &srs).unwrap();

        assert_eq!(vk.domain_size, 4);
        assert_eq!(vk.num_public_inputs, 1);
        assert_eq!(pk.powers_of_g.len(), srs_powers_for_domain(4));
        assert_eq!(pk.vk, vk);
    }

    #[rstest]
    fn commit_to_the_interpolated_selectors(multiplier3: Circuit) {
        use ark_poly::Polynomial;

        let tau = Fr::from(3u64);
        let srs = Srs::from_secret(64, tau);
        let (pk, vk) = preprocess(&multiplier3, &srs).unwrap();

        let q_m_at_tau = ProvingKey::poly(&pk.q_m).evaluate(&tau);
        assert_eq!(vk.q_m, (G1::generator() * q_m_at_tau).into_affine());
        // q_m is one on the two gate rows.
        let layout = Layout::new(&multiplier3).unwrap();
        let q_m = ProvingKey::poly(&pk.q_m);
        assert_eq!(q_m.evaluate(&layout.domain.element(1)), Fr::ONE);
        assert_eq!(q_m.evaluate(&layout.domain.element(0)), Fr::from(0u64));
    }

    #[rstest]
    fn serialise_keys_as_artifacts(multiplier3: Circuit) {
        let srs = Srs::from_secret(64, Fr::from(3u64));
        let (pk, _) = preprocess(&multiplier3, &srs).unwrap();
        let mut bytes = Vec::new();
        pk.serialize_compressed(&mut bytes).unwrap();

        assert_eq!(ProvingKey::deserialize_compressed(&bytes[..]).unwrap(), pk);
    }

    mod reject {
        use super::*;

        #[rstest]
        fn an_srs_too_short_for_the_domain(multiplier3: Circuit) {
            let srs = Srs::from_secret(10, Fr::from(3u64));
            assert_eq!(
                preprocess(&multiplier3, &srs).map(|_| ()),
                Err(GenerationError::SrsTooSmall {
                    required: 18,
                    available: 10
                })
            );
        }

        #[rstest]
        fn a_key_for_another_circuit(multiplier3: Circuit) {
            let hello = Circuit::from_json(include_str!("../../circuits/hello_world.json")).unwrap();
            let srs = Srs::from_secret(64, Fr::from(3u64));
            let (pk, _) = preprocess(&multiplier3, &srs).unwrap();

            assert!(matches!(
                pk.check_circuit(&hello, &Layout::new(&hello).unwrap()),
                Err(GenerationError::KeyMismatch { .. })
            ));
        }
    }
}

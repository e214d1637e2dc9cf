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

use std::path::Path;

use ark_bn254::G1Projective;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{AdditiveGroup, Field, One};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use tracing::debug;

use crate::{
    backend::{read_artifact, BackendKind},
    calldata::{UniversalArgs, VerifierArguments},
    constants::NUM_OPENED_AT_ZETA,
    errors::{GenerationError, VerifierCallError, VerifyError},
    harness::VerifierContract,
    utils::field_from_biguint,
    Bn254, Fr, G1,
};

use super::{
    key::VerificationKey,
    layout::column_shifts,
    proof::PlonkProof,
    transcript::{generate_challenges, Challenges},
};

/// Verifies a serialised proof.
pub fn verify(vk: &VerificationKey, proof: &[u8], public_inputs: &[Fr]) -> Result<(), VerifyError> {
    let proof = PlonkProof::try_from(proof).map_err(|e| VerifyError::InvalidProofError {
        message: e.to_string(),
    })?;
    verify_proof(vk, &proof, public_inputs)
}

pub fn verify_proof(
    vk: &VerificationKey,
    proof: &PlonkProof,
    public_inputs: &[Fr],
) -> Result<(), VerifyError> {
    check_public_input_number(vk, public_inputs)?;
    let domain = Radix2EvaluationDomain::<Fr>::new(vk.domain_size as usize)
        .filter(|domain| domain.size() as u64 == vk.domain_size)
        .ok_or(VerifyError::KeyError)?;

    let challenges = generate_challenges(vk, public_inputs, proof);

    check_identity(&domain, proof, public_inputs, &challenges)?;
    check_openings(vk, proof, &challenges, domain.group_gen())
}

fn check_public_input_number(vk: &VerificationKey, public_inputs: &[Fr]) -> Result<(), VerifyError> {
    if vk.num_public_inputs != public_inputs.len() as u64 {
        Err(VerifyError::PublicInputError {
            message: format!(
                "Provided public inputs length does not match. Expected: {}; Got: {}",
                vk.num_public_inputs,
                public_inputs.len()
            ),
        })
    } else {
        Ok(())
    }
}

/// `t(ζ)·Z_H(ζ) = gate(ζ) + α·perm(ζ) + α²·(z(ζ) - 1)·L_1(ζ)`
fn check_identity(
    domain: &Radix2EvaluationDomain<Fr>,
    proof: &PlonkProof,
    public_inputs: &[Fr],
    challenges: &Challenges,
) -> Result<(), VerifyError> {
    let Challenges {
        beta,
        gamma,
        alpha,
        zeta,
        ..
    } = *challenges;
    let e = &proof.evaluations;

    let vanishing = domain.evaluate_vanishing_polynomial(zeta);
    if vanishing == Fr::ZERO {
        return Err(verification_error("Evaluation challenge falls on the domain"));
    }
    let lagrange = domain.evaluate_all_lagrange_coefficients(zeta);
    let public_input_eval: Fr = -public_inputs
        .iter()
        .zip(&lagrange)
        .map(|(input, l_i)| *input * l_i)
        .sum::<Fr>();

    let gate = e.q_l * e.a + e.q_r * e.b + e.q_o * e.c + e.q_m * e.a * e.b + e.q_c
        + public_input_eval;

    let [_, k1, k2] = column_shifts();
    let perm = (e.a + beta * zeta + gamma)
        * (e.b + beta * k1 * zeta + gamma)
        * (e.c + beta * k2 * zeta + gamma)
        * e.z
        - (e.a + beta * e.s_1 + gamma)
            * (e.b + beta * e.s_2 + gamma)
            * (e.c + beta * e.s_3 + gamma)
            * e.z_omega;

    let rhs = gate + alpha * perm + alpha.square() * (e.z - Fr::ONE) * lagrange[0];
    if e.t * vanishing != rhs {
        return Err(verification_error("Quotient identity does not hold"));
    }
    Ok(())
}

/// Batched KZG check of the openings at `ζ` and `ζω`:
/// `e(W_ζ + u·W_ζω, [τ]₂) = e(ζ·W_ζ + uζω·W_ζω + F - E + u·([z] - z(ζω)·G), [1]₂)`.
fn check_openings(
    vk: &VerificationKey,
    proof: &PlonkProof,
    challenges: &Challenges,
    omega: Fr,
) -> Result<(), VerifyError> {
    let Challenges { zeta, v, u, .. } = *challenges;

    let commitments: [G1; NUM_OPENED_AT_ZETA] = [
        proof.a, proof.b, proof.c, vk.q_l, vk.q_r, vk.q_o, vk.q_m, vk.q_c, vk.s_1, vk.s_2, vk.s_3,
        proof.z, proof.t,
    ];
    let mut v_powers = [Fr::ONE; NUM_OPENED_AT_ZETA];
    for i in 1..NUM_OPENED_AT_ZETA {
        v_powers[i] = v_powers[i - 1] * v;
    }

    let batched_commitment = G1Projective::msm_unchecked(&commitments, &v_powers);
    let batched_evaluation: Fr = proof
        .evaluations
        .at_zeta()
        .iter()
        .zip(&v_powers)
        .map(|(eval, power)| *eval * power)
        .sum();

    let g = G1::generator();
    let zeta_omega = zeta * omega;
    let lhs = proof.w_zeta.into_group() + proof.w_zeta_omega * u;
    let rhs = proof.w_zeta * zeta + proof.w_zeta_omega * (u * zeta_omega) + batched_commitment
        - g * batched_evaluation
        + (proof.z.into_group() - g * proof.evaluations.z_omega) * u;

    let result = Bn254::multi_pairing(
        [lhs.into_affine(), (-rhs).into_affine()],
        [vk.x_g2, vk.g2],
    );
    if !result.0.is_one() {
        return Err(verification_error("Opening pairing check failed"));
    }
    Ok(())
}

fn verification_error(message: &str) -> VerifyError {
    VerifyError::VerificationError {
        message: message.to_string(),
    }
}

/// Native stand-in for the generated Solidity PLONK verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlonkVerifier {
    vk: VerificationKey,
}

impl PlonkVerifier {
    pub fn new(vk: VerificationKey) -> Self {
        Self { vk }
    }

    pub fn verification_key(&self) -> &VerificationKey {
        &self.vk
    }

    fn verify_universal(&self, args: &UniversalArgs) -> Result<bool, VerifierCallError> {
        let expected = self.num_public_inputs();
        if args.input.len() != expected {
            return Err(VerifierCallError::PublicInputArity {
                expected,
                actual: args.input.len(),
            });
        }
        let proof = args
            .decode_proof()
            .map_err(|e| VerifierCallError::MalformedProofBytes {
                message: e.to_string(),
            })?;
        let Some(inputs) = args
            .input
            .iter()
            .map(field_from_biguint::<Fr>)
            .collect::<Option<Vec<_>>>()
        else {
            debug!("public input is not a scalar field element");
            return Ok(false);
        };

        match verify(&self.vk, &proof, &inputs) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("plonk verification failed: {e}");
                Ok(false)
            }
        }
    }
}

impl VerifierContract for PlonkVerifier {
    fn deploy(verifying_key: &Path) -> Result<Self, GenerationError> {
        read_artifact(verifying_key).map(Self::new)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Universal
    }

    fn num_public_inputs(&self) -> usize {
        self.vk.num_public_inputs as usize
    }

    fn verify_proof(&self, args: &VerifierArguments) -> Result<bool, VerifierCallError> {
        match args {
            VerifierArguments::Universal(args) => self.verify_universal(args),
            other => Err(VerifierCallError::ArgumentShapeMismatch {
                expected: BackendKind::Universal,
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        circuit::{Circuit, WitnessInput},
        plonk::{key::preprocess, prover::prove, srs::Srs},
    };
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    struct Setup {
        vk: VerificationKey,
        proof: PlonkProof,
        public_inputs: Vec<Fr>,
    }

    #[fixture]
    fn setup() -> Setup {
        let mut rng = StdRng::seed_from_u64(0x3c6ef372);
        let circuit =
            Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap();
        let (pk, vk) = preprocess(&circuit, &Srs::setup(32, &mut rng)).unwrap();
        let witness = circuit
            .calculate_witness(&WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]))
            .unwrap();
        let proof = prove(&pk, &circuit, &witness, &mut rng).unwrap();

        Setup {
            vk,
            proof,
            public_inputs: witness.public_inputs().to_vec(),
        }
    }

    fn universal_args(setup: &Setup, input: u64) -> VerifierArguments {
        VerifierArguments::Universal(UniversalArgs {
            proof_bytes: format!("0x{}", hex::encode(setup.proof.to_bytes())),
            input: vec![BigUint::from(input)],
        })
    }

    #[rstest]
    fn accept_a_genuine_proof(setup: Setup) {
        assert_eq!(verify_proof(&setup.vk, &setup.proof, &setup.public_inputs), Ok(()));
        assert_eq!(
            verify(&setup.vk, &setup.proof.to_bytes(), &setup.public_inputs),
            Ok(())
        );
    }

    #[rstest]
    fn return_true_from_the_contract_call(setup: Setup) {
        let args = universal_args(&setup, 162);
        assert_eq!(PlonkVerifier::new(setup.vk).verify_proof(&args), Ok(true));
    }

    mod reject {
        use super::*;

        #[rstest]
        fn a_proof_for_other_public_inputs(setup: Setup) {
            assert!(matches!(
                verify_proof(&setup.vk, &setup.proof, &[Fr::from(163u64)]),
                Err(VerifyError::VerificationError { .. })
            ));
            let args = universal_args(&setup, 163);
            assert_eq!(PlonkVerifier::new(setup.vk).verify_proof(&args), Ok(false));
        }

        #[rstest]
        fn a_tampered_evaluation(mut setup: Setup) {
            setup.proof.evaluations.a += Fr::ONE;
            assert!(verify_proof(&setup.vk, &setup.proof, &setup.public_inputs).is_err());
        }

        #[rstest]
        fn a_tampered_opening_witness(mut setup: Setup) {
            setup.proof.w_zeta_omega = (setup.proof.w_zeta_omega + G1::generator()).into_affine();
            assert_eq!(
                verify_proof(&setup.vk, &setup.proof, &setup.public_inputs),
                Err(VerifyError::VerificationError {
                    message: "Opening pairing check failed".to_string()
                })
            );
        }

        #[rstest]
        fn the_wrong_number_of_public_inputs(setup: Setup) {
            assert!(matches!(
                verify_proof(&setup.vk, &setup.proof, &[]),
                Err(VerifyError::PublicInputError { .. })
            ));
        }

        #[rstest]
        #[case::all_zero(UniversalArgs::zeroed(1))]
        #[case::single_byte(UniversalArgs::truncated(1))]
        fn a_degenerate_proof(setup: Setup, #[case] args: UniversalArgs) {
            assert_eq!(
                PlonkVerifier::new(setup.vk).verify_proof(&VerifierArguments::Universal(args)),
                Ok(false)
            );
        }

        #[rstest]
        fn proof_bytes_that_are_not_hex(setup: Setup) {
            let args = VerifierArguments::Universal(UniversalArgs {
                proof_bytes: "0xzz".to_string(),
                input: vec![BigUint::from(162u32)],
            });
            assert!(matches!(
                PlonkVerifier::new(setup.vk).verify_proof(&args),
                Err(VerifierCallError::MalformedProofBytes { .. })
            ));
        }

        #[rstest]
        fn pairing_arguments(setup: Setup) {
            assert_eq!(
                PlonkVerifier::new(setup.vk)
                    .verify_proof(&VerifierArguments::zeroed(BackendKind::Pairing, 1)),
                Err(VerifierCallError::ArgumentShapeMismatch {
                    expected: BackendKind::Universal,
                    actual: BackendKind::Pairing
                })
            );
        }

        #[rstest]
        fn a_call_with_the_wrong_number_of_inputs(setup: Setup) {
            let VerifierArguments::Universal(mut args) = universal_args(&setup, 162) else {
                unreachable!()
            };
            args.input.push(BigUint::from(1u32));
            assert_eq!(
                PlonkVerifier::new(setup.vk).verify_proof(&VerifierArguments::Universal(args)),
                Err(VerifierCallError::PublicInputArity {
                    expected: 1,
                    actual: 2
                })
            );
        }
    }
}

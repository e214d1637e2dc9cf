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

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::One;
use ark_groth16::VerifyingKey;
use tracing::debug;

use crate::{
    backend::{read_json, BackendKind},
    calldata::{PairingArgs, VerifierArguments},
    canonical::{canonicalize, Value},
    errors::{GenerationError, ValueShapeError, VerifierCallError},
    harness::VerifierContract,
    utils::{field_from_biguint, g1_from_coordinates, g2_from_coordinates},
    Bn254, Fr, G1, G2,
};

use super::verifying_key_from_canonical;

/// Native stand-in for the generated Solidity Groth16 verifier.
///
/// Malformed field elements or points make the call return `false`; only a wrong
/// argument shape or arity raises.
#[derive(Debug, Clone, PartialEq)]
pub struct Groth16Verifier {
    vk: VerifyingKey<Bn254>,
}

impl Groth16Verifier {
    pub fn new(vk: VerifyingKey<Bn254>) -> Self {
        Self { vk }
    }

    /// Accepts `verification_key.json` in any integer encoding.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ValueShapeError> {
        Self::from_tree(&Value::from(json.clone()))
    }

    fn from_tree(tree: &Value) -> Result<Self, ValueShapeError> {
        verifying_key_from_canonical(&canonicalize(tree)).map(Self::new)
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.vk
    }

    fn decode(&self, args: &PairingArgs) -> Option<(G1, G2, G1, Vec<Fr>)> {
        let a = g1_from_coordinates(&args.a[0], &args.a[1])
            .map_err(|e| debug!("a: {e}"))
            .ok()?;
        // Calldata carries each G2 coordinate as (c1, c0).
        let b = g2_from_coordinates(
            [&args.b[0][1], &args.b[0][0]],
            [&args.b[1][1], &args.b[1][0]],
        )
        .map_err(|e| debug!("b: {e}"))
        .ok()?;
        let c = g1_from_coordinates(&args.c[0], &args.c[1])
            .map_err(|e| debug!("c: {e}"))
            .ok()?;
        let inputs = args
            .input
            .iter()
            .map(field_from_biguint::<Fr>)
            .collect::<Option<Vec<_>>>();
        if inputs.is_none() {
            debug!("public input is not a scalar field element");
        }

        Some((a, b, c, inputs?))
    }

    fn verify_pairing(&self, args: &PairingArgs) -> Result<bool, VerifierCallError> {
        let expected = self.num_public_inputs();
        if args.input.len() != expected {
            return Err(VerifierCallError::PublicInputArity {
                expected,
                actual: args.input.len(),
            });
        }
        let Some((a, b, c, inputs)) = self.decode(args) else {
            return Ok(false);
        };

        let vk_x = self.vk.gamma_abc_g1[0].into_group()
            + <Bn254 as Pairing>::G1::msm_unchecked(&self.vk.gamma_abc_g1[1..], &inputs);

        let result = Bn254::multi_pairing(
            [-a, self.vk.alpha_g1, vk_x.into_affine(), c],
            [b, self.vk.beta_g2, self.vk.gamma_g2, self.vk.delta_g2],
        );

        Ok(result.0.is_one())
    }
}

impl VerifierContract for Groth16Verifier {
    fn deploy(verifying_key: &Path) -> Result<Self, GenerationError> {
        Self::from_tree(&read_json(verifying_key)?).map_err(|e| GenerationError::ArtifactCorrupt {
            path: verifying_key.display().to_string(),
            message: e.to_string(),
        })
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Pairing
    }

    fn num_public_inputs(&self) -> usize {
        self.vk.gamma_abc_g1.len() - 1
    }

    fn verify_proof(&self, args: &VerifierArguments) -> Result<bool, VerifierCallError> {
        match args {
            VerifierArguments::Pairing(args) => self.verify_pairing(args),
            other => Err(VerifierCallError::ArgumentShapeMismatch {
                expected: BackendKind::Pairing,
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        backend::{write_json, ProofBackend},
        calldata::decompose_pairing,
        circuit::{Circuit, WitnessInput},
        groth16::{verifying_key_to_json, Groth16Backend},
    };
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    struct Setup {
        verifier: Groth16Verifier,
        args: PairingArgs,
    }

    #[fixture]
    fn setup() -> Setup {
        let mut rng = StdRng::seed_from_u64(0xbb67ae85);
        let circuit =
            Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let artifacts = Groth16Backend.setup(&circuit, dir.path(), &mut rng).unwrap();
        let (proof, signals) = Groth16Backend
            .produce_proof(
                &WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]),
                &artifacts,
                &mut rng,
            )
            .unwrap();
        let calldata = Groth16Backend
            .serialize_for_verifier(&proof, &signals)
            .unwrap();

        Setup {
            verifier: Groth16Verifier::deploy(&artifacts.verifying_key).unwrap(),
            args: decompose_pairing(&calldata).unwrap(),
        }
    }

    #[rstest]
    fn accept_a_genuine_proof(setup: Setup) {
        assert_eq!(
            setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
            Ok(true)
        );
    }

    #[rstest]
    fn load_a_key_with_hex_encoded_integers(setup: Setup) {
        let mut json = verifying_key_to_json(setup.verifier.verifying_key());
        json["IC"][0][0] = serde_json::Value::String(format!(
            "0x{}",
            BigUint::parse_bytes(json["IC"][0][0].as_str().unwrap().as_bytes(), 10)
                .unwrap()
                .to_str_radix(16)
        ));
        json["nPublic"] = serde_json::Value::String("1".to_string());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vk.json");
        write_json(&json, &path).unwrap();

        assert_eq!(Groth16Verifier::deploy(&path), Ok(setup.verifier));
    }

    mod reject {
        use super::*;

        #[rstest]
        fn a_proof_for_other_public_inputs(mut setup: Setup) {
            setup.args.input[0] = BigUint::from(163u32);
            assert_eq!(
                setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
                Ok(false)
            );
        }

        #[rstest]
        fn an_all_zero_proof(setup: Setup) {
            assert_eq!(
                setup
                    .verifier
                    .verify_proof(&VerifierArguments::zeroed(BackendKind::Pairing, 1)),
                Ok(false)
            );
        }

        #[rstest]
        fn a_proof_with_swapped_g2_limbs(mut setup: Setup) {
            setup.args.b[0].swap(0, 1);
            setup.args.b[1].swap(0, 1);
            assert_eq!(
                setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
                Ok(false)
            );
        }

        #[rstest]
        fn a_public_input_outside_the_scalar_field(mut setup: Setup) {
            setup.args.input[0] = BigUint::from(1u32) << 254;
            assert_eq!(
                setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
                Ok(false)
            );
        }

        #[rstest]
        fn a_coordinate_outside_the_base_field(mut setup: Setup) {
            setup.args.a[0] = BigUint::from(1u32) << 255;
            assert_eq!(
                setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
                Ok(false)
            );
        }

        #[rstest]
        fn a_call_with_the_wrong_number_of_inputs(mut setup: Setup) {
            setup.args.input.push(BigUint::from(1u32));
            assert_eq!(
                setup.verifier.verify_proof(&VerifierArguments::Pairing(setup.args)),
                Err(VerifierCallError::PublicInputArity {
                    expected: 1,
                    actual: 2
                })
            );
        }

        #[rstest]
        fn universal_arguments(setup: Setup) {
            assert_eq!(
                setup
                    .verifier
                    .verify_proof(&VerifierArguments::zeroed(BackendKind::Universal, 1)),
                Err(VerifierCallError::ArgumentShapeMismatch {
                    expected: BackendKind::Pairing,
                    actual: BackendKind::Universal
                })
            );
        }
    }
}

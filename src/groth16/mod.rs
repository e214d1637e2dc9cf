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

//! Pairing-based backend: Groth16 over BN254 with a circuit-specific setup.

mod r1cs;
mod verifier;

use std::path::Path;

use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    backend::{
        g1_at, g1_json, g2_at, g2_json, read_artifact, write_artifact, write_json, BackendKind,
        Calldata, CircuitArtifacts, PairingProof, Proof, ProofBackend, PublicSignals,
    },
    canonical::{self, Value},
    circuit::{Circuit, WitnessInput},
    constants::{CURVE_BN128, PROTOCOL_GROTH16},
    errors::{GenerationError, ValueShapeError},
    utils::{g1_coordinates, g2_coordinates, hex_word},
    Bn254,
};

pub(crate) use r1cs::R1csCircuit;
pub use verifier::Groth16Verifier;

pub const CIRCUIT_FILE: &str = "circuit.json";
pub const PROVING_KEY_FILE: &str = "groth16_pkey.bin";
pub const VERIFICATION_KEY_FILE: &str = "verification_key.json";

/// Circuit-specific trusted setup.
pub fn setup<R: RngCore + CryptoRng>(
    circuit: &Circuit,
    rng: &mut R,
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), GenerationError> {
    circuit.validate()?;
    Groth16::<Bn254>::circuit_specific_setup(R1csCircuit::shape(circuit), rng)
        .map_err(r1cs::synthesis_error)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16Backend;

impl ProofBackend for Groth16Backend {
    const KIND: BackendKind = BackendKind::Pairing;

    fn setup<R: RngCore + CryptoRng>(
        &self,
        circuit: &Circuit,
        dir: &Path,
        rng: &mut R,
    ) -> Result<CircuitArtifacts, GenerationError> {
        let (pk, vk) = setup(circuit, rng)?;
        let artifacts = CircuitArtifacts {
            circuit: dir.join(CIRCUIT_FILE),
            proving_key: dir.join(PROVING_KEY_FILE),
            verifying_key: dir.join(VERIFICATION_KEY_FILE),
        };

        write_json(&circuit.to_json()?, &artifacts.circuit)?;
        write_artifact(&pk, &artifacts.proving_key)?;
        write_json(&verifying_key_to_json(&vk), &artifacts.verifying_key)?;
        info!(circuit = %circuit.name, dir = %dir.display(), "groth16 setup done");

        Ok(artifacts)
    }

    fn produce_proof<R: RngCore + CryptoRng>(
        &self,
        input: &WitnessInput,
        artifacts: &CircuitArtifacts,
        rng: &mut R,
    ) -> Result<(Proof, PublicSignals), GenerationError> {
        let circuit = Circuit::load(&artifacts.circuit)?;
        let witness = circuit.calculate_witness(input)?;
        let pk: ProvingKey<Bn254> = read_artifact(&artifacts.proving_key)?;

        let expected = circuit.num_public_outputs() + 1;
        if pk.vk.gamma_abc_g1.len() != expected {
            return Err(GenerationError::KeyMismatch {
                message: format!(
                    "key has {} public input bases, circuit '{}' needs {expected}",
                    pk.vk.gamma_abc_g1.len(),
                    circuit.name
                ),
            });
        }

        let assigned = R1csCircuit::assigned(&circuit, &witness);
        assigned.check_satisfied()?;
        let proof = Groth16::<Bn254>::prove(&pk, assigned, rng).map_err(r1cs::synthesis_error)?;
        debug!(circuit = %circuit.name, "groth16 proof generated");

        Ok((
            Proof::Pairing(PairingProof {
                a: proof.a,
                b: proof.b,
                c: proof.c,
            }),
            witness.public_signals(),
        ))
    }

    /// Solidity calldata in the `snarkjs zkey export soliditycalldata` layout. Each
    /// G2 coordinate is written imaginary part first, as the precompile expects.
    fn serialize_for_verifier(
        &self,
        proof: &Proof,
        signals: &[BigUint],
    ) -> Result<Calldata, GenerationError> {
        let Proof::Pairing(proof) = proof else {
            return Err(GenerationError::WrongProofVariant {
                expected: BackendKind::Pairing,
            });
        };

        let [ax, ay] = g1_coordinates(&proof.a);
        let [[bx0, bx1], [by0, by1]] = g2_coordinates(&proof.b);
        let [cx, cy] = g1_coordinates(&proof.c);
        let inputs = signals
            .iter()
            .map(|s| format!("\"{}\"", hex_word(s)))
            .collect::<Vec<_>>()
            .join(",");

        Ok(Calldata::new(format!(
            "[\"{}\", \"{}\"],[[\"{}\", \"{}\"],[\"{}\", \"{}\"]],[\"{}\", \"{}\"],[{inputs}]",
            hex_word(&ax),
            hex_word(&ay),
            hex_word(&bx1),
            hex_word(&bx0),
            hex_word(&by1),
            hex_word(&by0),
            hex_word(&cx),
            hex_word(&cy),
        )))
    }
}

/// `verification_key.json` in the layout proof tooling uses.
pub fn verifying_key_to_json(vk: &VerifyingKey<Bn254>) -> serde_json::Value {
    json!({
        "protocol": PROTOCOL_GROTH16,
        "curve": CURVE_BN128,
        "nPublic": vk.gamma_abc_g1.len().saturating_sub(1),
        "vk_alpha_1": g1_json(&vk.alpha_g1),
        "vk_beta_2": g2_json(&vk.beta_g2),
        "vk_gamma_2": g2_json(&vk.gamma_g2),
        "vk_delta_2": g2_json(&vk.delta_g2),
        "IC": vk.gamma_abc_g1.iter().map(g1_json).collect::<Vec<_>>(),
    })
}

/// Rebuilds a verifying key from its canonicalised JSON tree.
pub fn verifying_key_from_canonical(tree: &Value) -> Result<VerifyingKey<Bn254>, ValueShapeError> {
    let ic = canonical::sequence(canonical::field(tree, "vk", "IC")?, "vk.IC", 1)?
        .iter()
        .enumerate()
        .map(|(i, point)| g1_at(point, &format!("vk.IC[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let n_public = canonical::integer(canonical::field(tree, "vk", "nPublic")?, "vk.nPublic")?;
    if *n_public != BigUint::from(ic.len() - 1) {
        return Err(ValueShapeError {
            path: "vk.nPublic".to_string(),
            expected: "the number of IC points minus one",
        });
    }

    Ok(VerifyingKey {
        alpha_g1: g1_at(canonical::field(tree, "vk", "vk_alpha_1")?, "vk.vk_alpha_1")?,
        beta_g2: g2_at(canonical::field(tree, "vk", "vk_beta_2")?, "vk.vk_beta_2")?,
        gamma_g2: g2_at(canonical::field(tree, "vk", "vk_gamma_2")?, "vk.vk_gamma_2")?,
        delta_g2: g2_at(canonical::field(tree, "vk", "vk_delta_2")?, "vk.vk_delta_2")?,
        gamma_abc_g1: ic,
    })
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        calldata::{decompose_pairing, PairingArgs},
        canonical::canonicalize,
    };
    use ark_std::UniformRand;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn multiplier3() -> Circuit {
        Circuit::from_json(include_str!("../../circuits/multiplier3.json")).unwrap()
    }

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x6a09e667)
    }

    #[rstest]
    fn round_trip_the_verifying_key_through_canonical_json(multiplier3: Circuit, mut rng: StdRng) {
        let (_, vk) = setup(&multiplier3, &mut rng).unwrap();
        let tree = canonicalize(&Value::from(verifying_key_to_json(&vk)));

        assert_eq!(verifying_key_from_canonical(&tree), Ok(vk));
    }

    #[rstest]
    fn prove_from_artifacts_on_disk(multiplier3: Circuit, mut rng: StdRng) {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = Groth16Backend
            .setup(&multiplier3, dir.path(), &mut rng)
            .unwrap();

        let (proof, signals) = Groth16Backend
            .produce_proof(
                &WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]),
                &artifacts,
                &mut rng,
            )
            .unwrap();

        assert_eq!(proof.kind(), BackendKind::Pairing);
        assert_eq!(signals, vec![BigUint::from(162u32)]);
    }

    #[rstest]
    fn lay_out_calldata_like_solidity_exports(mut rng: StdRng) {
        use ark_ec::{AffineRepr, CurveGroup};

        let proof = PairingProof {
            a: crate::G1::rand(&mut rng),
            b: crate::G2::rand(&mut rng),
            c: (crate::G1::generator() * crate::Fr::from(2u64)).into_affine(),
        };
        let calldata = Groth16Backend
            .serialize_for_verifier(&Proof::Pairing(proof.clone()), &[BigUint::from(162u32)])
            .unwrap();

        assert!(calldata.as_str().ends_with(&format!(
            "[\"0x{:064x}\"]",
            162u32
        )));
        let PairingArgs { a, b, c, input } = decompose_pairing(&calldata).unwrap();
        let [[bx0, bx1], [by0, by1]] = g2_coordinates(&proof.b);
        assert_eq!(a, g1_coordinates(&proof.a));
        assert_eq!(b, [[bx1, bx0], [by1, by0]]);
        assert_eq!(c, g1_coordinates(&proof.c));
        assert_eq!(input, vec![BigUint::from(162u32)]);
    }

    #[rstest]
    fn close_the_calldata_with_an_empty_input_list(mut rng: StdRng) {
        let proof = PairingProof {
            a: crate::G1::rand(&mut rng),
            b: crate::G2::rand(&mut rng),
            c: crate::G1::rand(&mut rng),
        };
        let calldata = Groth16Backend
            .serialize_for_verifier(&Proof::Pairing(proof.clone()), &[])
            .unwrap();

        assert!(calldata.as_str().ends_with(",[]"));
        let args = decompose_pairing(&calldata).unwrap();
        assert_eq!(args.a, g1_coordinates(&proof.a));
        assert!(args.input.is_empty());
    }

    mod reject {
        use super::*;
        use crate::{backend::UniversalProof, calldata::UniversalArgs};

        #[rstest]
        fn setup_of_a_circuit_using_a_signal_before_it_is_assigned(mut rng: StdRng) {
            let circuit = Circuit {
                name: "OutOfOrder".to_string(),
                inputs: vec!["a".to_string(), "b".to_string()],
                gates: vec![
                    crate::Gate::Mul {
                        left: "a".to_string(),
                        right: "d".to_string(),
                        out: "c".to_string(),
                    },
                    crate::Gate::Mul {
                        left: "a".to_string(),
                        right: "b".to_string(),
                        out: "d".to_string(),
                    },
                ],
                outputs: vec!["c".to_string()],
            };

            assert_eq!(
                setup(&circuit, &mut rng).map(|_| ()),
                Err(GenerationError::UnassignedSignal {
                    signal: "d".to_string()
                })
            );
        }

        #[rstest]
        fn a_witness_failing_the_circuit(multiplier3: Circuit, mut rng: StdRng) {
            let dir = tempfile::tempdir().unwrap();
            let artifacts = Groth16Backend
                .setup(&multiplier3, dir.path(), &mut rng)
                .unwrap();

            assert_eq!(
                Groth16Backend
                    .produce_proof(&WitnessInput::new([("a", 3u32), ("b", 6)]), &artifacts, &mut rng)
                    .map(|_| ()),
                Err(GenerationError::MissingInput {
                    signal: "c".to_string()
                })
            );
        }

        #[rstest]
        fn a_proving_key_of_another_circuit(multiplier3: Circuit, mut rng: StdRng) {
            let two_outputs = Circuit::from_json(
                r#"{"name": "Pair", "inputs": ["a", "b"],
                    "gates": [{"op": "mul", "left": "a", "right": "b", "out": "c"}],
                    "outputs": ["a", "c"]}"#,
            )
            .unwrap();
            let dir = tempfile::tempdir().unwrap();
            let artifacts = Groth16Backend
                .setup(&multiplier3, dir.path(), &mut rng)
                .unwrap();
            write_json(&two_outputs.to_json().unwrap(), &artifacts.circuit).unwrap();

            assert!(matches!(
                Groth16Backend.produce_proof(
                    &WitnessInput::new([("a", 3u32), ("b", 6)]),
                    &artifacts,
                    &mut rng
                ),
                Err(GenerationError::KeyMismatch { .. })
            ));
        }

        #[rstest]
        fn serialising_a_universal_proof() {
            let proof = Proof::Universal(UniversalProof {
                bytes: UniversalArgs::zeroed(0).decode_proof().unwrap(),
            });

            assert_eq!(
                Groth16Backend.serialize_for_verifier(&proof, &[]),
                Err(GenerationError::WrongProofVariant {
                    expected: BackendKind::Pairing
                })
            );
        }
    }
}

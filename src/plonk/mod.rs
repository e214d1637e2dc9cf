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

//! Universal-setup backend: an unrolled PLONK with KZG commitments over BN254.
//!
//! The proof carries seven G1 commitments and fourteen evaluations; its byte layout is
//! described by [`PlonkProof`].

mod key;
mod layout;
mod poly;
mod proof;
mod prover;
mod srs;
mod transcript;
mod verifier;

use std::path::Path;

use ark_poly::EvaluationDomain;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::info;

use crate::{
    backend::{
        read_artifact, write_artifact, write_json, BackendKind, Calldata, CircuitArtifacts, Proof,
        ProofBackend, PublicSignals, UniversalProof,
    },
    circuit::{Circuit, WitnessInput},
    constants::srs_powers_for_domain,
    errors::GenerationError,
    utils::{hex_word, to_hex_string},
};

pub use key::{preprocess, ProvingKey, VerificationKey};
pub use proof::{Evaluations, PlonkProof, ProofError};
pub use srs::Srs;
pub use verifier::{verify, verify_proof, PlonkVerifier};

pub const CIRCUIT_FILE: &str = "circuit.json";
pub const PROVING_KEY_FILE: &str = "plonk_pkey.bin";
pub const VERIFICATION_KEY_FILE: &str = "plonk_vkey.bin";

#[derive(Debug, Clone, Copy, Default)]
pub struct PlonkBackend;

impl PlonkBackend {
    /// Number of SRS powers needed to preprocess `circuit`.
    pub fn required_srs_powers(circuit: &Circuit) -> Result<usize, GenerationError> {
        let rows = circuit.num_public_outputs() + circuit.gates.len();
        Ok(srs_powers_for_domain(layout::domain_for_rows(rows)?.size()))
    }

    /// Preprocesses `circuit` against an existing SRS and writes its artifacts.
    pub fn setup_with_srs(
        &self,
        circuit: &Circuit,
        srs: &Srs,
        dir: &Path,
    ) -> Result<CircuitArtifacts, GenerationError> {
        let (pk, vk) = preprocess(circuit, srs)?;
        let artifacts = CircuitArtifacts {
            circuit: dir.join(CIRCUIT_FILE),
            proving_key: dir.join(PROVING_KEY_FILE),
            verifying_key: dir.join(VERIFICATION_KEY_FILE),
        };

        write_json(&circuit.to_json()?, &artifacts.circuit)?;
        write_artifact(&pk, &artifacts.proving_key)?;
        write_artifact(&vk, &artifacts.verifying_key)?;
        info!(circuit = %circuit.name, dir = %dir.display(), "plonk setup done");

        Ok(artifacts)
    }
}

impl ProofBackend for PlonkBackend {
    const KIND: BackendKind = BackendKind::Universal;

    fn setup<R: RngCore + CryptoRng>(
        &self,
        circuit: &Circuit,
        dir: &Path,
        rng: &mut R,
    ) -> Result<CircuitArtifacts, GenerationError> {
        let srs = Srs::setup(Self::required_srs_powers(circuit)?, rng);
        self.setup_with_srs(circuit, &srs, dir)
    }

    fn produce_proof<R: RngCore + CryptoRng>(
        &self,
        input: &WitnessInput,
        artifacts: &CircuitArtifacts,
        rng: &mut R,
    ) -> Result<(Proof, PublicSignals), GenerationError> {
        let circuit = Circuit::load(&artifacts.circuit)?;
        let witness = circuit.calculate_witness(input)?;
        let pk: ProvingKey = read_artifact(&artifacts.proving_key)?;

        let proof = prover::prove(&pk, &circuit, &witness, rng)?;

        Ok((
            Proof::Universal(UniversalProof {
                bytes: proof.to_bytes(),
            }),
            witness.public_signals(),
        ))
    }

    /// `0x<proof>,["0x<input>",...]`
    fn serialize_for_verifier(
        &self,
        proof: &Proof,
        signals: &[BigUint],
    ) -> Result<Calldata, GenerationError> {
        let Proof::Universal(proof) = proof else {
            return Err(GenerationError::WrongProofVariant {
                expected: BackendKind::Universal,
            });
        };
        let inputs = signals
            .iter()
            .map(|s| format!("\"{}\"", hex_word(s)))
            .collect::<Vec<_>>()
            .join(",");

        Ok(Calldata::new(format!(
            "{},[{inputs}]",
            to_hex_string(&proof.bytes)
        )))
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        calldata::{decompose_universal, VerifierArguments},
        constants::PLONK_PROOF_SIZE,
        harness::VerifierContract,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xa54ff53a)
    }

    fn circuit(json: &str) -> Circuit {
        Circuit::from_json(json).unwrap()
    }

    #[rstest]
    fn prove_and_verify_from_artifacts_on_disk(mut rng: StdRng) {
        let circuit = circuit(include_str!("../../circuits/multiplier3.json"));
        let dir = tempfile::tempdir().unwrap();
        let artifacts = PlonkBackend.setup(&circuit, dir.path(), &mut rng).unwrap();

        let (proof, signals) = PlonkBackend
            .produce_proof(
                &WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)]),
                &artifacts,
                &mut rng,
            )
            .unwrap();
        let calldata = PlonkBackend.serialize_for_verifier(&proof, &signals).unwrap();
        let args = decompose_universal(&calldata).unwrap();

        assert_eq!(signals, vec![BigUint::from(162u32)]);
        assert_eq!(args.decode_proof().unwrap().len(), PLONK_PROOF_SIZE);
        assert_eq!(
            PlonkVerifier::deploy(&artifacts.verifying_key)
                .unwrap()
                .verify_proof(&VerifierArguments::Universal(args)),
            Ok(true)
        );
    }

    #[rstest]
    fn share_one_srs_between_circuits(mut rng: StdRng) {
        let hello = circuit(include_str!("../../circuits/hello_world.json"));
        let multiplier3 = circuit(include_str!("../../circuits/multiplier3.json"));
        let srs = Srs::setup(64, &mut rng);

        for (circuit, input) in [
            (&hello, WitnessInput::new([("a", 1u32), ("b", 2)])),
            (&multiplier3, WitnessInput::new([("a", 3u32), ("b", 6), ("c", 9)])),
        ] {
            let dir = tempfile::tempdir().unwrap();
            let artifacts = PlonkBackend.setup_with_srs(circuit, &srs, dir.path()).unwrap();
            let (proof, signals) = PlonkBackend
                .produce_proof(&input, &artifacts, &mut rng)
                .unwrap();
            let Proof::Universal(proof) = proof else {
                unreachable!()
            };
            let vk: VerificationKey = read_artifact(&artifacts.verifying_key).unwrap();
            let inputs: Vec<crate::Fr> = signals.iter().map(|s| crate::Fr::from(s.clone())).collect();

            assert_eq!(verify(&vk, &proof.bytes, &inputs), Ok(()));
        }
    }

    #[rstest]
    fn lay_out_calldata_as_proof_then_inputs() {
        let proof = Proof::Universal(UniversalProof {
            bytes: vec![0x00, 0x3a],
        });
        let calldata = PlonkBackend
            .serialize_for_verifier(&proof, &[BigUint::from(2u32)])
            .unwrap();

        assert_eq!(
            calldata.as_str(),
            format!("0x003a,[\"0x{:064x}\"]", 2)
        );
    }

    mod reject {
        use super::*;

        #[rstest]
        fn a_proving_key_of_another_circuit(mut rng: StdRng) {
            let hello = circuit(include_str!("../../circuits/hello_world.json"));
            let multiplier3 = circuit(include_str!("../../circuits/multiplier3.json"));
            let dir = tempfile::tempdir().unwrap();
            let artifacts = PlonkBackend.setup(&multiplier3, dir.path(), &mut rng).unwrap();
            write_json(&hello.to_json().unwrap(), &artifacts.circuit).unwrap();

            assert!(matches!(
                PlonkBackend.produce_proof(
                    &WitnessInput::new([("a", 1u32), ("b", 2)]),
                    &artifacts,
                    &mut rng
                ),
                Err(GenerationError::KeyMismatch { .. })
            ));
        }

        #[rstest]
        fn serialising_a_pairing_proof() {
            use crate::backend::PairingProof;
            use ark_ec::AffineRepr;

            let proof = Proof::Pairing(PairingProof {
                a: crate::G1::zero(),
                b: crate::G2::zero(),
                c: crate::G1::zero(),
            });
            assert_eq!(
                PlonkBackend.serialize_for_verifier(&proof, &[]),
                Err(GenerationError::WrongProofVariant {
                    expected: BackendKind::Universal
                })
            );
        }
    }
}

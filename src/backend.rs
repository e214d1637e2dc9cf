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

//! The adapter contract shared by both proof systems.

use core::fmt;
use std::path::{Path, PathBuf};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    canonical::{self, Value},
    circuit::{Circuit, WitnessInput},
    constants::{CURVE_BN128, PLONK_PROOF_SIZE, PROTOCOL_GROTH16, PROTOCOL_PLONK},
    errors::{GenerationError, ValueShapeError},
    utils::{g1_coordinates, g1_from_coordinates, g2_coordinates, g2_from_coordinates, to_hex_string},
    G1, G2,
};

/// Which verifier call shape a backend targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Circuit-specific setup, `verifyProof(a, b, c, input)`.
    #[serde(rename = "groth16")]
    Pairing,
    /// Universal setup, `verifyProof(proof, input)`.
    #[serde(rename = "plonk")]
    Universal,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Pairing => write!(f, "pairing-based"),
            BackendKind::Universal => write!(f, "universal-setup"),
        }
    }
}

/// Groth16 proof points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingProof {
    pub a: G1,
    pub b: G2,
    pub c: G1,
}

/// Serialised PLONK proof. Its layout belongs to the universal-setup backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversalProof {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proof {
    Pairing(PairingProof),
    Universal(UniversalProof),
}

/// Public outputs in the circuit's declared order.
pub type PublicSignals = Vec<BigUint>;

/// Textual verifier arguments as emitted by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata(String);

impl Calldata {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Calldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the build pipeline left the artifacts of one circuit for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitArtifacts {
    /// Circuit description, used as the witness calculator.
    pub circuit: PathBuf,
    pub proving_key: PathBuf,
    pub verifying_key: PathBuf,
}

pub trait ProofBackend {
    const KIND: BackendKind;

    /// Runs the backend's setup for `circuit` and writes its artifacts into `dir`.
    fn setup<R: RngCore + CryptoRng>(
        &self,
        circuit: &Circuit,
        dir: &Path,
        rng: &mut R,
    ) -> Result<CircuitArtifacts, GenerationError>;

    /// Computes the witness and proves it against the proving key on disk.
    fn produce_proof<R: RngCore + CryptoRng>(
        &self,
        witness: &WitnessInput,
        artifacts: &CircuitArtifacts,
        rng: &mut R,
    ) -> Result<(Proof, PublicSignals), GenerationError>;

    /// Encodes proof and public signals the way the verifier call expects them.
    fn serialize_for_verifier(
        &self,
        proof: &Proof,
        signals: &[BigUint],
    ) -> Result<Calldata, GenerationError>;
}

impl Proof {
    pub fn kind(&self) -> BackendKind {
        match self {
            Proof::Pairing(_) => BackendKind::Pairing,
            Proof::Universal(_) => BackendKind::Universal,
        }
    }

    /// JSON form with string-encoded integers, as proof tooling writes `proof.json`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Proof::Pairing(proof) => json!({
                "pi_a": g1_json(&proof.a),
                "pi_b": g2_json(&proof.b),
                "pi_c": g1_json(&proof.c),
                "protocol": PROTOCOL_GROTH16,
                "curve": CURVE_BN128,
            }),
            Proof::Universal(proof) => json!({
                "proof": to_hex_string(&proof.bytes),
                "protocol": PROTOCOL_PLONK,
                "curve": CURVE_BN128,
            }),
        }
    }

    /// Rebuilds a typed proof from a canonicalised JSON tree.
    pub fn from_canonical(kind: BackendKind, tree: &Value) -> Result<Self, ValueShapeError> {
        match kind {
            BackendKind::Pairing => {
                let a = g1_at(canonical::field(tree, "proof", "pi_a")?, "proof.pi_a")?;
                let c = g1_at(canonical::field(tree, "proof", "pi_c")?, "proof.pi_c")?;

                let b = g2_at(canonical::field(tree, "proof", "pi_b")?, "proof.pi_b")?;

                Ok(Proof::Pairing(PairingProof { a, b, c }))
            }
            BackendKind::Universal => {
                let path = "proof.proof";
                let blob = canonical::integer(canonical::field(tree, "proof", "proof")?, path)?;
                // The canonicaliser turns the hex blob into an integer; restore the
                // fixed-width byte string, leading zero bytes included.
                let digits = blob.to_bytes_be();
                if digits.len() > PLONK_PROOF_SIZE {
                    return Err(ValueShapeError {
                        path: path.to_string(),
                        expected: "a proof of the universal-setup size",
                    });
                }
                let mut bytes = vec![0u8; PLONK_PROOF_SIZE - digits.len()];
                bytes.extend_from_slice(&digits);
                Ok(Proof::Universal(UniversalProof { bytes }))
            }
        }
    }
}

/// Projective-style `[x, y, "1"]` with decimal coordinates.
pub(crate) fn g1_json(point: &G1) -> serde_json::Value {
    let [x, y] = g1_coordinates(point);
    json!([x.to_str_radix(10), y.to_str_radix(10), "1"])
}

/// `[[x.c0, x.c1], [y.c0, y.c1], ["1", "0"]]` with decimal coordinates.
pub(crate) fn g2_json(point: &G2) -> serde_json::Value {
    let [[x0, x1], [y0, y1]] = g2_coordinates(point);
    json!([
        [x0.to_str_radix(10), x1.to_str_radix(10)],
        [y0.to_str_radix(10), y1.to_str_radix(10)],
        ["1", "0"]
    ])
}

pub(crate) fn g1_at(value: &Value, path: &str) -> Result<G1, ValueShapeError> {
    let coordinates = canonical::sequence(value, path, 2)?;
    let x = canonical::integer(&coordinates[0], &format!("{path}[0]"))?;
    let y = canonical::integer(&coordinates[1], &format!("{path}[1]"))?;
    g1_from_coordinates(x, y).map_err(|_| ValueShapeError {
        path: path.to_string(),
        expected: "a G1 point",
    })
}

pub(crate) fn g2_at(value: &Value, path: &str) -> Result<G2, ValueShapeError> {
    let coordinates = canonical::sequence(value, path, 2)?;
    let x = canonical::sequence(&coordinates[0], &format!("{path}[0]"), 2)?;
    let y = canonical::sequence(&coordinates[1], &format!("{path}[1]"), 2)?;
    g2_from_coordinates(
        [
            canonical::integer(&x[0], &format!("{path}[0][0]"))?,
            canonical::integer(&x[1], &format!("{path}[0][1]"))?,
        ],
        [
            canonical::integer(&y[0], &format!("{path}[1][0]"))?,
            canonical::integer(&y[1], &format!("{path}[1][1]"))?,
        ],
    )
    .map_err(|_| ValueShapeError {
        path: path.to_string(),
        expected: "a G2 point",
    })
}

/// `public.json` form: decimal strings in signal order.
pub fn signals_to_json(signals: &[BigUint]) -> serde_json::Value {
    serde_json::Value::Array(
        signals
            .iter()
            .map(|s| serde_json::Value::String(s.to_str_radix(10)))
            .collect(),
    )
}

pub fn signals_from_canonical(tree: &Value) -> Result<PublicSignals, ValueShapeError> {
    canonical::integers(tree, "publicSignals")
}

pub fn write_artifact<T: CanonicalSerialize>(value: &T, path: &Path) -> Result<(), GenerationError> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut bytes)
        .map_err(|e| GenerationError::ArtifactCorrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    std::fs::write(path, bytes).map_err(|e| GenerationError::ArtifactMissing {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub fn write_json(value: &serde_json::Value, path: &Path) -> Result<(), GenerationError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| GenerationError::ArtifactCorrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(path, text).map_err(|e| GenerationError::ArtifactMissing {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub fn read_json(path: &Path) -> Result<Value, GenerationError> {
    let text = std::fs::read_to_string(path).map_err(|e| GenerationError::ArtifactMissing {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Value::parse(&text).map_err(|e| GenerationError::ArtifactCorrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub fn read_artifact<T: CanonicalDeserialize>(path: &Path) -> Result<T, GenerationError> {
    let bytes = std::fs::read(path).map_err(|e| GenerationError::ArtifactMissing {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    T::deserialize_compressed(&bytes[..]).map_err(|e| GenerationError::ArtifactCorrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

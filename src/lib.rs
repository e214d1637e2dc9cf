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

//! Proof-to-calldata marshalling harness.
//!
//! Drives a pairing-based backend (Groth16) and a universal-setup backend (PLONK with
//! KZG) over BN254 from witness to proof, normalises the JSON artifacts the backends
//! emit, decomposes the textual calldata into typed verifier arguments and checks the
//! verdict of a native verifier that mirrors the generated Solidity contract.

pub mod backend;
pub mod calldata;
pub mod canonical;
pub mod circuit;
mod constants;
pub mod errors;
pub mod groth16;
pub mod harness;
pub mod manifest;
pub mod plonk;
mod utils;

pub use ark_bn254::{Bn254, Fq, Fq2, Fr};

pub type G1 = ark_bn254::G1Affine;
pub type G2 = ark_bn254::G2Affine;
pub type U256 = ark_ff::BigInt<4>;

pub use backend::{BackendKind, Calldata, CircuitArtifacts, Proof, ProofBackend, PublicSignals};
pub use calldata::{decompose, PairingArgs, UniversalArgs, VerifierArguments};
pub use canonical::{canonicalize, Value};
pub use circuit::{Circuit, Gate, Witness, WitnessInput};
pub use constants::{DEGENERATE_PROOF_BYTES, PLONK_PROOF_SIZE};
pub use errors::{DecomposeError, GenerationError, HarnessError, VerifierCallError, VerifyError};
pub use groth16::{Groth16Backend, Groth16Verifier};
pub use harness::{
    expect_rejected, expect_verified, groth16_context, plonk_context, HarnessContext,
    PipelineReport, VerifierContract,
};
pub use manifest::Manifest;
pub use plonk::{PlonkBackend, PlonkVerifier};

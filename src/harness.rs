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

//! End-to-end verification scenarios.
//!
//! A [`HarnessContext`] owns one backend, one deployed verifier, the circuit's
//! artifacts and an RNG. Every scenario builds its own context; nothing is shared.

use std::path::Path;

use rand::{rngs::StdRng, CryptoRng, RngCore, SeedableRng};
use tracing::{debug, info};

use crate::{
    backend::{
        signals_from_canonical, signals_to_json, BackendKind, Calldata, CircuitArtifacts, Proof,
        ProofBackend, PublicSignals,
    },
    calldata::{decompose, VerifierArguments},
    canonical::{canonicalize, Value},
    circuit::WitnessInput,
    errors::{GenerationError, HarnessError, VerifierCallError},
    groth16::{Groth16Backend, Groth16Verifier},
    plonk::{PlonkBackend, PlonkVerifier},
};

/// A deployed verifier, as the on-chain contract would expose it.
///
/// `Ok(false)` is a rejected proof. `Err` means the call itself failed, as when the
/// arguments do not fit the verifier's ABI.
pub trait VerifierContract: Sized {
    fn deploy(verifying_key: &Path) -> Result<Self, GenerationError>;

    fn kind(&self) -> BackendKind;

    fn num_public_inputs(&self) -> usize;

    fn verify_proof(&self, args: &VerifierArguments) -> Result<bool, VerifierCallError>;
}

/// Everything one pipeline run produced, with the verifier's answer unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub proof: Proof,
    pub public_signals: PublicSignals,
    pub calldata: Calldata,
    pub arguments: VerifierArguments,
    pub verified: bool,
}

pub struct HarnessContext<B, V, R = StdRng> {
    backend: B,
    verifier: V,
    artifacts: CircuitArtifacts,
    rng: R,
}

impl<B, V, R> HarnessContext<B, V, R>
where
    B: ProofBackend,
    V: VerifierContract,
    R: RngCore + CryptoRng,
{
    pub fn new(
        backend: B,
        verifier: V,
        artifacts: CircuitArtifacts,
        rng: R,
    ) -> Result<Self, HarnessError> {
        if verifier.kind() != B::KIND {
            return Err(VerifierCallError::ArgumentShapeMismatch {
                expected: verifier.kind(),
                actual: B::KIND,
            }
            .into());
        }
        Ok(Self {
            backend,
            verifier,
            artifacts,
            rng,
        })
    }

    /// Deploys the verifier from the artifacts' verifying key.
    pub fn deploy(backend: B, artifacts: CircuitArtifacts, rng: R) -> Result<Self, HarnessError> {
        let verifier = V::deploy(&artifacts.verifying_key)?;
        Self::new(backend, verifier, artifacts, rng)
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn artifacts(&self) -> &CircuitArtifacts {
        &self.artifacts
    }

    /// witness → proof → JSON → canonical tree → typed proof → calldata → arguments →
    /// verifier.
    pub fn full_pipeline(&mut self, witness: &WitnessInput) -> Result<PipelineReport, HarnessError> {
        let kind = B::KIND;
        info!(backend = %kind, circuit = %self.artifacts.circuit.display(), "pipeline started");

        let (proof, signals) = self
            .backend
            .produce_proof(witness, &self.artifacts, &mut self.rng)?;

        let proof_tree = canonicalize(&Value::from(proof.to_json()));
        let signals_tree = canonicalize(&Value::from(signals_to_json(&signals)));
        let proof = Proof::from_canonical(kind, &proof_tree)?;
        let public_signals = signals_from_canonical(&signals_tree)?;

        let calldata = self.backend.serialize_for_verifier(&proof, &public_signals)?;
        debug!(bytes = calldata.as_str().len(), "calldata serialised");

        let arguments = decompose(kind, &calldata)?;
        debug!(inputs = arguments.input().len(), "calldata decomposed");

        let verified = self.verifier.verify_proof(&arguments)?;
        info!(backend = %kind, verified, "pipeline finished");

        Ok(PipelineReport {
            proof,
            public_signals,
            calldata,
            arguments,
            verified,
        })
    }

    /// Calls the verifier with all-zero arguments of its arity.
    pub fn degenerate_probe(&self) -> Result<bool, HarnessError> {
        let args = VerifierArguments::zeroed(self.verifier.kind(), self.verifier.num_public_inputs());
        let verified = self.verify_arguments(&args)?;
        info!(backend = %self.verifier.kind(), verified, "degenerate probe finished");
        Ok(verified)
    }

    pub fn verify_arguments(&self, args: &VerifierArguments) -> Result<bool, HarnessError> {
        let verified = self.verifier.verify_proof(args)?;
        debug!(verified, "verifier called");
        Ok(verified)
    }
}

impl<B, V> HarnessContext<B, V, StdRng>
where
    B: ProofBackend,
    V: VerifierContract,
{
    /// Deterministic context for reproducible scenarios.
    pub fn seeded(backend: B, artifacts: CircuitArtifacts, seed: u64) -> Result<Self, HarnessError> {
        Self::deploy(backend, artifacts, StdRng::seed_from_u64(seed))
    }
}

pub type Groth16Context = HarnessContext<Groth16Backend, Groth16Verifier>;
pub type PlonkContext = HarnessContext<PlonkBackend, PlonkVerifier>;

pub fn groth16_context(artifacts: CircuitArtifacts, seed: u64) -> Result<Groth16Context, HarnessError> {
    HarnessContext::seeded(Groth16Backend, artifacts, seed)
}

pub fn plonk_context(artifacts: CircuitArtifacts, seed: u64) -> Result<PlonkContext, HarnessError> {
    HarnessContext::seeded(PlonkBackend, artifacts, seed)
}

pub fn expect_verified(verified: bool) -> Result<(), HarnessError> {
    expect(true, verified)
}

pub fn expect_rejected(verified: bool) -> Result<(), HarnessError> {
    expect(false, verified)
}

fn expect(expected: bool, actual: bool) -> Result<(), HarnessError> {
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::UnexpectedOutcome { expected, actual })
    }
}

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

use core::fmt;
use snafu::Snafu;

use crate::{
    backend::BackendKind,
    utils::{to_hex_string, IntoBEBytes32},
    U256,
};

/// Failure to produce a proof from a witness. Fatal for the scenario, never retried.
#[derive(Debug, PartialEq, Snafu)]
pub enum GenerationError {
    #[snafu(display("Missing witness value for input signal '{signal}'"))]
    MissingInput { signal: String },
    #[snafu(display("Witness provides '{signal}' which is not an input of circuit '{circuit}'"))]
    UnknownInput { signal: String, circuit: String },
    #[snafu(display("Witness value for '{signal}' is not a non-negative integer"))]
    InvalidInputValue { signal: String },
    #[snafu(display("Signal '{signal}' is used before it is assigned"))]
    UnassignedSignal { signal: String },
    #[snafu(display("Assertion '{left} == {right}' does not hold for the given witness"))]
    AssertionFailed { left: String, right: String },
    #[snafu(display("Witness does not satisfy the circuit constraints"))]
    UnsatisfiedConstraints,
    #[snafu(display("Invalid circuit description: {message}"))]
    InvalidCircuit { message: String },
    #[snafu(display("Artifact '{path}' could not be read: {message}"))]
    ArtifactMissing { path: String, message: String },
    #[snafu(display("Artifact '{path}' is corrupt: {message}"))]
    ArtifactCorrupt { path: String, message: String },
    #[snafu(display("Proving key was built for another circuit: {message}"))]
    KeyMismatch { message: String },
    #[snafu(display("Circuit needs {required} SRS powers but only {available} are available"))]
    SrsTooSmall { required: usize, available: usize },
    #[snafu(display("Expected a {expected} proof"))]
    WrongProofVariant { expected: BackendKind },
    #[snafu(display("Constraint synthesis failed: {message}"))]
    Synthesis { message: String },
}

/// Failure to turn calldata into verifier arguments. Never zero-filled.
#[derive(Debug, PartialEq, Snafu)]
pub enum DecomposeError {
    #[snafu(display("Calldata is empty"))]
    EmptyCalldata,
    #[snafu(display("Calldata has {actual} tokens, at least {expected} are required"))]
    TooFewTokens { expected: usize, actual: usize },
    #[snafu(display("Token {position} ('{token}') is not a decimal or 0x-hex integer"))]
    InvalidToken { position: usize, token: String },
    #[snafu(display("Unbalanced brackets in calldata"))]
    UnbalancedBrackets,
    #[snafu(display("Calldata carries no proof bytes"))]
    MissingProofBytes,
}

/// The verifier raised instead of returning a boolean.
#[derive(Debug, PartialEq, Snafu)]
pub enum VerifierCallError {
    #[snafu(display("Verifier expects {expected} arguments, got {actual} arguments"))]
    ArgumentShapeMismatch {
        expected: BackendKind,
        actual: BackendKind,
    },
    #[snafu(display("Verifier expects {expected} public inputs, got {actual}"))]
    PublicInputArity { expected: usize, actual: usize },
    #[snafu(display("Proof bytes are not valid hex: {message}"))]
    MalformedProofBytes { message: String },
}

/// Why a universal-setup proof did not verify.
#[derive(Debug, PartialEq, Snafu)]
pub enum VerifyError {
    /// Failure due to another reason.
    #[snafu(display("Other Error"))]
    OtherError,
    /// Provided data has not valid public inputs.
    #[snafu(display("Invalid public input: {message}"))]
    PublicInputError { message: String },
    /// Provided data has not valid proof.
    #[snafu(display("Invalid Proof: {message}"))]
    InvalidProofError { message: String },
    /// Verify proof failed.
    #[snafu(display("Verification Failed. Message: {message}"))]
    VerificationError { message: String },
    /// Provided an invalid verification key.
    #[snafu(display("Key Error"))]
    KeyError,
}

/// A canonical value tree did not have the shape of the requested artifact.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(display("Value at '{path}' is not {expected}"))]
pub struct ValueShapeError {
    pub path: String,
    pub expected: &'static str,
}

/// Outcome of a harness scenario that did not go as asserted.
#[derive(Debug, PartialEq, Snafu)]
pub enum HarnessError {
    #[snafu(context(false), display("Proof generation failed: {source}"))]
    Generation { source: GenerationError },
    #[snafu(context(false), display("Calldata decomposition failed: {source}"))]
    Decompose { source: DecomposeError },
    #[snafu(context(false), display("Verifier call failed: {source}"))]
    VerifierCall { source: VerifierCallError },
    #[snafu(context(false), display("Malformed proof material: {source}"))]
    ValueShape { source: ValueShapeError },
    #[snafu(display("Verifier returned {actual}, expected {expected}"))]
    UnexpectedOutcome { expected: bool, actual: bool },
}

#[derive(Debug, PartialEq)]
pub enum GroupError {
    InvalidSliceLength {
        actual_length: usize,
        expected_length: usize,
    },
    NotOnCurve,
    NotInSubgroup,
    CoordinateExceedsModulus {
        coordinate_value: U256,
        modulus: U256,
    },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::InvalidSliceLength {
                actual_length,
                expected_length,
            } => {
                write!(
                    f,
                    "Invalid Slice Length. Actual length: {actual_length}, Expected length: {expected_length}",
                )
            }
            GroupError::NotOnCurve => {
                write!(f, "Point not on curve")
            }
            GroupError::NotInSubgroup => {
                write!(f, "Point not in the prime-order subgroup")
            }
            GroupError::CoordinateExceedsModulus {
                coordinate_value,
                modulus,
            } => {
                write!(
                    f,
                    "Coordinate value {} exceeds base field modulus {}",
                    to_hex_string(&coordinate_value.into_be_bytes32()),
                    modulus
                )
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum FieldError {
    InvalidSliceLength {
        actual_length: usize,
        expected_length: usize,
    },
    NotMember,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidSliceLength {
                actual_length,
                expected_length,
            } => write!(
                f,
                "Invalid Slice Length. Actual length: {actual_length}, Expected length: {expected_length}",
            ),
            FieldError::NotMember => write!(f, "Value is not a member of the scalar field"),
        }
    }
}

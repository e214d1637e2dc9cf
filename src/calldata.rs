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

//! Calldata decomposition into verifier call arguments.
//!
//! Two grammars are supported:
//!
//! * **pairing**: bracket, quote and whitespace characters carry no meaning and are
//!   dropped; what remains is a comma separated list of decimal or `0x` hex integers.
//!   The first eight integers are `a` (2), `b` (2x2, row-major) and `c` (2); every
//!   integer after them is a public input.
//! * **universal**: only commas outside brackets separate tokens. The first token is
//!   the proof and is kept verbatim. Every following token is a public input, or a
//!   bracketed list of public inputs whose elements may be quoted.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::{
    backend::{BackendKind, Calldata},
    canonical::parse_numeric,
    constants::{
        DEGENERATE_PROOF_BYTES, PAIRING_A_TOKENS, PAIRING_B_TOKENS, PAIRING_C_TOKENS,
        PAIRING_PREFIX_TOKENS, PLONK_PROOF_SIZE,
    },
    errors::DecomposeError,
};

/// Arguments of `verifyProof(a, b, c, input)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingArgs {
    pub a: [BigUint; 2],
    pub b: [[BigUint; 2]; 2],
    pub c: [BigUint; 2],
    pub input: Vec<BigUint>,
}

/// Arguments of `verifyProof(proof, input)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversalArgs {
    /// `0x`-prefixed hex, exactly as it appeared in the calldata.
    pub proof_bytes: String,
    pub input: Vec<BigUint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierArguments {
    Pairing(PairingArgs),
    Universal(UniversalArgs),
}

impl PairingArgs {
    /// All-zero arguments with `num_inputs` public inputs.
    pub fn zeroed(num_inputs: usize) -> Self {
        Self {
            a: Default::default(),
            b: Default::default(),
            c: Default::default(),
            input: vec![BigUint::zero(); num_inputs],
        }
    }
}

impl UniversalArgs {
    /// A full-length all-zero proof with `num_inputs` zero public inputs.
    pub fn zeroed(num_inputs: usize) -> Self {
        Self {
            proof_bytes: format!("0x{}", "00".repeat(PLONK_PROOF_SIZE)),
            input: vec![BigUint::zero(); num_inputs],
        }
    }

    /// A single-byte proof with `num_inputs` zero public inputs.
    pub fn truncated(num_inputs: usize) -> Self {
        Self {
            proof_bytes: DEGENERATE_PROOF_BYTES.to_string(),
            input: vec![BigUint::zero(); num_inputs],
        }
    }

    pub fn decode_proof(&self) -> Result<Vec<u8>, hex::FromHexError> {
        let digits = self
            .proof_bytes
            .strip_prefix("0x")
            .unwrap_or(&self.proof_bytes);
        hex::decode(digits)
    }
}

impl VerifierArguments {
    pub fn zeroed(kind: BackendKind, num_inputs: usize) -> Self {
        match kind {
            BackendKind::Pairing => VerifierArguments::Pairing(PairingArgs::zeroed(num_inputs)),
            BackendKind::Universal => {
                VerifierArguments::Universal(UniversalArgs::zeroed(num_inputs))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            VerifierArguments::Pairing(_) => BackendKind::Pairing,
            VerifierArguments::Universal(_) => BackendKind::Universal,
        }
    }

    pub fn input(&self) -> &[BigUint] {
        match self {
            VerifierArguments::Pairing(args) => &args.input,
            VerifierArguments::Universal(args) => &args.input,
        }
    }
}

/// Splits pairing calldata into its numeric tokens, ignoring `[`, `]`, `"` and
/// whitespace. An empty bracket group such as `[]` contributes no token.
pub fn pairing_tokens(raw: &str) -> Vec<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect();
    if stripped.is_empty() {
        return Vec::new();
    }
    stripped
        .split(',')
        .filter(|piece| !is_empty_group(piece))
        .map(|piece| piece.replace(|c: char| matches!(c, '[' | ']'), ""))
        .collect()
}

fn is_empty_group(piece: &str) -> bool {
    piece.contains("[]") && piece.chars().all(|c| matches!(c, '[' | ']'))
}

/// Splits universal calldata on commas that are outside brackets and quotes.
pub fn universal_tokens(raw: &str) -> Result<Vec<&str>, DecomposeError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;

    for (i, ch) in raw.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(DecomposeError::UnbalancedBrackets)?;
            }
            ',' if !quoted && depth == 0 => {
                tokens.push(raw[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quoted {
        return Err(DecomposeError::UnbalancedBrackets);
    }
    tokens.push(raw[start..].trim());

    Ok(tokens)
}

fn numeric(position: usize, token: &str) -> Result<BigUint, DecomposeError> {
    parse_numeric(token).ok_or_else(|| DecomposeError::InvalidToken {
        position,
        token: token.to_string(),
    })
}

pub fn decompose_pairing(calldata: &Calldata) -> Result<PairingArgs, DecomposeError> {
    let tokens = pairing_tokens(calldata.as_str());
    if tokens.is_empty() {
        return Err(DecomposeError::EmptyCalldata);
    }
    if tokens.len() < PAIRING_PREFIX_TOKENS {
        return Err(DecomposeError::TooFewTokens {
            expected: PAIRING_PREFIX_TOKENS,
            actual: tokens.len(),
        });
    }

    let values = tokens
        .iter()
        .enumerate()
        .map(|(position, token)| numeric(position, token))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(tokens = values.len(), "decomposed pairing calldata");

    let (a, rest) = values.split_at(PAIRING_A_TOKENS);
    let (b, rest) = rest.split_at(PAIRING_B_TOKENS);
    let (c, input) = rest.split_at(PAIRING_C_TOKENS);

    Ok(PairingArgs {
        a: [a[0].clone(), a[1].clone()],
        b: [[b[0].clone(), b[1].clone()], [b[2].clone(), b[3].clone()]],
        c: [c[0].clone(), c[1].clone()],
        input: input.to_vec(),
    })
}

pub fn decompose_universal(calldata: &Calldata) -> Result<UniversalArgs, DecomposeError> {
    if calldata.as_str().trim().is_empty() {
        return Err(DecomposeError::EmptyCalldata);
    }
    let tokens = universal_tokens(calldata.as_str())?;
    let (proof, rest) = tokens
        .split_first()
        .ok_or(DecomposeError::EmptyCalldata)?;
    if proof.is_empty() {
        return Err(DecomposeError::MissingProofBytes);
    }

    let mut input = Vec::new();
    for token in rest {
        let elements: Vec<&str> = match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Some(list) if list.trim().is_empty() => Vec::new(),
            Some(list) => list.split(',').collect(),
            None => vec![token],
        };
        for element in elements {
            let cleaned = element.trim().trim_matches('"');
            input.push(numeric(input.len() + 1, cleaned)?);
        }
    }
    debug!(
        proof_len = proof.len(),
        inputs = input.len(),
        "decomposed universal calldata"
    );

    Ok(UniversalArgs {
        proof_bytes: proof.to_string(),
        input,
    })
}

/// Decomposes calldata according to the grammar of `kind`.
pub fn decompose(kind: BackendKind, calldata: &Calldata) -> Result<VerifierArguments, DecomposeError> {
    match kind {
        BackendKind::Pairing => decompose_pairing(calldata).map(VerifierArguments::Pairing),
        BackendKind::Universal => decompose_universal(calldata).map(VerifierArguments::Universal),
    }
}

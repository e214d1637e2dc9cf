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

use ark_bn254::Fr;
use ark_ff::MontFp;

// Scalar size (in bytes)
pub const FIELD_ELEMENT_SIZE: usize = 32;
// G1 Point Size (in bytes)
pub const GROUP_ELEMENT_SIZE: usize = 64;

// Pairing calldata: a (2) + b (2x2) + c (2) precede the public inputs.
pub const PAIRING_A_TOKENS: usize = 2;
pub const PAIRING_B_TOKENS: usize = 4;
pub const PAIRING_C_TOKENS: usize = 2;
pub const PAIRING_PREFIX_TOKENS: usize = PAIRING_A_TOKENS + PAIRING_B_TOKENS + PAIRING_C_TOKENS;

// Wire columns of the universal-setup arithmetisation (a, b, c).
pub const NUM_WIRES: usize = 3;

// Coset separators for the copy-constraint identity permutation.
pub const K1: Fr = MontFp!("2");
pub const K2: Fr = MontFp!("3");

// [a], [b], [c], [z], [t], [W_zeta], [W_zeta_omega]
pub const NUM_PROOF_COMMITMENTS: usize = 7;
// a, b, c, q_l, q_r, q_o, q_m, q_c, s_1, s_2, s_3, z, t at zeta; z at zeta * omega
pub const NUM_OPENED_AT_ZETA: usize = 13;
pub const NUM_PROOF_EVALUATIONS: usize = NUM_OPENED_AT_ZETA + 1;

pub const PLONK_PROOF_SIZE: usize =
    NUM_PROOF_COMMITMENTS * GROUP_ELEMENT_SIZE + NUM_PROOF_EVALUATIONS * FIELD_ELEMENT_SIZE;

// Blinding terms raise deg(t) to 3n + 5, so the SRS needs 3n + 6 powers.
pub const fn srs_powers_for_domain(domain_size: usize) -> usize {
    3 * domain_size + 6
}

// Single byte used by the hand-built universal-setup probe.
pub const DEGENERATE_PROOF_BYTES: &str = "0x3a";

pub const PROTOCOL_GROTH16: &str = "groth16";
pub const PROTOCOL_PLONK: &str = "plonk";
pub const CURVE_BN128: &str = "bn128";

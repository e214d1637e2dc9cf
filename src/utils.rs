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

use crate::{
    constants::{FIELD_ELEMENT_SIZE, GROUP_ELEMENT_SIZE},
    errors::{FieldError, GroupError},
    Fq, Fq2, Fr, G1, G2, U256,
};
use ark_ec::AffineRepr;
use ark_ff::{AdditiveGroup, PrimeField};
use num_bigint::BigUint;

/// Trait for returning a big-endian representation of some object as a `[u8; 32]`.
pub(crate) trait IntoBEBytes32 {
    fn into_be_bytes32(self) -> [u8; 32];
}

impl IntoBEBytes32 for U256 {
    fn into_be_bytes32(self) -> [u8; 32] {
        let mut rev_iter_be = self.0.iter().rev().flat_map(|limb| limb.to_be_bytes());
        core::array::from_fn(|_| rev_iter_be.next().unwrap_or_default())
    }
}

impl IntoBEBytes32 for Fr {
    fn into_be_bytes32(self) -> [u8; 32] {
        self.into_bigint().into_be_bytes32()
    }
}

impl IntoBEBytes32 for Fq {
    fn into_be_bytes32(self) -> [u8; 32] {
        self.into_bigint().into_be_bytes32()
    }
}

impl IntoBEBytes32 for u64 {
    fn into_be_bytes32(self) -> [u8; 32] {
        let be = self.to_be_bytes();
        let mut arr = [0u8; 32];
        arr[24..].copy_from_slice(&be);
        arr
    }
}

pub(crate) fn to_hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Formats an integer as a 32-byte, zero-padded `0x` word.
pub(crate) fn hex_word(value: &BigUint) -> String {
    format!("0x{:0>64}", value.to_str_radix(16))
}

pub(crate) fn biguint_from_field<F: PrimeField>(value: F) -> BigUint {
    value.into()
}

fn modulus_of<F: PrimeField>() -> BigUint {
    F::MODULUS.into()
}

/// Strict conversion: values at or above the modulus are rejected, not reduced.
pub(crate) fn field_from_biguint<F: PrimeField>(value: &BigUint) -> Option<F> {
    if value >= &modulus_of::<F>() {
        return None;
    }
    Some(F::from(value.clone()))
}

fn coordinate_from_biguint(value: &BigUint) -> Result<Fq, GroupError> {
    field_from_biguint::<Fq>(value).ok_or_else(|| GroupError::CoordinateExceedsModulus {
        coordinate_value: u256_saturating(value),
        modulus: Fq::MODULUS,
    })
}

fn u256_saturating(value: &BigUint) -> U256 {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return U256::new([u64::MAX; 4]);
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    read_u256(&word).unwrap_or_default()
}

pub(crate) fn read_u256(bytes: &[u8]) -> Result<U256, FieldError> {
    let word = <&[u8; 32]>::try_from(bytes).map_err(|_| FieldError::InvalidSliceLength {
        actual_length: bytes.len(),
        expected_length: 32,
    })?;
    let mut rchunks_iter = word.rchunks_exact(8);
    let limbs: [u64; 4] = core::array::from_fn(|_| {
        let mut limb = [0u8; 8];
        if let Some(chunk) = rchunks_iter.next() {
            limb.copy_from_slice(chunk);
        }
        u64::from_be_bytes(limb)
    });
    Ok(U256::new(limbs))
}

/// Builds a G1 point from affine coordinates, treating `(0, 0)` as the point at infinity
/// the way the EVM precompiles do.
pub(crate) fn g1_from_coordinates(x: &BigUint, y: &BigUint) -> Result<G1, GroupError> {
    let x = coordinate_from_biguint(x)?;
    let y = coordinate_from_biguint(y)?;

    if x == Fq::ZERO && y == Fq::ZERO {
        return Ok(G1::zero());
    }

    let point = G1::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(GroupError::NotOnCurve);
    }
    // This is always true for G1 with the BN254 curve.
    debug_assert!(point.is_in_correct_subgroup_assuming_on_curve());

    Ok(point)
}

/// Builds a G2 point from `(x.c0, x.c1)` and `(y.c0, y.c1)`.
pub(crate) fn g2_from_coordinates(x: [&BigUint; 2], y: [&BigUint; 2]) -> Result<G2, GroupError> {
    let x = Fq2::new(coordinate_from_biguint(x[0])?, coordinate_from_biguint(x[1])?);
    let y = Fq2::new(coordinate_from_biguint(y[0])?, coordinate_from_biguint(y[1])?);

    if x == Fq2::ZERO && y == Fq2::ZERO {
        return Ok(G2::zero());
    }

    let point = G2::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(GroupError::NotOnCurve);
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(GroupError::NotInSubgroup);
    }

    Ok(point)
}

/// Affine coordinates of a G1 point, `(0, 0)` for infinity.
pub(crate) fn g1_coordinates(point: &G1) -> [BigUint; 2] {
    if point.infinity {
        return [BigUint::default(), BigUint::default()];
    }
    [biguint_from_field(point.x), biguint_from_field(point.y)]
}

/// Affine coordinates of a G2 point as `[[x.c0, x.c1], [y.c0, y.c1]]`.
pub(crate) fn g2_coordinates(point: &G2) -> [[BigUint; 2]; 2] {
    if point.infinity {
        return Default::default();
    }
    [
        [biguint_from_field(point.x.c0), biguint_from_field(point.x.c1)],
        [biguint_from_field(point.y.c0), biguint_from_field(point.y.c1)],
    ]
}

// Parse point in G1.
pub(crate) fn read_g1(data: &[u8]) -> Result<(G1, &[u8]), GroupError> {
    if data.len() < GROUP_ELEMENT_SIZE {
        return Err(GroupError::InvalidSliceLength {
            actual_length: data.len(),
            expected_length: GROUP_ELEMENT_SIZE,
        });
    }

    let x = BigUint::from_bytes_be(&data[0..32]);
    let y = BigUint::from_bytes_be(&data[32..64]);

    Ok((g1_from_coordinates(&x, &y)?, &data[GROUP_ELEMENT_SIZE..]))
}

// Parse a canonical scalar; values >= r are rejected.
pub(crate) fn read_fr(data: &[u8]) -> Result<(Fr, &[u8]), FieldError> {
    if data.len() < FIELD_ELEMENT_SIZE {
        return Err(FieldError::InvalidSliceLength {
            actual_length: data.len(),
            expected_length: FIELD_ELEMENT_SIZE,
        });
    }

    let value = Fr::from_bigint(read_u256(&data[..FIELD_ELEMENT_SIZE])?).ok_or(FieldError::NotMember)?;

    Ok((value, &data[FIELD_ELEMENT_SIZE..]))
}

pub(crate) fn write_g1(point: &G1, out: &mut Vec<u8>) {
    if point.infinity {
        out.extend_from_slice(&[0u8; GROUP_ELEMENT_SIZE]);
        return;
    }
    out.extend_from_slice(&point.x.into_be_bytes32());
    out.extend_from_slice(&point.y.into_be_bytes32());
}

pub(crate) fn write_fr(value: &Fr, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.into_be_bytes32());
}

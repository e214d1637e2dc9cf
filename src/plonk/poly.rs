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

//! Coefficient-form helpers on top of `ark_poly` for the KZG prover.

use ark_ff::{AdditiveGroup, Field};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};

use crate::Fr;

pub(crate) type Poly = DensePolynomial<Fr>;

pub(crate) fn constant(c: Fr) -> Poly {
    Poly::from_coefficients_vec(vec![c])
}

/// `constant + slope·X`
pub(crate) fn linear(slope: Fr, constant: Fr) -> Poly {
    Poly::from_coefficients_vec(vec![constant, slope])
}

pub(crate) fn scale(p: &Poly, factor: Fr) -> Poly {
    Poly::from_coefficients_vec(p.coeffs.iter().map(|c| *c * factor).collect())
}

/// `p(ω·X)`
pub(crate) fn shift(p: &Poly, omega: Fr) -> Poly {
    let mut power = Fr::ONE;
    Poly::from_coefficients_vec(
        p.coeffs
            .iter()
            .map(|c| {
                let shifted = *c * power;
                power *= omega;
                shifted
            })
            .collect(),
    )
}

/// `p + b·Z_H` where `b` has coefficients `blinders` and `Z_H = X^n - 1`.
pub(crate) fn blind(p: &Poly, blinders: &[Fr], n: usize) -> Poly {
    let mut coeffs = p.coeffs.clone();
    coeffs.resize(coeffs.len().max(n + blinders.len()), Fr::ZERO);
    for (k, b) in blinders.iter().enumerate() {
        coeffs[k] -= b;
        coeffs[n + k] += b;
    }
    Poly::from_coefficients_vec(coeffs)
}

/// Quotient and remainder of `p / (X^n - 1)`.
pub(crate) fn divide_by_vanishing(p: &Poly, n: usize) -> (Poly, Poly) {
    let mut remainder = p.coeffs.clone();
    if remainder.len() <= n {
        return (Poly::from_coefficients_vec(vec![]), p.clone());
    }
    let mut quotient = vec![Fr::ZERO; remainder.len() - n];
    for i in (n..remainder.len()).rev() {
        let lead = remainder[i];
        quotient[i - n] += lead;
        remainder[i - n] += lead;
        remainder[i] = Fr::ZERO;
    }
    (
        Poly::from_coefficients_vec(quotient),
        Poly::from_coefficients_vec(remainder),
    )
}

/// `(p(X) - p(point)) / (X - point)` by synthetic division.
pub(crate) fn divide_by_linear(p: &Poly, point: Fr) -> Poly {
    let coeffs = &p.coeffs;
    let mut quotient = vec![Fr::ZERO; coeffs.len().saturating_sub(1)];
    let mut carry = Fr::ZERO;
    for i in (1..coeffs.len()).rev() {
        carry = coeffs[i] + carry * point;
        quotient[i - 1] = carry;
    }
    Poly::from_coefficients_vec(quotient)
}

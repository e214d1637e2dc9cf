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

use ark_ff::{batch_inversion, AdditiveGroup, Field};
use ark_poly::{DenseUVPolynomial, EvaluationDomain, Polynomial};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::{
    circuit::{Circuit, Witness},
    constants::NUM_WIRES,
    errors::GenerationError,
    Fr,
};

use super::{
    key::ProvingKey,
    layout::{column_shifts, Layout},
    poly::{blind, constant, divide_by_linear, divide_by_vanishing, linear, scale, shift, Poly},
    proof::{Evaluations, PlonkProof},
    srs::commit,
    transcript::Transcript,
};

/// Produces a proof that `witness` satisfies `circuit`.
pub(crate) fn prove<R: RngCore + CryptoRng>(
    pk: &ProvingKey,
    circuit: &Circuit,
    witness: &Witness,
    rng: &mut R,
) -> Result<PlonkProof, GenerationError> {
    let layout = Layout::new(circuit)?;
    pk.check_circuit(circuit, &layout)?;

    let domain = &layout.domain;
    let n = domain.size();
    let omega = domain.group_gen();
    let public_inputs = witness.public_inputs();
    let commit_to = |p: &Poly| commit(&pk.powers_of_g, &p.coeffs);
    let mut transcript = Transcript::new(&pk.vk, public_inputs);

    // Round 1: blinded wire polynomials
    let wire_values = layout.wire_values(witness);
    let [a, b, c] = wire_values.clone().map(|values| {
        let blinders = [Fr::rand(rng), Fr::rand(rng)];
        blind(&Poly::from_coefficients_vec(domain.ifft(&values)), &blinders, n)
    });
    let a_commitment = commit_to(&a)?;
    let b_commitment = commit_to(&b)?;
    let c_commitment = commit_to(&c)?;
    transcript.absorb_point(&a_commitment);
    transcript.absorb_point(&b_commitment);
    transcript.absorb_point(&c_commitment);
    let beta = transcript.challenge();
    let gamma = transcript.challenge();

    // Round 2: permutation grand product
    let z_values = grand_product(&layout, &wire_values, beta, gamma);
    let z_blinders = [Fr::rand(rng), Fr::rand(rng), Fr::rand(rng)];
    let z = blind(&Poly::from_coefficients_vec(domain.ifft(&z_values)), &z_blinders, n);
    let z_commitment = commit_to(&z)?;
    transcript.absorb_point(&z_commitment);
    let alpha = transcript.challenge();

    // Round 3: quotient
    let q_l = ProvingKey::poly(&pk.q_l);
    let q_r = ProvingKey::poly(&pk.q_r);
    let q_o = ProvingKey::poly(&pk.q_o);
    let q_m = ProvingKey::poly(&pk.q_m);
    let q_c = ProvingKey::poly(&pk.q_c);
    let s_1 = ProvingKey::poly(&pk.s_1);
    let s_2 = ProvingKey::poly(&pk.s_2);
    let s_3 = ProvingKey::poly(&pk.s_3);
    let pi = Poly::from_coefficients_vec(domain.ifft(&layout.public_input_values(public_inputs)));

    let gate = &(&(&(&(&(&q_l * &a) + &(&q_r * &b)) + &(&q_o * &c)) + &(&(&q_m * &a) * &b)) + &q_c)
        + &pi;

    let [_, k1, k2] = column_shifts();
    let identity = &(&(&(&a + &linear(beta, gamma)) * &(&b + &linear(beta * k1, gamma)))
        * &(&c + &linear(beta * k2, gamma)))
        * &z;
    let permuted = &(&(&(&(&a + &scale(&s_1, beta)) + &constant(gamma))
        * &(&(&b + &scale(&s_2, beta)) + &constant(gamma)))
        * &(&(&c + &scale(&s_3, beta)) + &constant(gamma)))
        * &shift(&z, omega);

    let mut l_1_values = vec![Fr::ZERO; n];
    l_1_values[0] = Fr::ONE;
    let l_1 = Poly::from_coefficients_vec(domain.ifft(&l_1_values));
    let z_starts_at_one = &(&z - &constant(Fr::ONE)) * &l_1;

    let numerator = &(&gate + &scale(&(&identity - &permuted), alpha))
        + &scale(&z_starts_at_one, alpha.square());
    let (t, remainder) = divide_by_vanishing(&numerator, n);
    if !remainder.coeffs.is_empty() {
        return Err(GenerationError::UnsatisfiedConstraints);
    }
    let t_commitment = commit_to(&t)?;
    transcript.absorb_point(&t_commitment);
    let zeta = transcript.challenge();

    // Round 4: openings
    let evaluations = Evaluations {
        a: a.evaluate(&zeta),
        b: b.evaluate(&zeta),
        c: c.evaluate(&zeta),
        q_l: q_l.evaluate(&zeta),
        q_r: q_r.evaluate(&zeta),
        q_o: q_o.evaluate(&zeta),
        q_m: q_m.evaluate(&zeta),
        q_c: q_c.evaluate(&zeta),
        s_1: s_1.evaluate(&zeta),
        s_2: s_2.evaluate(&zeta),
        s_3: s_3.evaluate(&zeta),
        z: z.evaluate(&zeta),
        t: t.evaluate(&zeta),
        z_omega: z.evaluate(&(zeta * omega)),
    };
    transcript.absorb_evaluations(&evaluations);
    let v = transcript.challenge();

    // Round 5: opening witnesses
    let opened = [&a, &b, &c, &q_l, &q_r, &q_o, &q_m, &q_c, &s_1, &s_2, &s_3, &z, &t];
    let mut batched = Poly::from_coefficients_vec(vec![]);
    let mut v_power = Fr::ONE;
    for polynomial in opened {
        batched = &batched + &scale(polynomial, v_power);
        v_power *= v;
    }
    let w_zeta = commit_to(&divide_by_linear(&batched, zeta))?;
    let w_zeta_omega = commit_to(&divide_by_linear(&z, zeta * omega))?;

    debug!(
        circuit = %circuit.name,
        domain_size = n,
        quotient_degree = t.degree(),
        "plonk proof generated"
    );

    Ok(PlonkProof {
        a: a_commitment,
        b: b_commitment,
        c: c_commitment,
        z: z_commitment,
        t: t_commitment,
        w_zeta,
        w_zeta_omega,
        evaluations,
    })
}

/// Evaluations of `z` with `z(ω^0) = 1` and
/// `z(ω^{i+1}) = z(ω^i) · Π(w + β·id + γ) / Π(w + β·σ + γ)` over row `i`.
fn grand_product(layout: &Layout, wires: &[Vec<Fr>; NUM_WIRES], beta: Fr, gamma: Fr) -> Vec<Fr> {
    let domain = &layout.domain;
    let n = domain.size();
    let shifts = column_shifts();

    let mut numerators = vec![Fr::ONE; n];
    let mut denominators = vec![Fr::ONE; n];
    for row in 0..n {
        let x = domain.element(row);
        for col in 0..NUM_WIRES {
            numerators[row] *= wires[col][row] + beta * shifts[col] * x + gamma;
            denominators[row] *= wires[col][row] + beta * layout.sigmas[col][row] + gamma;
        }
    }
    batch_inversion(&mut denominators);

    let mut values = Vec::with_capacity(n);
    let mut accumulator = Fr::ONE;
    for row in 0..n {
        values.push(accumulator);
        accumulator *= numerators[row] * denominators[row];
    }
    values
}

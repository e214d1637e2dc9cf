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

//! Numeric canonicalisation of loosely-typed proof material.
//!
//! Proof systems and their tooling exchange proofs, public signals and keys as JSON
//! trees whose integers are strings, either decimal (`"12"`) or `0x`-prefixed hex
//! (`"0xc"`). [`canonicalize`] walks such a tree and swaps every numeric string for an
//! arbitrary-precision integer, leaving the rest of the structure untouched.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ValueShapeError;

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid pattern"));
static HEXADECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("valid pattern"));

/// A nested value tree as found in proof and key artifacts.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// A native number that is not a non-negative integer (negative or fractional).
    Number(serde_json::Number),
    Integer(BigUint),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

/// Returns a structurally identical tree where numeric strings are integers.
///
/// Strings are tested against the decimal pattern first and the `0x` hex pattern
/// second; anything else is returned verbatim. Cyclic input cannot be expressed.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_numeric(s)
            .map(Value::Integer)
            .unwrap_or_else(|| Value::String(s.clone())),
        Value::Sequence(items) => Value::Sequence(items.iter().map(canonicalize).collect()),
        Value::Mapping(entries) => Value::Mapping(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Parses a decimal or `0x` hex string, `None` for anything else.
pub fn parse_numeric(s: &str) -> Option<BigUint> {
    if DECIMAL.is_match(s) {
        BigUint::parse_bytes(s.as_bytes(), 10)
    } else if HEXADECIMAL.is_match(s) {
        BigUint::parse_bytes(s[2..].as_bytes(), 16)
    } else {
        None
    }
}

impl Value {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(json).map(Value::from)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigUint> {
        match self {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(u) => Value::Integer(BigUint::from(u)),
                None => Value::Number(n),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            // Integers leave as decimal strings, the way proof tooling writes them.
            Value::Integer(n) => serde_json::Value::String(n.to_str_radix(10)),
            Value::String(s) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Mapping(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<BigUint> for Value {
    fn from(n: BigUint) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

// Typed extraction from canonical trees, with the failing path in the error.

pub(crate) fn field<'a>(value: &'a Value, path: &str, key: &str) -> Result<&'a Value, ValueShapeError> {
    value.get(key).ok_or_else(|| ValueShapeError {
        path: format!("{path}.{key}"),
        expected: "present",
    })
}

pub(crate) fn integer<'a>(value: &'a Value, path: &str) -> Result<&'a BigUint, ValueShapeError> {
    value.as_integer().ok_or_else(|| ValueShapeError {
        path: path.to_string(),
        expected: "an integer",
    })
}

pub(crate) fn sequence<'a>(
    value: &'a Value,
    path: &str,
    min_len: usize,
) -> Result<&'a [Value], ValueShapeError> {
    match value.as_sequence() {
        Some(items) if items.len() >= min_len => Ok(items),
        _ => Err(ValueShapeError {
            path: path.to_string(),
            expected: "a long enough sequence",
        }),
    }
}

pub(crate) fn integers(value: &Value, path: &str) -> Result<Vec<BigUint>, ValueShapeError> {
    sequence(value, path, 0)?
        .iter()
        .enumerate()
        .map(|(i, item)| integer(item, &format!("{path}[{i}]")).cloned())
        .collect()
}

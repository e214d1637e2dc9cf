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

#![allow(dead_code)]

use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use snark_calldata_harness::{
    manifest::Manifest, Circuit, CircuitArtifacts, Groth16Backend, PlonkBackend, ProofBackend,
};
use tempfile::TempDir;

pub const HELLO_WORLD: &str = include_str!("../../circuits/hello_world.json");
pub const MULTIPLIER3: &str = include_str!("../../circuits/multiplier3.json");

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build output of one or more circuits, kept alive for the duration of a test.
pub struct BuildDir {
    dir: TempDir,
    pub manifest: Manifest,
}

impl BuildDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(dir.path());
        Self { dir, manifest }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn build<B: ProofBackend>(&mut self, backend: B, circuit: &str, seed: u64) -> CircuitArtifacts {
        let circuit = Circuit::from_json(circuit).unwrap();
        let out = self
            .dir
            .path()
            .join(format!("{}_{}", circuit.name, B::KIND));
        std::fs::create_dir_all(&out).unwrap();
        let artifacts = backend
            .setup(&circuit, &out, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        self.manifest.record(&circuit.name, B::KIND, &artifacts);
        self.manifest
            .save(&self.dir.path().join("manifest.json"))
            .unwrap();
        artifacts
    }

    pub fn groth16(&mut self, circuit: &str) -> CircuitArtifacts {
        self.build(Groth16Backend, circuit, 0x510e527f)
    }

    pub fn plonk(&mut self, circuit: &str) -> CircuitArtifacts {
        self.build(PlonkBackend, circuit, 0x9b05688c)
    }
}

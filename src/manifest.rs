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

//! Artifact manifest: where the build pipeline left each circuit's files.
//!
//! ```json
//! {
//!   "circuits": [
//!     {
//!       "name": "Multiplier3",
//!       "backend": "plonk",
//!       "circuit": "multiplier3/circuit.json",
//!       "proving_key": "multiplier3/plonk_pkey.bin",
//!       "verifying_key": "multiplier3/plonk_vkey.bin"
//!     }
//!   ]
//! }
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    backend::{BackendKind, CircuitArtifacts},
    errors::GenerationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub backend: BackendKind,
    pub circuit: PathBuf,
    pub proving_key: PathBuf,
    pub verifying_key: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(skip)]
    base_dir: PathBuf,
    #[serde(default)]
    pub circuits: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            circuits: Vec::new(),
        }
    }

    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> Result<Self, serde_json::Error> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let json = std::fs::read_to_string(path).map_err(|e| GenerationError::ArtifactMissing {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let manifest =
            Self::from_json(&json, base_dir).map_err(|e| GenerationError::ArtifactCorrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), circuits = manifest.circuits.len(), "manifest loaded");
        Ok(manifest)
    }

    /// Writes the manifest, keeping paths under its directory relative.
    pub fn save(&self, path: &Path) -> Result<(), GenerationError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| GenerationError::ArtifactCorrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| GenerationError::ArtifactMissing {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records artifacts produced by a backend's setup, replacing any previous entry
    /// for the same circuit and backend.
    pub fn record(&mut self, name: &str, backend: BackendKind, artifacts: &CircuitArtifacts) {
        let relative = |path: &Path| {
            path.strip_prefix(&self.base_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf())
        };
        let entry = ManifestEntry {
            name: name.to_string(),
            backend,
            circuit: relative(&artifacts.circuit),
            proving_key: relative(&artifacts.proving_key),
            verifying_key: relative(&artifacts.verifying_key),
        };
        self.circuits
            .retain(|existing| !(existing.name == name && existing.backend == backend));
        self.circuits.push(entry);
    }

    /// Artifacts of `name` for `backend`, with paths resolved.
    pub fn circuit(&self, name: &str, backend: BackendKind) -> Option<CircuitArtifacts> {
        self.circuits
            .iter()
            .find(|entry| entry.name == name && entry.backend == backend)
            .map(|entry| CircuitArtifacts {
                circuit: self.base_dir.join(&entry.circuit),
                proving_key: self.base_dir.join(&entry.proving_key),
                verifying_key: self.base_dir.join(&entry.verifying_key),
            })
    }
}

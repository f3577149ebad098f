// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges the presentation side to the glyphcap backend crates.

pub mod data_dir;
pub mod orchestrator;

pub use orchestrator::Orchestrator;

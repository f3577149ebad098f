// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// glyphcap-app: the orchestrator that runs recognition off the caller's
// context, settings persistence, and the command-line front end.

pub mod cli;
pub mod services;

pub use services::Orchestrator;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments for the `glyphcap` binary.

use std::path::PathBuf;

use clap::Parser;
use glyphcap_core::config::{EmptyTextPolicy, ScanConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "glyphcap")]
#[command(about = "Recognise the printed text in a photo and print it to stdout")]
pub struct CliArgs {
    /// Path to the captured photo
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Model directory (one sub-directory per language)
    #[arg(long, value_name = "DIR")]
    pub models: Option<PathBuf>,

    /// Language to recognise (default: eng)
    #[arg(long = "lang", value_name = "CODE")]
    pub language: Option<String>,

    /// Write intermediate grayscale/binary images to this directory
    #[arg(long, value_name = "DIR")]
    pub debug_out: Option<PathBuf>,

    /// Print "Empty/Null Result" instead of failing on blank output
    #[arg(long)]
    pub placeholder: bool,

    /// Persist the options above as the new defaults
    #[arg(long)]
    pub save: bool,
}

impl CliArgs {
    /// Overlay the command-line options onto persisted settings.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(models) = &self.models {
            config.model_dir = models.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(debug_out) = &self.debug_out {
            config.debug_output_dir = Some(debug_out.clone());
        }
        if self.placeholder {
            config.empty_text = EmptyTextPolicy::Placeholder;
        }
    }
}

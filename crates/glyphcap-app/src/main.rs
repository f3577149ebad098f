// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// glyphcap: photograph printed text, get it back as a string.
//
// Entry point. Initialises logging, loads settings, decodes the photo, and
// runs one recognition request through the orchestrator.

use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use glyphcap_app::Orchestrator;
use glyphcap_app::cli::CliArgs;
use glyphcap_app::services::data_dir;
use glyphcap_core::error::{GlyphcapError, Result};
use glyphcap_core::human_errors::{HumanError, humanize_error, humanize_result};
use glyphcap_core::types::RecognitionResult;
use glyphcap_scan::{OcrsBackend, PipelineRequest, PixelBuffer};
use tokio::runtime::Handle;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the recognised text.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    tracing::info!(image = %args.image.display(), "glyphcap starting");

    match run(&args).await {
        Ok(RecognitionResult::Text(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(failed) => match humanize_result(&failed) {
            Some(human) => report(&human),
            None => ExitCode::FAILURE,
        },
        Err(err) => report(&humanize_error(&err)),
    }
}

async fn run(args: &CliArgs) -> Result<RecognitionResult> {
    let dir = data_dir::data_dir();
    let mut config = data_dir::load_config(&dir)?;
    args.apply(&mut config);
    if args.save {
        data_dir::persist_config(&dir, &config)?;
    }

    let image = PixelBuffer::open(&args.image)?.downsample(config.sample_size)?;

    let (tx, rx) = mpsc::channel();
    let mut orchestrator = Orchestrator::from_config(
        Handle::current(),
        &config,
        OcrsBackend::new,
        move |result: RecognitionResult| {
            let _ = tx.send(result);
        },
    );

    orchestrator.submit(PipelineRequest::new(image, config.model_data()))?;
    orchestrator.dispatch().await;

    rx.try_recv()
        .map_err(|_| GlyphcapError::Recognition("no result was delivered".into()))
}

fn report(human: &HumanError) -> ExitCode {
    eprintln!("{}\n{}", human.message, human.suggestion);
    ExitCode::FAILURE
}

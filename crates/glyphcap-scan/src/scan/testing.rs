// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scriptable recognition backend and model fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glyphcap_core::error::{GlyphcapError, Result};
use glyphcap_core::types::ModelData;
use image::GrayImage;
use tempfile::TempDir;

use super::session::RecognitionBackend;

/// What the stub does when asked to recognise.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(String),
    Panic,
}

/// Shared call counters, readable after the backend has moved away.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    inits: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    recognitions: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Counters {
    pub(crate) fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub(crate) fn recognitions(&self) -> usize {
        self.recognitions.load(Ordering::SeqCst)
    }

    /// Raw samples of every image passed to `recognize`.
    pub(crate) fn seen(&self) -> Vec<Vec<u8>> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[derive(Debug)]
pub(crate) struct StubBackend {
    reply: Reply,
    init_error: Option<String>,
    counters: Counters,
}

impl StubBackend {
    pub(crate) fn replying(reply: Reply) -> Self {
        Self {
            reply,
            init_error: None,
            counters: Counters::default(),
        }
    }

    pub(crate) fn failing_init(detail: &str) -> Self {
        Self {
            init_error: Some(detail.to_string()),
            ..Self::replying(Reply::Text(String::new()))
        }
    }

    pub(crate) fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl RecognitionBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn init(&mut self, _model: &ModelData) -> Result<()> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);
        match &self.init_error {
            // Deliberately not EngineInit: the session must coerce it.
            Some(detail) => Err(GlyphcapError::Config(detail.clone())),
            None => Ok(()),
        }
    }

    fn recognize(&mut self, image: &GrayImage) -> Result<String> {
        self.counters.recognitions.fetch_add(1, Ordering::SeqCst);
        self.counters
            .seen
            .lock()
            .expect("seen lock")
            .push(image.as_raw().clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(detail) => Err(GlyphcapError::Recognition(detail.clone())),
            Reply::Panic => panic!("stub engine crashed"),
        }
    }

    fn end(&mut self) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// A temporary model directory that provides `language`.
pub(crate) fn provisioned_model(language: &str) -> (TempDir, ModelData) {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join(language)).expect("language dir");
    let model = ModelData::new(dir.path(), language);
    (dir, model)
}

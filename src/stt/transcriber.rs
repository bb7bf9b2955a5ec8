//! The transcriber contract.
//!
//! The trait allows swapping the real Whisper implementation for a mock in
//! tests, keeping the driver independent of whisper-rs.

use crate::error::{Result, VoxprepError};
use crate::segment::SegmentList;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Trait for file-level speech-to-text transcription.
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio file into timestamped segments.
    ///
    /// A failure here is recoverable at the driver level: the file is
    /// treated as having produced zero segments.
    fn transcribe_file(&self, path: &Path) -> Result<SegmentList>;

    /// Name of the loaded model.
    fn model_name(&self) -> &str;

    /// Whether the transcriber can actually run inference.
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing a single model.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe_file(&self, path: &Path) -> Result<SegmentList> {
        (**self).transcribe_file(path)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Scripted per-file behavior for [`MockTranscriber`].
#[derive(Debug, Clone)]
enum Scripted {
    Segments(Vec<(f64, f64, String)>),
    Failure(String),
}

/// Mock transcriber for testing.
///
/// Scripts results per file name (the path's final component) and records
/// every call, so tests can assert both outputs and call counts.
#[derive(Debug)]
pub struct MockTranscriber {
    model_name: String,
    scripts: HashMap<String, Scripted>,
    calls: Mutex<Vec<PathBuf>>,
}

impl MockTranscriber {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script segments for a given file name.
    pub fn with_segments(mut self, file_name: &str, spans: Vec<(f64, f64, &str)>) -> Self {
        let spans = spans
            .into_iter()
            .map(|(s, e, t)| (s, e, t.to_string()))
            .collect();
        self.scripts
            .insert(file_name.to_string(), Scripted::Segments(spans));
        self
    }

    /// Script a transcription failure for a given file name.
    pub fn with_failure(mut self, file_name: &str, message: &str) -> Self {
        self.scripts
            .insert(file_name.to_string(), Scripted::Failure(message.to_string()));
        self
    }

    /// Paths this mock has been asked to transcribe, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe_file(&self, path: &Path) -> Result<SegmentList> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_path_buf());
        }

        let key = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        match self.scripts.get(key) {
            Some(Scripted::Segments(spans)) => Ok(SegmentList::from_spans(
                spans.iter().map(|(s, e, t)| (*s, *e, t.clone())),
            )),
            Some(Scripted::Failure(message)) => Err(VoxprepError::Transcription {
                message: message.clone(),
            }),
            None => Ok(SegmentList::empty()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

//! Diagnostic sink for recoverable load-time events
//!
//! Anything that goes wrong without being fatal to the scene is logged through
//! the `log` facade and also kept here, so callers can report it after loading.

use std::fmt;

/// What kind of recoverable event was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A model could not be loaded and was left out of the scene
    ModelSkipped,
    /// A material texture was missing and the default texture was used instead
    TextureFallback,
    /// A light entry was malformed and ignored
    LightSkipped,
    /// An instance entry was malformed and ignored
    InstanceSkipped,
    /// More point lights were described than the shader can hold
    PointLightCapExceeded,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::ModelSkipped => "model skipped",
            DiagnosticKind::TextureFallback => "texture fallback",
            DiagnosticKind::LightSkipped => "light skipped",
            DiagnosticKind::InstanceSkipped => "instance skipped",
            DiagnosticKind::PointLightCapExceeded => "point light cap exceeded",
        };
        f.write_str(label)
    }
}

/// A single recorded event
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Ordered collection of diagnostics gathered while building a scene
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event and forwards it to the logger as a warning
    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", kind, message);
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded events of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

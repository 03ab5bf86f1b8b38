//! Progress reporting
//!
//! Provides a simple API for displaying run state:
//! - Current phase (Loading, Generating an endpoint, Complete)
//! - Progress (current/total with a label)
//! - Log messages

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::generator::Endpoint;

/// Run phases reported to the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Loading,
    Generating(Endpoint),
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading tables"),
            Phase::Generating(endpoint) => write!(f, "Generating {}", endpoint),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both progress bars and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// One progress bar per generated endpoint
pub struct ProgressUi {
    multi: MultiProgress,
    style: ProgressStyle,
    current: Option<ProgressBar>,
}

impl ProgressUi {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{prefix:20} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        Self {
            multi: MultiProgress::new(),
            style,
            current: None,
        }
    }

    fn finish_current(&mut self) {
        if let Some(pb) = self.current.take() {
            let message = format!("{} documents", pb.position());
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ProgressUi {
    fn set_phase(&mut self, phase: Phase) {
        self.finish_current();

        if let Phase::Generating(endpoint) = phase {
            let pb = self.multi.add(ProgressBar::new(0));
            pb.set_style(self.style.clone());
            pb.set_prefix(endpoint.to_string());
            self.current = Some(pb);
        }
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        if let Some(pb) = &self.current {
            pb.set_length(total);
            pb.set_position(current);
            pb.set_message(label.into());
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        self.multi.println(message.into()).ok();
    }
}

impl Drop for ProgressUi {
    fn drop(&mut self) {
        self.finish_current();
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

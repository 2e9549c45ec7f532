//! Diagnostic frame logging for debugging progress display.
//!
//! When enabled via the `UPSCALER_TRACE_LOG` environment variable, every drawn
//! frame is appended to that file as one JSON object per line, together with
//! the numbers it was computed from.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::sync::{Mutex, OnceLock};

use super::frame::Frame;

static LOG_WRITER: OnceLock<Option<Mutex<LineWriter<File>>>> = OnceLock::new();
static KEEP_ANSI: OnceLock<bool> = OnceLock::new();

fn get_log_writer() -> Option<&'static Mutex<LineWriter<File>>> {
    LOG_WRITER
        .get_or_init(|| {
            std::env::var("UPSCALER_TRACE_LOG").ok().and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
                    .map(|file| Mutex::new(LineWriter::new(file)))
            })
        })
        .as_ref()
}

fn keep_ansi() -> bool {
    *KEEP_ANSI.get_or_init(|| std::env::var("UPSCALER_TRACE_RAW").is_ok())
}

/// One drawn frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameEvent {
    pub rendered: String,
    pub progress: usize,
    pub total: usize,
    pub percent: f64,
    pub filled: usize,
    pub width: usize,
}

impl FrameEvent {
    pub fn new(rendered: &str, frame: &Frame, keep_ansi: bool) -> Self {
        let rendered = if keep_ansi {
            rendered.to_string()
        } else {
            console::strip_ansi_codes(rendered)
                .trim_start_matches('\r')
                .to_string()
        };
        FrameEvent {
            rendered,
            progress: frame.progress,
            total: frame.total,
            percent: frame.percent,
            filled: frame.filled,
            width: frame.width,
        }
    }
}

/// Log a frame event to the trace log file, if one is configured.
pub fn log_frame(rendered: &str, frame: &Frame) {
    let Some(log_writer) = get_log_writer() else {
        return;
    };

    let event = FrameEvent::new(rendered, frame, keep_ansi());
    if let Ok(json) = serde_json::to_string(&event) {
        if let Ok(mut writer) = log_writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

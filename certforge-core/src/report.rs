//! Stdout Protocol
//!
//! Callers parse stdout line by line: `Success: <path>` or `[Level] message`.

use std::error::Error as _;
use std::fmt;

use crate::pipeline::{RenderError, RenderedCertificate};
use crate::templates::ResolutionNotice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Level::Error => "[Error]",
            Level::Warning => "[Warning]",
            Level::Info => "[Info]",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub message: String,
}

impl Line {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level, self.message)
    }
}

pub fn success_line(rendered: &RenderedCertificate) -> String {
    format!("Success: {}", rendered.output_path.display())
}

pub fn notice_lines(notices: &[ResolutionNotice]) -> Vec<Line> {
    notices
        .iter()
        .map(|n| Line::new(Level::Warning, n.to_string()))
        .collect()
}

/// Lines describing a failure: the error, then context and causes.
pub fn failure_lines(err: &RenderError) -> Vec<Line> {
    let mut lines = vec![Line::new(Level::Error, err.to_string())];

    match err {
        RenderError::TemplateNotFound { search_dir, .. } => {
            lines.push(Line::new(
                Level::Info,
                format!("Search directory: {}", search_dir.display()),
            ));
        }
        RenderError::InsufficientArguments { .. } | RenderError::UnknownCategory(_) => {}
        _ => {
            let mut previous: Option<String> = None;
            let mut source = err.source();
            while let Some(cause) = source {
                let text = cause.to_string();
                // ImageError::IoError displays the same text as its source
                if previous.as_deref() != Some(text.as_str()) {
                    lines.push(Line::new(Level::Info, format!("Caused by: {}", text)));
                }
                previous = Some(text);
                source = cause.source();
            }
        }
    }

    lines
}

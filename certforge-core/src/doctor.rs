//! Environment Self-Check
//!
//! Checks produce findings; the report is healthy when none is an error.

use std::path::{Path, PathBuf};

use crate::fonts::{load_font, FontConfig};
use crate::pipeline::CertificateRenderer;
use crate::report::{Level, Line};
use crate::request::CertificateRequest;
use crate::templates::{catalog, Policy, Region, KNOWN_RANKS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: &'static str,
    pub level: Level,
    pub message: String,
}

impl Finding {
    fn new(check: &'static str, level: Level, message: impl Into<String>) -> Self {
        Self { check, level, message: message.into() }
    }

    pub fn line(&self) -> Line {
        Line::new(self.level, format!("{}: {}", self.check, self.message))
    }
}

pub struct DoctorContext<'a> {
    pub resource_dir: &'a Path,
    pub fonts: &'a FontConfig,
    pub sessions: &'a [String],
}

pub trait Check {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &DoctorContext<'_>) -> Vec<Finding>;
}

pub struct FontCheck;

impl Check for FontCheck {
    fn name(&self) -> &'static str { "fonts" }

    fn run(&self, ctx: &DoctorContext<'_>) -> Vec<Finding> {
        ctx.fonts
            .paths(ctx.resource_dir)
            .iter()
            .map(|path| match load_font(path) {
                Ok(_) => Finding::new(self.name(), Level::Info, format!("loaded {}", file_name(path))),
                Err(e) => Finding::new(self.name(), Level::Error, e.to_string()),
            })
            .collect()
    }
}

pub struct TemplateCheck;

impl Check for TemplateCheck {
    fn name(&self) -> &'static str { "templates" }

    fn run(&self, ctx: &DoctorContext<'_>) -> Vec<Finding> {
        let entries = catalog(ctx.sessions, Some(ctx.resource_dir));
        let mut findings = vec![];
        let mut found = 0;

        for entry in &entries {
            if entry.present == Some(true) {
                found += 1;
            } else {
                let policy = match entry.policy {
                    Policy::FixedName => "fixed",
                    Policy::CodedSession => "coded",
                };
                findings.push(Finding::new(
                    self.name(),
                    Level::Error,
                    format!("missing {} template {}", policy, entry.filename),
                ));
            }
        }

        findings.insert(
            0,
            Finding::new(
                self.name(),
                Level::Info,
                format!("{} of {} templates present", found, entries.len()),
            ),
        );
        if ctx.sessions.is_empty() {
            findings.push(Finding::new(
                self.name(),
                Level::Warning,
                "no sessions given, coded templates not checked",
            ));
        }
        findings
    }
}

/// Composes a test certificate in memory; nothing is written.
pub struct SmokeCheck;

impl Check for SmokeCheck {
    fn name(&self) -> &'static str { "smoke" }

    fn run(&self, ctx: &DoctorContext<'_>) -> Vec<Finding> {
        let request = CertificateRequest {
            name: "测试用户".to_string(),
            category: Region::Weifang.label().to_string(),
            certificate_number: "TEST-001".to_string(),
            rank: KNOWN_RANKS[0].to_string(),
            session: None,
            output_path: PathBuf::from("smoke.png"),
            resource_dir: ctx.resource_dir.to_path_buf(),
        };

        let renderer = CertificateRenderer::new(ctx.fonts.clone());
        match renderer.compose(&request) {
            Ok(composed) => vec![Finding::new(
                self.name(),
                Level::Info,
                format!(
                    "composed {} ({}x{})",
                    composed.resolution.filename,
                    composed.image.width(),
                    composed.image.height()
                ),
            )],
            Err(e) => vec![Finding::new(
                self.name(),
                Level::Error,
                format!("test render failed (exit {}): {}", e.exit_code(), e),
            )],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    pub findings: Vec<Finding>,
}

impl DoctorReport {
    pub fn healthy(&self) -> bool {
        !self.findings.iter().any(|f| f.level == Level::Error)
    }

    pub fn lines(&self) -> Vec<Line> {
        self.findings.iter().map(Finding::line).collect()
    }
}

pub struct Doctor {
    checks: Vec<Box<dyn Check>>,
}

impl Doctor {
    pub fn new(smoke: bool) -> Self {
        let mut checks: Vec<Box<dyn Check>> = vec![Box::new(FontCheck), Box::new(TemplateCheck)];
        if smoke {
            checks.push(Box::new(SmokeCheck));
        }
        Self { checks }
    }

    pub fn run(&self, ctx: &DoctorContext<'_>) -> DoctorReport {
        let mut report = DoctorReport::default();

        if !ctx.resource_dir.is_dir() {
            report.findings.push(Finding::new(
                "resources",
                Level::Error,
                format!("resource directory not found: {}", ctx.resource_dir.display()),
            ));
            return report;
        }
        report.findings.push(Finding::new(
            "resources",
            Level::Info,
            format!("resource directory: {}", ctx.resource_dir.display()),
        ));

        for check in &self.checks {
            let findings = check.run(ctx);
            tracing::debug!(check = check.name(), findings = findings.len(), "check finished");
            report.findings.extend(findings);
        }
        report
    }
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new(false)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

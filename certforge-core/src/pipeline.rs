//! Render Pipeline - Single Entry Point
//!
//! resolve -> locate template -> load fonts -> open -> draw -> save.
//! Saving is always the last step; nothing is written on a failed render.

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compositor;
use crate::fonts::{FontConfig, FontSet};
use crate::hashing::file_digest;
use crate::layout::Layout;
use crate::request::CertificateRequest;
use crate::templates::{self, TemplateResolution};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Insufficient arguments: expected {expected}, got {got}")]
    InsufficientArguments { expected: usize, got: usize },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Template not found: {filename}")]
    TemplateNotFound { filename: String, search_dir: PathBuf },

    #[error("Failed to load font {}: {reason}", .path.display())]
    FontLoad { path: PathBuf, reason: String },

    #[error("Unsupported output format: {}", .0.display())]
    UnsupportedOutput(PathBuf),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            RenderError::InsufficientArguments { .. } | RenderError::UnknownCategory(_) => 10,
            RenderError::TemplateNotFound { .. } => 11,
            RenderError::FontLoad { .. }
            | RenderError::UnsupportedOutput(_)
            | RenderError::Image(_)
            | RenderError::Io(_) => 99,
        }
    }
}

/// Template with both strings drawn, not yet written anywhere
pub struct ComposedCertificate {
    pub resolution: TemplateResolution,
    pub template_path: PathBuf,
    pub image: DynamicImage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedCertificate {
    pub output_path: PathBuf,
    pub template: String,
    pub layout: Layout,
    /// SHA-256 of the written file, None when it could not be read back
    pub digest: Option<String>,
}

pub struct CertificateRenderer {
    fonts: FontConfig,
}

impl CertificateRenderer {
    pub fn new(fonts: FontConfig) -> Self {
        Self { fonts }
    }

    pub fn resolve(&self, request: &CertificateRequest) -> Result<TemplateResolution, RenderError> {
        let resolution = templates::resolve(
            request.policy(),
            &request.category,
            &request.rank,
            request.session.as_deref(),
        )?;
        tracing::debug!(
            policy = ?resolution.policy,
            filename = %resolution.filename,
            layout = ?resolution.layout,
            "resolved template"
        );
        for notice in &resolution.notices {
            tracing::warn!("{}", notice);
        }
        Ok(resolution)
    }

    /// Path of the resolved template, checked before anything opens it
    pub fn locate_template(
        &self,
        resource_dir: &Path,
        resolution: &TemplateResolution,
    ) -> Result<PathBuf, RenderError> {
        let path = resource_dir.join(&resolution.filename);
        if !path.is_file() {
            return Err(RenderError::TemplateNotFound {
                filename: resolution.filename.clone(),
                search_dir: resource_dir.to_path_buf(),
            });
        }
        Ok(path)
    }

    /// Open the template and draw the name and certificate number.
    pub fn compose(&self, request: &CertificateRequest) -> Result<ComposedCertificate, RenderError> {
        let resolution = self.resolve(request)?;
        self.compose_resolved(request, resolution)
    }

    fn compose_resolved(
        &self,
        request: &CertificateRequest,
        resolution: TemplateResolution,
    ) -> Result<ComposedCertificate, RenderError> {
        let template_path = self.locate_template(&request.resource_dir, &resolution)?;
        let fonts = FontSet::load(&request.resource_dir, &self.fonts)?;

        let template = image::open(&template_path)?;
        let has_alpha = template.color().has_alpha();
        let mut canvas = template.to_rgba8();

        compositor::compose(
            &mut canvas,
            &fonts,
            &resolution.layout.spec(),
            &request.name,
            &request.certificate_number,
        );

        let image = if has_alpha {
            DynamicImage::ImageRgba8(canvas)
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
        };

        Ok(ComposedCertificate {
            resolution,
            template_path,
            image,
        })
    }

    /// Render and write the certificate to the request's output path.
    pub fn render(&self, request: &CertificateRequest) -> Result<RenderedCertificate, RenderError> {
        let resolution = self.resolve(request)?;
        self.render_resolved(request, resolution)
    }

    /// Render with a resolution the caller already has.
    ///
    /// Once the file is saved the render counts as successful; a failure to
    /// read it back for the digest is only logged.
    pub fn render_resolved(
        &self,
        request: &CertificateRequest,
        resolution: TemplateResolution,
    ) -> Result<RenderedCertificate, RenderError> {
        // Format is checked up front so a bad extension fails before any work
        let format = ImageFormat::from_path(&request.output_path)
            .map_err(|_| RenderError::UnsupportedOutput(request.output_path.clone()))?;

        let composed = self.compose_resolved(request, resolution)?;
        composed.image.save_with_format(&request.output_path, format)?;

        let digest = output_digest(&request.output_path);
        tracing::info!(
            output = %request.output_path.display(),
            template = %composed.resolution.filename,
            digest = digest.as_deref().unwrap_or("-"),
            "certificate written"
        );

        Ok(RenderedCertificate {
            output_path: request.output_path.clone(),
            template: composed.resolution.filename,
            layout: composed.resolution.layout,
            digest,
        })
    }
}

fn output_digest(path: &Path) -> Option<String> {
    match file_digest(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::warn!(output = %path.display(), error = %e, "could not digest written certificate");
            None
        }
    }
}

impl Default for CertificateRenderer {
    fn default() -> Self {
        Self::new(FontConfig::default())
    }
}

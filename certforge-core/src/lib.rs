//! CertForge Core - Certificate Renderer
//!
//! # Render Path
//! 1. Resolve the template filename and layout from category, rank, session
//! 2. Check the template exists before opening it
//! 3. Load both fonts before drawing anything
//! 4. Draw name and certificate number at the layout's fixed anchors
//! 5. Save last, so a failed render never leaves a file behind

pub mod templates;
pub mod layout;
pub mod fonts;
pub mod compositor;
pub mod request;
pub mod hashing;
pub mod report;
pub mod doctor;
pub mod pipeline;

pub use templates::{Policy, Region, RankCode, SessionNumber, TemplateResolution, CatalogEntry};
pub use layout::{Layout, LayoutSpec, TextPlacement};
pub use fonts::{FontConfig, FontSet};
pub use request::CertificateRequest;
pub use hashing::file_digest;
pub use doctor::{Doctor, DoctorContext, DoctorReport};
pub use pipeline::{CertificateRenderer, ComposedCertificate, RenderedCertificate, RenderError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

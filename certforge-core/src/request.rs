//! Certificate Request - built once from positional arguments

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::RenderError;
use crate::templates::Policy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub name: String,
    pub category: String,
    pub certificate_number: String,
    pub rank: String,
    /// Present only for the coded-session policy
    #[serde(default)]
    pub session: Option<String>,
    pub output_path: PathBuf,
    pub resource_dir: PathBuf,
}

impl CertificateRequest {
    /// Build a request from the policy's positional arguments.
    ///
    /// Fixed-name: `name category certificate_number rank output_path resource_dir`
    /// Coded:      `name category certificate_number rank session output_path resource_dir`
    ///
    /// Arguments past the policy's arity are ignored. Never touches the
    /// filesystem.
    pub fn from_args(policy: Policy, args: &[String]) -> Result<Self, RenderError> {
        if args.len() < policy.arity() {
            return Err(RenderError::InsufficientArguments {
                expected: policy.arity(),
                got: args.len(),
            });
        }

        let (session, rest) = match policy {
            Policy::FixedName => (None, &args[4..6]),
            Policy::CodedSession => (Some(args[4].clone()), &args[5..7]),
        };

        Ok(Self {
            name: args[0].clone(),
            category: args[1].clone(),
            certificate_number: args[2].clone(),
            rank: args[3].clone(),
            session,
            output_path: PathBuf::from(&rest[0]),
            resource_dir: absolute(Path::new(&rest[1])),
        })
    }

    pub fn policy(&self) -> Policy {
        if self.session.is_some() {
            Policy::CodedSession
        } else {
            Policy::FixedName
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

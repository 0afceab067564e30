use std::{io, path::PathBuf};

use gl::types::GLenum;
use thiserror::Error;

use crate::kind::ShaderStage;

const ENOMEM: i32 = 12;
const EINVAL: i32 = 22;

pub type Result<T> = std::result::Result<T, ShaderError>;

#[derive(Debug, Error)]
pub enum ShaderError {
    /// The driver returned no object name from `glCreateShader`/`glCreateProgram`.
    #[error("could not create GL {object} object")]
    ResourceExhaustion { object: &'static str },

    #[error("could not read shader asset {}: {source}", .path.display())]
    AssetUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to compile {stage} shader {}: {log}", .path.display())]
    CompileFailure {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },

    /// Only ever seen inside the loader, which falls back to source.
    #[error("binary shader extension {extension} is not available")]
    BinaryUnsupported { extension: String },

    /// Only ever seen inside the loader, which falls back to source.
    #[error("error loading binary shader {}: 0x{code:04x}", .path.display())]
    BinaryRejected { path: PathBuf, code: GLenum },

    #[error("error while attaching the {stage} shader: 0x{code:04x}")]
    AttachFailure { stage: ShaderStage, code: GLenum },

    #[error("failed to link GL program: {log}")]
    LinkFailure { log: String },

    #[error("unknown shader kind {0:?}")]
    UnknownKind(String),
}

impl ShaderError {
    /// Negative errno value reported to the host plugin.
    pub fn errno(&self) -> i32 {
        match self {
            ShaderError::ResourceExhaustion { .. } => -ENOMEM,
            _ => -EINVAL,
        }
    }
}

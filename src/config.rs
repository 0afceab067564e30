use std::path::{Path, PathBuf};

use gl::types::GLenum;

/// Installed shader directory, overridable with `GLES_SHADER_DATA_DIR` at build time.
pub const DEFAULT_DATA_DIR: &str = match option_env!("GLES_SHADER_DATA_DIR") {
    Some(dir) => dir,
    None => "/usr/share/gst-plugins-gles/shaders",
};

pub const BINARY_EXTENSION: &str = "glsh";
pub const SOURCE_EXTENSION: &str = "glsl";

/// `GL_NVIDIA_PLATFORM_BINARY_NV`, missing from the GL headers.
pub const NV_PLATFORM_BINARY_FORMAT: GLenum = 0x890B;
pub const NV_PLATFORM_BINARY_EXTENSION: &str = "GL_NV_platform_binary";

/// Where shader assets live and how precompiled binaries are submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderConfig {
    pub data_dir: PathBuf,
    pub binary_extension: String,
    pub source_extension: String,
    /// Format passed to `glShaderBinary`.
    pub binary_format: GLenum,
    /// GL extension that must be advertised before a binary is tried.
    pub binary_capability: String,
    pub allow_binary: bool,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        ShaderConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            binary_extension: BINARY_EXTENSION.to_owned(),
            source_extension: SOURCE_EXTENSION.to_owned(),
            binary_format: NV_PLATFORM_BINARY_FORMAT,
            binary_capability: NV_PLATFORM_BINARY_EXTENSION.to_owned(),
            allow_binary: cfg!(feature = "binary-shaders"),
        }
    }
}

impl ShaderConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_binary_format(mut self, format: GLenum, capability: impl Into<String>) -> Self {
        self.binary_format = format;
        self.binary_capability = capability.into();
        self
    }

    pub fn with_binary(mut self, allow: bool) -> Self {
        self.allow_binary = allow;
        self
    }

    pub fn binary_path(&self, base_name: &str) -> PathBuf {
        asset_path(&self.data_dir, base_name, &self.binary_extension)
    }

    pub fn source_path(&self, base_name: &str) -> PathBuf {
        asset_path(&self.data_dir, base_name, &self.source_extension)
    }
}

fn asset_path(dir: &Path, base_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", base_name, extension))
}

//! Shader program loading for OpenGL ES video sinks.
//!
//! [`ProgramBuilder`] resolves the fixed vertex stage and the fragment stage
//! of a [`ShaderKind`] from a data directory, preferring precompiled platform
//! binaries and falling back to GLSL source, then links them into a
//! [`ShaderProgram`]. Every call has to happen on the thread that owns the
//! current GL context.
//!
//! ```no_run
//! use gles_sink_shader::{NativeGl, ProgramBuilder, ShaderConfig, ShaderKind};
//!
//! # fn run() -> gles_sink_shader::Result<()> {
//! // SAFETY: context created and made current by the sink.
//! let gl = unsafe { NativeGl::new() };
//! let builder = ProgramBuilder::new(&gl, ShaderConfig::default())
//!     .with_span(tracing::info_span!("glessink0"));
//! let mut program = builder.build(ShaderKind::Copy)?;
//! // ... draw frames ...
//! program.release(&gl);
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all)]

// Re-export dependencies.
pub use gl;

mod assets;
mod config;
mod driver;
mod error;
mod gl_utils;
mod kind;
mod loader;
mod object;
mod program;

pub use assets::{AssetReader, FsAssets};
pub use config::{
    ShaderConfig, BINARY_EXTENSION, DEFAULT_DATA_DIR, NV_PLATFORM_BINARY_EXTENSION,
    NV_PLATFORM_BINARY_FORMAT, SOURCE_EXTENSION,
};
pub use driver::{gl_error_name, GlDriver, NativeGl};
pub use error::{Result, ShaderError};
pub use kind::{ShaderKind, ShaderStage, VERTEX_BASE_NAME};
pub use loader::ShaderLoader;
pub use program::{
    ProgramBuilder, ShaderProgram, POSITION_ATTRIBUTE, POSITION_SLOT, TEXCOORD_ATTRIBUTE,
};

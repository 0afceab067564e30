use std::{
    io,
    path::{Path, PathBuf},
};

use gl::types::{GLsizei, GLuint};
use tracing::{debug, error, Span};

use crate::{
    assets::{AssetReader, FsAssets},
    config::ShaderConfig,
    driver::{drain_errors, gl_error_name, GlDriver},
    error::{Result, ShaderError},
    kind::ShaderStage,
    object::GlObject,
};

/// Resolves a shader stage from the data directory.
///
/// A precompiled binary (`<base>.glsh`) is preferred when the driver
/// advertises the configured binary extension; otherwise, or when the binary
/// cannot be used for any reason, the GLSL source (`<base>.glsl`) is
/// compiled. Diagnostics are emitted inside the span given to
/// [`ShaderLoader::with_span`].
pub struct ShaderLoader<'gl, G: GlDriver + ?Sized, A = FsAssets> {
    gl: &'gl G,
    assets: A,
    config: ShaderConfig,
    span: Span,
}

impl<'gl, G: GlDriver + ?Sized> ShaderLoader<'gl, G, FsAssets> {
    pub fn new(gl: &'gl G, config: ShaderConfig) -> Self {
        ShaderLoader {
            gl,
            assets: FsAssets,
            config,
            span: Span::none(),
        }
    }
}

impl<'gl, G: GlDriver + ?Sized, A: AssetReader> ShaderLoader<'gl, G, A> {
    pub fn with_assets<B: AssetReader>(self, assets: B) -> ShaderLoader<'gl, G, B> {
        ShaderLoader {
            gl: self.gl,
            assets,
            config: self.config,
            span: self.span,
        }
    }

    /// Span of the embedding element, usually carrying its name.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn gl(&self) -> &'gl G {
        self.gl
    }

    /// Loads `base_name` for `stage` and returns the shader object name.
    ///
    /// The returned shader is owned by the caller. On error nothing created
    /// by this call is left alive.
    pub fn load_shader(&self, stage: ShaderStage, base_name: &str) -> Result<GLuint> {
        let _entered = self.span.enter();

        if self.config.allow_binary {
            let path = self.config.binary_path(base_name);
            debug!("load binary shader from {}", path.display());
            match self.load_binary(stage, path) {
                Ok(shader) => return Ok(shader),
                Err(err) => debug!("{}, falling back to source shader", err),
            }
        }

        let path = self.config.source_path(base_name);
        debug!("load source shader from {}", path.display());
        self.load_source(stage, path)
    }

    fn load_binary(&self, stage: ShaderStage, path: PathBuf) -> Result<GLuint> {
        if !self.gl.has_extension(&self.config.binary_capability) {
            return Err(ShaderError::BinaryUnsupported {
                extension: self.config.binary_capability.clone(),
            });
        }

        let binary = self.read_asset(&path)?;
        if GLsizei::try_from(binary.len()).is_err() {
            return Err(ShaderError::BinaryRejected {
                path,
                code: gl::INVALID_VALUE,
            });
        }

        let shader = self.create_shader(stage)?;
        drain_errors(self.gl);
        if !self
            .gl
            .shader_binary(shader.name(), self.config.binary_format, &binary)
        {
            debug!("driver has no glShaderBinary entry point");
            return Err(ShaderError::BinaryRejected {
                path,
                code: gl::INVALID_OPERATION,
            });
        }

        match self.gl.get_error() {
            gl::NO_ERROR => Ok(shader.into_name()),
            code => {
                debug!(
                    "driver rejected binary shader: {} (0x{:X})",
                    gl_error_name(code),
                    code
                );
                Err(ShaderError::BinaryRejected { path, code })
            }
        }
    }

    fn load_source(&self, stage: ShaderStage, path: PathBuf) -> Result<GLuint> {
        let source = self
            .read_asset(&path)
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|err| ShaderError::AssetUnreadable {
                    path: path.clone(),
                    source: io::Error::new(io::ErrorKind::InvalidData, err),
                })
            })
            .map_err(|err| {
                error!("could not read shader source: {}", err);
                err
            })?;

        let shader = self.create_shader(stage)?;
        self.gl.shader_source(shader.name(), &source);
        self.gl.compile_shader(shader.name());

        if !self.gl.shader_compile_status(shader.name()) {
            let log = self.gl.shader_info_log(shader.name());
            if log.is_empty() {
                error!("failed to compile {} shader {}", stage, path.display());
            } else {
                error!("failed to compile shader: {}", log);
            }
            return Err(ShaderError::CompileFailure { stage, path, log });
        }

        debug!("{} shader compiled successfully", stage);
        Ok(shader.into_name())
    }

    fn read_asset(&self, path: &Path) -> Result<Vec<u8>> {
        let unreadable = |source| ShaderError::AssetUnreadable {
            path: path.to_owned(),
            source,
        };
        let bytes = self.assets.read(path).map_err(unreadable)?;
        if bytes.is_empty() {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file is empty",
            )));
        }
        Ok(bytes)
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<GlObject<'gl, G>> {
        let shader = GlObject::shader(self.gl, self.gl.create_shader(stage.gl_enum()));
        if shader.is_null() {
            error!("could not create shader object");
            return Err(ShaderError::ResourceExhaustion { object: "shader" });
        }
        Ok(shader)
    }
}

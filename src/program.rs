use gl::types::GLuint;
use tracing::{debug, error, warn, Span};

use crate::{
    assets::{AssetReader, FsAssets},
    config::ShaderConfig,
    driver::{drain_errors, gl_error_name, GlDriver},
    error::{Result, ShaderError},
    kind::{ShaderKind, ShaderStage, VERTEX_BASE_NAME},
    loader::ShaderLoader,
    object::GlObject,
};

/// Vertex attribute carrying the quad corners; bound to [`POSITION_SLOT`].
pub const POSITION_ATTRIBUTE: &str = "vPosition";
pub const TEXCOORD_ATTRIBUTE: &str = "aTexcoord";
pub const POSITION_SLOT: GLuint = 0;

/// A linked vertex + fragment program ready to draw video frames.
///
/// Only [`ProgramBuilder::build`] creates one, and only fully built. The GL
/// objects must be freed with [`ShaderProgram::release`] while the context
/// that created them is still current.
#[derive(Debug)]
pub struct ShaderProgram {
    kind: ShaderKind,
    vertex_shader: GLuint,
    fragment_shader: GLuint,
    program: GLuint,
    position_location: Option<GLuint>,
    texcoord_location: Option<GLuint>,
}

impl ShaderProgram {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn program(&self) -> GLuint {
        self.program
    }

    pub fn vertex_shader(&self) -> GLuint {
        self.vertex_shader
    }

    pub fn fragment_shader(&self) -> GLuint {
        self.fragment_shader
    }

    /// Location of `vPosition`, `None` if the vertex stage does not use it.
    pub fn position_location(&self) -> Option<GLuint> {
        self.position_location
    }

    /// Location of `aTexcoord`, `None` if the vertex stage does not use it.
    pub fn texcoord_location(&self) -> Option<GLuint> {
        self.texcoord_location
    }

    pub fn is_released(&self) -> bool {
        self.program == 0 && self.vertex_shader == 0 && self.fragment_shader == 0
    }

    /// Deletes both shader stages and the program and zeroes the handles.
    ///
    /// Calling it again is a no-op.
    pub fn release<G: GlDriver + ?Sized>(&mut self, gl: &G) {
        if self.fragment_shader != 0 {
            gl.delete_shader(self.fragment_shader);
            self.fragment_shader = 0;
        }
        if self.vertex_shader != 0 {
            gl.delete_shader(self.vertex_shader);
            self.vertex_shader = 0;
        }
        if self.program != 0 {
            gl.delete_program(self.program);
            self.program = 0;
        }
        self.position_location = None;
        self.texcoord_location = None;
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if !self.is_released() {
            warn!(
                "{} shader program {} dropped without release, GL objects leaked",
                self.kind, self.program
            );
        }
    }
}

/// Loads the fixed vertex stage and a [`ShaderKind`]'s fragment stage and
/// links them.
pub struct ProgramBuilder<'gl, G: GlDriver + ?Sized, A = FsAssets> {
    loader: ShaderLoader<'gl, G, A>,
}

impl<'gl, G: GlDriver + ?Sized> ProgramBuilder<'gl, G, FsAssets> {
    pub fn new(gl: &'gl G, config: ShaderConfig) -> Self {
        ProgramBuilder {
            loader: ShaderLoader::new(gl, config),
        }
    }
}

impl<'gl, G: GlDriver + ?Sized, A: AssetReader> ProgramBuilder<'gl, G, A> {
    pub fn from_loader(loader: ShaderLoader<'gl, G, A>) -> Self {
        ProgramBuilder { loader }
    }

    pub fn with_assets<B: AssetReader>(self, assets: B) -> ProgramBuilder<'gl, G, B> {
        ProgramBuilder {
            loader: self.loader.with_assets(assets),
        }
    }

    pub fn with_span(self, span: Span) -> Self {
        ProgramBuilder {
            loader: self.loader.with_span(span),
        }
    }

    pub fn loader(&self) -> &ShaderLoader<'gl, G, A> {
        &self.loader
    }

    /// Builds the program for `kind`.
    ///
    /// Leaves the program current and the clear colour at opaque black. Any
    /// failure deletes every object created so far.
    pub fn build(&self, kind: ShaderKind) -> Result<ShaderProgram> {
        let gl = self.loader.gl();
        let _entered = self.loader.span().enter();

        let program = GlObject::program(gl, gl.create_program());
        if program.is_null() {
            error!("could not create GL program");
            return Err(ShaderError::ResourceExhaustion { object: "program" });
        }

        let vertex = self.load_stage(ShaderStage::Vertex, VERTEX_BASE_NAME)?;
        let fragment = self.load_stage(ShaderStage::Fragment, kind.base_name())?;

        drain_errors(gl);
        attach(gl, &program, &vertex, ShaderStage::Vertex)?;
        attach(gl, &program, &fragment, ShaderStage::Fragment)?;

        gl.bind_attrib_location(program.name(), POSITION_SLOT, POSITION_ATTRIBUTE);
        gl.link_program(program.name());

        if !gl.program_link_status(program.name()) {
            error!("linker failure");
            let log = gl.program_info_log(program.name());
            if !log.is_empty() {
                error!("failed to link GL program: {}", log);
            }
            return Err(ShaderError::LinkFailure { log });
        }

        gl.use_program(program.name());
        let position_location = attrib_location(gl, program.name(), POSITION_ATTRIBUTE);
        let texcoord_location = attrib_location(gl, program.name(), TEXCOORD_ATTRIBUTE);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);

        debug!(
            "linked {} program {} (position {:?}, texcoord {:?})",
            kind,
            program.name(),
            position_location,
            texcoord_location
        );

        Ok(ShaderProgram {
            kind,
            vertex_shader: vertex.into_name(),
            fragment_shader: fragment.into_name(),
            program: program.into_name(),
            position_location,
            texcoord_location,
        })
    }

    fn load_stage(&self, stage: ShaderStage, base_name: &str) -> Result<GlObject<'gl, G>> {
        match self.loader.load_shader(stage, base_name) {
            Ok(shader) => Ok(GlObject::shader(self.loader.gl(), shader)),
            Err(err) => {
                error!("could not create GL {} shader: {}", stage, err.errno());
                Err(err)
            }
        }
    }
}

fn attach<G: GlDriver + ?Sized>(
    gl: &G,
    program: &GlObject<'_, G>,
    shader: &GlObject<'_, G>,
    stage: ShaderStage,
) -> Result<()> {
    gl.attach_shader(program.name(), shader.name());
    match gl.get_error() {
        gl::NO_ERROR => Ok(()),
        code => {
            error!(
                "error while attaching the {} shader: {} (0x{:04x})",
                stage,
                gl_error_name(code),
                code
            );
            Err(ShaderError::AttachFailure { stage, code })
        }
    }
}

fn attrib_location<G: GlDriver + ?Sized>(gl: &G, program: GLuint, name: &str) -> Option<GLuint> {
    GLuint::try_from(gl.attrib_location(program, name)).ok()
}

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use gles_sink_shader::{
    gl::{
        self,
        types::{GLenum, GLfloat, GLint, GLuint},
    },
    AssetReader, FsAssets, GlDriver, ShaderConfig, NV_PLATFORM_BINARY_EXTENSION,
    NV_PLATFORM_BINARY_FORMAT,
};
use tempfile::TempDir;

/// Leading bytes the mock driver accepts as a platform binary.
pub const BINARY_MAGIC: &[u8] = b"NVSH";

pub const VERTEX_SRC: &str = "attribute vec4 vPosition;
attribute vec2 aTexcoord;
varying vec2 vTexcoord;
void main() {
    gl_Position = vPosition;
    vTexcoord = aTexcoord;
}
";

pub const VERTEX_NO_TEXCOORD_SRC: &str = "attribute vec4 vPosition;
void main() {
    gl_Position = vPosition;
}
";

pub const COPY_SRC: &str = "precision mediump float;
uniform sampler2D s_tex;
varying vec2 vTexcoord;
void main() {
    gl_FragColor = texture2D(s_tex, vTexcoord);
}
";

pub const BROKEN_SRC: &str = "precision mediump float;
void main() {
    gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0;
}
";

pub fn binary_of(source: &str) -> Vec<u8> {
    let mut binary = BINARY_MAGIC.to_vec();
    binary.extend_from_slice(source.as_bytes());
    binary
}

/// Temporary data directory holding `files`.
pub fn data_dir(files: &[(&str, &[u8])]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

pub fn config_for(dir: &TempDir) -> ShaderConfig {
    ShaderConfig::default()
        .with_data_dir(dir.path())
        .with_binary(true)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    HasExtension(String),
    CreateShader(GLenum),
    DeleteShader(GLuint),
    ShaderBinary(GLuint, GLenum),
    ShaderSource(GLuint),
    CompileShader(GLuint),
    CreateProgram,
    DeleteProgram(GLuint),
    AttachShader(GLuint, GLuint),
    BindAttribLocation(GLuint, GLuint, String),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    ClearColor([GLfloat; 4]),
}

struct Shader {
    stage: GLenum,
    text: Option<String>,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct Program {
    attached: Vec<GLuint>,
    bindings: Vec<(String, GLuint)>,
    linked: bool,
    locations: Vec<(String, GLuint)>,
    log: String,
}

#[derive(Default)]
struct State {
    last_name: GLuint,
    shaders: HashMap<GLuint, Shader>,
    programs: HashMap<GLuint, Program>,
    errors: Vec<GLenum>,
    calls: Vec<Call>,
    current_program: GLuint,
    clear_color: Option<[GLfloat; 4]>,
}

impl State {
    fn next_name(&mut self) -> GLuint {
        self.last_name += 1;
        self.last_name
    }
}

/// In-memory GL driver.
///
/// Names are never reused. Sources compile when they contain a `main` and
/// balanced brackets; binaries load when they carry [`BINARY_MAGIC`] and the
/// NV platform format.
#[derive(Default)]
pub struct MockGl {
    state: RefCell<State>,
    extensions: Vec<String>,
    pub fail_create_shader: Cell<bool>,
    pub fail_create_program: Cell<bool>,
    /// Advertise the binary extension but expose no `glShaderBinary`.
    pub missing_shader_binary: Cell<bool>,
    pub attach_error: Cell<Option<GLenum>>,
    pub link_error: RefCell<Option<String>>,
}

impl MockGl {
    pub fn new() -> Self {
        MockGl::default()
    }

    pub fn with_binary_support() -> Self {
        MockGl {
            extensions: vec![
                "GL_OES_rgb8_rgba8".to_owned(),
                NV_PLATFORM_BINARY_EXTENSION.to_owned(),
            ],
            ..MockGl::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn extension_queries(&self) -> usize {
        self.count(|c| matches!(c, Call::HasExtension(_)))
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn is_shader(&self, name: GLuint) -> bool {
        self.state.borrow().shaders.contains_key(&name)
    }

    pub fn is_program(&self, name: GLuint) -> bool {
        self.state.borrow().programs.contains_key(&name)
    }

    pub fn shader_text(&self, name: GLuint) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&name)
            .and_then(|s| s.text.clone())
    }

    pub fn current_program(&self) -> GLuint {
        self.state.borrow().current_program
    }

    pub fn clear_color_value(&self) -> Option<[GLfloat; 4]> {
        self.state.borrow().clear_color
    }

    /// Raises `code` as if an earlier, unrelated call had failed.
    pub fn push_error(&self, code: GLenum) {
        self.state.borrow_mut().errors.push(code);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn raise(&self, code: GLenum) {
        self.state.borrow_mut().errors.push(code);
    }
}

fn compiles(text: &str) -> bool {
    let balanced = |open: char, close: char| {
        let mut depth = 0i32;
        for c in text.chars() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
        depth == 0
    };
    text.contains("void main") && balanced('(', ')') && balanced('{', '}')
}

fn declared_attributes(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("attribute "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_owned)
        .collect()
}

impl GlDriver for MockGl {
    fn has_extension(&self, name: &str) -> bool {
        self.record(Call::HasExtension(name.to_owned()));
        self.extensions.iter().any(|ext| ext == name)
    }

    fn create_shader(&self, shader_type: GLenum) -> GLuint {
        self.record(Call::CreateShader(shader_type));
        if self.fail_create_shader.get() {
            return 0;
        }
        if shader_type != gl::VERTEX_SHADER && shader_type != gl::FRAGMENT_SHADER {
            self.raise(gl::INVALID_ENUM);
            return 0;
        }
        let mut state = self.state.borrow_mut();
        let name = state.next_name();
        state.shaders.insert(
            name,
            Shader {
                stage: shader_type,
                text: None,
                compiled: false,
                log: String::new(),
            },
        );
        name
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
        if shader != 0 && self.state.borrow_mut().shaders.remove(&shader).is_none() {
            self.raise(gl::INVALID_VALUE);
        }
    }

    fn shader_binary(&self, shader: GLuint, format: GLenum, binary: &[u8]) -> bool {
        if self.missing_shader_binary.get() {
            return false;
        }
        self.record(Call::ShaderBinary(shader, format));
        if format != NV_PLATFORM_BINARY_FORMAT {
            self.raise(gl::INVALID_ENUM);
            return true;
        }
        let mut state = self.state.borrow_mut();
        let State {
            shaders, errors, ..
        } = &mut *state;
        match shaders.get_mut(&shader) {
            Some(object) if binary.starts_with(BINARY_MAGIC) => {
                object.text =
                    Some(String::from_utf8_lossy(&binary[BINARY_MAGIC.len()..]).into_owned());
                object.compiled = true;
            }
            _ => errors.push(gl::INVALID_VALUE),
        }
        true
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.record(Call::ShaderSource(shader));
        let mut state = self.state.borrow_mut();
        let State {
            shaders, errors, ..
        } = &mut *state;
        match shaders.get_mut(&shader) {
            Some(object) => {
                object.text = Some(source.to_owned());
                object.compiled = false;
            }
            None => errors.push(gl::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record(Call::CompileShader(shader));
        let mut state = self.state.borrow_mut();
        if let Some(object) = state.shaders.get_mut(&shader) {
            object.compiled = object.text.as_deref().map_or(false, compiles);
            object.log = if object.compiled {
                String::new()
            } else {
                "0:3: error: syntax error, unexpected ';'".to_owned()
            };
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn create_program(&self) -> GLuint {
        self.record(Call::CreateProgram);
        if self.fail_create_program.get() {
            return 0;
        }
        let mut state = self.state.borrow_mut();
        let name = state.next_name();
        state.programs.insert(name, Program::default());
        name
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        if program != 0 && state.programs.remove(&program).is_none() {
            state.errors.push(gl::INVALID_VALUE);
        }
        if state.current_program == program {
            state.current_program = 0;
        }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
        if let Some(code) = self.attach_error.get() {
            self.raise(code);
            return;
        }
        let mut state = self.state.borrow_mut();
        let State {
            shaders,
            programs,
            errors,
            ..
        } = &mut *state;
        match programs.get_mut(&program) {
            Some(object) if shaders.contains_key(&shader) => object.attached.push(shader),
            _ => errors.push(gl::INVALID_VALUE),
        }
    }

    fn bind_attrib_location(&self, program: GLuint, index: GLuint, name: &str) {
        self.record(Call::BindAttribLocation(program, index, name.to_owned()));
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program) {
            object.bindings.push((name.to_owned(), index));
        }
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
        let forced = self.link_error.borrow().clone();
        let mut state = self.state.borrow_mut();
        let State {
            shaders, programs, ..
        } = &mut *state;
        let Some(object) = programs.get_mut(&program) else {
            return;
        };

        if let Some(log) = forced {
            object.linked = false;
            object.log = log;
            return;
        }

        let stage_of = |wanted: GLenum| {
            object
                .attached
                .iter()
                .filter_map(|name| shaders.get(name))
                .filter(|s| s.stage == wanted && s.compiled)
                .count()
        };
        if stage_of(gl::VERTEX_SHADER) != 1 || stage_of(gl::FRAGMENT_SHADER) != 1 {
            object.linked = false;
            object.log = "error: program needs one compiled vertex and fragment shader".into();
            return;
        }

        let vertex_text = object
            .attached
            .iter()
            .filter_map(|name| shaders.get(name))
            .find(|s| s.stage == gl::VERTEX_SHADER)
            .and_then(|s| s.text.clone())
            .unwrap_or_default();

        let mut locations: Vec<(String, GLuint)> = Vec::new();
        let attributes = declared_attributes(&vertex_text);
        for attribute in &attributes {
            if let Some((_, index)) = object.bindings.iter().rev().find(|(n, _)| n == attribute) {
                locations.push((attribute.clone(), *index));
            }
        }
        for attribute in &attributes {
            if locations.iter().any(|(n, _)| n == attribute) {
                continue;
            }
            let free = (0..)
                .find(|i| !locations.iter().any(|(_, used)| used == i))
                .unwrap();
            locations.push((attribute.clone(), free));
        }

        object.locations = locations;
        object.linked = true;
        object.log.clear();
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
        let linked = self.program_link_status(program);
        let mut state = self.state.borrow_mut();
        if linked {
            state.current_program = program;
        } else {
            state.errors.push(gl::INVALID_OPERATION);
        }
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.locations.iter().find(|(n, _)| n == name))
            .map_or(-1, |(_, index)| *index as GLint)
    }

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
        self.state.borrow_mut().clear_color = Some([red, green, blue, alpha]);
    }

    fn get_error(&self) -> GLenum {
        let mut state = self.state.borrow_mut();
        if state.errors.is_empty() {
            gl::NO_ERROR
        } else {
            state.errors.remove(0)
        }
    }
}

/// [`FsAssets`] that remembers every path it was asked for.
#[derive(Default)]
pub struct CountingAssets {
    reads: RefCell<Vec<PathBuf>>,
}

impl CountingAssets {
    pub fn reads_of(&self, path: &Path) -> usize {
        self.reads.borrow().iter().filter(|p| *p == path).count()
    }

    pub fn total_reads(&self) -> usize {
        self.reads.borrow().len()
    }
}

impl AssetReader for CountingAssets {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.borrow_mut().push(path.to_owned());
        FsAssets.read(path)
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug-level subscriber and returns what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}

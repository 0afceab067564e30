#![allow(unsafe_code)]

use std::marker::PhantomData;

use gl::types::{GLenum, GLfloat, GLint, GLuint};

use crate::gl_utils;

/// The GL calls the loader and builder rely on.
///
/// Object names follow GL conventions: `0` means "no object" and attribute
/// locations are `-1` when the attribute is not active. Implementations are
/// bound to the thread owning the context, hence `&self` receivers and no
/// `Send`/`Sync` requirement.
pub trait GlDriver {
    /// Whether `name` is advertised in the context's extension list.
    fn has_extension(&self, name: &str) -> bool;

    fn create_shader(&self, shader_type: GLenum) -> GLuint;
    fn delete_shader(&self, shader: GLuint);
    /// Submits a precompiled binary; `false` if the driver cannot take one.
    fn shader_binary(&self, shader: GLuint, format: GLenum, binary: &[u8]) -> bool;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;

    fn create_program(&self) -> GLuint;
    fn delete_program(&self, program: GLuint);
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn bind_attrib_location(&self, program: GLuint, index: GLuint, name: &str);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn attrib_location(&self, program: GLuint, name: &str) -> GLint;

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat);
    fn get_error(&self) -> GLenum;
}

/// [`GlDriver`] over the process-wide `gl` function pointers.
pub struct NativeGl {
    // GL contexts are current per thread.
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// # Safety
    ///
    /// A GL context must be current on the calling thread and the `gl`
    /// function pointers must have been loaded with [`gl::load_with`]. Both
    /// must stay true for the lifetime of the returned value.
    pub unsafe fn new() -> Self {
        NativeGl {
            _not_send: PhantomData,
        }
    }

    /// Loads the `gl` function pointers with `loader`, then wraps them.
    ///
    /// # Safety
    ///
    /// Same as [`NativeGl::new`]; `loader` must resolve symbols of the
    /// context that is current on this thread.
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const std::os::raw::c_void,
    {
        gl::load_with(loader);
        NativeGl::new()
    }

    pub fn extensions(&self) -> Vec<String> {
        unsafe { gl_utils::get_extensions() }
    }
}

impl GlDriver for NativeGl {
    fn has_extension(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| ext == name)
    }

    fn create_shader(&self, shader_type: GLenum) -> GLuint {
        unsafe { gl::CreateShader(shader_type) }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn shader_binary(&self, shader: GLuint, format: GLenum, binary: &[u8]) -> bool {
        unsafe { gl_utils::shader_binary(shader, format, binary) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        unsafe { gl_utils::shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        unsafe { gl_utils::get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        unsafe { gl_utils::get_shader_info_log(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn bind_attrib_location(&self, program: GLuint, index: GLuint, name: &str) {
        unsafe { gl_utils::bind_attrib_location(program, index, name) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        unsafe { gl_utils::get_program_link_status(program) }
    }

    fn program_info_log(&self, program: GLuint) -> String {
        unsafe { gl_utils::get_program_info_log(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        unsafe { gl_utils::get_attrib_location(program, name) }
    }

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) {
        unsafe { gl::ClearColor(red, green, blue, alpha) }
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}

/// Human readable name of a `glGetError` code.
pub fn gl_error_name(error_code: GLenum) -> &'static str {
    match error_code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "<unknown>",
    }
}

// GL keeps one flag per error kind, so a handful of reads empties the queue.
const MAX_PENDING_ERRORS: usize = 16;

/// Clears errors raised by earlier, unrelated GL calls so the next
/// `get_error` reflects only what follows.
pub(crate) fn drain_errors<G: GlDriver + ?Sized>(gl: &G) {
    for _ in 0..MAX_PENDING_ERRORS {
        let error_code = gl.get_error();
        if error_code == gl::NO_ERROR {
            return;
        }
        tracing::debug!(
            "discarding stale GL error {} (0x{:X})",
            gl_error_name(error_code),
            error_code
        );
    }
}

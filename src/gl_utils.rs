#![allow(unsafe_code)]

//! Raw `gl` calls that need pointer, string or buffer marshalling.
//! [`crate::NativeGl`] calls the plain scalar entry points directly.
//!
//! All functions require a current GL context on the calling thread with
//! function pointers loaded through `gl::load_with`.

use std::ffi::{CStr, CString};

use gl::{
    types::{GLchar, GLenum, GLint, GLsizei, GLuint},
    INFO_LOG_LENGTH, LINK_STATUS,
};

unsafe fn string_from_ptr(raw_ptr: *const u8) -> Option<String> {
    if raw_ptr.is_null() {
        return None;
    }
    Some(
        CStr::from_ptr(raw_ptr as *const GLchar)
            .to_string_lossy()
            .into_owned(),
    )
}

pub unsafe fn get_parameter_string(parameter: u32) -> Option<String> {
    string_from_ptr(gl::GetString(parameter))
}

pub unsafe fn get_parameter_i32(parameter: u32) -> i32 {
    let mut value = 0;
    gl::GetIntegerv(parameter, &mut value);
    value
}

/// Extensions advertised by the current context.
///
/// Core profiles only expose the indexed query, ES 2 only the joined string.
pub unsafe fn get_extensions() -> Vec<String> {
    if gl::GetStringi::is_loaded() {
        let count = get_parameter_i32(gl::NUM_EXTENSIONS);
        if count > 0 {
            return (0..count as GLuint)
                .filter_map(|index| string_from_ptr(gl::GetStringi(gl::EXTENSIONS, index)))
                .collect();
        }
    }
    get_parameter_string(gl::EXTENSIONS)
        .map(|joined| joined.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

pub unsafe fn shader_source(shader: GLuint, source: &str) {
    gl::ShaderSource(
        shader,
        1,
        &(source.as_ptr() as *const GLchar),
        &(source.len() as GLint),
    );
}

/// Returns `false` when the context exposes no `glShaderBinary` entry point.
///
/// Caller guarantees `binary.len()` fits in a `GLsizei`.
pub unsafe fn shader_binary(shader: GLuint, format: GLenum, binary: &[u8]) -> bool {
    if !gl::ShaderBinary::is_loaded() {
        return false;
    }
    gl::ShaderBinary(
        1,
        &shader,
        format,
        binary.as_ptr() as *const std::ffi::c_void,
        binary.len() as GLsizei,
    );
    true
}

pub unsafe fn get_shader_compile_status(shader: GLuint) -> bool {
    let mut status = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
    1 == status
}

pub unsafe fn get_shader_info_log(shader: GLuint) -> String {
    let mut length = 0;
    gl::GetShaderiv(shader, INFO_LOG_LENGTH, &mut length);
    if length > 1 {
        let mut log = vec![0u8; length as usize];
        gl::GetShaderInfoLog(
            shader,
            length,
            &mut length,
            log.as_mut_ptr() as *mut GLchar,
        );
        log.truncate(length.max(0) as usize);
        String::from_utf8_lossy(&log).trim_end().to_owned()
    } else {
        String::new()
    }
}

pub unsafe fn bind_attrib_location(program: GLuint, index: GLuint, name: &str) {
    if let Ok(name) = CString::new(name) {
        gl::BindAttribLocation(program, index, name.as_ptr() as *const GLchar);
    }
}

pub unsafe fn get_program_link_status(program: GLuint) -> bool {
    let mut status = 0;
    gl::GetProgramiv(program, LINK_STATUS, &mut status);
    1 == status
}

pub unsafe fn get_program_info_log(program: GLuint) -> String {
    let mut length = 0;
    gl::GetProgramiv(program, INFO_LOG_LENGTH, &mut length);
    if length > 1 {
        let mut log = vec![0u8; length as usize];
        gl::GetProgramInfoLog(
            program,
            length,
            &mut length,
            log.as_mut_ptr() as *mut GLchar,
        );
        log.truncate(length.max(0) as usize);
        String::from_utf8_lossy(&log).trim_end().to_owned()
    } else {
        String::new()
    }
}

pub unsafe fn get_attrib_location(program: GLuint, name: &str) -> GLint {
    match CString::new(name) {
        Ok(name) => gl::GetAttribLocation(program, name.as_ptr() as *const GLchar),
        Err(_) => -1,
    }
}

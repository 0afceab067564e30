use gl::types::GLuint;

use crate::driver::GlDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Shader,
    Program,
}

/// Owns a GL shader or program name until it is handed out with
/// [`GlObject::into_name`]; deletes it otherwise.
pub(crate) struct GlObject<'gl, G: GlDriver + ?Sized> {
    gl: &'gl G,
    kind: ObjectKind,
    name: GLuint,
}

impl<'gl, G: GlDriver + ?Sized> GlObject<'gl, G> {
    pub fn shader(gl: &'gl G, name: GLuint) -> Self {
        GlObject {
            gl,
            kind: ObjectKind::Shader,
            name,
        }
    }

    pub fn program(gl: &'gl G, name: GLuint) -> Self {
        GlObject {
            gl,
            kind: ObjectKind::Program,
            name,
        }
    }

    pub fn name(&self) -> GLuint {
        self.name
    }

    pub fn is_null(&self) -> bool {
        self.name == 0
    }

    pub fn into_name(mut self) -> GLuint {
        std::mem::replace(&mut self.name, 0)
    }
}

impl<G: GlDriver + ?Sized> Drop for GlObject<'_, G> {
    fn drop(&mut self) {
        if self.name == 0 {
            return;
        }
        match self.kind {
            ObjectKind::Shader => self.gl.delete_shader(self.name),
            ObjectKind::Program => self.gl.delete_program(self.name),
        }
    }
}

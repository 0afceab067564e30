use std::{fmt, str::FromStr};

use gl::types::GLenum;

use crate::error::ShaderError;

/// Base name of the vertex stage, shared by every [`ShaderKind`].
pub const VERTEX_BASE_NAME: &str = "vertex";

/// Programmable pipeline stage a shader object is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Rendering mode of the sink, selecting the fragment stage.
///
/// The discriminants are the values the sink exposes on its property, so
/// [`ShaderKind::try_from`] accepts exactly those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Line-blending deinterlacer.
    DeinterlaceLinear = 0,
    /// Plain linear scaled copy.
    Copy = 1,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 2] = [ShaderKind::DeinterlaceLinear, ShaderKind::Copy];

    /// File name (without extension) of the fragment asset.
    pub const fn base_name(self) -> &'static str {
        match self {
            ShaderKind::DeinterlaceLinear => "deint_linear",
            ShaderKind::Copy => "copy",
        }
    }

    /// Short name used in configuration and on the command line.
    pub const fn nick(self) -> &'static str {
        match self {
            ShaderKind::DeinterlaceLinear => "deinterlace-linear",
            ShaderKind::Copy => "copy",
        }
    }
}

impl TryFrom<u32> for ShaderKind {
    type Error = ShaderError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| ShaderKind::ALL.get(index).copied())
            .ok_or_else(|| ShaderError::UnknownKind(value.to_string()))
    }
}

impl FromStr for ShaderKind {
    type Err = ShaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShaderKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.nick() == s || kind.base_name() == s)
            .ok_or_else(|| ShaderError::UnknownKind(s.to_owned()))
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nick())
    }
}

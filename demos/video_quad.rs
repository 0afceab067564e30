// Draws a generated test frame through the sink's shader program.
//
//   cargo run --example video_quad -- --kind deinterlace-linear

use std::{mem, ptr};

use clap::Parser;
use gles_sink_shader::{
    gl::{self, types::*},
    NativeGl, ProgramBuilder, ShaderConfig, ShaderKind,
};
use sdl2::{event::Event, video::GLProfile};

const SCREEN_WIDTH: u32 = 720;
const SCREEN_HEIGHT: u32 = 576;
const FRAME_WIDTH: usize = 360;
const FRAME_HEIGHT: usize = 288;

// x, y, z, w, u, v
static QUAD: [GLfloat; 24] = [
    -1.0, -1.0, 0.0, 1.0, 0.0, 1.0, //
    1.0, -1.0, 0.0, 1.0, 1.0, 1.0, //
    -1.0, 1.0, 0.0, 1.0, 0.0, 0.0, //
    1.0, 1.0, 0.0, 1.0, 1.0, 0.0,
];

#[derive(Parser)]
struct Args {
    /// Shader kind: copy or deinterlace-linear.
    #[arg(long, default_value = "copy")]
    kind: ShaderKind,

    /// Directory holding the shader assets.
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))]
    data_dir: String,

    /// Never try precompiled binaries.
    #[arg(long)]
    source_only: bool,
}

/// Interlaced-looking bars: odd lines are shifted to show combing.
fn test_frame() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(FRAME_WIDTH * FRAME_HEIGHT * 4);
    for y in 0..FRAME_HEIGHT {
        let shift = if y % 2 == 1 { 12 } else { 0 };
        for x in 0..FRAME_WIDTH {
            let bar = ((x + shift) / 45) as u8;
            pixels.extend_from_slice(&[
                if bar & 1 != 0 { 0xff } else { 0x20 },
                if bar & 2 != 0 { 0xff } else { 0x20 },
                if bar & 4 != 0 { 0xff } else { 0x20 },
                0xff,
            ]);
        }
    }
    pixels
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let sdl_context = sdl2::init().unwrap();
    let video_subsystem = sdl_context.video().unwrap();

    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::GLES);
    gl_attr.set_context_version(2, 0);

    let window = video_subsystem
        .window("Demo: GLES sink shader", SCREEN_WIDTH, SCREEN_HEIGHT)
        .opengl()
        .build()
        .unwrap();

    let _ctx = window.gl_create_context().unwrap();
    let gl = unsafe {
        NativeGl::load_with(|name| video_subsystem.gl_get_proc_address(name) as *const _)
    };

    let config = ShaderConfig::default()
        .with_data_dir(&args.data_dir)
        .with_binary(!args.source_only);
    let builder = ProgramBuilder::new(&gl, config).with_span(tracing::info_span!("video_quad"));
    let mut program = match builder.build(args.kind) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("Could not build {} program: {}", args.kind, err);
            std::process::exit(1);
        }
    };

    let mut texture = 0;
    let mut vbo = 0;
    unsafe {
        gl::GenTextures(1, &mut texture);
        gl::BindTexture(gl::TEXTURE_2D, texture);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
        let pixels = test_frame();
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::RGBA as i32,
            FRAME_WIDTH as i32,
            FRAME_HEIGHT as i32,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            pixels.as_ptr() as *const GLvoid,
        );

        gl::GenBuffers(1, &mut vbo);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            (QUAD.len() * mem::size_of::<GLfloat>()) as GLsizeiptr,
            QUAD.as_ptr() as *const GLvoid,
            gl::STATIC_DRAW,
        );

        let stride = (6 * mem::size_of::<GLfloat>()) as GLsizei;
        if let Some(position) = program.position_location() {
            gl::VertexAttribPointer(position, 4, gl::FLOAT, gl::FALSE, stride, ptr::null());
            gl::EnableVertexAttribArray(position);
        }
        if let Some(texcoord) = program.texcoord_location() {
            gl::VertexAttribPointer(
                texcoord,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (4 * mem::size_of::<GLfloat>()) as *const GLvoid,
            );
            gl::EnableVertexAttribArray(texcoord);
        }

        // Only the deinterlacer samples the neighbouring line.
        let line_height = std::ffi::CString::new("line_height").unwrap();
        let loc = gl::GetUniformLocation(program.program(), line_height.as_ptr());
        if loc >= 0 {
            gl::Uniform1f(loc, 1.0 / FRAME_HEIGHT as f32);
        }
    }

    let mut event_pump = sdl_context.event_pump().unwrap();
    'running: loop {
        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                break 'running;
            }
        }

        unsafe {
            gl::Viewport(0, 0, SCREEN_WIDTH as i32, SCREEN_HEIGHT as i32);
            gl::Clear(gl::COLOR_BUFFER_BIT);
            gl::DrawArrays(gl::TRIANGLE_STRIP, 0, 4);
        }
        window.gl_swap_window();
        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    program.release(&gl);
    unsafe {
        gl::DeleteBuffers(1, &vbo);
        gl::DeleteTextures(1, &texture);
    }
}

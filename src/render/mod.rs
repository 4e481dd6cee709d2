pub mod pipeline;
pub mod shaders;
pub mod webgl;

pub use pipeline::RenderPipeline;
pub use webgl::WebGLContext;

//! Rendering
//!
//! The scene is rasterized into a logical-resolution software framebuffer,
//! which is then handed to the GPU for presentation.

pub mod font;
pub mod framebuffer;
pub mod present;
pub mod scene;

pub use framebuffer::{Framebuffer, Rgba, rgb};
pub use present::{PresentError, Presenter};
pub use scene::draw_frame;

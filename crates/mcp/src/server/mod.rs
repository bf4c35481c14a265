mod core;
mod stdio;

pub use core::ThunderMcpCore;
pub use stdio::serve_stdio;

pub mod decode;
pub mod playback;
mod types;

// Re-exports
pub use {
    playback::Playback,
    types::{Animation, ChannelMask},
};

pub mod chain;
pub mod commands;
pub mod driver;
pub mod texture;

pub use chain::{ChainError, DmaChain, Packet, PacketId, PacketTag};
pub use driver::{GpuDriver, GpuError};
pub use texture::TextureInfo;

pub mod kick;

pub use kick::{ChannelName, ChannelSource, KickClient};

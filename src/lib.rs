pub mod color;
pub mod config;
pub mod dns;
pub mod error;
pub mod exceptions;
pub mod filters;
pub mod lighting;
pub mod palette;
pub mod tables;
pub mod time;

pub use color::{Color, ColorDelta};
pub use config::DnsConfig;
pub use dns::{Dns, FrameContext, FrameOutcome};
pub use error::ConfigError;
pub use exceptions::{AppContext, MapCategory, SpriteTagLookup};
pub use filters::FilterPolicy;
pub use palette::PaletteBuffer;
pub use time::{GameTime, TimePhase};

pub mod freq;
pub mod path;
pub mod utf8;

pub use freq::frequency_map;
pub use utf8::Utf8Decoder;

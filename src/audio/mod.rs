pub mod decode;
pub mod framer;

pub use decode::{decode_audio, AudioData};
pub use framer::ChunkFramer;

pub mod dump;
pub mod texture;

pub use dump::{read_text_dump, DumpWriter};

pub mod assemble;
pub mod caption;
pub mod chunk;
pub mod platform;
pub mod reduce;

pub use assemble::{assemble_thread, ThreadOptions};
pub use caption::{flatten_caption, flatten_caption_plain};
pub use chunk::{chunk_text, weigh_chars};
pub use reduce::reduce_blocks;

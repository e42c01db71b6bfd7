pub mod assembler;
pub mod chunker;
pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod rewrite;
pub mod sink;
pub mod source;
pub mod walker;

pub use assembler::assemble;
pub use chunker::{chunk, Chunk};
pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use model::{Collection, Info, Item, ItemGroup, Request, RequestItem};
pub use naming::chunk_name;
pub use rewrite::rewrite_identifier;
pub use source::{fetch_from_network, fetch_from_storage, FetchOptions};
pub use walker::{run, ChunkFailure, SplitReport};

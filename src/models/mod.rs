mod track;

pub use track::{Track, EMBEDDING_DIM};

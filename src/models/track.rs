use serde::{Deserialize, Serialize};

/// Number of components in every track embedding (PCA1..PCA5 in the dataset).
pub const EMBEDDING_DIM: usize = 5;

/// A single song as returned to clients.
///
/// The acoustic embedding is kept separately in the store, keyed by row
/// position, and is never serialized out with the track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Unique identifier for the track
    pub track_id: String,
    pub track_name: String,
    /// One or more artist names in a single string
    pub artists: String,
    pub album_name: String,
    /// Higher means more popular
    pub popularity: f64,
    pub duration_min: f64,
    pub track_genre: String,
    /// Cover image URL
    pub img: String,
    /// Preview audio URL
    pub preview: String,
}

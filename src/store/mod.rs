use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Track, EMBEDDING_DIM};

/// Error types for dataset loading
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Malformed(#[from] csv::Error),
}

/// Raw CSV row, including the embedding columns.
#[derive(Debug, Deserialize)]
struct TrackRecord {
    track_id: String,
    track_name: String,
    artists: String,
    album_name: String,
    popularity: f64,
    duration_min: f64,
    track_genre: String,
    img: String,
    preview: String,
    #[serde(rename = "PCA1")]
    pca1: f64,
    #[serde(rename = "PCA2")]
    pca2: f64,
    #[serde(rename = "PCA3")]
    pca3: f64,
    #[serde(rename = "PCA4")]
    pca4: f64,
    #[serde(rename = "PCA5")]
    pca5: f64,
}

/// Immutable in-memory song dataset.
///
/// Built once at startup and read concurrently afterwards; nothing here is
/// ever mutated post-load. The track list, the embedding matrix and the
/// id index share row order.
#[derive(Debug)]
pub struct SongStore {
    tracks: Vec<Track>,
    embeddings: Vec<[f64; EMBEDDING_DIM]>,
    index: HashMap<String, usize>,
}

impl SongStore {
    /// Loads the dataset from a CSV file.
    ///
    /// Any malformed or incomplete row fails the whole load; there is no
    /// partial dataset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Loads the dataset from any CSV source.
    ///
    /// Duplicate track ids are collapsed, keeping the first occurrence.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut tracks = Vec::new();
        let mut embeddings = Vec::new();
        let mut index = HashMap::new();

        for record in csv_reader.deserialize() {
            let record: TrackRecord = record?;
            if index.contains_key(&record.track_id) {
                continue;
            }

            index.insert(record.track_id.clone(), tracks.len());
            embeddings.push([
                record.pca1,
                record.pca2,
                record.pca3,
                record.pca4,
                record.pca5,
            ]);
            tracks.push(Track {
                track_id: record.track_id,
                track_name: record.track_name,
                artists: record.artists,
                album_name: record.album_name,
                popularity: record.popularity,
                duration_min: record.duration_min,
                track_genre: record.track_genre,
                img: record.img,
                preview: record.preview,
            });
        }

        Ok(Self {
            tracks,
            embeddings,
            index,
        })
    }

    /// Looks up a track by id
    pub fn get(&self, track_id: &str) -> Option<&Track> {
        self.index.get(track_id).map(|&row| &self.tracks[row])
    }

    /// Row position of a track id, if present
    pub fn row_of(&self, track_id: &str) -> Option<usize> {
        self.index.get(track_id).copied()
    }

    /// All tracks in load order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// All embeddings, aligned row-for-row with `tracks()`
    pub fn embeddings(&self) -> &[[f64; EMBEDDING_DIM]] {
        &self.embeddings
    }

    /// Embedding of a track by id
    pub fn embedding_of(&self, track_id: &str) -> Option<&[f64; EMBEDDING_DIM]> {
        self.index.get(track_id).map(|&row| &self.embeddings[row])
    }

    /// Number of distinct tracks loaded
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Track, EMBEDDING_DIM};
use crate::store::SongStore;

/// Error types for the recommendation engine
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Song '{0}' not found in the dataset")]
    SeedNotFound(String),
}

/// The two halves of a recommendation: acoustically similar tracks and
/// popular tracks from the seed's genre that were not already recommended.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub similar: Vec<Track>,
    pub popular_in_genre: Vec<Track>,
}

/// Cosine similarity between two embeddings.
///
/// A zero-norm vector has no direction; it scores 0.0 instead of dividing
/// by zero.
fn cosine_similarity(a: &[f64; EMBEDDING_DIM], b: &[f64; EMBEDDING_DIM]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Computes recommendations for a seed track.
///
/// Every track is scored against the seed with cosine similarity in one
/// brute-force pass; at a few thousand rows and five dimensions this is
/// cheap enough that no nearest-neighbor index is worth its complexity.
/// The seed is excluded from the similarity ranking by row position, so a
/// tie at similarity 1.0 can never smuggle it back in or push out a
/// legitimate twin. The genre half excludes the seed and everything the
/// similarity half already returned.
pub fn for_track(
    store: &SongStore,
    seed_id: &str,
    limit: usize,
) -> Result<Recommendations, RecommendError> {
    let seed_row = store
        .row_of(seed_id)
        .ok_or_else(|| RecommendError::SeedNotFound(seed_id.to_owned()))?;
    let seed_vector = &store.embeddings()[seed_row];

    let mut scored: Vec<(usize, f64)> = store
        .embeddings()
        .iter()
        .enumerate()
        .map(|(row, vector)| (row, cosine_similarity(seed_vector, vector)))
        .collect();
    // Stable sort: equal scores keep row order, so the ranking is
    // deterministic across requests.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let similar: Vec<Track> = scored
        .iter()
        .filter(|&&(row, _)| row != seed_row)
        .take(limit)
        .map(|&(row, _)| store.tracks()[row].clone())
        .collect();

    let seed_genre = &store.tracks()[seed_row].track_genre;
    let mut excluded: HashSet<&str> = similar.iter().map(|t| t.track_id.as_str()).collect();
    excluded.insert(seed_id);

    let mut in_genre: Vec<&Track> = store
        .tracks()
        .iter()
        .filter(|track| {
            track.track_genre == *seed_genre && !excluded.contains(track.track_id.as_str())
        })
        .collect();
    in_genre.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    let popular_in_genre = in_genre.into_iter().take(limit).cloned().collect();

    Ok(Recommendations {
        similar,
        popular_in_genre,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const HEADER: &str = "track_id,track_name,artists,album_name,popularity,duration_min,track_genre,img,preview,PCA1,PCA2,PCA3,PCA4,PCA5";

    fn store_from(rows: &[&str]) -> SongStore {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        SongStore::from_reader(csv.as_bytes()).unwrap()
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.track_id.as_str()).collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        let x = [1.0, 0.0, 0.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0, 0.0, 0.0];
        let neg_x = [-2.0, 0.0, 0.0, 0.0, 0.0];

        assert!((cosine_similarity(&x, &x) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&x, &y)).abs() < 1e-12);
        assert!((cosine_similarity(&x, &neg_x) + 1.0).abs() < 1e-12);
        // Scaling does not change direction
        let scaled = [3.0, 0.0, 0.0, 0.0, 0.0];
        assert!((cosine_similarity(&x, &scaled) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_zero_norm_is_zero() {
        let zero = [0.0; EMBEDDING_DIM];
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(cosine_similarity(&zero, &x), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_identical_embedding_ranks_first_but_seed_is_skipped() {
        // A and B share an embedding; A-vs-A is also similarity 1.0, yet
        // the seed must never recommend itself.
        let store = store_from(&[
            "A,Song A,Artist,Album,10,3.0,rock,i,p,1,0,0,0,0",
            "B,Song B,Artist,Album,50,3.0,rock,i,p,1,0,0,0,0",
            "C,Song C,Artist,Album,5,3.0,jazz,i,p,0,1,0,0,0",
        ]);

        let recs = for_track(&store, "A", 1).unwrap();
        assert_eq!(ids(&recs.similar), vec!["B"]);
    }

    #[test]
    fn test_similar_sorted_by_descending_similarity() {
        let store = store_from(&[
            "S,Seed,Artist,Album,10,3.0,rock,i,p,1,0,0,0,0",
            "FAR,Far,Artist,Album,10,3.0,rock,i,p,0,1,0,0,0",
            "NEAR,Near,Artist,Album,10,3.0,rock,i,p,1,0.1,0,0,0",
            "MID,Mid,Artist,Album,10,3.0,rock,i,p,1,1,0,0,0",
        ]);

        let recs = for_track(&store, "S", 3).unwrap();
        assert_eq!(ids(&recs.similar), vec!["NEAR", "MID", "FAR"]);
    }

    #[test]
    fn test_halves_are_disjoint_and_exclude_seed() {
        let store = store_from(&[
            "A,Song A,Artist,Album,10,3.0,rock,i,p,1,0,0,0,0",
            "B,Song B,Artist,Album,50,3.0,rock,i,p,1,0,0,0,0",
            "C,Song C,Artist,Album,40,3.0,rock,i,p,0.9,0.1,0,0,0",
            "D,Song D,Artist,Album,30,3.0,rock,i,p,0,1,0,0,0",
            "E,Song E,Artist,Album,20,3.0,jazz,i,p,0,0,1,0,0",
        ]);

        let recs = for_track(&store, "A", 2).unwrap();
        assert_eq!(ids(&recs.similar), vec!["B", "C"]);
        // D is the only rock track left once the seed and the similar
        // half are excluded
        assert_eq!(ids(&recs.popular_in_genre), vec!["D"]);

        let similar: HashSet<&str> = recs.similar.iter().map(|t| t.track_id.as_str()).collect();
        for track in &recs.popular_in_genre {
            assert!(!similar.contains(track.track_id.as_str()));
            assert_ne!(track.track_id, "A");
        }
    }

    #[test]
    fn test_popular_in_genre_sorted_and_genre_bound() {
        let store = store_from(&[
            "S,Seed,Artist,Album,10,3.0,jazz,i,p,1,0,0,0,0",
            "J1,Jazz One,Artist,Album,20,3.0,jazz,i,p,0,1,0,0,0",
            "J2,Jazz Two,Artist,Album,60,3.0,jazz,i,p,0,0,1,0,0",
            "J3,Jazz Three,Artist,Album,40,3.0,jazz,i,p,0,0,0,1,0",
            "R1,Rock One,Artist,Album,99,3.0,rock,i,p,0,0,0,0,1",
        ]);

        // limit 0 for the similar half keeps the genre half unfiltered
        let recs = for_track(&store, "S", 0).unwrap();
        assert!(recs.similar.is_empty());
        assert!(recs.popular_in_genre.is_empty());

        let recs = for_track(&store, "S", 2).unwrap();
        for track in &recs.popular_in_genre {
            assert_eq!(track.track_genre, "jazz");
        }
        assert!(recs.popular_in_genre.len() <= 2);
        let popularity: Vec<f64> = recs.popular_in_genre.iter().map(|t| t.popularity).collect();
        let mut sorted = popularity.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(popularity, sorted);
    }

    #[test]
    fn test_limit_larger_than_dataset() {
        let store = store_from(&[
            "A,Song A,Artist,Album,10,3.0,rock,i,p,1,0,0,0,0",
            "B,Song B,Artist,Album,50,3.0,rock,i,p,0,1,0,0,0",
        ]);

        let recs = for_track(&store, "A", 99).unwrap();
        assert_eq!(ids(&recs.similar), vec!["B"]);
        assert!(recs.popular_in_genre.is_empty());
    }

    #[test]
    fn test_unknown_seed() {
        let store = store_from(&["A,Song A,Artist,Album,10,3.0,rock,i,p,1,0,0,0,0"]);
        let result = for_track(&store, "nope", 5);
        assert!(matches!(result, Err(RecommendError::SeedNotFound(_))));
    }
}

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rand::seq::SliceRandom;

use crate::models::Track;
use crate::store::SongStore;

/// Hard cap on the number of search results
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Sorts by popularity descending; the sort is stable so ties keep the
/// original row order.
fn sort_by_popularity(tracks: &mut [&Track]) {
    tracks.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
}

fn to_owned_tracks<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Vec<Track> {
    tracks.into_iter().cloned().collect()
}

/// Most popular tracks, paginated.
///
/// Out-of-range `skip`/`limit` truncate to an empty or shorter result;
/// this never errors.
pub fn popular(store: &SongStore, skip: usize, limit: usize) -> Vec<Track> {
    let mut ranked: Vec<&Track> = store.tracks().iter().collect();
    sort_by_popularity(&mut ranked);
    to_owned_tracks(ranked.into_iter().skip(skip).take(limit))
}

/// Case-insensitive substring search over track name, artists and album name.
///
/// Results are sorted by popularity descending and capped at
/// [`SEARCH_RESULT_LIMIT`]. Empty queries are rejected at the API boundary
/// before this runs.
pub fn search(store: &SongStore, query: &str) -> Vec<Track> {
    let needle = query.to_lowercase();
    let mut matches: Vec<&Track> = store
        .tracks()
        .iter()
        .filter(|track| {
            track.track_name.to_lowercase().contains(&needle)
                || track.artists.to_lowercase().contains(&needle)
                || track.album_name.to_lowercase().contains(&needle)
        })
        .collect();

    sort_by_popularity(&mut matches);
    to_owned_tracks(matches.into_iter().take(SEARCH_RESULT_LIMIT))
}

/// All tracks of an album (case-insensitive exact match), most popular first.
/// An empty result means the album is unknown.
pub fn by_album(store: &SongStore, album_name: &str) -> Vec<Track> {
    let wanted = album_name.to_lowercase();
    let mut matches: Vec<&Track> = store
        .tracks()
        .iter()
        .filter(|track| track.album_name.to_lowercase() == wanted)
        .collect();

    sort_by_popularity(&mut matches);
    to_owned_tracks(matches)
}

/// Distinct genre labels, lexicographically ascending.
pub fn genres(store: &SongStore) -> Vec<String> {
    let distinct: BTreeSet<&str> = store
        .tracks()
        .iter()
        .map(|track| track.track_genre.as_str())
        .collect();
    distinct.into_iter().map(str::to_owned).collect()
}

/// Tracks of a genre, either the most popular or a shuffled selection.
///
/// The genre is matched case-insensitively first; if that finds nothing,
/// a case-sensitive pass tolerates mixed-case labels stored verbatim.
/// `None` means the genre is unknown under both spellings.
///
/// With `shuffle`, the top `limit` tracks are set aside and the result is a
/// uniform sample without replacement from the less popular remainder. A
/// genre with no remainder beyond the head is sampled from in full, so small
/// genres still shuffle.
pub fn by_genre(
    store: &SongStore,
    genre: &str,
    limit: usize,
    shuffle: bool,
) -> Option<Vec<Track>> {
    let wanted = genre.to_lowercase();
    let mut matches: Vec<&Track> = store
        .tracks()
        .iter()
        .filter(|track| track.track_genre.to_lowercase() == wanted)
        .collect();

    if matches.is_empty() {
        matches = store
            .tracks()
            .iter()
            .filter(|track| track.track_genre == genre)
            .collect();
    }

    if matches.is_empty() {
        return None;
    }

    sort_by_popularity(&mut matches);

    if !shuffle {
        return Some(to_owned_tracks(matches.into_iter().take(limit)));
    }

    let tail = &matches[limit.min(matches.len())..];
    let pool = if tail.is_empty() { &matches[..] } else { tail };

    let mut rng = rand::thread_rng();
    let sampled = pool
        .choose_multiple(&mut rng, limit.min(pool.len()))
        .map(|&track| track.clone())
        .collect();
    Some(sampled)
}

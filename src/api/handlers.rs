use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::Track;
use crate::services::{query, recommend};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_popular_limit")]
    limit: i64,
}

fn default_popular_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    #[serde(default = "default_recommend_limit")]
    limit: i64,
}

fn default_recommend_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    #[serde(default)]
    genre: String,
    #[serde(default = "default_genre_limit")]
    limit: i64,
    #[serde(default)]
    shuffle: bool,
}

fn default_genre_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub similar_songs: Vec<Track>,
    pub popular_in_genre: Vec<Track>,
}

/// Negative pagination values clamp to zero results instead of erroring
fn clamp(value: i64) -> usize {
    value.max(0) as usize
}

// Handlers

/// Welcome message
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Song Recommendation API."
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Most popular tracks, paginated with `skip` and `limit`
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> AppResult<Json<Vec<Track>>> {
    let store = state.store()?;
    Ok(Json(query::popular(
        store,
        clamp(params.skip),
        clamp(params.limit),
    )))
}

/// Searches tracks by name, artist or album
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Track>>> {
    let store = state.store()?;
    if params.query.is_empty() {
        return Err(AppError::InvalidInput(
            "A 'query' parameter is required".to_string(),
        ));
    }
    Ok(Json(query::search(store, &params.query)))
}

/// All tracks of an album, most popular first
pub async fn by_album(
    State(state): State<AppState>,
    Path(album_name): Path<String>,
) -> AppResult<Json<Vec<Track>>> {
    let store = state.store()?;
    let tracks = query::by_album(store, &album_name);
    if tracks.is_empty() {
        return Err(AppError::NotFound(format!(
            "Album '{album_name}' not found"
        )));
    }
    Ok(Json(tracks))
}

/// Distinct genre labels, sorted
pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(query::genres(state.store()?)))
}

/// Tracks of one genre, either the most popular or a shuffled selection
pub async fn songs_by_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> AppResult<Json<Vec<Track>>> {
    let store = state.store()?;
    if params.genre.is_empty() {
        return Err(AppError::InvalidInput(
            "A 'genre' parameter is required".to_string(),
        ));
    }

    query::by_genre(store, &params.genre, clamp(params.limit), params.shuffle)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Genre '{}' not found", params.genre)))
}

/// Recommends `limit` acoustically similar tracks plus `limit` popular
/// tracks from the seed's genre
pub async fn recommend(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    Query(params): Query<RecommendParams>,
) -> AppResult<Json<RecommendResponse>> {
    let store = state.store()?;
    let recommendations = recommend::for_track(store, &track_id, clamp(params.limit))?;

    Ok(Json(RecommendResponse {
        similar_songs: recommendations.similar,
        popular_in_genre: recommendations.popular_in_genre,
    }))
}

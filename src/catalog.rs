//! Catalog metadata resolution
//!
//! Resolves pasted streaming links into display metadata through the
//! third-party catalog API. Credentials are supplied per request and used
//! for a client-credentials token handshake; nothing is stored process-wide.
//!
//! Link classification is deliberately textual: a link containing the
//! substring `"track"` is a single item, one containing `"playlist"` is a
//! collection. Links matching neither are rejected with a resolution error
//! rather than silently producing no response.

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// Per-request catalog API credentials
///
/// Built from the `cid`/`cs` fields of an incoming request. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Catalog client id
    pub client_id: String,
    /// Catalog client secret
    pub client_secret: String,
}

impl Credentials {
    /// Build credentials from optional request fields
    ///
    /// Fails with [`Error::MissingCredentials`] when either part is absent
    /// or blank.
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Result<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Ok(Self {
                    client_id: id,
                    client_secret: secret,
                })
            }
            _ => Err(Error::MissingCredentials),
        }
    }
}

/// Link classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Single-item link
    Track,
    /// Collection link
    Playlist,
}

/// Classify a link by substring
///
/// `"track"` is checked before `"playlist"`, so a link containing both is
/// treated as a single item. This is a narrow dispatch rule, not a URL
/// parser; anything matching neither substring is a resolution error.
pub fn classify_link(link: &str) -> Result<LinkKind> {
    if link.contains("track") {
        Ok(LinkKind::Track)
    } else if link.contains("playlist") {
        Ok(LinkKind::Playlist)
    } else {
        Err(Error::Resolution(format!(
            "unrecognized link (expected a track or playlist link): {link}"
        )))
    }
}

/// Display metadata for a single resolved track
#[derive(Debug, Clone)]
pub struct TrackInfo {
    /// Track title
    pub name: String,
    /// First listed artist
    pub artist: String,
    /// Artwork URL, when the catalog provides one
    pub image: Option<String>,
}

/// Display metadata for a resolved playlist
#[derive(Debug, Clone)]
pub struct PlaylistInfo {
    /// Playlist display name
    pub name: String,
    /// Total item count reported by the catalog
    pub count: u64,
    /// Artwork URL, when the catalog provides one
    pub image: Option<String>,
}

/// One playable playlist entry
///
/// Entries without an associated playable track are skipped during listing,
/// so every item here carries both an artist and a title.
#[derive(Debug, Clone)]
pub struct PlaylistItem {
    /// First listed artist
    pub artist: String,
    /// Track title
    pub title: String,
}

/// Metadata resolved from one catalog call
#[derive(Debug, Clone)]
pub enum ResolvedMetadata {
    /// Single item
    Track(TrackInfo),
    /// Collection
    Playlist(PlaylistInfo),
}

/// Authenticated catalog client for the lifetime of one request
///
/// Created by [`CatalogClient::authenticate`]; holds the bearer token from
/// the client-credentials handshake.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    album: AlbumRef,
}

#[derive(Debug, Deserialize)]
struct PlaylistTracksRef {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    name: String,
    #[serde(default)]
    images: Vec<ImageRef>,
    tracks: PlaylistTracksRef,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntryTrack {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    track: Option<PlaylistEntryTrack>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistEntry>,
}

impl CatalogClient {
    /// Perform the client-credentials handshake and return a ready client
    ///
    /// A 4xx from the token endpoint means the catalog rejected the supplied
    /// keys ([`Error::InvalidCredentials`]); transport failures surface as
    /// [`Error::Network`].
    pub async fn authenticate(config: &CatalogConfig, credentials: &Credentials) -> Result<Self> {
        let http = reqwest::Client::new();

        let response = http
            .post(&config.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            tracing::debug!(%status, "catalog token endpoint rejected credentials");
            return Err(Error::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(Error::Resolution(format!(
                "catalog token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response.json().await?;

        Ok(Self {
            http,
            token: token.access_token,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a link into display metadata
    pub async fn resolve(&self, link: &str) -> Result<ResolvedMetadata> {
        match classify_link(link)? {
            LinkKind::Track => Ok(ResolvedMetadata::Track(self.track(link).await?)),
            LinkKind::Playlist => Ok(ResolvedMetadata::Playlist(self.playlist(link).await?)),
        }
    }

    /// Look up a single track by link
    pub async fn track(&self, link: &str) -> Result<TrackInfo> {
        let id = extract_item_id(link, "track")?;
        let raw: TrackResponse = self.get_json(&format!("tracks/{id}")).await?;
        track_info_from_response(raw)
    }

    /// Look up playlist display metadata by link
    pub async fn playlist(&self, link: &str) -> Result<PlaylistInfo> {
        let id = extract_item_id(link, "playlist")?;
        let raw: PlaylistResponse = self.get_json(&format!("playlists/{id}")).await?;
        Ok(PlaylistInfo {
            name: raw.name,
            count: raw.tracks.total,
            image: raw.images.into_iter().next().map(|i| i.url),
        })
    }

    /// List the playable items of a playlist by link
    ///
    /// Reads a single page, matching the original service behavior; entries
    /// without a playable track (or without any listed artist) are skipped.
    pub async fn playlist_items(&self, link: &str) -> Result<Vec<PlaylistItem>> {
        let id = extract_item_id(link, "playlist")?;
        let raw: PlaylistItemsResponse = self.get_json(&format!("playlists/{id}/tracks")).await?;

        let items = raw
            .items
            .into_iter()
            .filter_map(|entry| {
                let track = entry.track?;
                let artist = track.artists.into_iter().next()?.name;
                Some(PlaylistItem {
                    artist,
                    title: track.name,
                })
            })
            .collect();

        Ok(items)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.api_base, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::InvalidCredentials),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(Error::Resolution("catalog rate limit exceeded".to_string()))
            }
            status => Err(Error::Resolution(format!(
                "catalog lookup failed with {status}"
            ))),
        }
    }
}

fn track_info_from_response(raw: TrackResponse) -> Result<TrackInfo> {
    let artist = raw
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .ok_or_else(|| Error::Resolution("track has no listed artist".to_string()))?;

    Ok(TrackInfo {
        name: raw.name,
        artist,
        image: raw.album.images.into_iter().next().map(|i| i.url),
    })
}

/// Extract the catalog item id following a path marker
///
/// Handles both `https://…/track/<id>?si=…` links and `spotify:track:<id>`
/// URIs. The id must be plain alphanumeric.
fn extract_item_id(link: &str, marker: &str) -> Result<String> {
    if let Ok(parsed) = Url::parse(link)
        && let Some(segments) = parsed.path_segments()
        && let Some(id) = id_after_marker(segments, marker)
    {
        return Ok(id);
    }

    // URI form without path segments (spotify:track:<id>)
    let without_query = link.split(['?', '#']).next().unwrap_or(link);
    if let Some(id) = id_after_marker(without_query.split(':'), marker) {
        return Ok(id);
    }

    Err(Error::Resolution(format!(
        "could not extract {marker} id from link: {link}"
    )))
}

fn id_after_marker<'a>(parts: impl Iterator<Item = &'a str>, marker: &str) -> Option<String> {
    let mut parts = parts;
    while let Some(part) = parts.next() {
        if part == marker {
            let id = parts.next()?;
            let id = id.split(['?', '#']).next().unwrap_or(id);
            if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Some(id.to_string());
            }
            return None;
        }
    }
    None
}

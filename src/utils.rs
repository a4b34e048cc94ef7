use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{
    error::PkceError,
    types::{Track, TrackTableRow},
};

pub const CODE_VERIFIER_LENGTH: usize = 64;
pub const CODE_VERIFIER_MIN: usize = 43;
pub const CODE_VERIFIER_MAX: usize = 128;

const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Verifier and the challenge derived from it for one authorization attempt.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate(length: usize) -> Result<Self, PkceError> {
        let verifier = generate_code_verifier(length)?;
        let challenge = generate_code_challenge(&verifier);
        Ok(Self {
            verifier,
            challenge,
        })
    }
}

/// Generates a PKCE code verifier.
///
/// Draws `length` characters from the unreserved set
/// (`A-Z a-z 0-9 - . _ ~`) using the thread-local CSPRNG.
///
/// # Arguments
///
/// * `length` - Number of characters, between 43 and 128 inclusive
///
/// # Errors
///
/// Returns [`PkceError::InvalidLength`] when `length` is out of range.
///
/// # Example
///
/// ```
/// let verifier = generate_code_verifier(CODE_VERIFIER_LENGTH)?;
/// assert_eq!(verifier.len(), 64);
/// ```
pub fn generate_code_verifier(length: usize) -> Result<String, PkceError> {
    if !(CODE_VERIFIER_MIN..=CODE_VERIFIER_MAX).contains(&length) {
        return Err(PkceError::InvalidLength(length));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| UNRESERVED[rng.random_range(0..UNRESERVED.len())] as char)
        .collect())
}

/// Derives the S256 challenge: base64url without padding of SHA-256(verifier).
///
/// Always 43 characters long.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn is_unreserved(c: char) -> bool {
    c.is_ascii() && UNRESERVED.contains(&(c as u8))
}

pub fn format_artists(track: &Track) -> String {
    track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackTableRow {
            index: i + 1,
            name: track.name.clone(),
            artists: format_artists(track),
            album: track.album.name.clone(),
        })
        .collect()
}

/// Resolves 1-based picks against a track list.
///
/// # Arguments
///
/// * `tracks` - The list the numbers refer to, as shown in the table
/// * `picks` - Numbers typed by the user
///
/// # Returns
///
/// The picked tracks in pick order, and the picks that matched nothing.
///
/// # Example
///
/// ```
/// let (found, invalid) = pick_tracks(&results, &[2, 0, 11]);
/// ```
pub fn pick_tracks(tracks: &[Track], picks: &[usize]) -> (Vec<Track>, Vec<usize>) {
    let mut found = Vec::new();
    let mut invalid = Vec::new();
    for &pick in picks {
        match pick.checked_sub(1).and_then(|i| tracks.get(i)) {
            Some(track) => found.push(track.clone()),
            None => invalid.push(pick),
        }
    }
    (found, invalid)
}

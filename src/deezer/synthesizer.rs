//! Builds album-like aggregates out of a flat list of provider tracks.
//!
//! Tracks are first grouped by artist: every artist with at least
//! [`MIN_ARTIST_ALBUM_TRACKS`] tracks gets a "Best of" album. When that yields
//! fewer than [`GENRE_PASS_THRESHOLD`] albums, the tracks of the remaining
//! artists are grouped by genre and every genre with at least
//! [`MIN_GENRE_ALBUM_TRACKS`] of them gets a "Collection" album. Anything
//! else is dropped.

use super::models::{
    AlbumArtist, AlbumTracks, GenreKey, SynthesizedAlbum, UpstreamAlbumRef, UpstreamTrack,
};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

pub const MIN_ARTIST_ALBUM_TRACKS: usize = 3;
pub const MIN_GENRE_ALBUM_TRACKS: usize = 5;
/// The genre pass only runs if the artist pass produced fewer albums than this.
pub const GENRE_PASS_THRESHOLD: usize = 5;

pub const ARTIST_ALBUM_ID_PREFIX: i64 = 9;
pub const GENRE_ALBUM_ID_PREFIX: i64 = 8;

const ID_SUFFIX_SPAN: i64 = 100_000;
const ID_SUFFIX_MIN: i64 = 10_000;
const ID_SUFFIX_MAX: i64 = 99_999;

pub const PLACEHOLDER_RELEASE_DATE: &str = "2023-01-01";
pub const VARIOUS_ARTISTS: &str = "Various Artists";
const MISC_COLLECTION_TITLE: &str = "Misc Collection";

/// Insertion-ordered multi-map: groups keep the order in which their key
/// was first seen, and each group keeps input order.
struct OrderedGroups<'a, K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<&'a UpstreamTrack>)>,
}

impl<'a, K: Eq + Hash + Clone> OrderedGroups<'a, K> {
    fn new() -> Self {
        OrderedGroups {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn push(&mut self, key: K, track: &'a UpstreamTrack) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].1.push(track),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![track]));
            }
        }
    }

    fn into_groups(self) -> Vec<(K, Vec<&'a UpstreamTrack>)> {
        self.groups
    }
}

/// `prefix * 100000 + suffix`, suffix uniform in `10000..=99999`.
/// Collisions are not checked for.
pub fn synthetic_id(prefix: i64) -> i64 {
    prefix * ID_SUFFIX_SPAN + rand::rng().random_range(ID_SUFFIX_MIN..=ID_SUFFIX_MAX)
}

/// Each size comes from the embedded album, falling back to its generic
/// `cover` when that size is missing.
fn inherited_covers(track: &UpstreamTrack) -> (Option<String>, Option<String>, Option<String>) {
    let Some(album) = track.album.as_ref() else {
        return (None, None, None);
    };
    let pick = |size: &Option<String>, album: &UpstreamAlbumRef| {
        size.clone().or_else(|| album.cover.clone())
    };
    (
        pick(&album.cover_small, album),
        pick(&album.cover_medium, album),
        pick(&album.cover_big, album),
    )
}

fn build_album(
    id_prefix: i64,
    title: String,
    artist: &str,
    group: &[&UpstreamTrack],
    tracks_per_album: usize,
    genre_id: GenreKey,
) -> SynthesizedAlbum {
    let (cover_small, cover_medium, cover_big) = group
        .first()
        .map(|track| inherited_covers(track))
        .unwrap_or((None, None, None));
    let data: Vec<UpstreamTrack> = group
        .iter()
        .take(tracks_per_album)
        .map(|&track| track.clone())
        .collect();

    SynthesizedAlbum {
        id: synthetic_id(id_prefix),
        title,
        artist: AlbumArtist {
            name: artist.to_string(),
        },
        cover_small,
        cover_medium,
        cover_big,
        nb_tracks: data.len(),
        tracks: AlbumTracks { data },
        release_date: PLACEHOLDER_RELEASE_DATE.to_string(),
        is_custom: true,
        genre_id,
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

fn genre_album_title(key: &GenreKey) -> String {
    match key {
        GenreKey::Name(name) => format!("{} Collection", title_case(name)),
        GenreKey::Id(_) => MISC_COLLECTION_TITLE.to_string(),
    }
}

/// Groups `tracks` into synthesized albums of at most `tracks_per_album`
/// tracks each. Artist albums come first, then genre albums.
pub fn synthesize(tracks: &[UpstreamTrack], tracks_per_album: usize) -> Vec<SynthesizedAlbum> {
    let mut by_artist = OrderedGroups::new();
    for track in tracks {
        by_artist.push(track.artist_name(), track);
    }

    let mut albums = Vec::new();
    let mut small_artists: HashSet<&str> = HashSet::new();
    for (artist, group) in by_artist.into_groups() {
        if group.len() >= MIN_ARTIST_ALBUM_TRACKS {
            let genre_id = GenreKey::Id(group[0].genre_id.unwrap_or(0));
            albums.push(build_album(
                ARTIST_ALBUM_ID_PREFIX,
                format!("Best of {}", artist),
                artist,
                &group,
                tracks_per_album,
                genre_id,
            ));
        } else {
            small_artists.insert(artist);
        }
    }

    if albums.len() >= GENRE_PASS_THRESHOLD {
        debug!(
            "Synthesized {} artist albums, skipping genre pass",
            albums.len()
        );
        return albums;
    }

    // Leftovers are regrouped in input order.
    let leftovers = tracks
        .iter()
        .filter(|track| small_artists.contains(track.artist_name()));

    let mut by_genre = OrderedGroups::new();
    for track in leftovers {
        by_genre.push(track.genre_key(), track);
    }

    let artist_album_count = albums.len();
    for (genre_key, group) in by_genre.into_groups() {
        if group.len() >= MIN_GENRE_ALBUM_TRACKS {
            albums.push(build_album(
                GENRE_ALBUM_ID_PREFIX,
                genre_album_title(&genre_key),
                VARIOUS_ARTISTS,
                &group,
                tracks_per_album,
                genre_key,
            ));
        }
    }

    debug!(
        "Synthesized {} artist albums and {} genre albums out of {} tracks",
        artist_album_count,
        albums.len() - artist_album_count,
        tracks.len()
    );
    albums
}

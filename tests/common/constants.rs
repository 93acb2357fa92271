//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, catalog ids, upstream
//! payloads), update only this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Seeded test user name
pub const TEST_USER: &str = "testuser";

/// Seeded test user email
pub const TEST_EMAIL: &str = "testuser@example.com";

/// Seeded test user password
pub const TEST_PASS: &str = "testpass123";

/// Second seeded user, used to check per-user isolation
pub const OTHER_USER: &str = "otheruser";

pub const OTHER_EMAIL: &str = "otheruser@example.com";

pub const OTHER_PASS: &str = "otherpass123";

/// Secret used to sign tokens in tests
pub const TEST_SECRET_KEY: &str = "test-secret-key";

// ============================================================================
// Test Catalog
// ============================================================================

// Ids are assigned by SQLite in insertion order on a fresh database.

/// Album id of "First Album" by The Test Band
pub const ALBUM_1_ID: i64 = 1;

/// Album id of "Jazz Collection" by Jazz Ensemble
pub const ALBUM_2_ID: i64 = 2;

/// "Opening Track" on First Album
pub const TRACK_1_ID: i64 = 1;

/// "Middle Track" on First Album
pub const TRACK_2_ID: i64 = 2;

/// "Closing Track" on First Album
pub const TRACK_3_ID: i64 = 3;

/// "Smooth Jazz" on Jazz Collection
pub const TRACK_4_ID: i64 = 4;

/// "Upbeat Jazz" on Jazz Collection
pub const TRACK_5_ID: i64 = 5;

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const ALBUM_1_TITLE: &str = "First Album";
pub const ALBUM_2_TITLE: &str = "Jazz Collection";

pub const TRACK_1_TITLE: &str = "Opening Track";
pub const TRACK_2_TITLE: &str = "Middle Track";
pub const TRACK_3_TITLE: &str = "Closing Track";
pub const TRACK_4_TITLE: &str = "Smooth Jazz";
pub const TRACK_5_TITLE: &str = "Upbeat Jazz";

/// An id no fixture uses
pub const MISSING_ID: i64 = 999;

// ============================================================================
// Fake Upstream
// ============================================================================

/// Albums returned by the fake album search, whatever the query
pub const FAKE_SEARCH_ALBUMS_COUNT: usize = 3;

/// Tracks returned by the fake track search, whatever the query
pub const FAKE_SEARCH_TRACKS_COUNT: usize = 2;

/// Tracks in the fake chart
pub const FAKE_CHART_TRACKS_COUNT: usize = 20;

/// Artist with 4 radio tracks, first synthesized album
pub const FAKE_RADIO_ARTIST_1: &str = "Radio Star";

/// Artist with 3 radio tracks, second synthesized album
pub const FAKE_RADIO_ARTIST_2: &str = "Radio Duo";

/// Albums synthesized from the fake radio
pub const FAKE_RADIO_ALBUMS_COUNT: usize = 2;

/// Upstream track id the fake answers with 404
pub const FAKE_MISSING_TRACK_ID: i64 = 404;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Radio genre whose payload carries null and mistyped fields (reggae)
pub const FAKE_DEGRADED_RADIO_GENRE_ID: i64 = 144;
pub const FAKE_DEGRADED_RADIO_ARTIST: &str = "Rough Cut";

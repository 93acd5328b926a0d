//! Domain types built from API responses.
//!
//! All of these are read-only snapshots produced by the functions in
//! [`mapper`](crate::mapper). Field names follow Rust conventions rather than
//! the camelCase used on the wire.

use serde::{Deserialize, Serialize};

/// Artist reference embedded in songs, albums and MVs.
///
/// API JSON fields: `id`, `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistBrief {
    pub id: u64,
    pub name: String,
}

/// Album reference embedded in a song (`al` or `album`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumBrief {
    pub id: u64,
    pub name: String,
    /// Cover image URL (e.g. `https://p1.music.126.net/...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
}

/// A song.
///
/// Returned by [`Music163Api::music`](crate::Music163Api::music), inside
/// playlists and albums, by song search and by the recommendation feeds.
///
/// Two JSON shapes exist: the current one (`ar`, `al`, `dt`) and the legacy
/// one still served by recommendation endpoints (`artists`, `album`,
/// `duration`). Both map to this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Music {
    pub id: u64,
    pub name: String,
    /// Alternative titles (`alia` / `alias`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    pub artists: Vec<ArtistBrief>,
    pub album: AlbumBrief,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Associated MV id; `None` when the song has no MV (`mv: 0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mv_id: Option<u64>,
    /// Pricing class: 0/8 free, 1 VIP, 4 purchase.
    pub fee: i64,
}

/// Abbreviated user info (playlist creator, radio host).
///
/// API JSON fields: `userId`, `nickname`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBrief {
    pub id: u64,
    pub name: String,
}

/// A playlist.
///
/// Returned by [`Music163Api::playlist`](crate::Music163Api::playlist) with
/// `tracks` populated, and without tracks by playlist search and
/// [`Music163Api::personalized_playlist`](crate::Music163Api::personalized_playlist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `coverImgUrl`, or `picUrl` on recommendation entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub track_count: u64,
    pub play_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserBrief>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Ids of every track, even past the first 1000 (detail endpoint only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub track_ids: Vec<u64>,
    /// Full songs (detail endpoint only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Music>,
}

/// An album.
///
/// [`Music163Api::album`](crate::Music163Api::album) fills `songs`; album
/// search leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Release date as a Unix timestamp in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<i64>,
    /// Number of songs on the album.
    pub size: u64,
    pub artists: Vec<ArtistBrief>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<Music>,
}

/// An artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    /// `avatar` on the detail endpoint, `picUrl` elsewhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief_desc: Option<String>,
    pub album_size: u64,
    pub music_size: u64,
    pub mv_size: u64,
}

/// A user profile.
///
/// Returned by [`Music163Api::user`](crate::Music163Api::user) and user search.
/// `level` and `listen_songs` are only present on the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// 0 unknown, 1 male, 2 female.
    pub gender: u8,
    pub follows: u64,
    pub followeds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_songs: Option<u64>,
}

/// The account the session token belongs to.
///
/// Returned by [`Music163Api::my`](crate::Music163Api::my).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct My {
    pub account_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// 0 for free accounts.
    pub vip_type: i64,
    pub profile: User,
}

/// A music video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mv {
    pub id: u64,
    pub name: String,
    pub artist_name: String,
    pub artists: Vec<ArtistBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub play_count: u64,
    pub duration_ms: u64,
    /// Release date as sent by the server (`2021-06-01`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
}

/// A radio station (DJ radio).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DjRadio {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub program_count: u64,
    pub sub_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dj: Option<UserBrief>,
}

/// One episode of a radio station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DjProgram {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub duration_ms: u64,
    pub listener_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio: Option<DjRadio>,
    /// The audio behind the episode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_song: Option<Music>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    /// Number of matches on the server, across all pages.
    pub total: u64,
    pub items: Vec<T>,
}

/// Search target, sent as the `type` form parameter.
///
/// | Variant    | API value |
/// |------------|-----------|
/// | `Music`    | 1         |
/// | `Album`    | 10        |
/// | `Artist`   | 100       |
/// | `Playlist` | 1000      |
/// | `User`     | 1002      |
/// | `Mv`       | 1004      |
/// | `Lyric`    | 1006      |
/// | `DjRadio`  | 1009      |
/// | `Video`    | 1014      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    Music = 1,
    Album = 10,
    Artist = 100,
    Playlist = 1000,
    User = 1002,
    Mv = 1004,
    Lyric = 1006,
    DjRadio = 1009,
    Video = 1014,
}

impl SearchType {
    /// Value of the `type` form parameter.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// `(count field, items field)` inside `result`.
    pub(crate) fn result_fields(self) -> (&'static str, &'static str) {
        match self {
            Self::Music | Self::Lyric => ("songCount", "songs"),
            Self::Album => ("albumCount", "albums"),
            Self::Artist => ("artistCount", "artists"),
            Self::Playlist => ("playlistCount", "playlists"),
            Self::User => ("userprofileCount", "userprofiles"),
            Self::Mv => ("mvCount", "mvs"),
            Self::DjRadio => ("djRadiosCount", "djRadios"),
            Self::Video => ("videoCount", "videos"),
        }
    }
}

/// Region filter for [`Music163Api::top_song`](crate::Music163Api::top_song),
/// sent as `areaId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewSongArea {
    #[default]
    All = 0,
    Chinese = 7,
    Japanese = 8,
    Korean = 16,
    Western = 96,
}

impl NewSongArea {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Region filter for
/// [`Music163Api::top_artist_list`](crate::Music163Api::top_artist_list),
/// sent as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArtistArea {
    #[default]
    Chinese = 1,
    Western = 2,
    Korean = 3,
    Japanese = 4,
}

impl ArtistArea {
    pub fn code(self) -> u32 {
        self as u32
    }
}

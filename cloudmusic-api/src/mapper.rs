//! JSON → domain object mappers.
//!
//! One function per resource. Each takes the JSON object for a single item
//! and never fails on a missing optional field: absent strings become
//! `None`/empty, absent numbers become `0`. Only [`my`] can fail, because a
//! null `profile` means the token is not valid.
//!
//! Several endpoints wrap the object they describe (`{ "data": {...} }`,
//! `{ "profile": {...} }`) while search returns the bare object. Mappers
//! accept both.

use crate::error::{Error, Result};
use crate::types::{
    Album, AlbumBrief, Artist, ArtistBrief, DjProgram, DjRadio, Music, Mv, My, Playlist,
    SearchPage, SearchType, User, UserBrief,
};
use serde_json::Value;

static NULL: Value = Value::Null;

fn id(v: &Value) -> u64 {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

fn count(v: &Value) -> u64 {
    v.as_u64().unwrap_or(0)
}

fn text(v: &Value) -> String {
    v.as_str().unwrap_or("").to_owned()
}

fn opt_text(v: &Value) -> Option<String> {
    v.as_str().filter(|s| !s.is_empty()).map(String::from)
}

fn texts(v: &Value) -> Vec<String> {
    v.as_array()
        .map(|arr| arr.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

/// The object itself, or `v[key]` when the endpoint wrapped it.
fn unwrap_envelope<'a>(v: &'a Value, key: &str) -> &'a Value {
    if v[key].is_object() { &v[key] } else { v }
}

/// First of `keys` holding an object.
fn first_object<'a>(v: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .map(|k| &v[*k])
        .find(|x| x.is_object())
        .unwrap_or(&NULL)
}

pub fn artist_brief(v: &Value) -> ArtistBrief {
    ArtistBrief {
        id: id(&v["id"]),
        name: text(&v["name"]),
    }
}

fn artist_briefs(v: &Value) -> Vec<ArtistBrief> {
    v.as_array()
        .map(|arr| arr.iter().map(artist_brief).collect())
        .unwrap_or_default()
}

pub fn album_brief(v: &Value) -> AlbumBrief {
    AlbumBrief {
        id: id(&v["id"]),
        name: text(&v["name"]),
        pic_url: opt_text(&v["picUrl"]),
    }
}

/// Map a song in either the current (`ar`/`al`/`dt`) or legacy
/// (`artists`/`album`/`duration`) shape.
pub fn music(v: &Value) -> Music {
    let artists = if v["ar"].is_array() { &v["ar"] } else { &v["artists"] };
    let alias = if v["alia"].is_array() { &v["alia"] } else { &v["alias"] };
    let mv_id = v["mv"]
        .as_u64()
        .or_else(|| v["mvid"].as_u64())
        .filter(|&mv| mv != 0);

    Music {
        id: id(&v["id"]),
        name: text(&v["name"]),
        alias: texts(alias),
        artists: artist_briefs(artists),
        album: album_brief(first_object(v, &["al", "album"])),
        duration_ms: v["dt"]
            .as_u64()
            .or_else(|| v["duration"].as_u64())
            .unwrap_or(0),
        mv_id,
        fee: v["fee"].as_i64().unwrap_or(0),
    }
}

pub fn musics(v: &Value) -> Vec<Music> {
    v.as_array()
        .map(|arr| arr.iter().map(music).collect())
        .unwrap_or_default()
}

/// `{ userId, nickname }`, or `None` for `null`.
pub fn user_brief(v: &Value) -> Option<UserBrief> {
    if !v.is_object() {
        return None;
    }
    Some(UserBrief {
        id: id(&v["userId"]),
        name: text(&v["nickname"]),
    })
}

/// Map a playlist from the detail endpoint, search or a recommendation feed.
///
/// `tracks` holds whatever songs were embedded; the API stops embedding after
/// 1000, see [`Music163Api::playlist`](crate::Music163Api::playlist).
pub fn playlist(v: &Value) -> Playlist {
    let track_ids = v["trackIds"]
        .as_array()
        .map(|arr| arr.iter().map(|t| id(&t["id"])).collect())
        .unwrap_or_default();

    Playlist {
        id: id(&v["id"]),
        name: text(&v["name"]),
        description: opt_text(&v["description"]).or_else(|| opt_text(&v["copywriter"])),
        cover_url: opt_text(&v["coverImgUrl"]).or_else(|| opt_text(&v["picUrl"])),
        track_count: count(&v["trackCount"]),
        play_count: count(&v["playCount"]),
        creator: user_brief(&v["creator"]),
        tags: texts(&v["tags"]),
        track_ids,
        tracks: musics(&v["tracks"]),
    }
}

/// Map an album from `{ album, songs }` (detail) or a bare album (search).
pub fn album(v: &Value) -> Album {
    let (al, songs) = if v["album"].is_object() {
        (&v["album"], &v["songs"])
    } else {
        (v, &v["songs"])
    };

    let artists = if al["artists"].is_array() {
        artist_briefs(&al["artists"])
    } else if al["artist"].is_object() {
        vec![artist_brief(&al["artist"])]
    } else {
        Vec::new()
    };

    Album {
        id: id(&al["id"]),
        name: text(&al["name"]),
        pic_url: opt_text(&al["picUrl"]),
        description: opt_text(&al["description"]),
        company: opt_text(&al["company"]),
        publish_time: al["publishTime"].as_i64(),
        size: count(&al["size"]),
        artists,
        songs: musics(songs),
    }
}

pub fn artist(v: &Value) -> Artist {
    let pic_url = ["avatar", "picUrl", "img1v1Url", "cover"]
        .iter()
        .find_map(|k| opt_text(&v[*k]));

    Artist {
        id: id(&v["id"]),
        name: text(&v["name"]),
        alias: texts(&v["alias"]),
        pic_url,
        brief_desc: opt_text(&v["briefDesc"]),
        album_size: count(&v["albumSize"]),
        music_size: count(&v["musicSize"]),
        mv_size: count(&v["mvSize"]),
    }
}

/// Map a user from `user/detail` (`{ profile, level, listenSongs }`) or a
/// bare profile.
pub fn user(v: &Value) -> User {
    let p = unwrap_envelope(v, "profile");
    let wrapped = !std::ptr::eq(p, v);

    User {
        id: id(&p["userId"]),
        nickname: text(&p["nickname"]),
        avatar_url: opt_text(&p["avatarUrl"]),
        signature: opt_text(&p["signature"]),
        gender: p["gender"]
            .as_u64()
            .and_then(|g| u8::try_from(g).ok())
            .unwrap_or(0),
        follows: count(&p["follows"]),
        followeds: count(&p["followeds"]),
        level: if wrapped { v["level"].as_u64() } else { None },
        listen_songs: if wrapped { v["listenSongs"].as_u64() } else { None },
    }
}

/// Map the `account/get` response.
///
/// # Errors
///
/// [`Error::BadData`] when `profile` is null, which is how the server
/// answers an invalid or anonymous token.
pub fn my(v: &Value) -> Result<My> {
    if !v["profile"].is_object() {
        return Err(Error::BadData(v.clone()));
    }
    let account = &v["account"];
    Ok(My {
        account_id: id(&account["id"]),
        user_name: opt_text(&account["userName"]),
        vip_type: account["vipType"].as_i64().unwrap_or(0),
        profile: user(&v["profile"]),
    })
}

/// Map an MV from `mv/detail` (`{ data }`) or search.
pub fn mv(v: &Value) -> Mv {
    let d = unwrap_envelope(v, "data");
    let cover_url = ["cover", "imgurl16v9", "imgurl", "coverUrl"]
        .iter()
        .find_map(|k| opt_text(&d[*k]));

    Mv {
        id: id(&d["id"]),
        name: text(&d["name"]),
        artist_name: text(&d["artistName"]),
        artists: artist_briefs(&d["artists"]),
        cover_url,
        description: opt_text(&d["desc"]).or_else(|| opt_text(&d["briefDesc"])),
        play_count: count(&d["playCount"]),
        duration_ms: count(&d["duration"]),
        publish_time: opt_text(&d["publishTime"]),
    }
}

/// Map a radio station from `djradio/v2/get` (`{ data }`) or search.
pub fn dj_radio(v: &Value) -> DjRadio {
    let d = unwrap_envelope(v, "data");
    DjRadio {
        id: id(&d["id"]),
        name: text(&d["name"]),
        description: opt_text(&d["desc"]).or_else(|| opt_text(&d["description"])),
        pic_url: opt_text(&d["picUrl"]),
        category: opt_text(&d["category"]),
        program_count: count(&d["programCount"]),
        sub_count: count(&d["subCount"]),
        dj: user_brief(&d["dj"]),
    }
}

pub fn dj_program(v: &Value) -> DjProgram {
    DjProgram {
        id: id(&v["id"]),
        name: text(&v["name"]),
        description: opt_text(&v["description"]),
        cover_url: opt_text(&v["coverUrl"]),
        duration_ms: count(&v["duration"]),
        listener_count: count(&v["listenerCount"]),
        radio: v["radio"].is_object().then(|| dj_radio(&v["radio"])),
        main_song: v["mainSong"].is_object().then(|| music(&v["mainSong"])),
    }
}

/// Map every element of the array at `pointer` (e.g. `/list/artists`).
///
/// # Errors
///
/// [`Error::BadData`] with the whole response when there is no array there.
pub fn list<T>(resp: &Value, pointer: &str, f: impl Fn(&Value) -> T) -> Result<Vec<T>> {
    match resp.pointer(pointer).and_then(Value::as_array) {
        Some(arr) => Ok(arr.iter().map(f).collect()),
        None => Err(Error::BadData(resp.clone())),
    }
}

/// Map a `cloudsearch` response for `kind` with the per-item mapper `f`.
pub fn search_page<T>(v: &Value, kind: SearchType, f: impl Fn(&Value) -> T) -> SearchPage<T> {
    let (count_field, items_field) = kind.result_fields();
    let result = &v["result"];
    SearchPage {
        total: count(&result[count_field]),
        items: result[items_field]
            .as_array()
            .map(|arr| arr.iter().map(f).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn music_current_shape() {
        let v = json!({
            "id": 347230, "name": "海阔天空", "alia": ["Boundless"],
            "ar": [{ "id": 11127, "name": "Beyond" }],
            "al": { "id": 34209, "name": "海阔天空", "picUrl": "https://p1.music.126.net/a.jpg" },
            "dt": 326000, "mv": 376199, "fee": 8
        });
        let m = music(&v);
        assert_eq!(m.id, 347_230);
        assert_eq!(m.alias, vec!["Boundless"]);
        assert_eq!(m.artists[0].name, "Beyond");
        assert_eq!(m.album.pic_url.as_deref(), Some("https://p1.music.126.net/a.jpg"));
        assert_eq!(m.duration_ms, 326_000);
        assert_eq!(m.mv_id, Some(376_199));
        assert_eq!(m.fee, 8);
    }

    #[test]
    fn music_legacy_shape() {
        let v = json!({
            "id": 1, "name": "x",
            "artists": [{ "id": 2, "name": "a" }, { "id": 3, "name": "b" }],
            "album": { "id": 4, "name": "al" },
            "duration": 1000, "mvid": 0
        });
        let m = music(&v);
        assert_eq!(m.artists.len(), 2);
        assert_eq!(m.album.id, 4);
        assert_eq!(m.duration_ms, 1000);
        assert_eq!(m.mv_id, None);
    }

    #[test]
    fn playlist_detail() {
        let v = json!({
            "id": 24381616, "name": "list", "coverImgUrl": "c.jpg",
            "trackCount": 2, "playCount": 99, "tags": ["华语"],
            "creator": { "userId": 7, "nickname": "me" },
            "trackIds": [{ "id": 10 }, { "id": 11 }],
            "tracks": [{ "id": 10, "name": "t" }]
        });
        let p = playlist(&v);
        assert_eq!(p.track_ids, vec![10, 11]);
        assert_eq!(p.tracks.len(), 1);
        assert_eq!(p.creator, Some(UserBrief { id: 7, name: "me".into() }));
        assert_eq!(p.tags, vec!["华语"]);
    }

    #[test]
    fn playlist_recommendation_entry() {
        let p = playlist(&json!({ "id": 1, "name": "r", "picUrl": "p.jpg", "creator": null }));
        assert_eq!(p.cover_url.as_deref(), Some("p.jpg"));
        assert!(p.creator.is_none());
        assert!(p.tracks.is_empty());
    }

    #[test]
    fn album_detail_and_search_item() {
        let detail = json!({
            "album": { "id": 5, "name": "al", "size": 1, "artists": [{ "id": 1, "name": "a" }] },
            "songs": [{ "id": 9, "name": "s" }]
        });
        let a = album(&detail);
        assert_eq!(a.id, 5);
        assert_eq!(a.songs.len(), 1);

        let item = json!({ "id": 6, "name": "b", "artist": { "id": 2, "name": "z" } });
        let a = album(&item);
        assert_eq!(a.artists, vec![ArtistBrief { id: 2, name: "z".into() }]);
        assert!(a.songs.is_empty());
    }

    #[test]
    fn user_detail_envelope() {
        let v = json!({
            "level": 9, "listenSongs": 1234,
            "profile": { "userId": 1, "nickname": "n", "gender": 2, "follows": 3, "followeds": 4 }
        });
        let u = user(&v);
        assert_eq!(u.nickname, "n");
        assert_eq!(u.gender, 2);
        assert_eq!(u.level, Some(9));
        assert_eq!(u.listen_songs, Some(1234));

        let bare = user(&json!({ "userId": 2, "nickname": "m" }));
        assert_eq!(bare.id, 2);
        assert_eq!(bare.level, None);
    }

    #[test]
    fn my_requires_profile() {
        let err = my(&json!({ "code": 200, "account": null, "profile": null })).unwrap_err();
        assert!(matches!(err, Error::BadData(_)));

        let ok = my(&json!({
            "account": { "id": 42, "userName": "1_123", "vipType": 11 },
            "profile": { "userId": 42, "nickname": "n" }
        }))
        .unwrap();
        assert_eq!(ok.account_id, 42);
        assert_eq!(ok.vip_type, 11);
        assert_eq!(ok.profile.id, 42);
    }

    #[test]
    fn mv_and_radio_envelopes() {
        let m = mv(&json!({ "data": { "id": 3, "name": "v", "cover": "c", "duration": 5 } }));
        assert_eq!((m.id, m.duration_ms), (3, 5));
        assert_eq!(m.cover_url.as_deref(), Some("c"));

        let r = dj_radio(&json!({ "id": 4, "name": "r", "dj": { "userId": 8, "nickname": "d" } }));
        assert_eq!(r.dj.map(|d| d.id), Some(8));
    }

    #[test]
    fn program_with_radio_and_song() {
        let p = dj_program(&json!({
            "id": 1, "name": "ep",
            "radio": { "id": 2, "name": "station" },
            "mainSong": { "id": 3, "name": "audio", "duration": 60000 }
        }));
        assert_eq!(p.radio.map(|r| r.name), Some("station".to_owned()));
        assert_eq!(p.main_song.map(|s| s.duration_ms), Some(60_000));
    }

    #[test]
    fn list_requires_the_array() {
        let v = json!({ "code": 200, "list": { "artists": [{ "id": 1, "name": "a" }] } });
        let artists = list(&v, "/list/artists", artist).unwrap();
        assert_eq!(artists[0].name, "a");

        let err = list(&json!({ "code": 200 }), "/result", music).unwrap_err();
        assert!(matches!(err, Error::BadData(_)));
        let err = list(&json!({ "code": 200, "result": null }), "/result", music).unwrap_err();
        assert!(matches!(err, Error::BadData(_)));
    }

    #[test]
    fn search_page_reads_type_fields() {
        let v = json!({ "result": { "artistCount": 12, "artists": [{ "id": 1, "name": "a" }] } });
        let page = search_page(&v, SearchType::Artist, artist);
        assert_eq!(page.total, 12);
        assert_eq!(page.items[0].name, "a");

        let empty = search_page(&json!({ "result": {} }), SearchType::Mv, mv);
        assert_eq!(empty.total, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn string_ids_are_parsed() {
        assert_eq!(artist_brief(&json!({ "id": "15", "name": "x" })).id, 15);
    }
}

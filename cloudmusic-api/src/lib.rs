//! Async client for the Netease Cloud Music web API.
//!
//! Two entry points:
//!
//! - [`Login`] runs the email, phone/captcha and QR login flows and returns a
//!   [`SessionToken`] plus a [`Music163Api`] bound to it.
//! - [`Music163Api`] reads songs, playlists, albums, artists, users, MVs,
//!   radio stations, search results and recommendation feeds.
//!
//! Both sit on a [`Transport`] that POSTs form-encoded bodies to
//! `https://music.163.com` and retries failed requests up to [`RECONNECTION`]
//! times.
//!
//! ```no_run
//! use cloudmusic_api::{Login, PhoneCredential, DEFAULT_COUNTRY_CODE};
//!
//! # async fn run() -> cloudmusic_api::Result<()> {
//! let mut login = Login::new()?;
//! login.send_captcha("13800000000", DEFAULT_COUNTRY_CODE).await?;
//! let (token, api) = login
//!     .cellphone("13800000000", PhoneCredential::Captcha("1234"), DEFAULT_COUNTRY_CODE)
//!     .await?;
//! println!("cookie: {token}");
//! println!("hello {}", api.my().await?.profile.nickname);
//! # Ok(())
//! # }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                                  | Endpoint                        |
//! |-----------------------------------------|---------------------------------|
//! | [`Music163Api::my`]                     | `/api/w/nuser/account/get`      |
//! | [`Music163Api::music`]                  | `/api/v3/song/detail`           |
//! | [`Music163Api::user`]                   | `/api/v1/user/detail/{id}`      |
//! | [`Music163Api::playlist`]               | `/api/v6/playlist/detail`       |
//! | [`Music163Api::artist`]                 | `/api/artist/head/info/get`     |
//! | [`Music163Api::album`]                  | `/api/v1/album/{id}`            |
//! | [`Music163Api::mv`]                     | `/api/v1/mv/detail`             |
//! | [`Music163Api::dj`]                     | `/api/djradio/v2/get`           |
//! | [`Music163Api::search`]                 | `/api/cloudsearch/pc`           |
//! | [`Music163Api::personalized_playlist`]  | `/api/personalized/playlist`    |
//! | [`Music163Api::personalized_new_song`]  | `/api/personalized/newsong`     |
//! | [`Music163Api::personalized_dj`]        | `/api/personalized/djprogram`   |
//! | [`Music163Api::home_page`]              | `/api/homepage/block/page`      |
//! | [`Music163Api::top_artist_list`]        | `/api/toplist/artist`           |
//! | [`Music163Api::top_song`]               | `/api/v1/discovery/new/songs`   |

mod album;
mod artist;
pub mod auth;
pub mod client;
pub mod error;
pub mod login;
pub mod mapper;
mod mv;
mod playlist;
mod radio;
mod search;
mod track;
pub mod transport;
pub mod types;
mod user;

pub use auth::{SessionToken, md5_hex};
pub use client::Music163Api;
pub use error::{Error, Result};
pub use login::{DEFAULT_COUNTRY_CODE, DEFAULT_QR_INTERVAL, Login, PhoneCredential};
pub use transport::{ACCEPTED_CODES, BASE_URL, BROWSER_UA, Form, RECONNECTION, Reply, RetryPolicy, Transport};

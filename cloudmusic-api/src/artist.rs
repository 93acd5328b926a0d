//! Artist API.
//!
//! - `artist`: `POST /api/artist/head/info/get` with `id`;
//!   the artist is at `data.artist`.
//! - `top_artist_list`: `POST /api/toplist/artist`; entries at `list.artists`.

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::{Artist, ArtistArea};

impl Music163Api {
    pub async fn artist(&self, id: u64) -> Result<Artist> {
        let resp = self
            .request("/api/artist/head/info/get", &Form::new().param("id", id))
            .await?;
        let artist = &resp["data"]["artist"];
        if !artist.is_object() {
            return Err(Error::BadData(resp));
        }
        Ok(mapper::artist(artist))
    }

    /// Artist chart for `area`. `page` is 0-based.
    pub async fn top_artist_list(&self, area: ArtistArea, page: u32, limit: u32) -> Result<Vec<Artist>> {
        let form = Form::new()
            .param("type", area.code())
            .param("limit", limit)
            .param("offset", u64::from(page) * u64::from(limit))
            .param("total", true);
        let resp = self.request("/api/toplist/artist", &form).await?;
        mapper::list(&resp, "/list/artists", mapper::artist)
    }
}

//! Radio (DJ) API.
//!
//! - `dj`: `POST /api/djradio/v2/get` with `id`; the station is at `data`.
//! - `personalized_dj`: `POST /api/personalized/djprogram`; episodes at
//!   `result[].program`.

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::{DjProgram, DjRadio};

impl Music163Api {
    pub async fn dj(&self, id: u64) -> Result<DjRadio> {
        let resp = self
            .request("/api/djradio/v2/get", &Form::new().param("id", id))
            .await?;
        if !resp["data"].is_object() {
            return Err(Error::BadData(resp));
        }
        Ok(mapper::dj_radio(&resp))
    }

    /// Recommended radio episodes.
    pub async fn personalized_dj(&self) -> Result<Vec<DjProgram>> {
        let resp = self
            .request("/api/personalized/djprogram", &Form::new())
            .await?;
        mapper::list(&resp, "/result", |item| mapper::dj_program(&item["program"]))
    }
}

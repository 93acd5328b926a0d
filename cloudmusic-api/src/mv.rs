//! MV API: `POST /api/v1/mv/detail` with `id`, MV at `data`.

use crate::client::Music163Api;
use crate::error::{Error, Result};
use crate::mapper;
use crate::transport::Form;
use crate::types::Mv;

impl Music163Api {
    pub async fn mv(&self, id: u64) -> Result<Mv> {
        let resp = self
            .request("/api/v1/mv/detail", &Form::new().param("id", id))
            .await?;
        if !resp["data"].is_object() {
            return Err(Error::BadData(resp));
        }
        Ok(mapper::mv(&resp))
    }
}

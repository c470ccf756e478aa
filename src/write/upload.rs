//! Image upload.
//!
//! Local files go up as indexed multipart parts; the endpoint answers with
//! an HTML page that stashes two opaque tokens in JavaScript assignments.
//! Both tokens must come back, and both are required verbatim by the
//! article submission that follows.

use std::path::PathBuf;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClientError;
use crate::forms::UploadForm;
use crate::session::Session;

static FL_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\('FL_DATA'\)\.value ?= ?'(.*)'").unwrap());
static OFL_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\('OFL_DATA'\)\.value ?= ?'(.*)'").unwrap());

/// Extracts the FL_DATA/OFL_DATA token pair from an upload response body.
pub(crate) fn extract_upload_tokens(body: &str) -> Result<(String, String), ClientError> {
    let grab = |re: &Regex| {
        re.captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    match (grab(&FL_DATA_RE), grab(&OFL_DATA_RE)) {
        (Some(fl), Some(ofl)) => Ok((fl, ofl)),
        _ => Err(ClientError::ImageUploadFailed),
    }
}

impl Session {
    /// Uploads `files` for `gall_id` and returns the `(FL_DATA, OFL_DATA)`
    /// token pair. Unreadable files are skipped by the form builder.
    pub(crate) async fn upload_images(
        &self,
        gall_id: &str,
        files: &[PathBuf],
    ) -> Result<(String, String), ClientError> {
        debug!("uploading {} image(s) for {gall_id}", files.len());
        let form = UploadForm { gall_id, files }.multipart().await;
        let body = self
            .post_multipart(&self.endpoints().image_upload, form, None)
            .await?
            .text()
            .await?;
        extract_upload_tokens(&body)
    }
}

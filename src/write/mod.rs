//! Mutating operations: write, upload and delete.
//!
//! An article write is a three-step pipeline: authorization handshake,
//! optional image upload, multipart submission. The submission response is
//! an HTML page; the new article's canonical URL, gallery id and number are
//! recovered from it by three independent patterns, and all three must be
//! present. Comment writes are a single form POST with no handshake.

use std::path::PathBuf;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClientError;
use crate::forms::{ArticleSubmitForm, CommentSubmitForm, WriteVerifyForm};
use crate::gallery::{ArticleRef, CommentRef, GallRef};
use crate::response::KeyEnvelope;
use crate::session::Session;

pub(crate) mod auth;
pub(crate) mod delete;
pub(crate) mod upload;

static WRITTEN_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"url="?(.*?)"?>"#).unwrap());
static WRITTEN_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=([^&]*)").unwrap());
static WRITTEN_NO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"no=(\d+)").unwrap());

/// Everything needed to post a new article.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub gall_id: String,
    pub subject: String,
    pub content: String,
    /// Local image files, uploaded in order before submission.
    pub images: Vec<PathBuf>,
}

impl ArticleDraft {
    pub fn new(gall_id: &str, subject: &str, content: &str) -> Self {
        Self {
            gall_id: gall_id.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<PathBuf>) -> Self {
        self.images = images;
        self
    }
}

/// Pulls the `(url, id, no)` triple out of a write response body.
pub(crate) fn extract_written_article(body: &str) -> Result<(String, String, String), ClientError> {
    let grab = |re: &Regex| {
        re.captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    match (
        grab(&WRITTEN_URL_RE),
        grab(&WRITTEN_ID_RE),
        grab(&WRITTEN_NO_RE),
    ) {
        (Some(url), Some(id), Some(no)) => Ok((url, id, no)),
        _ => Err(ClientError::WriteFailed(
            "response missing the url/id/no triple",
        )),
    }
}

impl Session {
    /// Posts a new article. Runs the write-verify handshake, uploads the
    /// draft's images when present, then submits the multipart form with
    /// the single-use key and cookies from the handshake.
    pub async fn write_article(&self, draft: &ArticleDraft) -> Result<ArticleRef, ClientError> {
        let verify = WriteVerifyForm {
            gall_id: &draft.gall_id,
            subject: &draft.subject,
            content: &draft.content,
        };
        let handshake = self
            .authorize(verify.pairs(), &self.endpoints().option_write)
            .await?;

        let (fl_data, ofl_data) = if draft.images.is_empty() {
            (String::new(), String::new())
        } else {
            self.upload_images(&draft.gall_id, &draft.images).await?
        };

        let (name, password) = self.credentials();
        let form = ArticleSubmitForm {
            name,
            password,
            gall_id: &draft.gall_id,
            subject: &draft.subject,
            content: &draft.content,
            fl_data: &fl_data,
            ofl_data: &ofl_data,
            auth_key: &handshake.key,
        };
        let body = self
            .post_multipart(
                &self.endpoints().article_write,
                form.multipart(),
                Some(&handshake.cookies),
            )
            .await?
            .text()
            .await?;

        let (_url, gall_id, number) = extract_written_article(&body)?;
        debug!("wrote article {gall_id}/{number}");
        let gall = GallRef::new(&self.endpoints().mobile_base, &gall_id);
        Ok(ArticleRef::scoped(gall, &number))
    }

    /// Posts a comment under `article`. A single form POST; the response
    /// envelope's `data` is the new comment number.
    pub async fn write_comment(
        &self,
        article: &ArticleRef,
        content: &str,
    ) -> Result<CommentRef, ClientError> {
        let (nick, password) = self.credentials();
        let form = CommentSubmitForm {
            gall_id: &article.gall.id,
            article_number: &article.number,
            nick,
            password,
            content,
        };
        let body = self
            .post_form(&self.endpoints().comment_write, &form.pairs(), None)
            .await?
            .text()
            .await?;
        let number = KeyEnvelope::parse(&body)?
            .data
            .ok_or(ClientError::WriteFailed("comment number missing"))?;
        debug!("wrote comment {number} under {}", article.number);
        let gall = GallRef::new(&self.endpoints().mobile_base, &article.gall.id);
        Ok(CommentRef::scoped(gall, &article.number, &number))
    }
}

//! Domain entities for galleries, articles and comments.
//!
//! Everything here is plain data mapped out of the remote JSON; the fetch
//! and write modules construct these, callers only read them. Every content
//! entity carries the [`GallRef`] that scopes it to its gallery.

use bytes::Bytes;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api;
use crate::error::ClientError;
use crate::session::Session;

pub(crate) mod parse;

/// A gallery identifier plus its canonical list URL. Embedded by every
/// content entity; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallRef {
    pub id: String,
    pub url: String,
}

impl GallRef {
    pub fn new(base: &str, gall_id: &str) -> Self {
        Self {
            id: gall_id.to_string(),
            url: api::gall_url(base, gall_id),
        }
    }
}

/// A general (site-operated) gallery, as listed by the name index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorGallery {
    pub id: String,
    pub name: String,
    pub number: String,
    pub can_write: bool,
}

/// A community-created gallery. Same index shape as [`MajorGallery`] plus
/// the manager roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinorGallery {
    pub id: String,
    pub name: String,
    pub number: String,
    pub can_write: bool,
    pub manager: String,
    pub sub_managers: Vec<String>,
}

/// Member standing of an author, decoded from the `member_icon` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberLevel {
    /// Posting with an ad-hoc nickname/password pair.
    Guest,
    /// Registered account.
    Member,
    /// Registered account with a fixed nickname.
    FixedMember,
}

/// Classification of an article derived from its image/best flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleKind {
    Plain,
    Picture,
    Best,
    BestPicture,
}

/// Author fields shared by list items, articles and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInfo {
    /// Display name as rendered by the board.
    pub name: String,
    pub level: MemberLevel,
    /// Registered user id; empty for guests.
    pub gallog_id: String,
    /// Derived user page URL; empty for guests.
    pub gallog_url: String,
    /// Partially masked address the board shows for guests.
    pub ip: String,
}

/// One page of a gallery's article listing.
#[derive(Debug, Clone)]
pub struct List {
    pub info: ListInfo,
    pub items: Vec<ListItem>,
}

/// Gallery-level header record that rides along with every listing page.
#[derive(Debug, Clone)]
pub struct ListInfo {
    pub gall: GallRef,
    pub category_name: String,
    pub file_count: String,
    pub file_size: String,
}

/// Summary of one article as it appears in a listing page. Identifying
/// numbers are opaque: they are threaded into canonical URLs, never
/// recomputed.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub gall: GallRef,
    pub url: String,
    pub subject: String,
    pub author: AuthorInfo,
    pub kind: ArticleKind,
    pub has_image: bool,
    pub is_best: bool,
    pub thumbs_up: i64,
    pub hit: i64,
    pub comment_count: i64,
    pub voice_comment_count: i64,
    pub number: String,
    pub date: Option<NaiveDateTime>,
}

/// A fully assembled article: body, vote totals, images and (when the
/// declared count is positive) every comment page.
#[derive(Debug, Clone)]
pub struct Article {
    pub gall: GallRef,
    pub url: String,
    pub subject: String,
    /// Body HTML as served.
    pub content: String,
    /// Aggregate of the plain and member up-vote counters.
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub author: AuthorInfo,
    pub number: String,
    pub comment_count: i64,
    pub has_image: bool,
    pub hit: i64,
    pub kind: ArticleKind,
    pub is_best: bool,
    pub images: Vec<ImageRef>,
    pub comments: Vec<Comment>,
    pub date: Option<NaiveDateTime>,
}

/// One comment. Holds the parent article's number and gallery scope by
/// identifier, not by pointer.
#[derive(Debug, Clone)]
pub struct Comment {
    pub gall: GallRef,
    pub article_number: String,
    pub author: AuthorInfo,
    /// Comment body; the board serves it as HTML.
    pub content: String,
    pub number: String,
    pub date: Option<NaiveDateTime>,
}

/// One page of a comment listing, with the server-reported paging state
/// the assembler uses to decide whether more pages remain.
#[derive(Debug, Clone)]
pub struct CommentPage {
    pub total_count: i64,
    pub total_pages: i64,
    pub now_page: i64,
    pub comments: Vec<Comment>,
}

/// Minimal handle on an article: enough to build its canonical URL, fetch
/// it, or delete it. Returned by the writer.
#[derive(Debug, Clone)]
pub struct ArticleRef {
    pub gall: GallRef,
    pub number: String,
}

impl ArticleRef {
    pub fn new(gall_id: &str, number: &str) -> Self {
        Self::scoped(GallRef::new(api::MOBILE_BASE, gall_id), number)
    }

    pub(crate) fn scoped(gall: GallRef, number: &str) -> Self {
        Self {
            gall,
            number: number.to_string(),
        }
    }

    pub fn url(&self) -> String {
        api::article_url(base_of(&self.gall.url), &self.gall.id, &self.number)
    }
}

/// Recovers the host base from a gallery list URL, so canonical article
/// URLs stay on whatever host the ref was scoped to.
fn base_of(gall_url: &str) -> &str {
    gall_url
        .split_once("/list.php")
        .map(|(base, _)| base)
        .unwrap_or(api::MOBILE_BASE)
}

impl From<&Article> for ArticleRef {
    fn from(a: &Article) -> Self {
        Self {
            gall: a.gall.clone(),
            number: a.number.clone(),
        }
    }
}

/// Minimal handle on a comment, for deletion.
#[derive(Debug, Clone)]
pub struct CommentRef {
    pub gall: GallRef,
    pub article_number: String,
    pub number: String,
}

impl CommentRef {
    pub fn new(gall_id: &str, article_number: &str, number: &str) -> Self {
        Self::scoped(GallRef::new(api::MOBILE_BASE, gall_id), article_number, number)
    }

    pub(crate) fn scoped(gall: GallRef, article_number: &str, number: &str) -> Self {
        Self {
            gall,
            article_number: article_number.to_string(),
            number: number.to_string(),
        }
    }
}

impl From<&Comment> for CommentRef {
    fn from(c: &Comment) -> Self {
        Self {
            gall: c.gall.clone(),
            article_number: c.article_number.clone(),
            number: c.number.clone(),
        }
    }
}

static CONTENT_TYPE_FILENAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"image/(.*)").unwrap());

/// Opaque pointer to a remotely stored image, resolvable on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub(crate) String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Downloads the image, inferring a filename from the Content-Type
    /// header (`image/jpeg` ⇒ `jpeg`).
    pub async fn fetch(&self, session: &Session) -> Result<(Bytes, String), ClientError> {
        let resp = session.get_raw(&self.0).await?;
        let filename = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|ct| CONTENT_TYPE_FILENAME_RE.captures(ct))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_lowercase())
            .ok_or(ClientError::MissingRecord("image content-type"))?;
        let data = resp.bytes().await?;
        Ok((data, filename))
    }
}

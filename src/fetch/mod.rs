//! Single-purpose read operations against the mobile JSON endpoints.
//!
//! One method per resource kind: gallery name indexes, article listings
//! (normal or best-only), one page of comments, and an article's image
//! references. Each call builds its typed query, validates the response
//! envelope and maps the raw records into domain entities. Multi-call
//! orchestration lives in [`assembler`].

use log::debug;
use serde::Deserialize;

use crate::api;
use crate::error::ClientError;
use crate::forms::{CommentQuery, ListQuery, ViewQuery};
use crate::gallery::parse::{article_kind, lenient_int, normalize_date, yn};
use crate::gallery::{
    AuthorInfo, Comment, CommentPage, GallRef, ImageRef, List, ListInfo, ListItem, MajorGallery,
    MemberLevel, MinorGallery,
};
use crate::session::Session;

pub(crate) mod assembler;

#[derive(Debug, Deserialize)]
struct RawGallery {
    #[serde(rename = "name")]
    id: String,
    #[serde(rename = "ko_name")]
    name: String,
    #[serde(default)]
    no: String,
    /// Inverted on the wire: `no_write: true` means writing is disabled.
    #[serde(default)]
    no_write: bool,
    #[serde(default)]
    manager: String,
    #[serde(default)]
    submanager: String,
}

#[derive(Debug, Deserialize)]
struct RawListPage {
    #[serde(default)]
    gall_info: Vec<RawListInfo>,
    #[serde(default)]
    gall_list: Vec<RawListItem>,
}

#[derive(Debug, Deserialize)]
struct RawListInfo {
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    file_cnt: String,
    #[serde(default)]
    file_size: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawListItem {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    img_icon: String,
    #[serde(default)]
    best_chk: String,
    #[serde(default)]
    recommend: String,
    #[serde(default)]
    hit: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    ip: String,
    #[serde(default)]
    total_comment: String,
    #[serde(default)]
    total_voice: String,
    #[serde(default)]
    no: String,
    #[serde(default)]
    date_time: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawView {
    #[serde(default)]
    pub(crate) view_info: RawViewInfo,
    #[serde(default)]
    pub(crate) view_main: RawViewMain,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawViewInfo {
    #[serde(default)]
    pub(crate) subject: String,
    #[serde(default)]
    pub(crate) no: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) member_icon: String,
    #[serde(default)]
    pub(crate) total_comment: String,
    #[serde(default)]
    pub(crate) ip: String,
    #[serde(default)]
    pub(crate) img_chk: String,
    #[serde(default)]
    pub(crate) recommend_chk: String,
    #[serde(default)]
    pub(crate) hit: String,
    #[serde(default)]
    pub(crate) user_id: String,
    #[serde(default)]
    pub(crate) date_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawViewMain {
    #[serde(default)]
    pub(crate) memo: String,
    #[serde(default)]
    pub(crate) recommend: String,
    #[serde(default)]
    pub(crate) recommend_member: String,
    #[serde(default)]
    pub(crate) nonrecommend: String,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    img: String,
}

#[derive(Debug, Deserialize)]
struct RawCommentPage {
    #[serde(default)]
    total_comment: String,
    #[serde(default)]
    total_page: String,
    #[serde(default)]
    re_page: String,
    #[serde(default)]
    comment_list: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    member_icon: String,
    #[serde(rename = "ipData", default)]
    ip: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    comment_memo: String,
    #[serde(default)]
    comment_no: String,
    #[serde(default)]
    date_time: String,
}

impl Session {
    /// Fetches the index of all general galleries.
    pub async fn major_galleries(&self) -> Result<Vec<MajorGallery>, ClientError> {
        let body = self
            .get_raw(&self.endpoints().major_gallery_list)
            .await?
            .text()
            .await?;
        let raw: Vec<RawGallery> = serde_json::from_str(&body)?;
        debug!("major gallery index: {} entries", raw.len());
        Ok(raw
            .into_iter()
            .map(|g| MajorGallery {
                id: g.id,
                name: g.name,
                number: g.no,
                can_write: !g.no_write,
            })
            .collect())
    }

    /// Fetches the index of all community-created galleries.
    pub async fn minor_galleries(&self) -> Result<Vec<MinorGallery>, ClientError> {
        let body = self
            .get_raw(&self.endpoints().minor_gallery_list)
            .await?
            .text()
            .await?;
        let raw: Vec<RawGallery> = serde_json::from_str(&body)?;
        debug!("minor gallery index: {} entries", raw.len());
        Ok(raw
            .into_iter()
            .map(|g| MinorGallery {
                id: g.id,
                name: g.name,
                number: g.no,
                can_write: !g.no_write,
                sub_managers: g
                    .submanager
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                manager: g.manager,
            })
            .collect())
    }

    /// One page of a gallery's article listing.
    pub async fn article_list(&self, gall_id: &str, page: u32) -> Result<List, ClientError> {
        self.fetch_list(gall_id, page, false).await
    }

    /// One page of a gallery's best (recommended) articles.
    pub async fn best_article_list(&self, gall_id: &str, page: u32) -> Result<List, ClientError> {
        self.fetch_list(gall_id, page, true).await
    }

    async fn fetch_list(
        &self,
        gall_id: &str,
        page: u32,
        best_only: bool,
    ) -> Result<List, ClientError> {
        let query = ListQuery {
            app_id: self.app_id(),
            gall_id,
            page,
            best_only,
        };
        let pages: Vec<RawListPage> = self
            .get_json(&self.endpoints().article_list, &query.pairs())
            .await?;
        let raw = pages
            .into_iter()
            .next()
            .ok_or(ClientError::MissingRecord("gall_list"))?;
        let info = raw
            .gall_info
            .into_iter()
            .next()
            .ok_or(ClientError::MissingRecord("gall_info"))?;

        let base = &self.endpoints().mobile_base;
        let gall = GallRef::new(base, gall_id);
        let items = raw
            .gall_list
            .into_iter()
            .map(|a| ListItem {
                gall: gall.clone(),
                url: api::article_url(base, gall_id, &a.no),
                kind: article_kind(&a.img_icon, &a.best_chk),
                has_image: yn(&a.img_icon),
                is_best: yn(&a.best_chk),
                thumbs_up: lenient_int(&a.recommend),
                hit: lenient_int(&a.hit),
                comment_count: lenient_int(&a.total_comment),
                voice_comment_count: lenient_int(&a.total_voice),
                date: normalize_date(&a.date_time),
                author: AuthorInfo {
                    name: a.name,
                    level: MemberLevel::from_code(lenient_int(&a.level)),
                    gallog_url: api::gallog_url(&a.user_id),
                    gallog_id: a.user_id,
                    ip: a.ip,
                },
                subject: a.subject,
                number: a.no,
            })
            .collect();

        Ok(List {
            info: ListInfo {
                gall,
                category_name: info.category_name,
                file_count: info.file_cnt,
                file_size: info.file_size,
            },
            items,
        })
    }

    /// One page of an article's comments, with the server-reported paging
    /// counters. Walking every page belongs to the article assembler.
    pub async fn comment_page(
        &self,
        gall_id: &str,
        article_number: &str,
        page: u32,
    ) -> Result<CommentPage, ClientError> {
        let query = CommentQuery {
            app_id: self.app_id(),
            gall_id,
            number: article_number,
            page,
        };
        let pages: Vec<RawCommentPage> = self
            .get_json(&self.endpoints().comment_list, &query.pairs())
            .await?;
        let raw = pages
            .into_iter()
            .next()
            .ok_or(ClientError::MissingRecord("comment_list"))?;

        let gall = GallRef::new(&self.endpoints().mobile_base, gall_id);
        let comments = raw
            .comment_list
            .into_iter()
            .map(|c| Comment {
                gall: gall.clone(),
                article_number: article_number.to_string(),
                author: AuthorInfo {
                    name: c.name,
                    level: MemberLevel::from_code(lenient_int(&c.member_icon)),
                    gallog_url: api::gallog_url(&c.user_id),
                    gallog_id: c.user_id,
                    ip: c.ip,
                },
                content: c.comment_memo,
                number: c.comment_no,
                date: normalize_date(&c.date_time),
            })
            .collect();

        Ok(CommentPage {
            total_count: lenient_int(&raw.total_comment),
            total_pages: lenient_int(&raw.total_page),
            now_page: lenient_int(&raw.re_page),
            comments,
        })
    }

    /// The image references attached to an article.
    pub async fn image_refs(
        &self,
        gall_id: &str,
        article_number: &str,
    ) -> Result<Vec<ImageRef>, ClientError> {
        let query = ViewQuery {
            app_id: self.app_id(),
            gall_id,
            number: article_number,
        };
        let raw: Vec<RawImage> = self
            .get_json(&self.endpoints().article_images, &query.pairs())
            .await?;
        Ok(raw
            .into_iter()
            .filter(|i| !i.img.is_empty())
            .map(|i| ImageRef(i.img))
            .collect())
    }

    pub(crate) async fn fetch_view(
        &self,
        gall_id: &str,
        article_number: &str,
    ) -> Result<RawView, ClientError> {
        let query = ViewQuery {
            app_id: self.app_id(),
            gall_id,
            number: article_number,
        };
        let views: Vec<RawView> = self
            .get_json(&self.endpoints().article_view, &query.pairs())
            .await?;
        views
            .into_iter()
            .next()
            .ok_or(ClientError::MissingRecord("view_info"))
    }
}

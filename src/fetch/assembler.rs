//! Article assembly: one canonical URL in, one fully populated
//! [`Article`] out.
//!
//! The body and the image-reference list are fetched concurrently and
//! joined before anything else happens. The asymmetry is intentional:
//! images are supplementary, so a failed image fetch degrades to an empty
//! list, while a failed body fetch fails the whole assembly. Comments are
//! then paged through strictly sequentially — each page's request depends
//! on knowing more pages remain.

use log::{debug, warn};

use crate::api;
use crate::error::ClientError;
use crate::gallery::parse::{article_kind, lenient_int, normalize_date, yn};
use crate::gallery::{Article, AuthorInfo, Comment, GallRef, MemberLevel};
use crate::session::Session;

impl Session {
    /// Fetches the article behind a canonical mobile-view URL, together
    /// with its image references and, when the declared comment count is
    /// positive, all of its comments.
    pub async fn article(&self, url: &str) -> Result<Article, ClientError> {
        let (gall_id, number) = api::parse_article_url(url)?;

        let (view, images) = tokio::join!(
            self.fetch_view(&gall_id, &number),
            self.image_refs(&gall_id, &number),
        );
        let view = view?;
        let images = images.unwrap_or_else(|e| {
            warn!("image list fetch failed for {gall_id}/{number}, continuing without: {e}");
            Vec::new()
        });

        let base = &self.endpoints().mobile_base;
        let gall = GallRef::new(base, &gall_id);
        let info = view.view_info;
        let main = view.view_main;

        let mut article = Article {
            url: api::article_url(base, &gall_id, &info.no),
            subject: info.subject,
            content: main.memo,
            thumbs_up: lenient_int(&main.recommend) + lenient_int(&main.recommend_member),
            thumbs_down: lenient_int(&main.nonrecommend),
            comment_count: lenient_int(&info.total_comment),
            has_image: yn(&info.img_chk),
            hit: lenient_int(&info.hit),
            kind: article_kind(&info.img_chk, &info.recommend_chk),
            is_best: yn(&info.recommend_chk),
            date: normalize_date(&info.date_time),
            author: AuthorInfo {
                name: info.name,
                level: MemberLevel::from_code(lenient_int(&info.member_icon)),
                gallog_url: api::gallog_url(&info.user_id),
                gallog_id: info.user_id,
                ip: info.ip,
            },
            number: info.no,
            gall,
            images,
            comments: Vec::new(),
        };

        if article.comment_count > 0 {
            article.comments = self.all_comments(&gall_id, &article.number).await?;
        }

        // An empty subject on a 200 response means the article is gone or
        // inaccessible; never hand back a zero-value success.
        if article.subject.is_empty() {
            return Err(ClientError::EmptyArticle);
        }
        Ok(article)
    }

    /// Walks comment pages from 1 until the server reports the current
    /// page has reached the total (a total of 0 or 1 stops after the
    /// first page).
    async fn all_comments(
        &self,
        gall_id: &str,
        article_number: &str,
    ) -> Result<Vec<Comment>, ClientError> {
        let mut comments = Vec::new();
        let mut page = 1;
        loop {
            let fetched = self.comment_page(gall_id, article_number, page).await?;
            debug!(
                "comment page {}/{} for {gall_id}/{article_number}: {} comments",
                fetched.now_page,
                fetched.total_pages,
                fetched.comments.len()
            );
            comments.extend(fetched.comments);
            if fetched.now_page >= fetched.total_pages {
                break;
            }
            page += 1;
        }
        Ok(comments)
    }
}

//! Endpoint table and canonical URL handling.
//!
//! All identifiers the client threads around (gallery id, article number)
//! are carried inside canonical mobile-view URLs. The two extraction
//! patterns here are the only accepted way to pull them back out; anything
//! they don't match fails before a single network call is made.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClientError;

static GALL_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=([^&]*)").unwrap());
static ARTICLE_NO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"no=(\d+)").unwrap());

pub const MOBILE_BASE: &str = "http://m.dcinside.com";
pub const GALLOG_BASE: &str = "http://gallog.dcinside.com";

/// Every remote endpoint the client talks to.
///
/// `Endpoints::default()` points at the live service. Embedders and tests
/// can rebase the whole table onto another host with [`Endpoints::on_host`].
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub major_gallery_list: String,
    pub minor_gallery_list: String,
    pub article_list: String,
    pub article_view: String,
    pub article_images: String,
    pub comment_list: String,
    pub access_token: String,
    pub option_write: String,
    pub article_write: String,
    pub image_upload: String,
    pub comment_write: String,
    /// Base used when building canonical article/list URLs.
    pub mobile_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            major_gallery_list: "http://json2.dcinside.com/json0/gallery_name.php".into(),
            minor_gallery_list: "http://json2.dcinside.com/json1/mgallery_name.php".into(),
            article_list: "http://json2.dcinside.com/json0/app/gall_list_new.php".into(),
            article_view: "http://json2.dcinside.com/json0/app/view_new.php".into(),
            article_images: "http://json2.dcinside.com/json0/app/view_img.php".into(),
            comment_list: "http://json2.dcinside.com/json0/app/comment_new.php".into(),
            access_token: "http://m.dcinside.com/_access_token.php".into(),
            option_write: "http://option.dcinside.com/_option_write.php".into(),
            article_write: "http://upload.dcinside.com/g_write.php".into(),
            image_upload: "http://upload.dcinside.com/upload_imgfree_mobile.php".into(),
            comment_write: "http://option.dcinside.com/_option_write.php".into(),
            mobile_base: MOBILE_BASE.into(),
        }
    }
}

impl Endpoints {
    /// Rebases every endpoint onto `host` (e.g. a mock server URI), keeping
    /// one distinct path per operation.
    pub fn on_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            major_gallery_list: format!("{host}/json0/gallery_name.php"),
            minor_gallery_list: format!("{host}/json1/mgallery_name.php"),
            article_list: format!("{host}/json0/app/gall_list_new.php"),
            article_view: format!("{host}/json0/app/view_new.php"),
            article_images: format!("{host}/json0/app/view_img.php"),
            comment_list: format!("{host}/json0/app/comment_new.php"),
            access_token: format!("{host}/_access_token.php"),
            option_write: format!("{host}/_option_write.php"),
            article_write: format!("{host}/g_write.php"),
            image_upload: format!("{host}/upload_imgfree_mobile.php"),
            comment_write: format!("{host}/_option_write.php"),
            mobile_base: host.to_string(),
        }
    }
}

/// Canonical URL of an article in the mobile view.
pub fn article_url(base: &str, gall_id: &str, number: &str) -> String {
    format!("{base}/view.php?id={gall_id}&no={number}")
}

/// Canonical URL of a gallery's list page.
pub fn gall_url(base: &str, gall_id: &str) -> String {
    format!("{base}/list.php?id={gall_id}")
}

/// Gallog (user page) URL for a registered user id. Empty id means an
/// anonymous author and yields an empty URL.
pub fn gallog_url(user_id: &str) -> String {
    if user_id.is_empty() {
        String::new()
    } else {
        format!("{GALLOG_BASE}/{user_id}")
    }
}

/// Extracts `(gallery id, article number)` from a canonical article URL.
pub fn parse_article_url(url: &str) -> Result<(String, String), ClientError> {
    let id = GALL_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty());
    let no = ARTICLE_NO_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    match (id, no) {
        (Some(id), Some(no)) => Ok((id.to_string(), no.to_string())),
        _ => Err(ClientError::InvalidArticleUrl(url.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn article_url_round_trips() {
        let url = article_url(MOBILE_BASE, "programming", "123456");
        let (id, no) = parse_article_url(&url).unwrap();
        assert_eq!(id, "programming");
        assert_eq!(no, "123456");
        assert_eq!(article_url(MOBILE_BASE, &id, &no), url);
    }

    #[test]
    fn malformed_urls_fail_fast() {
        assert!(matches!(
            parse_article_url("http://m.dcinside.com/list.php"),
            Err(ClientError::InvalidArticleUrl(_))
        ));
        // Number present but id empty.
        assert!(parse_article_url("http://m.dcinside.com/view.php?id=&no=1").is_err());
        // Non-numeric article number never matches.
        assert!(parse_article_url("http://m.dcinside.com/view.php?id=a&no=x").is_err());
    }

    #[test]
    fn gallog_url_empty_for_anonymous() {
        assert_eq!(gallog_url(""), "");
        assert_eq!(gallog_url("neo"), "http://gallog.dcinside.com/neo");
    }
}

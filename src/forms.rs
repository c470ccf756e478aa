//! Typed request bodies, one struct per endpoint.
//!
//! Each struct names its fields explicitly and knows how to render itself
//! into the key/value pairs the endpoint expects; the only generic machinery
//! underneath is the multipart builder for the two endpoints that take file
//! parts. Mode flags and other fixed fields live here and nowhere else.

use std::path::{Path, PathBuf};

use log::warn;
use reqwest::multipart::{Form, Part};

pub(crate) type FieldPairs = Vec<(&'static str, String)>;

/// Query for one page of a gallery's article listing.
pub(crate) struct ListQuery<'a> {
    pub app_id: &'a str,
    pub gall_id: &'a str,
    pub page: u32,
    /// Restrict the listing to best (recommended) articles.
    pub best_only: bool,
}

impl ListQuery<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        let mut pairs = vec![
            ("app_id", self.app_id.to_string()),
            ("id", self.gall_id.to_string()),
            ("page", self.page.to_string()),
        ];
        if self.best_only {
            pairs.push(("recommend", "1".to_string()));
        }
        pairs
    }
}

/// Query for an article body or its image-reference list; both endpoints
/// take the same fields.
pub(crate) struct ViewQuery<'a> {
    pub app_id: &'a str,
    pub gall_id: &'a str,
    pub number: &'a str,
}

impl ViewQuery<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("app_id", self.app_id.to_string()),
            ("id", self.gall_id.to_string()),
            ("no", self.number.to_string()),
        ]
    }
}

/// Query for one page of an article's comments.
pub(crate) struct CommentQuery<'a> {
    pub app_id: &'a str,
    pub gall_id: &'a str,
    pub number: &'a str,
    pub page: u32,
}

impl CommentQuery<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("app_id", self.app_id.to_string()),
            ("id", self.gall_id.to_string()),
            ("no", self.number.to_string()),
            ("re_page", self.page.to_string()),
        ]
    }
}

/// Pre-flight verification fields for an article write.
pub(crate) struct WriteVerifyForm<'a> {
    pub gall_id: &'a str,
    pub subject: &'a str,
    pub content: &'a str,
}

impl WriteVerifyForm<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("id", self.gall_id.to_string()),
            ("w_subject", self.subject.to_string()),
            ("w_memo", self.content.to_string()),
            ("w_filter", "1".to_string()),
            ("mode", "write_verify".to_string()),
        ]
    }
}

/// Pre-flight verification fields for a nomember deletion.
pub(crate) enum DeleteVerifyForm {
    Article,
    Comment,
}

impl DeleteVerifyForm {
    pub(crate) fn pairs(&self) -> FieldPairs {
        let token = match self {
            DeleteVerifyForm::Article => "nonuser_del",
            DeleteVerifyForm::Comment => "nonuser_com_del",
        };
        vec![("token_verify", token.to_string())]
    }
}

/// Final article submission, sent multipart together with the handshake
/// token and the upload tokens (empty strings when no images were sent).
pub(crate) struct ArticleSubmitForm<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub gall_id: &'a str,
    pub subject: &'a str,
    pub content: &'a str,
    pub fl_data: &'a str,
    pub ofl_data: &'a str,
    pub auth_key: &'a str,
}

impl ArticleSubmitForm<'_> {
    pub(crate) fn multipart(&self) -> Form {
        fields_to_multipart(vec![
            ("name", self.name.to_string()),
            ("password", self.password.to_string()),
            ("subject", self.subject.to_string()),
            ("memo", self.content.to_string()),
            ("mode", "write".to_string()),
            ("id", self.gall_id.to_string()),
            ("mobile_key", "mobile_nomember".to_string()),
            ("FL_DATA", self.fl_data.to_string()),
            ("OFL_DATA", self.ofl_data.to_string()),
            ("Block_key", self.auth_key.to_string()),
            ("filter", "1".to_string()),
        ])
    }
}

/// Comment submission. No handshake is required for comments.
pub(crate) struct CommentSubmitForm<'a> {
    pub gall_id: &'a str,
    pub article_number: &'a str,
    pub nick: &'a str,
    pub password: &'a str,
    pub content: &'a str,
}

impl CommentSubmitForm<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("id", self.gall_id.to_string()),
            ("no", self.article_number.to_string()),
            ("comment_nick", self.nick.to_string()),
            ("comment_pw", self.password.to_string()),
            ("comment_memo", self.content.to_string()),
            ("mode", "comment_nonmember".to_string()),
        ]
    }
}

/// Article deletion form, bearing the single-use handshake token.
pub(crate) struct ArticleDeleteForm<'a> {
    pub gall_id: &'a str,
    pub password: &'a str,
    pub number: &'a str,
    pub auth_key: &'a str,
}

impl ArticleDeleteForm<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("id", self.gall_id.to_string()),
            ("write_pw", self.password.to_string()),
            ("no", self.number.to_string()),
            ("mode", "board_del2".to_string()),
            ("con_key", self.auth_key.to_string()),
        ]
    }
}

/// Comment deletion form.
pub(crate) struct CommentDeleteForm<'a> {
    pub gall_id: &'a str,
    pub article_number: &'a str,
    pub number: &'a str,
    pub password: &'a str,
    pub auth_key: &'a str,
}

impl CommentDeleteForm<'_> {
    pub(crate) fn pairs(&self) -> FieldPairs {
        vec![
            ("id", self.gall_id.to_string()),
            ("no", self.article_number.to_string()),
            ("iNo", self.number.to_string()),
            ("comment_pw", self.password.to_string()),
            ("user_no", "nonmember".to_string()),
            ("mode", "comment_del".to_string()),
            ("con_key", self.auth_key.to_string()),
        ]
    }
}

/// Image-upload body: indexed `upload[i]` file parts plus fixed metadata.
pub(crate) struct UploadForm<'a> {
    pub gall_id: &'a str,
    pub files: &'a [PathBuf],
}

impl UploadForm<'_> {
    /// Reads each file into its own part. A file that cannot be opened is
    /// skipped, not fatal; the batch is best effort.
    pub(crate) async fn multipart(&self) -> Form {
        let mut form = fields_to_multipart(vec![
            ("imgId", self.gall_id.to_string()),
            ("mode", "write".to_string()),
            ("img_num", "11".to_string()),
        ]);
        for (i, path) in self.files.iter().enumerate() {
            match tokio::fs::read(path).await {
                Ok(data) => {
                    let part = Part::bytes(data).file_name(display_name(path));
                    form = form.part(format!("upload[{i}]"), part);
                }
                Err(e) => {
                    warn!("skipping unreadable image {}: {e}", path.display());
                }
            }
        }
        form
    }
}

fn fields_to_multipart(fields: FieldPairs) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (k, v)| form.text(k, v))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

//! Article and comment deletion.
//!
//! Deletion is a nomember-only operation: member sessions are rejected with
//! `AuthRequired` before any network traffic. Each delete runs its own
//! handshake (delete-specific verification mode) and posts the deletion
//! form with the single-use key and cookies; any non-error HTTP response
//! counts as success, the endpoint sends no structured confirmation.
//!
//! Batch deletion fans out one task per target and returns the first error
//! it sees. Outstanding sibling tasks are cancelled by dropping the task
//! set; the aggregate call never waits for them to drain.

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

use crate::error::ClientError;
use crate::forms::{ArticleDeleteForm, CommentDeleteForm, DeleteVerifyForm};
use crate::gallery::{ArticleRef, CommentRef};
use crate::session::Session;

impl Session {
    /// Deletes one article written by this nomember session.
    pub async fn delete_article(&self, article: &ArticleRef) -> Result<(), ClientError> {
        if !self.is_guest() {
            return Err(ClientError::AuthRequired);
        }
        let handshake = self
            .authorize(
                DeleteVerifyForm::Article.pairs(),
                &self.endpoints().access_token,
            )
            .await?;
        let (_, password) = self.credentials();
        let form = ArticleDeleteForm {
            gall_id: &article.gall.id,
            password,
            number: &article.number,
            auth_key: &handshake.key,
        };
        self.post_form(
            &self.endpoints().option_write,
            &form.pairs(),
            Some(&handshake.cookies),
        )
        .await?;
        debug!("deleted article {}/{}", article.gall.id, article.number);
        Ok(())
    }

    /// Deletes one comment written by this nomember session.
    pub async fn delete_comment(&self, comment: &CommentRef) -> Result<(), ClientError> {
        if !self.is_guest() {
            return Err(ClientError::AuthRequired);
        }
        let handshake = self
            .authorize(
                DeleteVerifyForm::Comment.pairs(),
                &self.endpoints().access_token,
            )
            .await?;
        let (_, password) = self.credentials();
        let form = CommentDeleteForm {
            gall_id: &comment.gall.id,
            article_number: &comment.article_number,
            number: &comment.number,
            password,
            auth_key: &handshake.key,
        };
        self.post_form(
            &self.endpoints().option_write,
            &form.pairs(),
            Some(&handshake.cookies),
        )
        .await?;
        debug!(
            "deleted comment {} under {}/{}",
            comment.number, comment.gall.id, comment.article_number
        );
        Ok(())
    }

    /// Deletes a batch of articles concurrently, returning the first error.
    pub async fn delete_articles(&self, articles: &[ArticleRef]) -> Result<(), ClientError> {
        let mut tasks: FuturesUnordered<_> =
            articles.iter().map(|a| self.delete_article(a)).collect();
        while let Some(done) = tasks.next().await {
            done?;
        }
        Ok(())
    }

    /// Deletes a batch of comments concurrently, returning the first error.
    pub async fn delete_comments(&self, comments: &[CommentRef]) -> Result<(), ClientError> {
        let mut tasks: FuturesUnordered<_> =
            comments.iter().map(|c| self.delete_comment(c)).collect();
        while let Some(done) = tasks.next().await {
            done?;
        }
        Ok(())
    }
}

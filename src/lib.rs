//! # dcgall
//!
//! dcgall is an async client for DCInside's private mobile JSON/HTML
//! endpoints: gallery indexes, article listings, full articles with images
//! and comments, and nomember write/delete operations.
//!
//! Reads go through a [`Session`] (gallery lists, article lists, one
//! comment page, image references) or the article assembler
//! ([`Session::article`]), which fetches body and images concurrently and
//! pages through comments. Writes run the handshake → upload → submit
//! pipeline; deletes are nomember-only and support concurrent batches.
pub mod api;
mod error;
mod fetch;
mod forms;
pub mod gallery;
mod response;
mod session;
mod write;

pub use api::Endpoints;

pub use error::ClientError;

pub use session::{Session, SessionBuilder};

pub use write::ArticleDraft;

pub use gallery::{
    Article, ArticleKind, ArticleRef, AuthorInfo, Comment, CommentPage, CommentRef, GallRef,
    ImageRef, List, ListInfo, ListItem, MajorGallery, MemberLevel, MinorGallery,
};

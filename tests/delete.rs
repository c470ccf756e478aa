//! Delete-pipeline tests, including the deterministic multi-outcome batch
//! harness. Batch deletion is fail-fast and non-draining by contract: the
//! aggregate call returns the first error it sees and does not wait for
//! sibling deletions still in flight (they are dropped, not drained).

mod common;

use std::time::{Duration, Instant};

use common::{guest_session, init_logging};
use dcgall::{ArticleRef, ClientError, CommentRef, Session};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token(server: &MockServer, verify: &str, key: &str) {
    Mock::given(method("POST"))
        .and(path("/_access_token.php"))
        .and(body_string_contains(format!("token_verify={verify}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "ci_t=del-cookie; path=/")
                .set_body_json(json!({"msg": "ok", "data": key})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn member_sessions_are_rejected_before_any_request() {
    let server = MockServer::start().await;
    let session = Session::builder()
        .member("account", "pw")
        .endpoints(dcgall::Endpoints::on_host(&server.uri()))
        .build()
        .unwrap();

    let article = ArticleRef::new("programming", "11");
    assert!(matches!(
        session.delete_article(&article).await,
        Err(ClientError::AuthRequired)
    ));
    let comment = CommentRef::new("programming", "11", "5");
    assert!(matches!(
        session.delete_comment(&comment).await,
        Err(ClientError::AuthRequired)
    ));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn article_delete_posts_the_token_and_cookies() {
    init_logging();
    let server = MockServer::start().await;
    mount_token(&server, "nonuser_del", "con-key-7").await;

    Mock::given(method("POST"))
        .and(path("/_option_write.php"))
        .and(header("Cookie", "ci_t=del-cookie"))
        .and(body_string_contains("mode=board_del2"))
        .and(body_string_contains("con_key=con-key-7"))
        .and(body_string_contains("no=11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let article = ArticleRef::new("programming", "11");
    session.delete_article(&article).await.unwrap();
}

#[tokio::test]
async fn comment_delete_uses_its_own_mode_and_fields() {
    let server = MockServer::start().await;
    mount_token(&server, "nonuser_com_del", "con-key-9").await;

    Mock::given(method("POST"))
        .and(path("/_option_write.php"))
        .and(body_string_contains("mode=comment_del"))
        .and(body_string_contains("iNo=5"))
        .and(body_string_contains("user_no=nonmember"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let comment = CommentRef::new("programming", "11", "5");
    session.delete_comment(&comment).await.unwrap();
}

#[tokio::test]
async fn batch_delete_succeeds_when_every_item_succeeds() {
    let server = MockServer::start().await;
    mount_token(&server, "nonuser_del", "con-key").await;
    Mock::given(method("POST"))
        .and(path("/_option_write.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let articles: Vec<_> = ["11", "22", "33"]
        .iter()
        .map(|no| ArticleRef::new("programming", no))
        .collect();
    session.delete_articles(&articles).await.unwrap();
}

#[tokio::test]
async fn batch_returns_first_error_without_draining() {
    // N=5, item 33 fails immediately while every other deletion is held for
    // several seconds. The aggregate call must return the failure without
    // waiting on the slow siblings; the non-draining contract is the point
    // of this harness, so the elapsed-time bound is part of the assertion.
    let server = MockServer::start().await;
    mount_token(&server, "nonuser_del", "con-key").await;

    let slow = Duration::from_secs(5);
    for no in ["11", "22", "44", "55"] {
        Mock::given(method("POST"))
            .and(path("/_option_write.php"))
            .and(body_string_contains(format!("no={no}")))
            .respond_with(ResponseTemplate::new(200).set_delay(slow))
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/_option_write.php"))
        .and(body_string_contains("no=33"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let articles: Vec<_> = ["11", "22", "33", "44", "55"]
        .iter()
        .map(|no| ArticleRef::new("programming", no))
        .collect();

    let started = Instant::now();
    let result = session.delete_articles(&articles).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(ClientError::Transport(_))));
    assert!(
        elapsed < slow,
        "batch waited {elapsed:?} instead of failing fast"
    );
}

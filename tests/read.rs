//! Read-pipeline tests: listings, article assembly, comment pagination and
//! the body/image fan-out asymmetry, all against a mock endpoint table.

mod common;

use common::{guest_session, init_logging};
use dcgall::ClientError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn view_body(subject: &str, total_comment: &str) -> serde_json::Value {
    json!([{
        "view_info": {
            "subject": subject,
            "no": "123456",
            "name": "writer",
            "member_icon": "0",
            "total_comment": total_comment,
            "ip": "1.2",
            "img_chk": "Y",
            "recommend_chk": "N",
            "hit": "777",
            "user_id": "",
            "date_time": "2016.08.23 21:11"
        },
        "view_main": {
            "memo": "<p>hello</p>",
            "recommend": "3",
            "recommend_member": "2",
            "nonrecommend": "1"
        }
    }])
}

fn comment_page_body(now: u32, total: u32, numbers: &[u32]) -> serde_json::Value {
    let comments: Vec<_> = numbers
        .iter()
        .map(|n| {
            json!({
                "member_icon": "1",
                "ipData": "",
                "name": "replier",
                "user_id": "someone",
                "comment_memo": format!("reply {n}"),
                "comment_no": n.to_string(),
                "date_time": "2016.08.23 22:00"
            })
        })
        .collect();
    json!([{
        "total_comment": numbers.len().to_string(),
        "total_page": total.to_string(),
        "re_page": now.to_string(),
        "comment_list": comments
    }])
}

async fn mount_view(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/json0/app/view_new.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_images(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/json0/app/view_img.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn article_assembly_joins_body_images_and_all_comment_pages() {
    init_logging();
    let server = MockServer::start().await;
    mount_view(&server, view_body("a subject", "3")).await;
    mount_images(&server, json!([{"img": "http://img.host/a.jpg"}])).await;

    // Two comment pages; the loop must stop exactly when now == total.
    Mock::given(method("GET"))
        .and(path("/json0/app/comment_new.php"))
        .and(query_param("re_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page_body(1, 2, &[1, 2])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json0/app/comment_new.php"))
        .and(query_param("re_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page_body(2, 2, &[3])))
        .expect(1)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    let article = session.article(&url).await.unwrap();

    assert_eq!(article.subject, "a subject");
    assert_eq!(article.gall.id, "programming");
    assert_eq!(article.number, "123456");
    // Up-votes aggregate the plain and member counters.
    assert_eq!(article.thumbs_up, 5);
    assert_eq!(article.thumbs_down, 1);
    assert_eq!(article.images.len(), 1);
    assert_eq!(article.images[0].as_str(), "http://img.host/a.jpg");
    assert_eq!(article.comments.len(), 3);
    assert_eq!(article.comments[2].content, "reply 3");
    assert_eq!(article.comments[0].article_number, "123456");
}

#[tokio::test]
async fn image_fetch_failure_degrades_to_zero_images() {
    let server = MockServer::start().await;
    mount_view(&server, view_body("still here", "0")).await;
    Mock::given(method("GET"))
        .and(path("/json0/app/view_img.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    let article = session.article(&url).await.unwrap();

    assert!(article.images.is_empty());
    assert_eq!(article.subject, "still here");
}

#[tokio::test]
async fn comment_total_of_zero_pages_terminates_after_the_first_fetch() {
    let server = MockServer::start().await;
    mount_view(&server, view_body("short thread", "2")).await;
    mount_images(&server, json!([])).await;
    // Server reports total_page 0; the loop must stop after one page since
    // the current page already reached the total.
    Mock::given(method("GET"))
        .and(path("/json0/app/comment_new.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page_body(1, 0, &[1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    let article = session.article(&url).await.unwrap();
    assert_eq!(article.comments.len(), 2);
}

#[tokio::test]
async fn zero_declared_comments_skips_the_comment_endpoint() {
    let server = MockServer::start().await;
    mount_view(&server, view_body("quiet", "0")).await;
    mount_images(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/json0/app/comment_new.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page_body(1, 1, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    let article = session.article(&url).await.unwrap();
    assert!(article.comments.is_empty());
}

#[tokio::test]
async fn empty_subject_is_an_error_not_a_zero_value_success() {
    let server = MockServer::start().await;
    mount_view(&server, view_body("", "0")).await;
    mount_images(&server, json!([])).await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    assert!(matches!(
        session.article(&url).await,
        Err(ClientError::EmptyArticle)
    ));
}

#[tokio::test]
async fn malformed_article_url_fails_before_any_request() {
    let server = MockServer::start().await;
    let session = guest_session(&server);

    let err = session.article("not a url at all").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArticleUrl(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn article_list_maps_fields_and_tolerates_unparsable_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json0/app/gall_list_new.php"))
        .and(query_param("id", "programming"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "gall_info": [{"category_name": "Programming", "file_cnt": "10", "file_size": "1024"}],
            "gall_list": [{
                "subject": "first post",
                "name": "author",
                "level": "2",
                "img_icon": "Y",
                "best_chk": "Y",
                "recommend": "12",
                "hit": "N/A",
                "user_id": "neo",
                "ip": "",
                "total_comment": "4",
                "total_voice": "0",
                "no": "42",
                "date_time": "2016.08.23 21:11"
            }]
        }])))
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let list = session.article_list("programming", 1).await.unwrap();

    assert_eq!(list.info.category_name, "Programming");
    assert_eq!(list.items.len(), 1);
    let item = &list.items[0];
    assert_eq!(item.subject, "first post");
    assert_eq!(item.kind, dcgall::ArticleKind::BestPicture);
    assert_eq!(item.thumbs_up, 12);
    // Unparsable counter reads as zero, never as an error.
    assert_eq!(item.hit, 0);
    assert_eq!(item.author.level, dcgall::MemberLevel::FixedMember);
    assert_eq!(item.author.gallog_url, "http://gallog.dcinside.com/neo");
    assert_eq!(item.number, "42");
    assert!(item.url.ends_with("/view.php?id=programming&no=42"));
}

#[tokio::test]
async fn best_list_sends_the_recommend_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json0/app/gall_list_new.php"))
        .and(query_param("recommend", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "gall_info": [{"category_name": "", "file_cnt": "", "file_size": ""}],
            "gall_list": []
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let list = session.best_article_list("programming", 1).await.unwrap();
    assert!(list.items.is_empty());
}

#[tokio::test]
async fn logically_rejected_response_surfaces_remote_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json0/app/gall_list_new.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"result": false, "cause": "blocked"}])),
        )
        .mount(&server)
        .await;

    let session = guest_session(&server);
    match session.article_list("programming", 1).await {
        Err(ClientError::RemoteRejected { cause }) => assert_eq!(cause, "blocked"),
        other => panic!("expected RemoteRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn gallery_indexes_invert_the_no_write_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json0/gallery_name.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "open", "ko_name": "Open", "no": "1", "no_write": false},
            {"name": "closed", "ko_name": "Closed", "no": "2", "no_write": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json1/mgallery_name.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "mini", "ko_name": "Mini", "no": "9", "no_write": false,
             "manager": "boss", "submanager": "a,b"}
        ])))
        .mount(&server)
        .await;

    let session = guest_session(&server);
    let majors = session.major_galleries().await.unwrap();
    assert!(majors[0].can_write);
    assert!(!majors[1].can_write);

    let minors = session.minor_galleries().await.unwrap();
    assert_eq!(minors[0].manager, "boss");
    assert_eq!(minors[0].sub_managers, vec!["a", "b"]);
}

#[tokio::test]
async fn image_ref_fetch_infers_filename_from_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/viewimage.php"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xff, 0xd8, 0xff], "image/JPEG"))
        .mount(&server)
        .await;
    mount_view(&server, view_body("with image", "0")).await;
    mount_images(
        &server,
        json!([{"img": format!("{}/viewimage.php", server.uri())}]),
    )
    .await;

    let session = guest_session(&server);
    let url = format!("{}/view.php?id=programming&no=123456", server.uri());
    let article = session.article(&url).await.unwrap();

    let (data, filename) = article.images[0].fetch(&session).await.unwrap();
    assert_eq!(filename, "jpeg");
    assert_eq!(data.as_ref(), &[0xff, 0xd8, 0xff]);
}

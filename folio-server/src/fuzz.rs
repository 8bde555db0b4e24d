#![cfg(test)]

use axum::{
    body::{Body, Bytes},
    http::{self, request, StatusCode},
    routing::get,
    Router,
};
use bolero::generator::TypeGenerator;
use folio_api::{Comment, CommentId, DeleteComment, Error as ApiError, NewComment};
use folio_client::{CommentStore, HttpStore};
use folio_mock_server::MockServer;
use std::{cmp, fmt::Debug, net::SocketAddr, ops::RangeTo, panic::AssertUnwindSafe};
use tower::{Service, ServiceExt};

use crate::*;

macro_rules! do_sqlx_test {
    ( $name:ident, $gen:expr, $fn:expr ) => {
        #[test]
        fn $name() {
            if std::env::var("RUST_LOG").is_ok() {
                let _ = tracing_subscriber::fmt::try_init();
            }
            let runtime = AssertUnwindSafe(
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed initializing tokio runtime"),
            );
            bolero::check!()
                .with_generator($gen)
                .cloned()
                .for_each(move |v| {
                    runtime.block_on(async move {
                        let pool = test_pool().await;
                        let () = $fn(pool, v).await;
                    })
                })
        }
    };
}

macro_rules! do_app_test {
    ( $name:ident, $fn:expr ) => {
        #[test]
        fn $name() {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed initializing tokio runtime");
            runtime.block_on(async move {
                let app = app(test_pool().await);
                let () = $fn(app).await;
            })
        }
    };
}

macro_rules! do_http_test {
    ( $name:ident, $fn:expr ) => {
        #[test]
        fn $name() {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed initializing tokio runtime");
            runtime.block_on(async move {
                let host = serve(app(test_pool().await));
                let () = $fn(host).await;
            })
        }
    };
}

/// Fresh database living as long as the pool
async fn test_pool() -> sqlx::SqlitePool {
    // every new connection to `sqlite::memory:` opens a distinct database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("creating sqlx pool");
    MIGRATOR
        .run(&pool)
        .await
        .expect("failed applying migrations");
    pool
}

/// Serve `app` on an ephemeral local port, returning its base url
fn serve(app: Router) -> String {
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let host = format!("http://{}", server.local_addr());
    tokio::spawn(server);
    host
}

/// Serve a listing endpoint that always answers `status` and `body`
fn serve_listing(status: StatusCode, body: &'static str) -> String {
    serve(Router::new().route(
        folio_api::LIST_COMMENTS,
        get(move || async move { (status, body) }),
    ))
}

async fn send(app: &mut Router, req: request::Request<Body>) -> (StatusCode, Bytes) {
    app.ready().await.expect("waiting for app to be ready");
    let resp = app.call(req).await.expect("running request");
    let status = resp.status();
    let body = hyper::body::to_bytes(resp.into_body())
        .await
        .expect("recovering resp bytes");
    (status, body)
}

fn parse_error(status: StatusCode, body: &[u8]) -> ApiError {
    ApiError::parse(body).unwrap_or_else(|err| {
        panic!("parsing error response body {err}, status is {status}, body is {body:?}")
    })
}

async fn list_raw(app: &mut Router, num_comments: &str) -> Result<Vec<Comment>, ApiError> {
    let query = serde_urlencoded::to_string([(folio_api::NUM_COMMENTS_PARAM, num_comments)])
        .expect("encoding query string");
    let req = request::Builder::new()
        .method("GET")
        .uri(format!("{}?{query}", folio_api::LIST_COMMENTS))
        .body(Body::empty())
        .expect("building request");
    let (status, body) = send(app, req).await;
    if status != StatusCode::OK {
        return Err(parse_error(status, &body));
    }
    Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
        panic!("failed parsing listing {err}, body is {body:?}")
    }))
}

async fn list(app: &mut Router, limit: usize) -> Result<Vec<Comment>, ApiError> {
    list_raw(app, &limit.to_string()).await
}

async fn post_form<Req>(app: &mut Router, uri: &str, body: &Req) -> Result<StatusCode, ApiError>
where
    Req: ?Sized + Debug + serde::Serialize,
{
    let req = request::Builder::new()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(
            serde_urlencoded::to_string(body).expect("serializing request body to a form"),
        ))
        .expect("building request");
    let (status, resp_body) = send(app, req).await;
    if status.is_success() || status.is_redirection() {
        return Ok(status);
    }
    Err(parse_error(status, &resp_body))
}

/// Body of a form without any field
const EMPTY_FORM: &[(&str, &str)] = &[];

fn new_comment(message: &str) -> NewComment {
    NewComment {
        name: String::from("Ada"),
        email: String::from("ada@example.org"),
        subject: String::from("Hello"),
        message: String::from(message),
    }
}

do_app_test!(listing_is_newest_first_and_limited, |mut app: Router| async move {
    for msg in ["first", "second", "third"] {
        assert_eq!(
            post_form(&mut app, folio_api::CONTACT_ME, &new_comment(msg)).await,
            Ok(StatusCode::SEE_OTHER)
        );
    }
    let all = list(&mut app, 10).await.unwrap();
    let messages = all.iter().map(|c| &c.message as &str).collect::<Vec<_>>();
    assert_eq!(messages, vec!["third", "second", "first"]);
    assert_eq!(list(&mut app, 2).await.unwrap(), all[..2].to_vec());
    assert_eq!(list(&mut app, 0).await.unwrap(), Vec::new());
});

do_app_test!(bad_limit_means_zero, |mut app: Router| async move {
    post_form(&mut app, folio_api::CONTACT_ME, &new_comment("hi"))
        .await
        .unwrap();
    assert_eq!(list_raw(&mut app, "lots").await, Ok(Vec::new()));
    assert_eq!(list_raw(&mut app, "-1").await, Ok(Vec::new()));

    // missing parameter entirely
    let req = request::Builder::new()
        .method("GET")
        .uri(folio_api::LIST_COMMENTS)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&mut app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");
});

do_app_test!(incomplete_contact_form_is_ignored, |mut app: Router| async move {
    let mut c = new_comment("hi");
    c.email.clear();
    assert_eq!(
        post_form(&mut app, folio_api::CONTACT_ME, &c).await,
        Ok(StatusCode::SEE_OTHER)
    );
    assert_eq!(list(&mut app, 10).await, Ok(Vec::new()));
});

do_app_test!(delete_one_and_all, |mut app: Router| async move {
    for msg in ["a", "b", "c"] {
        post_form(&mut app, folio_api::CONTACT_ME, &new_comment(msg))
            .await
            .unwrap();
    }
    let before = list(&mut app, 10).await.unwrap();
    let target = before[1].clone();
    post_form(
        &mut app,
        folio_api::DELETE_COMMENT,
        &DeleteComment {
            id: target.id.clone(),
        },
    )
    .await
    .unwrap();
    let after = list(&mut app, 10).await.unwrap();
    assert_eq!(after, vec![before[0].clone(), before[2].clone()]);

    // deleting again is not an error
    post_form(&mut app, folio_api::DELETE_COMMENT, &DeleteComment { id: target.id })
        .await
        .unwrap();

    for _ in 0..2 {
        post_form(&mut app, folio_api::DELETE_ALL_COMMENTS, EMPTY_FORM)
            .await
            .unwrap();
        assert_eq!(list(&mut app, 10).await, Ok(Vec::new()));
    }
});

do_app_test!(delete_rejects_non_numeric_ids, |mut app: Router| async move {
    assert_eq!(
        post_form(
            &mut app,
            folio_api::DELETE_COMMENT,
            &DeleteComment {
                id: CommentId(String::from("abc")),
            },
        )
        .await,
        Err(ApiError::InvalidId(String::from("abc")))
    );
});

do_http_test!(store_contact_me_with_default_client, |host: String| async move {
    // this client follows the redirect, to a page that is not served here
    let store = HttpStore::new(&host);
    assert_eq!(store.contact_me(&new_comment("hello")).await, Ok(()));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let no_redirect = HttpStore::with_client(&host, client);
    assert_eq!(no_redirect.contact_me(&new_comment("again")).await, Ok(()));

    let mut incomplete = new_comment("ignored");
    incomplete.name.clear();
    assert_eq!(store.contact_me(&incomplete).await, Ok(()));

    let listed = store.list_comments(10).await.unwrap();
    let messages = listed.iter().map(|c| &c.message as &str).collect::<Vec<_>>();
    assert_eq!(messages, vec!["again", "hello"]);
});

do_http_test!(store_deletes_through_forms, |host: String| async move {
    let store = HttpStore::new(host);
    for msg in ["a", "b", "c"] {
        store.contact_me(&new_comment(msg)).await.unwrap();
    }
    let before = store.list_comments(10).await.unwrap();
    assert_eq!(before.len(), 3);
    store.delete_comment(&before[1].id).await.unwrap();
    assert_eq!(
        store.list_comments(10).await,
        Ok(vec![before[0].clone(), before[2].clone()])
    );
    assert_eq!(store.list_comments(0).await, Ok(Vec::new()));

    store.delete_all_comments().await.unwrap();
    assert_eq!(store.list_comments(10).await, Ok(Vec::new()));
});

do_http_test!(store_reports_api_errors, |host: String| async move {
    let store = HttpStore::new(host);
    assert_eq!(
        store
            .delete_comment(&CommentId(String::from("abc")))
            .await,
        Err(folio_client::Error::Api(ApiError::InvalidId(String::from(
            "abc"
        ))))
    );
});

#[tokio::test]
async fn store_accepts_integer_ids() {
    let host = serve_listing(
        StatusCode::OK,
        r#"[{"id":1,"message":"hi"},{"id":"x2","message":"bye"}]"#,
    );
    assert_eq!(
        HttpStore::new(host).list_comments(2).await,
        Ok(vec![Comment::new("1", "hi"), Comment::new("x2", "bye")])
    );
}

#[tokio::test]
async fn store_rejects_malformed_listings() {
    for (status, body) in [
        (StatusCode::OK, "not json"),
        (StatusCode::OK, r#"[{"message":"no id"}]"#),
        (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
        (StatusCode::UNPROCESSABLE_ENTITY, "Failed to deserialize form"),
    ] {
        let res = HttpStore::new(serve_listing(status, body))
            .list_comments(5)
            .await;
        assert!(
            matches!(res, Err(folio_client::Error::Payload(_))),
            "got {res:?} for {status} {body:?}"
        );
    }
}

#[tokio::test]
async fn store_reports_unreachable_server() {
    // bind then drop a listener, so nothing answers on its port
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let res = HttpStore::new(format!("http://{addr}"))
        .list_comments(5)
        .await;
    assert!(matches!(res, Err(folio_client::Error::Network(_))), "got {res:?}");
}

#[derive(Clone, Debug, TypeGenerator)]
enum FuzzOp {
    ListComments {
        limit: u8,
    },
    ListRaw {
        num_comments: String,
    },
    ContactMe {
        name: String,
        email: String,
        subject: String,
        message: String,
    },
    DeleteComment {
        idx: usize,
    },
    DeleteRaw {
        id: String,
    },
    DeleteAll,
}

fn compare<T>(name: &str, app_res: T, mock_res: T)
where
    T: Debug + PartialEq,
{
    assert_eq!(
        app_res, mock_res,
        "app and mock did not return the same result for {name}"
    );
}

fn resize_int(fuzz_id: usize, RangeTo { end }: RangeTo<usize>) -> Option<usize> {
    if end == 0 {
        return None;
    }
    let bucket_size = cmp::max(1, usize::MAX / end); // in case we rounded to 0
    let id = fuzz_id / bucket_size;
    Some(cmp::min(id, end - 1)) // in case id was actually over end - 1 due to rounding
}

fn strip_nul(s: String) -> String {
    s.replace('\0', "")
}

struct ComparativeFuzzer {
    app: Router,
    mock: MockServer,
}

impl ComparativeFuzzer {
    fn new(pool: sqlx::SqlitePool) -> ComparativeFuzzer {
        ComparativeFuzzer {
            app: app(pool),
            mock: MockServer::new(),
        }
    }

    async fn execute_fuzz_op(&mut self, op: FuzzOp) {
        match op {
            FuzzOp::ListComments { limit } => compare(
                "ListComments",
                list(&mut self.app, limit as usize).await,
                Ok(self.mock.list_comments(limit as usize)),
            ),
            FuzzOp::ListRaw { num_comments } => {
                let limit = folio_api::parse_limit(&num_comments).unwrap_or(0);
                compare(
                    "ListRaw",
                    list_raw(&mut self.app, &num_comments).await,
                    Ok(self.mock.list_comments(limit)),
                )
            }
            FuzzOp::ContactMe {
                name,
                email,
                subject,
                message,
            } => {
                let c = NewComment {
                    name: strip_nul(name),
                    email: strip_nul(email),
                    subject: strip_nul(subject),
                    message: strip_nul(message),
                };
                let app_res = post_form(&mut self.app, folio_api::CONTACT_ME, &c).await;
                // the form always redirects, stored or not
                compare("ContactMe", app_res, Ok(StatusCode::SEE_OTHER));
                let _ = self.mock.contact_me(c);
            }
            FuzzOp::DeleteComment { idx } => {
                let id = match resize_int(idx, ..self.mock.test_num_comments()) {
                    Some(i) => self
                        .mock
                        .test_get_comment_id(i)
                        .expect("resized index is in range"),
                    None => CommentId::from(idx as i64),
                };
                compare(
                    "DeleteComment",
                    post_form(
                        &mut self.app,
                        folio_api::DELETE_COMMENT,
                        &DeleteComment { id: id.clone() },
                    )
                    .await
                    .map(|_| ()),
                    self.mock.delete_comment(&id),
                )
            }
            FuzzOp::DeleteRaw { id } => {
                let id = CommentId(id);
                compare(
                    "DeleteRaw",
                    post_form(
                        &mut self.app,
                        folio_api::DELETE_COMMENT,
                        &DeleteComment { id: id.clone() },
                    )
                    .await
                    .map(|_| ()),
                    self.mock.delete_comment(&id),
                )
            }
            FuzzOp::DeleteAll => {
                compare(
                    "DeleteAll",
                    post_form(&mut self.app, folio_api::DELETE_ALL_COMMENTS, EMPTY_FORM)
                        .await
                        .map(|_| ()),
                    Ok(()),
                );
                self.mock.delete_all_comments();
            }
        }
    }

    async fn check_final_state(&mut self) {
        compare(
            "final listing",
            list(&mut self.app, usize::MAX).await,
            Ok(self.mock.list_comments(usize::MAX)),
        );
    }
}

do_sqlx_test!(
    compare_with_mock,
    bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..100usize),
    |pool, test: Vec<FuzzOp>| async move {
        let mut fuzzer = ComparativeFuzzer::new(pool);
        for op in test {
            fuzzer.execute_fuzz_op(op).await;
        }
        fuzzer.check_final_state().await;
    }
);

use futures::future::join_all;
use hyper::StatusCode;
use routerify_express::{App, Context, Middleware, Router, WildcardMode};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod support;
use support::serve;

fn text(body: &'static str) -> impl Fn(Context) -> std::future::Ready<Result<Context, io::Error>> + Send + Sync {
    move |mut ctx: Context| {
        ctx.text(body);
        std::future::ready(Ok(ctx))
    }
}

#[tokio::test]
async fn can_route_to_the_first_registered_match() {
    let router = Router::builder("/api")
        .get("/users/:id", text("by id"))
        .get("/users/me", text("me"))
        .build()
        .unwrap();
    let serve = serve(App::new(vec![router])).await;

    let (status, body) = serve.get("/api/users/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "by id\n");

    serve.shutdown();
}

#[tokio::test]
async fn can_pick_the_first_matching_prefix_without_fallback() {
    let wide = Router::builder("/api").get("/:name", text("wide")).build().unwrap();
    let narrow = Router::builder("/api/http").get("/32", text("narrow")).build().unwrap();
    let serve = serve(App::new(vec![wide, narrow])).await;

    assert_eq!(serve.get("/api/x").await.1, "wide\n");
    // "/api" claims the request, has no two-segment route and the next router isn't tried.
    assert_eq!(serve.get("/api/http/32").await.0, StatusCode::NOT_FOUND);

    serve.shutdown();
}

#[tokio::test]
async fn can_stop_the_chain_once_finished() {
    let ran_second = Arc::new(AtomicUsize::new(0));
    let counter = ran_second.clone();

    let router: Router<io::Error> = Router::builder("/api/http")
        .get("/32", |mut ctx: Context| async move {
            ctx.set_value("wow", "nice").unwrap();
            let key = ctx.value_bytes("wow").unwrap();
            ctx.bytes(key);
            Ok(ctx)
        })
        .then(move |mut ctx: Context| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ctx.json(&serde_json::json!({ "lol": 32 })).unwrap();
                Ok(ctx)
            }
        })
        .build()
        .unwrap();
    let serve = serve(App::new(vec![router])).await;

    let (status, body) = serve.get("/api/http/32").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""nice""#);
    assert_eq!(ran_second.load(Ordering::SeqCst), 0);

    serve.shutdown();
}

#[tokio::test]
async fn can_share_request_values_along_the_chain() {
    let router: Router<io::Error> = Router::builder("/api")
        .middleware(Middleware::new(|mut ctx: Context| async move {
            ctx.set_value("user", "u-1").unwrap();
            Ok(ctx)
        }))
        .get("/me", |mut ctx: Context| async move {
            let user = ctx.value_string("user").unwrap_or_default();
            ctx.text(user);
            Ok(ctx)
        })
        .build()
        .unwrap();
    let serve = serve(App::new(vec![router])).await;

    assert_eq!(serve.get("/api/me").await.1, "\"u-1\"\n");

    serve.shutdown();
}

#[tokio::test]
async fn can_abort_on_middleware_errors() {
    let reached = Arc::new(AtomicUsize::new(0));
    let counter = reached.clone();

    let router: Router<io::Error> = Router::builder("/api")
        .middleware(Middleware::new(|_: Context| async move {
            Err(io::Error::new(io::ErrorKind::Other, "nope"))
        }))
        .get("/x", move |ctx: Context| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(ctx) }
        })
        .build()
        .unwrap();
    let serve = serve(App::new(vec![router])).await;

    assert_eq!(serve.get("/api/x").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reached.load(Ordering::SeqCst), 0);

    // The server keeps serving after a failed request.
    assert_eq!(serve.get("/api/x").await.0, StatusCode::INTERNAL_SERVER_ERROR);

    serve.shutdown();
}

#[tokio::test]
async fn can_reject_unsupported_methods() {
    let router = Router::builder("/api").get("/x", text("x")).build().unwrap();
    let serve = serve(App::new(vec![router])).await;

    let (status, _) = serve.send_body("PATCH", "/api/x", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    serve.shutdown();
}

#[tokio::test]
async fn can_answer_unmatched_requests_with_not_found() {
    let router = Router::builder("/api").get("/x", text("x")).build().unwrap();
    let serve = serve(App::new(vec![router])).await;

    let (status, body) = serve.get("/elsewhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"status":false,"message":"Not Found"}"#);

    assert_eq!(serve.get("/api/y").await.0, StatusCode::NOT_FOUND);
    assert_eq!(serve.get("/api/x/extra").await.0, StatusCode::NOT_FOUND);

    serve.shutdown();
}

#[tokio::test]
async fn can_tolerate_extra_segments_after_a_trailing_slash() {
    let router = Router::builder("/static").get("/files/", text("files")).build().unwrap();
    let serve = serve(App::new(vec![router])).await;

    assert_eq!(serve.get("/static/files/a/b").await.1, "files\n");

    serve.shutdown();
}

#[tokio::test]
async fn can_match_wildcards_in_both_modes() {
    let short = Router::builder("/short").get("/*", text("short")).build().unwrap();
    let rest: Router<io::Error> = Router::builder("/rest")
        .wildcard_mode(WildcardMode::Rest)
        .get("/*", |mut ctx: Context| async move {
            let rest = ctx.param("*").unwrap_or_default().to_owned();
            ctx.text(rest);
            Ok(ctx)
        })
        .build()
        .unwrap();
    let serve = serve(App::new(vec![short, rest])).await;

    assert_eq!(serve.get("/short/a").await.1, "short\n");
    // Segment counts are compared before the wildcard short circuits.
    assert_eq!(serve.get("/short/a/b").await.0, StatusCode::NOT_FOUND);
    assert_eq!(serve.get("/rest/a/b/c").await.1, "a/b/c\n");

    serve.shutdown();
}

#[tokio::test]
async fn can_isolate_params_between_concurrent_requests() {
    let router: Router<io::Error> = Router::builder("/api/go")
        .get("/lol/:id", |mut ctx: Context| async move {
            tokio::task::yield_now().await;
            let id = ctx.param("id").unwrap_or_default().to_owned();
            ctx.write(format!("____yes____{}{}", id, id));
            Ok(ctx)
        })
        .build()
        .unwrap();
    let serve = Arc::new(serve(App::new(vec![router])).await);

    let calls = (0..32).map(|n| {
        let serve = serve.clone();
        async move { (n, serve.get(&format!("/api/go/lol/{}", n)).await) }
    });

    for (n, (status, body)) in join_all(calls).await {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("____yes____{}{}", n, n));
    }
}

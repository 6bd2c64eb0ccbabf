//! Bound routes and dispatch through a frozen table.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use routeguard_route::prelude::*;
use routeguard_route::{Endpoint, RouteInfo};
use serde_json::json;

fn ping(ctx: &RequestContext) -> Reply {
    let fruit = ctx.args().get_json("fruit").cloned().unwrap_or_default();
    Reply::ok(json!({ "message": fruit }))
}

fn ping_spec() -> RouteSpec {
    RouteSpec::new("/ping", "ping test")
        .query(
            ParamSchema::string("fruit")
                .with_description("what fruit like?")
                .with_constraint(Constraint::one_of(["apple", "kiwi"])),
        )
        .response(ResponseSpec::new(200, "Success", json!({"message": "success"})))
}

#[test]
fn handler_sees_validated_args() {
    let route = ping_spec().bind(ping).unwrap();
    let reply = route
        .call(RawRequest::new().with_query("fruit", "kiwi"))
        .unwrap();
    assert_eq!(reply, Reply::ok(json!({"message": "kiwi"})));
}

#[test]
fn rejection_carries_reasons() {
    let route = ping_spec().bind(ping).unwrap().layer(TraceLayer);
    let rejection = route
        .call(RawRequest::new().with_query("fruit", "durian"))
        .unwrap_err();
    assert_eq!(rejection.status(), 400);
    assert_eq!(
        rejection.body(),
        json!({"parameters": {"fruit": "not one of the allowed values"}})
    );
}

#[test]
fn handler_is_not_called_on_rejection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let route = ping_spec()
        .bind(move |ctx: &RequestContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            ping(ctx)
        })
        .unwrap();

    assert!(route.call(RawRequest::new()).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(route.call(RawRequest::new().with_query("fruit", "apple")).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn path_args_and_path_reach_the_handler() {
    let route = RouteSpec::new("/users/{id}/posts/{slug}", "")
        .path_param(ParamSchema::integer("id"))
        .bind(|ctx: &RequestContext| {
            Reply::ok(json!({
                "path": ctx.path(),
                "raw": ctx.path_args(),
                "args": ctx.args().to_json(),
            }))
        })
        .unwrap();

    let mut registry = RouteRegistry::new();
    registry.register(route).unwrap();
    let table = registry.freeze();

    let reply = table
        .dispatch(Method::Get, "/users/42/posts/hello", RawRequest::new())
        .unwrap();
    assert_eq!(
        reply.body,
        json!({
            "path": "/users/{id}/posts/{slug}",
            "raw": {"id": "42", "slug": "hello"},
            "args": {"id": 42}
        })
    );
}

#[test]
fn json_body_is_validated_field_by_field() {
    let mut registry = RouteRegistry::new();
    registry
        .route(
            RouteSpec::new("/signup", "")
                .with_method(Method::Post)
                .body(ParamSchema::string("email"))
                .body(ParamSchema::integer("age").optional()),
            |ctx: &RequestContext| Reply::new(201, ctx.args().to_json()),
        )
        .unwrap();
    let table = registry.freeze();

    let err = table
        .dispatch(
            Method::Post,
            "/signup",
            RawRequest::new().with_json_body(json!({"age": "old"})),
        )
        .unwrap_err();
    match err {
        RouteError::Rejected(rejection) => assert_eq!(
            rejection.body(),
            json!({"parameters": {
                "email": "missing required parameter",
                "age": "coercion error: expected integer"
            }})
        ),
        other => panic!("expected rejection, got {other:?}"),
    }

    let reply = table
        .dispatch(
            Method::Post,
            "/signup",
            RawRequest::new().with_json_body(json!({"email": "a@b.com"})),
        )
        .unwrap();
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body, json!({"email": "a@b.com"}));
}

struct RequireHeader(&'static str);

struct Guarded {
    header: &'static str,
    inner: Arc<dyn Endpoint>,
}

impl Endpoint for Guarded {
    fn call(&self, request: RawRequest) -> Result<Reply, Rejection> {
        if request.get(ParamLocation::Header, self.header).is_none() {
            return Ok(Reply::new(401, json!({"message": "unauthorized"})));
        }
        self.inner.call(request)
    }
}

impl Layer for RequireHeader {
    fn name(&self) -> &'static str {
        "require_header"
    }

    fn wrap(&self, _route: RouteInfo<'_>, inner: Arc<dyn Endpoint>) -> Arc<dyn Endpoint> {
        Arc::new(Guarded {
            header: self.0,
            inner,
        })
    }
}

#[test]
fn outer_layers_run_before_validation() {
    let route = ping_spec()
        .bind(ping)
        .unwrap()
        .layer(TraceLayer)
        .layer(RequireHeader("Authorization"));
    assert_eq!(route.layers(), &["validate", "trace", "require_header"]);

    let reply = route.call(RawRequest::new()).unwrap();
    assert_eq!(reply.status, 401);

    let reply = route
        .call(
            RawRequest::new()
                .with_header("authorization", "Bearer t")
                .with_query("fruit", "apple"),
        )
        .unwrap();
    assert_eq!(reply.body, json!({"message": "apple"}));
}

#[test]
fn table_serves_from_many_threads() {
    let mut registry = RouteRegistry::new();
    registry.route(ping_spec(), ping).unwrap();
    let table = Arc::new(registry.freeze());

    let handles: Vec<_> = ["apple", "kiwi"]
        .into_iter()
        .map(|fruit| {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                table
                    .dispatch(Method::Get, "/ping", RawRequest::new().with_query("fruit", fruit))
                    .map(|reply| reply.body)
            })
        })
        .collect();

    let bodies: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(
        bodies,
        vec![json!({"message": "apple"}), json!({"message": "kiwi"})]
    );
}

//! A single `/ping` route: declared, documented and served.
//!
//! Run with `ROUTEGUARD_LOG=debug cargo run -p routeguard-route --example ping`.

use routeguard_route::prelude::*;
use serde_json::json;

fn ping(ctx: &RequestContext) -> Reply {
    Reply::ok(json!({ "message": ctx.args().to_json() }))
}

fn main() -> anyhow::Result<()> {
    routeguard_log::auto_init()?;

    let mut registry = RouteRegistry::new();
    registry.register(
        RouteSpec::new("/ping", "ping test")
            .query(ParamSchema::string("fruit").with_description("what fruit like?"))
            .response(ResponseSpec::new(200, "Success", json!({"message": "success"})))
            .bind(ping)?
            .layer(TraceLayer),
    )?;
    let table = registry.freeze();

    let config = ApiConfig::from_env();
    println!("{}", serde_json::to_string_pretty(&table.document(&config))?);

    let reply = table.dispatch(
        Method::Get,
        "/ping",
        RawRequest::new().with_query("fruit", "apple"),
    )?;
    println!("{} {}", reply.status, reply.body);

    match table.dispatch(Method::Get, "/ping", RawRequest::new()) {
        Ok(reply) => println!("{} {}", reply.status, reply.body),
        Err(err) => println!("{} {}", err.status(), err),
    }

    Ok(())
}

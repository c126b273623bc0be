#![allow(clippy::unused_async)]

use crate::{routes::json::JsonBody, state::RollcallState};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use jiff::{Timestamp, Zoned};
use serde::Deserialize;
use serde_json::{Value, json};

const AVAILABLE_ENDPOINTS: [&str; 8] = [
    "GET /hello - Simple hello world",
    "GET /hello/{name} - Personalized greeting",
    "GET /info - Application information",
    "GET /time - Current server time",
    "GET /greet?name=&message= - Greeting from query parameters",
    "GET /students - Student CRUD operations",
    "GET /payment - Selected payment provider",
    "POST /echo - Echo request data",
];

pub async fn welcome(State(state): State<RollcallState>) -> Json<Value> {
    let app_info = state.config().app_info();

    Json(json!({
        "message": "Welcome to Rollcall!",
        "description": app_info.description,
        "author": app_info.author,
        "availableEndpoints": AVAILABLE_ENDPOINTS,
        "timestamp": Timestamp::now(),
    }))
}

pub async fn hello() -> Json<Value> {
    Json(json!({
        "message": "Hello, World!",
        "tip": "Try /hello/{yourName} for a personalized greeting",
    }))
}

pub async fn hello_name(Path(name): Path<String>) -> Json<Value> {
    Json(json!({
        "message": format!("Hello, {name}!"),
        "note": "The name comes from the URL path",
    }))
}

pub async fn app_info(State(state): State<RollcallState>) -> Json<Value> {
    let app_info = state.config().app_info();

    Json(json!({
        "applicationName": "Rollcall",
        "description": app_info.description,
        "author": app_info.author,
        "features": [
            "REST API Development",
            "Postgres persistence",
            "Environment configuration",
            "Configuration-selected payment provider",
        ],
    }))
}

pub async fn current_time() -> Json<Value> {
    let now = Zoned::now();

    Json(json!({
        "currentTime": now.datetime().to_string(),
        "timezone": now.time_zone().iana_name().unwrap_or("UTC"),
        "epoch": now.timestamp().as_millisecond(),
    }))
}

pub async fn echo(JsonBody(request_data): JsonBody<Value>) -> Json<Value> {
    Json(json!({
        "echo": request_data,
        "receivedAt": Timestamp::now(),
        "httpMethod": "POST",
    }))
}

#[derive(Deserialize)]
pub struct GreetQuery {
    name: Option<String>,
    message: Option<String>,
}

pub async fn greet(Query(GreetQuery { name, message }): Query<GreetQuery>) -> Json<Value> {
    let name = name.unwrap_or_else(|| "Guest".to_string());
    let message = message.unwrap_or_else(|| "Hello".to_string());

    Json(json!({
        "greeting": format!("{message}, {name}!"),
    }))
}

pub async fn payment(State(state): State<RollcallState>) -> Json<Value> {
    Json(json!({
        "provider": state.payment().pay(),
    }))
}

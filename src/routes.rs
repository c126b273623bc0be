use crate::{
    routes::{
        students::{
            create_new_student, delete_student, get_all_students, get_student_by_id,
            update_partial_student, update_student,
        },
        welcome::{app_info, current_time, echo, greet, hello, hello_name, payment, welcome},
    },
    state::RollcallState,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub mod json;
pub mod students;
pub mod welcome;

pub fn router(state: RollcallState) -> Router {
    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        .route("/", get(welcome))
        .route("/hello", get(hello))
        .route("/hello/{name}", get(hello_name))
        .route("/info", get(app_info))
        .route("/time", get(current_time))
        .route("/echo", post(echo))
        .route("/greet", get(greet))
        .route("/payment", get(payment))
        .route(
            "/students",
            get(get_all_students).post(create_new_student),
        )
        .route(
            "/students/{id}",
            get(get_student_by_id)
                .put(update_student)
                .patch(update_partial_student)
                .delete(delete_student),
        )
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
pub mod testing {
    use crate::{
        config::RuntimeConfiguration, data::memory_store::InMemoryStudentStore,
        state::RollcallState,
    };
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// The whole router over an empty in-memory store.
    pub struct TestApp {
        router: Router,
    }

    impl TestApp {
        pub fn new() -> Self {
            let state = RollcallState::with_store(
                Arc::new(InMemoryStudentStore::new()),
                RuntimeConfiguration::in_memory(),
            );
            Self {
                router: super::router(state),
            }
        }

        ///empty response bodies come back as `Value::Null`
        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let request = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => request
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap())),
                None => request.body(Body::empty()),
            }
            .unwrap();

            self.dispatch(request).await
        }

        async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();

            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                    Value::String(String::from_utf8_lossy(&bytes).into_owned())
                })
            };
            (status, body)
        }
    }

    pub async fn raw_body(
        app: &TestApp,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        app.dispatch(request).await
    }
}

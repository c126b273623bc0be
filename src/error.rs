use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::{collections::BTreeMap, net::AddrParseError, num::ParseIntError};
use validator::ValidationErrors;

pub type RollcallResult<T> = Result<T, RollcallError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollcallError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse server address {:?}", original))]
    ParseAddress {
        source: AddrParseError,
        original: String,
    },
    #[snafu(display("Unknown payment provider {:?}, expected `razorpay` or `stripe`", value))]
    UnknownPaymentProvider { value: String },
    #[snafu(display("Unknown student store {:?}, expected `postgres` or `memory`", value))]
    UnknownStoreBackend { value: String },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: i64 },
    #[snafu(display("Field: {} is not a valid field", field))]
    InvalidField { field: String },
    #[snafu(display("Request failed validation"))]
    Validation { source: ValidationErrors },
    #[snafu(display("Error decoding JSON body: {}", source.body_text()))]
    JsonBody { source: JsonRejection },
    #[snafu(display("Invalid path parameter: {}", source.body_text()))]
    PathParam { source: PathRejection },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for RollcallError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MigrateError { .. } | Self::MakeQuery { .. } => ISE,
            Self::BadEnvVar { .. } => ISE,
            Self::ParsePort { .. } | Self::ParseAddress { .. } => ISE,
            Self::UnknownPaymentProvider { .. } | Self::UnknownStoreBackend { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::InvalidField { .. } => BI,
            Self::Validation { .. } | Self::PathParam { .. } => BI,
            Self::JsonBody { source } => match source {
                JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => BI,
            },
        };

        let fields = match &self {
            Self::Validation { source } => Some(field_messages(source)),
            _ => None,
        };

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            debug!(?self, %status_code, "Rejected request");
        }

        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };
        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use validator::ValidationError;

    async fn body_of(error: RollcallError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_student_is_not_found() {
        let (status, body) = body_of(RollcallError::MissingStudent { id: 7 }).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unable to find student with ID: 7");
        assert!(body.get("fields").is_none());
    }

    #[tokio::test]
    async fn invalid_field_names_the_field() {
        let (status, body) = body_of(RollcallError::InvalidField {
            field: "age".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Field: age is not a valid field");
    }

    #[tokio::test]
    async fn validation_lists_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("required").with_message("Name is required".into()),
        );

        let (status, body) = body_of(RollcallError::Validation { source: errors }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["name"][0], "Name is required");
    }

    #[tokio::test]
    async fn failed_queries_are_server_errors() {
        let (status, body) = body_of(RollcallError::MakeQuery {
            source: sqlx::Error::RowNotFound,
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error making SQL query");
    }
}

use axum::{
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use mongodb::bson::spec::ElementType;
use snafu::Snafu;
use std::num::ParseIntError;

pub type StudentsResult<T> = Result<T, StudentsError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StudentsError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: mongodb::error::Error },
    #[snafu(display("Error making MongoDB query"))]
    MakeQuery { source: mongodb::error::Error },
    #[snafu(display("Unable to read stored student, `_id` had type {:?}", found))]
    MalformedDocument { found: Option<ElementType> },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unknown student store kind {:?}, expected `mongo` or `memory`", found))]
    UnknownStoreKind { found: String },
    #[snafu(display("Unable to use {:?} as a CORS origin", origin))]
    InvalidCorsOrigin {
        source: InvalidHeaderValue,
        origin: String,
    },
}

impl IntoResponse for StudentsError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::MakeQuery { .. } => ISE,
            Self::MalformedDocument { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::UnknownStoreKind { .. } | Self::InvalidCorsOrigin { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_errors_are_opaque_server_errors() {
        let response = StudentsError::MalformedDocument {
            found: Some(ElementType::Int32),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Int32"), "unexpected body: {body}");
    }
}

use crate::{
    routes::students::{delete_student, get_students, post_student, put_student},
    state::StudentState,
};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod students;

pub fn router(state: StudentState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list([state.config().server_config().cors_origin()]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);
    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        .route("/students", get(get_students).post(post_student))
        .route("/students/{id}", put(put_student).delete(delete_student))
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

use axum::http::StatusCode;

pub fn map_db_error(err: sqlx::Error) -> (StatusCode, String) {
    let status = match &err {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("1555") => StatusCode::CONFLICT,    // primary key violation
            Some("2067") => StatusCode::CONFLICT,    // unique constraint
            Some("787") => StatusCode::BAD_REQUEST,  // foreign key violation
            Some("1299") => StatusCode::BAD_REQUEST, // not-null violation
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::error!(error = %err, status = %status, "database error");

    let message = match status {
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::CONFLICT => "Resource already exists",
        StatusCode::BAD_REQUEST => "Invalid request",
        _ => "Database error",
    };

    (status, message.to_string())
}

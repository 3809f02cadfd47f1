//! The endpoint for deleting a category.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::Error;

use super::{create::CreateCategoryState, db::delete_category, domain::CategoryId};

/// Delete a category.
///
/// Transactions already labelled with the category keep their label.
pub async fn delete_category_endpoint(
    State(state): State<CreateCategoryState>,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        category::{CategoryName, create_category, db::get_categories},
        endpoints,
    };

    use super::delete_category_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn deletes_category() {
        let (server, state) = test_server();
        let category = {
            let connection = state.db_connection.lock().unwrap();
            create_category(CategoryName::new("Food").unwrap(), &connection).unwrap()
        };

        let response = server
            .delete(&endpoints::format_endpoint(
                endpoints::DELETE_CATEGORY,
                category.id,
            ))
            .await;

        response.assert_status_ok();
        let connection = state.db_connection.lock().unwrap();
        assert!(get_categories(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let (server, _) = test_server();

        let response = server
            .delete(&endpoints::format_endpoint(endpoints::DELETE_CATEGORY, 999))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

pub mod audit_log;
pub mod companies;
pub mod persons;
pub mod products;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Audit log (admin only)
        .route("/api/v1/audit-log/recent", get(audit_log::recent))
        .route(
            "/api/v1/audit-log/{entity_type}/{entity_id}",
            get(audit_log::by_entity),
        )
        // Persons
        .route("/api/v1/persons", get(persons::list).post(persons::create))
        .route(
            "/api/v1/persons/{id}",
            get(persons::get)
                .put(persons::update)
                .delete(persons::delete),
        )
        // Companies
        .route(
            "/api/v1/companies",
            get(companies::list).post(companies::create),
        )
        .route(
            "/api/v1/companies/{id}",
            get(companies::get)
                .put(companies::update)
                .delete(companies::delete),
        )
        // Products
        .route("/api/v1/products", get(products::list).post(products::create))
        .route(
            "/api/v1/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod body;
pub mod books;
pub mod codec;
pub mod error;
pub mod health;
pub mod negotiation;
pub mod response;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{Scope, web};

pub use error::{ApiFault, ApiResult};

use self::negotiation::WireFormat;

/// The `/api` scope with every users and books endpoint.
///
/// Path and query extraction failures render as 422 faults in the
/// negotiated wire format. Handlers expect [`state::HttpState`] in app data.
pub fn api_scope() -> Scope {
    let query_config = web::QueryConfig::default().error_handler(|err, req| {
        ApiFault::validation(WireFormat::from_request(req), &["query"], err.to_string()).into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, req| {
        ApiFault::validation(WireFormat::from_request(req), &["path"], err.to_string()).into()
    });

    web::scope("/api")
        .app_data(query_config)
        .app_data(path_config)
        .service(users::sign_up)
        .service(users::sign_in)
        .service(books::upload_cover_image)
        .service(books::list_books)
        .service(books::create_book)
        .service(books::get_book)
        .service(books::update_book)
        .service(books::delete_book)
}

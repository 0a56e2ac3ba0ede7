//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the users, books and health endpoints together with
//! the wire payload schemas and the bearer token security scheme. Swagger UI
//! serves it in debug builds.

use crate::domain::AccessToken;
use crate::inbound::http::health::{Stage, StageReport};
use crate::inbound::http::schemas::{
    BookCreateRequest, BookPatchPayload, BookPayload, BookUpdateRequest, CoverUploadForm,
    SignInRequest, SignUpRequest, UserPayload,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "bearer";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/users/sign-in."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookshelf API",
        description = "Users sign up and sign in; authors publish and manage books and covers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::sign_in,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::books::upload_cover_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignUpRequest,
        SignInRequest,
        BookCreateRequest,
        BookUpdateRequest,
        CoverUploadForm,
        UserPayload,
        BookPayload,
        BookPatchPayload,
        AccessToken,
        Stage,
        StageReport,
    )),
    tags(
        (name = "users", description = "Sign-up and sign-in"),
        (name = "books", description = "Book catalogue and cover uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

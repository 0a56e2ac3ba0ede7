//! Users API handlers.
//!
//! ```text
//! POST /api/users/sign-up {"first_name":"Ursula",...,"author_pseudonym":"Ursula K."}
//! POST /api/users/sign-in {"username":"leguin","password":"earthsea"}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::{AccessToken, LoginCredentials, Outcome, SignUpCandidate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::DecodedBody;
use crate::inbound::http::error::ApiFault;
use crate::inbound::http::negotiation::WireFormat;
use crate::inbound::http::response::respond;
use crate::inbound::http::schemas::{SignInRequest, SignUpRequest, UserPayload};
use crate::inbound::http::state::HttpState;

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "User signed up", body = Outcome<UserPayload>),
        (status = 409, description = "Username, email or pseudonym already exists", body = Outcome<UserPayload>),
        (status = 422, description = "Invalid payload"),
        (status = 503, description = "Store unavailable", body = Outcome<UserPayload>)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/users/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    format: WireFormat,
    payload: DecodedBody<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let candidate = SignUpCandidate::try_from_parts(payload.parts())
        .map_err(|err| ApiFault::validation(format, &["body", err.field()], err.to_string()))?;
    let outcome = state.users.sign_up(candidate).await.map(UserPayload::from);
    Ok(respond(format, &outcome))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/users/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "User signed in", body = Outcome<AccessToken>),
        (status = 401, description = "Username or password is wrong", body = Outcome<AccessToken>),
        (status = 422, description = "Invalid payload")
    ),
    tags = ["users"],
    operation_id = "signIn",
    security([])
)]
#[post("/users/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    format: WireFormat,
    payload: DecodedBody<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| ApiFault::validation(format, &["body", err.field()], err.to_string()))?;
    let outcome = state.users.sign_in(credentials).await;
    Ok(respond(format, &outcome))
}

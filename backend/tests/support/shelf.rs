//! Shared harness for HTTP integration suites over in-memory stores.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use bookshelf::Trace;
use bookshelf::domain::{LoginCredentials, SignUpCandidate, SignUpParts};
use bookshelf::inbound::http::api_scope;
use bookshelf::inbound::http::state::HttpState;

/// Boundary used by [`multipart_file`].
pub const BOUNDARY: &str = "bookshelf-test-boundary";

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct horse";

/// App exposing the `/api` scope with trace propagation.
pub fn shelf_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api_scope())
}

/// Register `username` through the user directory and return a bearer
/// header value for it.
pub async fn seed_account(state: &HttpState, username: &str, pseudonym: Option<&str>) -> String {
    let email = format!("{username}@example.com");
    let candidate = SignUpCandidate::try_from_parts(SignUpParts {
        first_name: "Test",
        last_name: "Author",
        email: &email,
        username,
        password: PASSWORD,
        pseudonym,
    })
    .expect("valid sign-up");
    let signed_up = state.users.sign_up(candidate).await;
    assert!(signed_up.is_success(), "sign-up failed: {}", signed_up.message());

    let credentials = LoginCredentials::try_from_parts(username, PASSWORD).expect("credentials");
    let token = state
        .users
        .sign_in(credentials)
        .await
        .into_data()
        .expect("sign-in succeeded");
    format!("Bearer {}", token.access_token)
}

/// Multipart body carrying one `file` field; returns the content type and
/// the encoded body.
pub fn multipart_file(filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

//! Books API handlers.
//!
//! ```text
//! GET    /api/books?title=dune&limit=5
//! GET    /api/books/{id}
//! POST   /api/books          (bearer)
//! PUT    /api/books/{id}     (bearer)
//! DELETE /api/books/{id}     (bearer)
//! POST   /api/books/upload   (bearer, multipart field `file`)
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use futures_util::TryStreamExt;

use crate::domain::{BookDraft, BookPatch, Outcome, PageRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::body::DecodedBody;
use crate::inbound::http::error::ApiFault;
use crate::inbound::http::negotiation::WireFormat;
use crate::inbound::http::response::respond;
use crate::inbound::http::schemas::{
    BookCreateRequest, BookPatchPayload, BookPayload, BookUpdateRequest, BooksQuery,
    CoverUploadForm,
};
use crate::inbound::http::state::HttpState;

const UPLOAD_FIELD: &str = "file";

fn into_payloads(books: Vec<crate::domain::Book>) -> Vec<BookPayload> {
    books.into_iter().map(BookPayload::from).collect()
}

/// List books, or search them when any criterion is given.
///
/// Search runs a substring match per non-empty criterion and returns the
/// union, deduplicated by id. `skip` only applies to plain listing.
#[utoipa::path(
    get,
    path = "/api/books",
    params(BooksQuery),
    responses(
        (status = 200, description = "Books fetched", body = Outcome<Vec<BookPayload>>),
        (status = 422, description = "Invalid query"),
        (status = 503, description = "Store unavailable", body = Outcome<Vec<BookPayload>>)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    format: WireFormat,
    query: web::Query<BooksQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let page = PageRequest::try_new(query.limit, query.skip)
        .map_err(|err| ApiFault::validation(format, &["query", "limit"], err.to_string()))?;
    let criteria = query.criteria();
    let outcome = if criteria.is_empty() {
        state.books.list(page).await
    } else {
        state.books.list_by_search(criteria, page.limit()).await
    };
    Ok(respond(format, &outcome.map(into_payloads)))
}

/// Fetch one book.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book found", body = Outcome<BookPayload>),
        (status = 404, description = "Book not exists", body = Outcome<BookPayload>),
        (status = 422, description = "Invalid id")
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    format: WireFormat,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let outcome = state.books.get_by_id(id.into_inner()).await;
    Ok(respond(format, &outcome.map(BookPayload::from)))
}

/// Publish a book under the caller's pseudonym.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookCreateRequest,
    responses(
        (status = 200, description = "Book added", body = Outcome<BookPayload>),
        (status = 401, description = "Bad token or author mismatch", body = Outcome<BookPayload>),
        (status = 403, description = "Forbidden publisher", body = Outcome<BookPayload>),
        (status = 404, description = "Cover image missing", body = Outcome<BookPayload>),
        (status = 422, description = "Invalid payload")
    ),
    tags = ["books"],
    operation_id = "createBook",
    security(("bearer" = []))
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    format: WireFormat,
    caller: Authenticated,
    payload: DecodedBody<BookCreateRequest>,
) -> ApiResult<HttpResponse> {
    let draft = BookDraft::try_from(payload.into_inner())
        .map_err(|err| ApiFault::validation(format, &["body", err.field()], err.to_string()))?;
    let outcome = state.books.create(draft, caller.claims()).await;
    Ok(respond(format, &outcome.map(BookPayload::from)))
}

/// Replace a book's mutable fields.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    request_body = BookUpdateRequest,
    responses(
        (status = 200, description = "Book details updated", body = Outcome<BookPatchPayload>),
        (status = 401, description = "Bad token or not the author", body = Outcome<BookPatchPayload>),
        (status = 404, description = "Book or cover image missing", body = Outcome<BookPatchPayload>),
        (status = 422, description = "Invalid payload")
    ),
    tags = ["books"],
    operation_id = "updateBook",
    security(("bearer" = []))
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    format: WireFormat,
    caller: Authenticated,
    id: web::Path<i32>,
    payload: DecodedBody<BookUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let patch = BookPatch::try_from(payload.into_inner())
        .map_err(|err| ApiFault::validation(format, &["body", err.field()], err.to_string()))?;
    let outcome = state
        .books
        .update(id.into_inner(), patch, caller.claims())
        .await;
    Ok(respond(format, &outcome.map(BookPatchPayload::from)))
}

/// Remove a book owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book deleted", body = Outcome<BookPayload>),
        (status = 401, description = "Bad token or not the author", body = Outcome<BookPayload>),
        (status = 404, description = "Book not exists", body = Outcome<BookPayload>)
    ),
    tags = ["books"],
    operation_id = "deleteBook",
    security(("bearer" = []))
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    format: WireFormat,
    caller: Authenticated,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let outcome = state.books.delete(id.into_inner(), caller.claims()).await;
    Ok(respond(format, &outcome.map(BookPayload::from)))
}

/// Store a cover image and return its generated filename.
#[utoipa::path(
    post,
    path = "/api/books/upload",
    request_body(content = CoverUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File saved", body = Outcome<String>),
        (status = 401, description = "Bad token"),
        (status = 422, description = "Missing file or filename")
    ),
    tags = ["books"],
    operation_id = "uploadCoverImage",
    security(("bearer" = []))
)]
#[post("/books/upload")]
pub async fn upload_cover_image(
    state: web::Data<HttpState>,
    format: WireFormat,
    _caller: Authenticated,
    mut form: Multipart,
) -> ApiResult<HttpResponse> {
    let malformed = |err: actix_multipart::MultipartError| {
        ApiFault::validation(format, &["body", UPLOAD_FIELD], err.to_string())
    };

    let mut upload = None;
    while let Some(mut field) = form.try_next().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned)
            .unwrap_or_default();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            bytes.extend_from_slice(&chunk);
        }
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload
        .ok_or_else(|| ApiFault::validation(format, &["body", UPLOAD_FIELD], "field required"))?;
    if filename.trim().is_empty() {
        return Err(ApiFault::validation(
            format,
            &["body", UPLOAD_FIELD],
            "file name must not be empty",
        ));
    }
    let outcome = state.books.upload_cover_image(bytes, &filename).await;
    Ok(respond(format, &outcome))
}

#[cfg(test)]
#[path = "books_tests.rs"]
mod tests;

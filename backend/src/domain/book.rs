//! Book catalogue model: records, drafts, patches, paging and search criteria.

use std::fmt;

/// Stored book.
///
/// ## Invariants
/// - `author` is the publishing pseudonym of an existing user and never
///   changes after creation.
/// - `cover_image` names a file already present in the cover store when the
///   record was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Store-assigned identifier.
    pub id: i32,
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Cover image filename in the cover store.
    pub cover_image: String,
    /// Opaque integer price.
    pub price: i32,
    /// Author pseudonym.
    pub author: String,
}

/// Validation errors raised when building drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// Title is blank.
    EmptyTitle,
    /// Cover image filename is blank.
    EmptyCoverImage,
    /// Author pseudonym is blank.
    EmptyAuthor,
}

impl BookValidationError {
    /// Name of the offending payload field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyCoverImage => "cover_image",
            Self::EmptyAuthor => "author",
        }
    }
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyCoverImage => write!(f, "cover image must not be empty"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
        }
    }
}

impl std::error::Error for BookValidationError {}

fn required(value: &str, error: BookValidationError) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// Mutable book fields shared by patches and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPatch {
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Cover image filename.
    pub cover_image: String,
    /// Opaque integer price.
    pub price: i32,
}

impl BookPatch {
    /// Validate raw update inputs.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::BookPatch;
    ///
    /// let patch = BookPatch::try_new(" Dune ", "", "AB12CD_dune.png", 10).unwrap();
    /// assert_eq!(patch.title, "Dune");
    /// ```
    pub fn try_new(
        title: &str,
        description: &str,
        cover_image: &str,
        price: i32,
    ) -> Result<Self, BookValidationError> {
        Ok(Self {
            title: required(title, BookValidationError::EmptyTitle)?,
            description: description.to_owned(),
            cover_image: required(cover_image, BookValidationError::EmptyCoverImage)?,
            price,
        })
    }
}

/// Create payload: the mutable fields plus the claimed author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Title, description, cover and price.
    pub fields: BookPatch,
    /// Pseudonym the caller publishes under.
    pub author: String,
}

impl BookDraft {
    /// Validate raw create inputs.
    pub fn try_new(fields: BookPatch, author: &str) -> Result<Self, BookValidationError> {
        Ok(Self {
            fields,
            author: required(author, BookValidationError::EmptyAuthor)?,
        })
    }
}

/// Default page size for listings and searches.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    skip: u32,
}

/// Raised when a page window is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be between 1 and {MAX_PAGE_LIMIT}")]
pub struct PageLimitError;

impl PageRequest {
    /// Build a window, applying defaults for absent values.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::PageRequest;
    ///
    /// let page = PageRequest::try_new(None, None).unwrap();
    /// assert_eq!((page.limit(), page.skip()), (10, 0));
    /// assert!(PageRequest::try_new(Some(0), None).is_err());
    /// ```
    pub fn try_new(limit: Option<u32>, skip: Option<u32>) -> Result<Self, PageLimitError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PageLimitError);
        }
        Ok(Self {
            limit,
            skip: skip.unwrap_or(0),
        })
    }

    /// Maximum number of records.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Records to skip.
    #[must_use]
    pub const fn skip(&self) -> u32 {
        self.skip
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            skip: 0,
        }
    }
}

/// Searchable book column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// `books.title`.
    Title,
    /// `books.description`.
    Description,
    /// `books.author`.
    Author,
}

/// Optional substring criteria; empty strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Title substring.
    pub title: Option<String>,
    /// Description substring.
    pub description: Option<String>,
    /// Author substring.
    pub author: Option<String>,
}

impl SearchCriteria {
    /// Non-empty criteria in title, description, author order.
    pub fn terms(&self) -> impl Iterator<Item = (SearchField, &str)> {
        [
            (SearchField::Title, self.title.as_deref()),
            (SearchField::Description, self.description.as_deref()),
            (SearchField::Author, self.author.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, term)| term.filter(|t| !t.is_empty()).map(|t| (field, t)))
    }

    /// Whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "cover.png", BookValidationError::EmptyTitle)]
    #[case("Dune", "  ", BookValidationError::EmptyCoverImage)]
    fn patch_rejects_blank_fields(
        #[case] title: &str,
        #[case] cover: &str,
        #[case] expected: BookValidationError,
    ) {
        let err = BookPatch::try_new(title, "desc", cover, 1).expect_err("invalid patch");
        assert_eq!(err, expected);
        assert_eq!(err.field(), expected.field());
    }

    #[rstest]
    fn draft_requires_author() {
        let fields = BookPatch::try_new("Dune", "", "c.png", 1).expect("valid patch");
        let err = BookDraft::try_new(fields, " ").expect_err("blank author");
        assert_eq!(err, BookValidationError::EmptyAuthor);
    }

    #[rstest]
    #[case(None, None, Some((10, 0)))]
    #[case(Some(1), Some(5), Some((1, 5)))]
    #[case(Some(100), None, Some((100, 0)))]
    #[case(Some(0), None, None)]
    #[case(Some(101), None, None)]
    fn page_limits_are_bounded(
        #[case] limit: Option<u32>,
        #[case] skip: Option<u32>,
        #[case] expected: Option<(u32, u32)>,
    ) {
        let page = PageRequest::try_new(limit, skip).ok();
        assert_eq!(page.map(|p| (p.limit(), p.skip())), expected);
    }

    #[rstest]
    fn search_terms_skip_empty_criteria() {
        let criteria = SearchCriteria {
            title: Some("Ring".to_owned()),
            description: Some(String::new()),
            author: Some("Tolkien".to_owned()),
        };
        let terms: Vec<_> = criteria.terms().collect();
        assert_eq!(
            terms,
            vec![(SearchField::Title, "Ring"), (SearchField::Author, "Tolkien")]
        );
        assert!(!criteria.is_empty());
        assert!(SearchCriteria::default().is_empty());
    }
}

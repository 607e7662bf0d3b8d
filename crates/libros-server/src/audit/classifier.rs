//! Request classification
//!
//! Decides from the HTTP method and route alone whether a request is a book
//! inventory operation worth auditing, and which [`AuditAction`] it maps to.
//! Route templates (`/books/:id`) and concrete paths (`/books/42`) classify
//! the same way: a template parameter or a purely numeric segment counts as
//! an identifier.

use http::Method;

use super::models::{AuditAction, EntityType};

/// Collection segment every inventory route lives under
pub const BOOKS_SEGMENT: &str = "books";

/// Sub-routes below `books` that are never audited, whatever the method
pub const EXCLUDED_BOOK_ROUTES: &[&str] = &["upload-image", "upload", "genres", "publishers", "test-audit"];

const SEARCH_SEGMENT: &str = "search";
const SEARCH_QUERY_KEY: &str = "search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Param,
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        let is_template = raw.starts_with(':') || (raw.starts_with('{') && raw.ends_with('}'));
        let is_numeric = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());

        if is_template || is_numeric {
            Segment::Param
        } else {
            Segment::Literal(raw)
        }
    }

    fn is(&self, literal: &str) -> bool {
        matches!(self, Segment::Literal(s) if s.eq_ignore_ascii_case(literal))
    }
}

/// A path split around its `books` segment
#[derive(Debug)]
struct BookRoute<'a> {
    rest: Vec<Segment<'a>>,
}

impl<'a> BookRoute<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let mut segments = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse);

        segments.by_ref().find(|s| s.is(BOOKS_SEGMENT))?;

        Some(Self {
            rest: segments.collect(),
        })
    }

    fn is_collection(&self) -> bool {
        self.rest.is_empty()
    }

    fn is_excluded(&self) -> bool {
        self.rest
            .iter()
            .any(|s| EXCLUDED_BOOK_ROUTES.iter().any(|excluded| s.is(excluded)))
    }

    fn is_search(&self) -> bool {
        self.rest.iter().any(|s| s.is(SEARCH_SEGMENT))
    }
}

/// True when the raw query string carries a non-empty `search` parameter
pub fn has_search_query(query: Option<&str>) -> bool {
    query
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .any(|(key, value)| key == SEARCH_QUERY_KEY && !value.is_empty())
}

/// Map a request onto an inventory action
///
/// Returns `None` for anything that should pass through unaudited: routes
/// outside `books`, excluded sub-routes, and method/shape combinations that
/// are not inventory operations (e.g. `PUT /books`).
pub fn classify(method: &Method, path: &str, query: Option<&str>) -> Option<AuditAction> {
    let route = BookRoute::parse(path)?;

    if route.is_excluded() {
        return None;
    }

    match *method {
        Method::GET if route.is_search() || has_search_query(query) => Some(AuditAction::Searched),
        Method::GET => Some(AuditAction::Viewed),
        Method::POST if route.is_collection() => Some(AuditAction::Added),
        Method::POST if route.is_search() => Some(AuditAction::Searched),
        Method::PUT | Method::PATCH if !route.is_collection() => Some(AuditAction::Updated),
        Method::DELETE if !route.is_collection() => Some(AuditAction::Removed),
        _ => None,
    }
}

/// Resource type of a path
///
/// A `books` segment anywhere wins, matching what [`classify`] audits;
/// otherwise the first recognised segment names the type.
pub fn entity_type_for(path: &str) -> EntityType {
    if BookRoute::parse(path).is_some() {
        return EntityType::Book;
    }

    path.split('/')
        .filter(|s| !s.is_empty())
        .find_map(|segment| match segment.to_ascii_lowercase().as_str() {
            BOOKS_SEGMENT => Some(EntityType::Book),
            "users" => Some(EntityType::User),
            "auth" => Some(EntityType::Auth),
            "dashboard" => Some(EntityType::Dashboard),
            _ => None,
        })
        .unwrap_or(EntityType::Unknown)
}

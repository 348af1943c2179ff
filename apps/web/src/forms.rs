//! Form bodies and query strings as posted by the pages.
//!
//! Every field defaults to empty so a missing field reaches validation
//! (and its flash message) instead of failing extraction. The [`PageParam`]
//! and [`Submitted`] extractors go further: input axum cannot decode at all
//! still ends up in validation rather than in a plain-text 400.

use std::convert::Infallible;

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Form;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tally_core::Item;
use tracing::debug;

/// `?page=N` on listing pages. Absent means the first page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// =============================================================================
// Lenient Extractors
// =============================================================================

/// The `page` query parameter, never rejected.
///
/// When the query string does not decode as a [`PageQuery`] (a repeated
/// `page`, for one), the first `page` value in it is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParam(pub Option<String>);

impl PageParam {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for PageParam
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<PageQuery>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(PageParam(query.page)),
            Err(rejection) => {
                debug!(%rejection, "Undecodable query string; using the first page value");
                Ok(PageParam(first_page_value(parts.uri.query().unwrap_or(""))))
            }
        }
    }
}

/// Raw first `page=` value. Anything but plain digits fails page
/// validation later, so no percent-decoding is needed.
fn first_page_value(query: &str) -> Option<String> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == "page")
        .map(|(_, value)| value.to_string())
}

/// A URL-encoded form body, never rejected.
///
/// A body that cannot be decoded (wrong content type, repeated fields)
/// reads as `T::default()`, so every field is empty and validation reports
/// it the usual way.
#[derive(Debug, Clone, Default)]
pub struct Submitted<T>(pub T);

impl<T, S> FromRequest<S> for Submitted<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Submitted(value)),
            Err(rejection) => {
                debug!(%rejection, "Undecodable form body; treating every field as empty");
                Ok(Submitted(T::default()))
            }
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// New category / rename form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category: String,
}

/// New item / edit item form. Quantities stay raw until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub item: String,

    #[serde(default)]
    pub num_need: String,

    #[serde(default)]
    pub num_have: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        ItemForm {
            item: item.name.clone(),
            num_need: item.num_need.to_string(),
            num_have: item.num_have.to_string(),
        }
    }
}

/// Sign-in and create-account form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Delete confirmation radio buttons: `delete` or `cancel`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default, rename = "optionsRadios")]
    pub options_radios: String,
}

impl DeleteForm {
    /// Only an explicit "delete" choice deletes.
    pub fn confirmed(&self) -> bool {
        self.options_radios == "delete"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_value() {
        assert_eq!(first_page_value("page=1&page=0"), Some("1".to_string()));
        assert_eq!(first_page_value("sort=name&page=2"), Some("2".to_string()));
        assert_eq!(first_page_value("page"), Some(String::new()));
        assert_eq!(first_page_value("pages=3"), None);
        assert_eq!(first_page_value(""), None);
    }

    #[test]
    fn test_only_delete_is_confirmed() {
        let choice = |value: &str| DeleteForm {
            options_radios: value.to_string(),
        };

        assert!(choice("delete").confirmed());
        assert!(!choice("cancel").confirmed());
        assert!(!choice("").confirmed());
    }
}

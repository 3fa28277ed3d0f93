//! Shared query-string payloads for listing and search endpoints.

use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SearchOrder;
use crate::domain::Error;

/// `?page=` for admin listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number; absent or non-positive values clamp to 1.
    pub page: Option<i64>,
}

impl PageParams {
    /// The requested page, defaulting to the first.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// `?q=&order=&page=&limit=` for keyword search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Keyword; handlers fall back to the full list below two characters.
    pub q: Option<String>,
    /// Sort order token; see [`parse_order`].
    pub order: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size, clamped against the search ceiling.
    pub limit: Option<i64>,
}

impl SearchParams {
    /// The raw keyword, defaulting to empty.
    pub fn keyword(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    /// The requested page, defaulting to the first.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// The requested page size; non-positive values clamp to the ceiling.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(0)
    }
}

/// Parse the `order` token into a [`SearchOrder`].
///
/// Accepted tokens: `id_asc`, `name_asc`, `name_desc`. Absent means the
/// default descending-by-name order the public API has always used.
pub fn parse_order(token: Option<&str>) -> Result<SearchOrder, Error> {
    match token {
        None | Some("") => Ok(SearchOrder::default()),
        Some("id_asc") => Ok(SearchOrder::IdAsc),
        Some("name_asc") => Ok(SearchOrder::NameAsc),
        Some("name_desc") => Ok(SearchOrder::NameDesc),
        Some(other) => Err(
            Error::invalid_request("order must be one of id_asc, name_asc, name_desc")
                .with_details(json!({
                    "field": "order",
                    "code": "invalid_order",
                    "value": other,
                })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, SearchOrder::NameDesc)]
    #[case(Some(""), SearchOrder::NameDesc)]
    #[case(Some("id_asc"), SearchOrder::IdAsc)]
    #[case(Some("name_asc"), SearchOrder::NameAsc)]
    #[case(Some("name_desc"), SearchOrder::NameDesc)]
    fn known_tokens_parse(#[case] token: Option<&str>, #[case] expected: SearchOrder) {
        assert_eq!(parse_order(token).expect("valid token"), expected);
    }

    #[rstest]
    fn unknown_tokens_are_rejected() {
        let err = parse_order(Some("newest")).expect_err("invalid token");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}

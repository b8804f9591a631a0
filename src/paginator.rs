use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AuthContext;
use crate::error::Result;
use crate::http::ApiClient;

/// A single page of a paginated collection.
pub trait Page: DeserializeOwned {
    type Item;

    /// Splits the page into its items and the absolute URL of the next page.
    /// `current_url` is the URL this page was fetched from, for providers
    /// whose cursor is a token rather than a URL.
    fn into_parts(self, current_url: &str) -> (Vec<Self::Item>, Option<String>);
}

/// The `{ items, next }` shape shared by playlist-list and track-list endpoints.
#[derive(Debug, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T: DeserializeOwned> Page for CursorPage<T> {
    type Item = T;

    fn into_parts(self, _current_url: &str) -> (Vec<T>, Option<String>) {
        (self.items, self.next)
    }
}

/// Follows `next` cursors from `initial_url` until exhausted and returns every
/// item in page order. Any failing page fails the whole call.
pub async fn fetch_all<P: Page>(
    api: &ApiClient,
    initial_url: &str,
    auth: &AuthContext,
) -> Result<Vec<P::Item>> {
    let mut items = Vec::new();
    let mut current = Some(initial_url.to_string());
    let mut pages = 0usize;

    while let Some(url) = current {
        let page: P = api.get_json(&url, auth).await?;
        let (page_items, next) = page.into_parts(&url);

        pages += 1;
        debug!("Fetched page {} with {} items", pages, page_items.len());

        items.extend(page_items);
        current = next.filter(|n| !n.is_empty());
    }

    Ok(items)
}

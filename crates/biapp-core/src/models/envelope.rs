use serde::{Deserialize, Serialize};

/// A list response that may come bare (`[...]`) or wrapped in a resource
/// envelope (`{"data": [...]}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

/// A single resource, bare or wrapped in `{"data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            ItemEnvelope::Wrapped { data } => data,
            ItemEnvelope::Bare(item) => item,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        matches!(
            (self.current_page, self.last_page),
            (Some(current), Some(last)) if current < last
        )
    }
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        Page {
            data: envelope.into_items(),
            current_page: None,
            last_page: None,
            total: None,
        }
    }
}

/// A paginated response, or a plain list when the backend skips pagination.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageResponse<T> {
    Paginated(Page<T>),
    Bare(Vec<T>),
}

impl<T> PageResponse<T> {
    pub fn into_page(self) -> Page<T> {
        match self {
            PageResponse::Paginated(page) => page,
            PageResponse::Bare(items) => ListEnvelope::Bare(items).into(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// A server-paginated slice of a collection.
///
/// Mirrors the backend's page envelope: `content` plus zero-based position
/// and total counters. `first`/`last` are sent by newer backend versions but
/// never trusted for navigation; `has_previous`/`has_next` derive from the
/// counters instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
}

impl<T> Page<T> {
    /// Create an empty first page with the given size.
    pub fn empty(page_size: u32) -> Self {
        Self {
            content: Vec::new(),
            page_number: 0,
            page_size,
            total_elements: 0,
            total_pages: 0,
            first: None,
            last: None,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 0
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.page_number < self.total_pages - 1
    }

    /// Map items while preserving the pagination envelope.
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(&mut f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_wire_form() {
        let page: Page<String> = serde_json::from_str(
            r#"{
                "content": ["a", "b"],
                "pageNumber": 1,
                "pageSize": 2,
                "totalElements": 5,
                "totalPages": 3,
                "first": false,
                "last": false
            }"#,
        )
        .unwrap();

        assert_eq!(page.content, vec!["a", "b"]);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_elements, 5);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn navigation_flags_derive_from_counters() {
        let mut page = Page::<u8>::empty(20);
        assert!(!page.has_previous());
        assert!(!page.has_next());

        page.total_pages = 4;
        page.page_number = 3;
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn first_last_are_optional_on_the_wire() {
        let page: Page<u8> = serde_json::from_str(
            r#"{"content":[],"pageNumber":0,"pageSize":20,"totalElements":0,"totalPages":0}"#,
        )
        .unwrap();
        assert_eq!(page.first, None);
        assert_eq!(page.last, None);
    }

    #[test]
    fn map_items_preserves_envelope() {
        let page = Page {
            content: vec![1, 2, 3],
            page_number: 2,
            page_size: 3,
            total_elements: 9,
            total_pages: 3,
            first: Some(false),
            last: Some(true),
        };
        let mapped = page.map_items(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.page_number, 2);
        assert_eq!(mapped.total_pages, 3);
    }
}

use serde::{Deserialize, Serialize};

/// Generic acknowledgement. Plain-text success bodies are turned into this
/// shape (`{message, success: true}`) by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// List endpoints answer either with a bare array or `{ "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) => items,
            ListResponse::Wrapped { data } => data,
        }
    }
}

/// A server-side page of results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let bare: ListResponse<u32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2, 3]);

        let wrapped: ListResponse<u32> = serde_json::from_str(r#"{"data":[4]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![4]);

        let empty: ListResponse<u32> = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert!(empty.into_vec().is_empty());
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<u32> = serde_json::from_str(r#"{"content":[7],"totalPages":3}"#).unwrap();
        assert_eq!(page.content, vec![7]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 0);
    }
}

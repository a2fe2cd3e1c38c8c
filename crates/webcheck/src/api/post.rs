//! Post records and payloads for the `/posts` resource.

use crate::result::{WebcheckError, WebcheckResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned identifier
    pub id: u64,
    /// Post title
    pub title: String,
    /// Post body
    pub body: String,
    /// Author id
    pub user_id: u64,
}

/// Payload for create and full replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Post title
    pub title: String,
    /// Post body
    pub body: String,
    /// Author id
    pub user_id: u64,
}

impl NewPost {
    /// Create a payload
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, user_id: u64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }
}

/// Partial update; absent fields are left out of the JSON body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// New author id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

impl PostPatch {
    /// Patch only the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Check that `value` looks like a post: numeric `id`, string `title` and `body`
pub fn check_post_shape(value: &Value) -> WebcheckResult<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| WebcheckError::assertion(format!("expected a post object, got {value}")))?;
    if !obj.get("id").is_some_and(Value::is_number) {
        return Err(WebcheckError::assertion(format!(
            "post has no numeric id: {value}"
        )));
    }
    for field in ["title", "body"] {
        if !obj.get(field).is_some_and(Value::is_string) {
            return Err(WebcheckError::assertion(format!(
                "post has no string {field}: {value}"
            )));
        }
    }
    Ok(())
}

/// Check that `value` is a non-empty array of well-formed posts
pub fn check_post_collection(value: &Value) -> WebcheckResult<usize> {
    let items = value
        .as_array()
        .ok_or_else(|| WebcheckError::assertion("expected an array of posts"))?;
    if items.is_empty() {
        return Err(WebcheckError::assertion("expected at least one post"));
    }
    for (index, item) in items.iter().enumerate() {
        check_post_shape(item).map_err(|e| {
            WebcheckError::assertion(format!("post #{index}: {e}"))
        })?;
    }
    Ok(items.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    mod payload_tests {
        use super::*;

        #[test]
        fn test_new_post_uses_camel_case() {
            let post = NewPost::new("t", "b", 1);
            assert_eq!(
                serde_json::to_value(&post).unwrap(),
                json!({"title": "t", "body": "b", "userId": 1})
            );
        }

        #[test]
        fn test_patch_omits_absent_fields() {
            let patch = PostPatch::title("Updated Playwright Test Post");
            assert_eq!(
                serde_json::to_value(&patch).unwrap(),
                json!({"title": "Updated Playwright Test Post"})
            );
        }

        #[test]
        fn test_post_deserializes() {
            let post: Post =
                serde_json::from_value(json!({"id": 1, "title": "t", "body": "b", "userId": 7}))
                    .unwrap();
            assert_eq!(post.user_id, 7);
        }
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn test_valid_shape() {
            assert!(check_post_shape(&json!({"id": 1, "title": "t", "body": "b"})).is_ok());
        }

        #[test]
        fn test_string_id_rejected() {
            let err = check_post_shape(&json!({"id": "1", "title": "t", "body": "b"})).unwrap_err();
            assert!(err.is_assertion());
        }

        #[test]
        fn test_collection_checks_every_element() {
            let value = json!([
                {"id": 1, "title": "t", "body": "b"},
                {"id": 2, "title": "t"}
            ]);
            let err = check_post_collection(&value).unwrap_err();
            assert!(err.to_string().contains("post #1"));
        }

        #[test]
        fn test_empty_collection_rejected() {
            assert!(check_post_collection(&json!([])).is_err());
            assert!(check_post_collection(&json!({})).is_err());
        }
    }
}

//! JSON response envelopes.
//!
//! List and CRUD responses wrap their payload under `data.items`; autopaging
//! responses additionally carry `data.nextCursor`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stratus_types::{Result, StratusError};

/// One page of a `data.items` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemsPage<T> {
    /// The items of this page.
    #[serde(default)]
    pub items: Vec<T>,
    /// Continuation cursor; absent or null on the last page.
    #[serde(rename = "nextCursor", default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Decodes a `data.items` page, keeping the continuation cursor.
pub fn decode_page<T: DeserializeOwned>(value: Value) -> Result<ItemsPage<T>> {
    let envelope: DataEnvelope<ItemsPage<T>> = serde_json::from_value(value)?;
    Ok(envelope.data)
}

/// Decodes the items of a `data.items` response, discarding any cursor.
pub fn decode_items<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    Ok(decode_page(value)?.items)
}

/// Decodes the single item of a `data.items` response.
///
/// Fails with a server-shaped error when the response holds no items, which
/// the platform only does for malformed requests it failed to reject.
pub fn decode_single<T: DeserializeOwned>(value: Value) -> Result<T> {
    decode_items::<T>(value)?
        .into_iter()
        .next()
        .ok_or_else(|| StratusError::Transport("response contained no items".to_string()))
}

/// Wraps a request payload under `items`.
pub fn items_body(items: &impl Serialize) -> Result<Value> {
    Ok(serde_json::json!({ "items": serde_json::to_value(items)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page() {
        let page: ItemsPage<Value> = decode_page(json!({
            "data": {"items": [{"x": 1}], "nextCursor": "abc"}
        }))
        .unwrap();
        assert_eq!(1, page.items.len());
        assert_eq!(Some("abc".to_string()), page.next_cursor);
    }

    #[test]
    fn test_decode_page_terminal() {
        let page: ItemsPage<Value> = decode_page(json!({
            "data": {"items": [], "nextCursor": null}
        }))
        .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(None, page.next_cursor);
    }

    #[test]
    fn test_decode_single() {
        let item: Value = decode_single(json!({"data": {"items": [{"x": 1}, {"x": 2}]}})).unwrap();
        assert_eq!(json!({"x": 1}), item);
        assert!(decode_single::<Value>(json!({"data": {"items": []}})).is_err());
    }

    #[test]
    fn test_items_body() {
        assert_eq!(
            json!({"items": [1, 2]}),
            items_body(&vec![1, 2]).unwrap()
        );
    }
}

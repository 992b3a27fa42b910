//! One page of a list response.
//!
//! Every list command answers with the same envelope: the page's items plus
//! three counters describing where the page sits in the full result. Items
//! are kept as raw JSON here; the pager decodes them into entities one at a
//! time so a single bad item fails at its position instead of poisoning the
//! whole page.

use serde_json::Value;

use vidora_core::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Page {
    /// Total items matching the query across all pages. The service has
    /// been seen reporting `-1` when the count is unavailable.
    pub total_count: i64,
    pub page_number: u64,
    pub page_size: u64,
    pub items: Vec<Value>,
}

impl Page {
    /// Decodes a list-response envelope.
    ///
    /// All three counters must be present and numeric. `items` may be
    /// absent or `null`, both meaning an empty page; anything else
    /// non-array is malformed.
    pub fn from_value(raw: Value) -> Result<Page> {
        let total_count = counter(&raw, "total_count")?;
        let page_number = counter(&raw, "page_number")?;
        let page_size = counter(&raw, "page_size")?;
        let items = match raw.get("items") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(Error::deserialization(format!(
                    "'items' must be a list, got {other}"
                )))
            }
        };
        Ok(Page {
            total_count,
            page_number: page_number.max(0) as u64,
            page_size: page_size.max(0) as u64,
            items,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn counter(raw: &Value, key: &str) -> Result<i64> {
    raw.get(key)
        .and_then(|v| {
            // Counters occasionally arrive float-typed.
            v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
        })
        .ok_or_else(|| Error::deserialization(format!("list response missing numeric '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_full_envelope() {
        let page = Page::from_value(json!({
            "total_count": 17,
            "page_number": 2,
            "page_size": 5,
            "items": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();
        assert_eq!(page.total_count, 17);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_null_and_absent_items_mean_empty() {
        let envelope = json!({"total_count": 0, "page_number": 0, "page_size": 100});
        assert!(Page::from_value(envelope).unwrap().is_empty());

        let envelope = json!({
            "total_count": 0, "page_number": 0, "page_size": 100, "items": null
        });
        assert!(Page::from_value(envelope).unwrap().is_empty());
    }

    #[test]
    fn test_missing_counter_is_malformed() {
        let err = Page::from_value(json!({"page_number": 0, "page_size": 100, "items": []}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed response: list response missing numeric 'total_count'"
        );
    }

    #[test]
    fn test_non_numeric_counter_is_malformed() {
        let raw = json!({"total_count": "many", "page_number": 0, "page_size": 100, "items": []});
        assert!(Page::from_value(raw).is_err());
    }

    #[test]
    fn test_negative_total_count_is_preserved() {
        let page = Page::from_value(json!({
            "total_count": -1, "page_number": 0, "page_size": 100, "items": [{}]
        }))
        .unwrap();
        assert_eq!(page.total_count, -1);
    }
}

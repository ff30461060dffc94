use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
}

/// One block of a tool result. Chart tools answer with a single text block holding the locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Text(TextContent),
}

impl Content {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text(TextContent { text: text.into() })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_content_wire_shape() {
        let value = serde_json::to_value(Content::text("file:///tmp/chart.json")).unwrap();
        assert_eq!(
            value,
            json!({"type": "text", "text": "file:///tmp/chart.json"})
        );
    }
}

use eyre::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// A per-request tweak supplied by the caller.
///
/// Modifiers are applied in order, so a later header replaces an earlier one
/// with the same name. Query parameters accumulate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestModifier {
    /// Set a header, replacing any previous value
    Header(String, String),
    /// Append a query parameter
    Query(String, String),
}

impl RequestModifier {
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header(name.into(), value.into())
    }

    pub fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query(key.into(), value.into())
    }

    pub(crate) fn apply(
        &self,
        headers: &mut HeaderMap,
        query: &mut Vec<(String, String)>,
    ) -> Result<()> {
        match self {
            Self::Header(name, value) => {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .with_context(|| format!("Invalid header name: {}", name))?;
                let value = HeaderValue::from_str(value)
                    .with_context(|| format!("Invalid value for header {}", name))?;
                headers.insert(name, value);
            }
            Self::Query(key, value) => query.push((key.clone(), value.clone())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_header_wins() {
        let mut headers = HeaderMap::new();
        let mut query = Vec::new();
        for m in [
            RequestModifier::header("Content-Type", "application/json"),
            RequestModifier::header("content-type", "application/tar"),
        ] {
            m.apply(&mut headers, &mut query).unwrap();
        }
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["content-type"], "application/tar");
        assert!(query.is_empty());
    }

    #[test]
    fn test_query_accumulates() {
        let mut headers = HeaderMap::new();
        let mut query = vec![("format".to_string(), "yaml".to_string())];
        RequestModifier::query("withPermissions", "true")
            .apply(&mut headers, &mut query)
            .unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query[1], ("withPermissions".to_string(), "true".to_string()));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut headers = HeaderMap::new();
        let mut query = Vec::new();
        let result = RequestModifier::header("bad header", "x").apply(&mut headers, &mut query);
        assert!(result.unwrap_err().to_string().contains("Invalid header name"));
    }
}

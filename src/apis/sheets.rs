use crate::constants::{SHEETS_BASE_URL, SHEETS_SOURCE};
use crate::error::{DatalensError, Result};
use crate::types::Worksheet;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Reads worksheets from a published spreadsheet through its `gviz` JSON
/// endpoint. The sheet must be published/public; anything else surfaces as
/// a fatal `SourceUnavailable`.
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for SheetsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetsClient {
    pub fn new() -> Self {
        Self::with_base_url(SHEETS_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch one worksheet by name, in source row order.
    #[instrument(skip(self))]
    pub async fn fetch_worksheet(&self, sheet_id: &str, worksheet: &str) -> Result<Worksheet> {
        let url = format!("{}/{}/gviz/tq", self.base_url, sheet_id);
        let response = self
            .client
            .get(&url)
            .query(&[("tqx", "out:json"), ("sheet", worksheet)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DatalensError::source_unavailable(
                SHEETS_SOURCE,
                format!(
                    "worksheet '{}' returned HTTP {}; is the sheet published?",
                    worksheet,
                    response.status()
                ),
            ));
        }

        let body = response.text().await?;
        let sheet = parse_gviz(&body)?;
        info!(
            "Fetched worksheet '{}': {} rows, {} columns",
            worksheet,
            sheet.rows.len(),
            sheet.headers.len()
        );
        Ok(sheet)
    }
}

/// Parse a gviz response body. The endpoint wraps its JSON in a JavaScript
/// call (`google.visualization.Query.setResponse({...});`), so strip
/// everything outside the outermost parentheses first.
pub fn parse_gviz(body: &str) -> Result<Worksheet> {
    let start = body.find('(').ok_or_else(|| {
        DatalensError::source_unavailable(SHEETS_SOURCE, "response is not a gviz payload")
    })?;
    let end = body.rfind(')').ok_or_else(|| {
        DatalensError::source_unavailable(SHEETS_SOURCE, "response is not a gviz payload")
    })?;
    if end <= start {
        return Err(DatalensError::source_unavailable(
            SHEETS_SOURCE,
            "response is not a gviz payload",
        ));
    }

    let payload: Value = serde_json::from_str(&body[start + 1..end])?;

    if payload["status"].as_str() == Some("error") {
        let detail = payload["errors"][0]["detailed_message"]
            .as_str()
            .or_else(|| payload["errors"][0]["message"].as_str())
            .unwrap_or("unknown gviz error");
        return Err(DatalensError::source_unavailable(SHEETS_SOURCE, detail));
    }

    let table = payload["table"]
        .as_object()
        .ok_or_else(|| DatalensError::MissingField("table".to_string()))?;

    let mut headers: Vec<String> = table["cols"]
        .as_array()
        .map(|cols| {
            cols.iter()
                .map(|c| c["label"].as_str().unwrap_or("").trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut rows: Vec<Vec<Option<String>>> = table["rows"]
        .as_array()
        .map(|rows| rows.iter().map(parse_row).collect())
        .unwrap_or_default();

    // When the sheet's header row was not marked as such, gviz leaves the
    // column labels empty and the first data row holds the headers.
    if headers.iter().all(|h| h.is_empty()) && !rows.is_empty() {
        let first = rows.remove(0);
        headers = first
            .into_iter()
            .map(|cell| cell.unwrap_or_default())
            .collect();
        debug!("Using first row as worksheet headers");
    }

    Ok(Worksheet { headers, rows })
}

fn parse_row(row: &Value) -> Vec<Option<String>> {
    row["c"]
        .as_array()
        .map(|cells| cells.iter().map(parse_cell).collect())
        .unwrap_or_default()
}

fn parse_cell(cell: &Value) -> Option<String> {
    match &cell["v"] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "/*O_o*/\n",
        "google.visualization.Query.setResponse({\"version\":\"0.6\",\"status\":\"ok\",",
        "\"table\":{\"cols\":[{\"id\":\"A\",\"label\":\"From\",\"type\":\"string\"},",
        "{\"id\":\"B\",\"label\":\"To\",\"type\":\"string\"}],",
        "\"rows\":[{\"c\":[{\"v\":\"CRM\"},{\"v\":\"Warehouse\"}]},",
        "{\"c\":[{\"v\":\"Billing\"},null]}]}});"
    );

    #[test]
    fn parses_wrapped_payload() {
        let sheet = parse_gviz(SAMPLE).unwrap();
        assert_eq!(sheet.headers, vec!["From", "To"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][0].as_deref(), Some("CRM"));
        assert_eq!(sheet.rows[1][1], None);
    }

    #[test]
    fn promotes_first_row_to_headers_when_labels_are_empty() {
        let body = concat!(
            "setResponse({\"status\":\"ok\",\"table\":{",
            "\"cols\":[{\"label\":\"\"},{\"label\":\"\"}],",
            "\"rows\":[{\"c\":[{\"v\":\"System\"},{\"v\":\"Owner\"}]},",
            "{\"c\":[{\"v\":\"CRM\"},{\"v\":\"Sales\"}]}]}})"
        );
        let sheet = parse_gviz(body).unwrap();
        assert_eq!(sheet.headers, vec!["System", "Owner"]);
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn gviz_error_status_is_source_unavailable() {
        let body = "setResponse({\"status\":\"error\",\"errors\":[{\"detailed_message\":\"no access\"}]})";
        let err = parse_gviz(body).unwrap_err();
        assert!(matches!(
            err,
            DatalensError::SourceUnavailable { .. }
        ));
    }

    #[test]
    fn garbage_body_is_source_unavailable() {
        assert!(parse_gviz("<html>sign in</html>").is_err());
    }
}

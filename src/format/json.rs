//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::nearby::NearbyResult;

/// JSON formatter - outputs the result envelope as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format(&self, result: &NearbyResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

use crate::models::RunReport;
use super::FormatError;

/// Serialize a RunReport to pretty-printed JSON
pub fn to_json(report: &RunReport) -> Result<String, FormatError> {
    serde_json::to_string_pretty(report).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn test_to_json() {
        let json = to_json(&sample_report()).unwrap();
        assert!(json.contains("\"repository\""));
        assert!(json.contains("\"documents\""));
        assert!(json.contains("\"base_url\": \"https://github.com/acme/widgets\""));
    }
}

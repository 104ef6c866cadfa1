use crate::models::RunReport;
use super::FormatError;

/// Serialize a RunReport to YAML
pub fn to_yaml(report: &RunReport) -> Result<String, FormatError> {
    serde_yaml::to_string(report).map_err(FormatError::from)
}

pub mod json;
pub mod md;
pub mod summary;

use crate::error::AttributionError;
use crate::types::report::Attribution;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Renders a computed-only attribution, as produced by `scan`.
pub fn render(
    attribution: &Attribution,
    format: OutputFormat,
) -> Result<String, AttributionError> {
    match format {
        OutputFormat::Json => json::to_json(attribution).map_err(AttributionError::Json),
        OutputFormat::Md => Ok(md::attribution_markdown(attribution)),
    }
}

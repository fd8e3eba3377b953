use anyhow::Result;
use cepfetch_core::AddressResult;

/// Render an address as pretty JSON or an aligned key/value block.
pub(crate) fn render(address: &AddressResult, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(address)?);
    }

    let fields = address.fields();
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let lines: Vec<String> = fields
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect();
    Ok(lines.join("\n"))
}

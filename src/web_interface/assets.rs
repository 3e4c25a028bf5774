use rust_embed::RustEmbed;

use crate::error_handling::types::WebError;
use crate::session_management::Flash;

pub const INDEX_TEMPLATE: &str = "index.html";
const FLASHES_PLACEHOLDER: &str = "{{flashes}}";

/// Dashboard files compiled into the binary.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
pub struct Assets;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the dashboard with the given flash messages in place of the
/// `{{flashes}}` marker.
pub fn render_index(flashes: &[Flash]) -> Result<String, WebError> {
    let file = Assets::get(INDEX_TEMPLATE)
        .ok_or_else(|| WebError::AssetMissing(INDEX_TEMPLATE.to_string()))?;
    let template = String::from_utf8_lossy(&file.data);

    let rendered: String = flashes
        .iter()
        .map(|flash| {
            format!(
                "<div class=\"flash flash-{}\">{}</div>\n",
                flash.status.as_str(),
                escape_html(&flash.message)
            )
        })
        .collect();

    Ok(template.replace(FLASHES_PLACEHOLDER, &rendered))
}

/// Embedded file contents and their guessed content type.
pub fn static_asset(path: &str) -> Option<(Vec<u8>, String)> {
    let file = Assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some((file.data.into_owned(), mime.to_string()))
}

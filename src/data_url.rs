//! The image input boundary: file bytes in, data-URL string out.
//!
//! The MIME type is sniffed from the content so the shell does not have to
//! report one. Unknown content falls back to a generic MIME rather than
//! failing; format and size validation are out of scope here.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const FALLBACK_MIME: &str = "application/octet-stream";

#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes).map_or(FALLBACK_MIME, |format| format.to_mime_type());
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

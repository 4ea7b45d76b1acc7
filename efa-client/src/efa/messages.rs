//! Scanning `itdMessage` elements for server-reported errors.

use tracing::{debug, warn};

use crate::xml::Document;

use super::error::ServerError;

/// Message codes that only mean "nothing found".
///
/// - `-8011`: unknown error
/// - `-8012`: empty query
/// - `-8020`: no results
pub const SUPPRESSED_CODES: [i32; 3] = [-8011, -8012, -8020];

/// Collect the actionable error messages embedded in a response.
///
/// A message is actionable when its `type` is `error`, its `code` is
/// negative and the code is not one of [`SUPPRESSED_CODES`]. Its text
/// falls back to the code when the element is empty.
pub fn scan_messages(doc: &Document) -> Vec<ServerError> {
    let mut errors = Vec::new();

    for message in doc.elements_by_tag_name("itdMessage") {
        let kind = message.attr_or_empty("type");
        let code = message.int_attr("code");

        if kind == "error" {
            debug!(code, text = %message.text(), "server message");
        }
        if SUPPRESSED_CODES.contains(&code) {
            continue;
        }

        if kind == "error" && code < 0 {
            let mut text = message.text();
            if text.is_empty() {
                text = code.to_string();
            }
            warn!(code, %text, "server reported an error");
            errors.push(ServerError { code, text });
        }
    }

    errors
}

//! Inline/block layout decision for message segments.

/// Whether a segment of type `type_tag` flows inline with surrounding text.
///
/// Returns `None` for types this client has no opinion on; callers decide
/// how to lay those out.
pub fn is_inline(type_tag: &str) -> Option<bool> {
    match type_tag {
        "at" | "text" | "face" => Some(true),
        "bface" | "image" | "record" | "video" | "file" | "json" | "xml" => Some(false),
        _ => None,
    }
}

#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for taking `$ref` strings apart.
//!
//! References are never fetched: only pointers into the current document's
//! `#/components/<section>/<name>` are considered local.

use percent_encoding::percent_decode_str;

/// Pointer prefix of local component schema references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Extracts the decoded component name of a local reference into `section`.
///
/// Returns `None` for external references, other sections, or nested pointers
/// such as `#/components/schemas/User/properties/id`.
pub(crate) fn local_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let mut segments = pointer.split('/');

    if segments.next() != Some("components") || segments.next() != Some(section) {
        return None;
    }
    let name = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let name = decode_pointer_segment(name);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Returns the decoded last segment of any reference.
///
/// e.g. `other.yaml#/components/schemas/Pet` -> `Pet`
pub(crate) fn last_segment(ref_str: &str) -> String {
    let raw = ref_str.rsplit('/').next().unwrap_or(ref_str);
    decode_pointer_segment(raw)
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

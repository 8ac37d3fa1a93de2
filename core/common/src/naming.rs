//! Display-name synthesis for uploaded files.

/// Build the display name a file carries in remote storage.
///
/// The name is `{date}_{photographer}_{original}`. Rename requests
/// recompute it with the same rule, so renaming with unchanged
/// metadata is a no-op on the remote side.
pub fn display_name(date: &str, photographer: &str, original: &str) -> String {
    format!("{}_{}_{}", date, photographer, original)
}

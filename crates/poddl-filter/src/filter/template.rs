//! Placeholder substitution for path templates.

use std::collections::HashMap;

/// Replaces every `{{Name}}` in `template` with its binding.
///
/// Names are ASCII letters only. A name missing from `bindings` renders as
/// the empty string, and anything that is not a well-formed placeholder is
/// copied through unchanged. There is no escape for a literal `{{`.
pub fn substitute(template: &str, bindings: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let name_len = after.bytes().take_while(u8::is_ascii_alphabetic).count();

        if name_len > 0 && after[name_len..].starts_with("}}") {
            let name = &after[..name_len];
            out.push_str(bindings.get(name).map(String::as_str).unwrap_or_default());
            rest = &after[name_len + 2..];
        } else {
            // Not a placeholder here; a match may still start at the next brace.
            out.push('{');
            rest = &rest[start + 1..];
        }
    }

    out.push_str(rest);
    out
}

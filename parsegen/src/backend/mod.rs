//! Back ends rendering programs as target language source.

mod python;
mod rust;

pub use python::Python;
pub use rust::Rust;

/// Maps a rule or variable name to a valid identifier that isn't one of
/// `reserved`.
pub(crate) fn sanitize(name: &str, reserved: &[&str]) -> String {
    let mut out = identifier(name);
    if out == "_" || reserved.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// The name a rule's routine takes under every back end. Two rules whose
/// canonical names differ never render to the same identifier.
pub(crate) fn canonical(name: &str) -> String {
    let mut out = identifier(name);
    let keyword = |reserved: &[&str]| reserved.contains(&out.as_str());
    if out == "_" || keyword(python::RESERVED) || keyword(rust::RESERVED) {
        out.push('_');
    }
    out
}

fn identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

//! URL template expansion
//!
//! Registry URLs may embed `{{.field}}` placeholders that are filled in from
//! the owning entry, so a version bump only touches one field:
//!
//! ```text
//! https://www.7-zip.org/a/7z{{.version}}-x64.msi
//! ```

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::registry::PackageEntry;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*\.(\w+)\s*\}\}").unwrap())
}

/// Expand placeholders in `template` against the fields of `entry`.
///
/// Recognised fields are `version` and `name`. Anything else is left in the
/// output untouched so that a typo shows up in the failing URL.
pub fn expand(template: &str, entry: &PackageEntry) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "version" => entry.version.clone(),
            "name" => entry.name.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Installer;

    fn entry() -> PackageEntry {
        PackageEntry {
            name: "7zip".to_string(),
            version: "19.00".to_string(),
            installer: Installer::new("msi"),
        }
    }

    #[test]
    fn test_expand_version() {
        let url = expand("https://www.7-zip.org/a/7z{{.version}}-x64.msi", &entry());
        assert_eq!(url, "https://www.7-zip.org/a/7z19.00-x64.msi");
    }

    #[test]
    fn test_expand_with_whitespace_and_name() {
        let url = expand("https://dl.example.com/{{ .name }}/{{.version}}/setup.exe", &entry());
        assert_eq!(url, "https://dl.example.com/7zip/19.00/setup.exe");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let url = expand("https://example.com/{{.arch}}/{{.version}}", &entry());
        assert_eq!(url, "https://example.com/{{.arch}}/19.00");
    }

    #[test]
    fn test_plain_url_unchanged() {
        let url = expand("http://example.com/foo.exe", &entry());
        assert_eq!(url, "http://example.com/foo.exe");
    }
}

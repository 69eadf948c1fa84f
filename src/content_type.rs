//! Content-type acceptance for installer downloads

use std::collections::HashSet;
use std::sync::OnceLock;

/// Content types that identify an installer payload.
///
/// Several are quirks of specific hosts and are matched verbatim against the
/// raw `Content-Type` header, parameters included.
pub const EXPECTED_CONTENT_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/unknown", // Bintray
    "application/x-dosexec",
    "application/x-msdos-program",
    "application/x-msdownload",
    "application/x-msi",
    "application/x-zip-compressed",
    "application/zip",
    "binary/octet-stream",
    "Composite Document File V2 Document, corrupt: Can't read SAT; charset=binary", // Google Code
    "text/x-python", // PIP
    "Zip Files",
];

/// URL suffix of VirtualBox extension packs, served as `text/plain`
pub const EXTPACK_SUFFIX: &str = ".vbox-extpack";

const EXTPACK_CONTENT_TYPE: &str = "text/plain";

/// Immutable set of accepted content types
#[derive(Debug)]
pub struct ContentTypePolicy {
    allowed: HashSet<&'static str>,
}

impl ContentTypePolicy {
    fn new() -> Self {
        Self {
            allowed: EXPECTED_CONTENT_TYPES.iter().copied().collect(),
        }
    }

    /// The process-wide policy, built on first use
    pub fn global() -> &'static ContentTypePolicy {
        static POLICY: OnceLock<ContentTypePolicy> = OnceLock::new();
        POLICY.get_or_init(ContentTypePolicy::new)
    }

    /// Whether `content_type` is on the allow-list
    pub fn is_allowed(&self, content_type: &str) -> bool {
        self.allowed.contains(content_type)
    }

    /// Whether a response with `content_type` is acceptable for `url`
    ///
    /// Extension packs bypass the allow-list entirely and must be served as
    /// exactly `text/plain`; allow-listed types are rejected for them too.
    pub fn accepts(&self, url: &str, content_type: &str) -> bool {
        if is_extpack(url) {
            return content_type == EXTPACK_CONTENT_TYPE;
        }
        self.is_allowed(content_type)
    }
}

fn is_extpack(url: &str) -> bool {
    url.ends_with(EXTPACK_SUFFIX)
}

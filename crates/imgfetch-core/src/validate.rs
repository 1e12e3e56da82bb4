//! Response validation: content type allow-list and declared size cap.

use std::fmt;

use crate::http::ResponseHead;

/// What responses are accepted before the body is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPolicy {
    /// Substrings, one of which `Content-Type` must contain.
    pub allowed_content_types: Vec<String>,
    /// Largest accepted `Content-Length`, in bytes.
    pub max_bytes: u64,
}

/// Why a response was skipped without being saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `Content-Type` matched nothing on the allow-list (empty when absent).
    ContentType(String),
    /// `Content-Length` declared more than the cap.
    TooLarge { declared: u64, limit: u64 },
    /// The derived filename would overwrite a file the tool owns (the ledger).
    ReservedName(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ContentType(ct) => write!(f, "Invalid content type: {}", ct),
            SkipReason::TooLarge { .. } => write!(f, "File too large"),
            SkipReason::ReservedName(name) => write!(f, "Reserved filename: {}", name),
        }
    }
}

impl ContentPolicy {
    /// Content type check. Matching is substring-based and ASCII case-insensitive,
    /// so `image/jpeg; charset=binary` passes.
    pub fn content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.to_ascii_lowercase();
        self.allowed_content_types
            .iter()
            .any(|allowed| ct.contains(&allowed.to_ascii_lowercase()))
    }

    /// Checks a response head; type is checked before size.
    ///
    /// The size check trusts the header: a missing `Content-Length` passes.
    pub fn check(&self, head: &ResponseHead) -> Result<(), SkipReason> {
        let content_type = head.content_type.as_deref().unwrap_or("");
        if !self.content_type_allowed(content_type) {
            return Err(SkipReason::ContentType(content_type.to_string()));
        }
        if let Some(declared) = head.content_length {
            if declared > self.max_bytes {
                return Err(SkipReason::TooLarge {
                    declared,
                    limit: self.max_bytes,
                });
            }
        }
        Ok(())
    }
}

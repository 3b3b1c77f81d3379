//! Visitor registration - fingerprints a visitor and records the visit

use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::db::{Database, FieldMap, Model};
use crate::error::Result;

/// Whitespace is stripped from the fingerprint input so header reformatting
/// does not change the hash.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Visitor record bound to the `visitors` table.
pub struct VisitorRecord;

impl Model for VisitorRecord {
    fn table_name() -> &'static str {
        "visitors"
    }
}

/// One incoming visitor: address, user-agent, and the page the banner was
/// requested from.
pub struct Visitor {
    ip: String,
    user_agent: String,
    page: String,
}

impl Visitor {
    pub fn new(
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Visitor {
            ip: ip.into(),
            user_agent: user_agent.into(),
            page: page.into(),
        }
    }

    /// Deduplication hash: md5 hex of the whitespace-stripped, lowercased
    /// concatenation of address + user-agent + page.
    pub fn fingerprint(&self) -> String {
        let joined = format!("{}{}{}", self.ip, self.user_agent, self.page);
        let stripped = WHITESPACE.replace_all(&joined, "");
        hex::encode(Md5::digest(stripped.to_lowercase().as_bytes()))
    }

    /// Records the visit: inserts a row for an unseen fingerprint, otherwise
    /// bumps `views_count` on the existing one.
    pub fn register(&self, db: &Database) -> Result<bool> {
        let hash = self.fingerprint();

        let rows = VisitorRecord::select(db, &["id", "views_count"])?
            .where_eq(&FieldMap::from([(
                "hash".to_string(),
                Value::String(hash.clone()),
            )]))?
            .limit(1)?
            .execute_with_result()?;

        match rows.first() {
            None => {
                debug!(%hash, "new visitor");
                VisitorRecord::insert(
                    db,
                    &FieldMap::from([
                        ("ip_address".to_string(), Value::String(self.ip.clone())),
                        (
                            "user_agent".to_string(),
                            Value::String(self.user_agent.clone()),
                        ),
                        ("page_url".to_string(), Value::String(self.page.clone())),
                        ("hash".to_string(), Value::String(hash)),
                    ]),
                )
            }
            Some(row) => {
                let views = row.get("views_count").and_then(Value::as_i64).unwrap_or(0);
                debug!(%hash, views, "repeat visitor");
                VisitorRecord::update(
                    db,
                    &FieldMap::from([("views_count".to_string(), Value::from(views + 1))]),
                )?
                .where_eq(&FieldMap::from([(
                    "hash".to_string(),
                    Value::String(hash),
                )]))?
                .limit(1)?
                .execute()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_matches_known_digest() {
        let visitor = Visitor::new(
            "127.0.0.1",
            "Mozilla/5.0 (X11; Linux)",
            "http://example.com/page",
        );

        assert_eq!(visitor.fingerprint(), "27b61e73bf47a7a97ef65af3d14ae5ae");
    }

    #[test]
    fn fingerprint_ignores_whitespace_and_case() {
        let spaced = Visitor::new(
            "127.0.0.1",
            "Mozilla/5.0 (X11; Linux)",
            "http://example.com/page",
        );
        let compact = Visitor::new(
            "127.0.0.1",
            "Mozilla/5.0(X11;Linux)",
            "http://example.com/page",
        );
        let shouting = Visitor::new(
            "127.0.0.1",
            "MOZILLA/5.0 (x11; LINUX)",
            "HTTP://EXAMPLE.COM/page",
        );

        assert_eq!(spaced.fingerprint(), compact.fingerprint());
        assert_eq!(spaced.fingerprint(), shouting.fingerprint());
    }

    #[test]
    fn fingerprint_is_hex_md5() {
        let visitor = Visitor::new("10.0.0.1", "curl/8.0", "https://example.org/");
        let hash = visitor.fingerprint();

        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_pages_yield_different_fingerprints() {
        let a = Visitor::new("10.0.0.1", "curl/8.0", "https://example.org/a");
        let b = Visitor::new("10.0.0.1", "curl/8.0", "https://example.org/b");

        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}

//! CSS selectors and text markers for the vendor page.
//!
//! The extraction protocol is bound to one page layout. Everything that
//! needs re-tuning when the vendor ships a redesign lives here, and a
//! profile can be loaded from JSON to override the built-in values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageProfile {
    /// Cookie-consent "reject" button.
    pub reject_cookies: String,
    /// Heading whose text embeds the vendor name.
    pub vendor_heading: String,
    /// Text immediately before the vendor name in the heading.
    pub vendor_prefix: String,
    /// Text immediately after the vendor name in the heading.
    pub vendor_suffix: String,
    /// Filter tab restricting the list to code offers.
    pub codes_only_filter: String,
    pub discount: String,
    pub description: String,
    pub expiration_date: String,
    /// "See the code" button on each offer; opens a new tab.
    pub reveal_trigger: String,
    /// Code text inside the newly opened tab.
    pub revealed_code: String,
    /// Overlay close button inside the newly opened tab.
    pub close_overlay: String,
}

impl Default for PageProfile {
    fn default() -> Self {
        Self {
            reject_cookies: "#cmpwelcomebtnno".to_string(),
            vendor_heading: "h1.xcrmu53".to_string(),
            vendor_prefix: "promo ".to_string(),
            vendor_suffix: " valid".to_string(),
            codes_only_filter: r#"li[data-testid="Codes"]"#.to_string(),
            discount: "div._1abe9s90._1abe9s91._1abe9s92 span._1yyc3er0".to_string(),
            description: "div._1abe9s90._1abe9s91._1abe9s92 h3._1eilsni9".to_string(),
            expiration_date: "div._1abe9s90._1abe9s91._1abe9s92 div._6h4c610._1eilsnid"
                .to_string(),
            reveal_trigger: "div._1abe9s90._1abe9s91._1abe9s92 span._1oj1i5v0".to_string(),
            revealed_code: "h4.tqzsj70.tqzsj76._106202mb".to_string(),
            close_overlay: ".sb77nm5".to_string(),
        }
    }
}

/// Extracts the vendor name from the heading text: the substring between
/// the first `prefix` and the following `suffix`.
///
/// Returns `None` if either marker is missing or the name is empty.
#[must_use]
pub fn vendor_name<'a>(heading: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let start = heading.find(prefix)? + prefix.len();
    let len = heading[start..].find(suffix)?;
    let name = heading[start..start + len].trim();
    (!name.is_empty()).then_some(name)
}

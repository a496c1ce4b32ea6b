//! Preview image lookup for place pages.
//!
//! The image is the `og:image` meta tag of the public place page.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::USER_AGENT;

fn meta_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("meta tag pattern"))
}

fn attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("attribute pattern")
    })
}

/// Return the `content` of the first `<meta property="og:image">` tag.
pub fn extract_og_image(html: &str) -> Option<String> {
    for tag in meta_tag().find_iter(html) {
        let mut property = None;
        let mut content = None;

        for caps in attribute().captures_iter(tag.as_str()) {
            let Some(name) = caps.get(1) else { continue };
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());

            if name.as_str().eq_ignore_ascii_case("property") {
                property = Some(value);
            } else if name.as_str().eq_ignore_ascii_case("content") {
                content = Some(value);
            }
        }

        if property.is_some_and(|p| p.eq_ignore_ascii_case("og:image")) {
            if let Some(content) = content.filter(|c| !c.is_empty()) {
                return Some(html_escape::decode_html_entities(content).into_owned());
            }
        }
    }
    None
}

/// Fetches place pages and extracts their preview image.
#[derive(Debug, Clone)]
pub struct ThumbnailFetcher {
    http: reqwest::Client,
    user_agent: String,
}

impl ThumbnailFetcher {
    pub fn new(http: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            user_agent: user_agent.into(),
        }
    }

    pub async fn fetch(&self, page_url: &str) -> Result<Option<String>, reqwest::Error> {
        let html = self
            .http
            .get(page_url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_og_image(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_og_image() {
        let html = r#"<html><head>
            <meta charset="utf-8">
            <meta property="og:title" content="Louvre">
            <meta content="https://lh3.example.com/p/abc=w900-h900" property="og:image">
            </head></html>"#;
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://lh3.example.com/p/abc=w900-h900")
        );
    }

    #[test]
    fn handles_single_quotes_case_and_entities() {
        let html = "<META PROPERTY='og:image' CONTENT='https://img.example.com/a?x=1&amp;y=2'/>";
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://img.example.com/a?x=1&y=2")
        );
    }

    #[test]
    fn decodes_numeric_and_named_entities() {
        let html = r#"<meta property="og:image" content="https:&#x2F;&#x2F;img.example.com&#47;p?w&#61;900&amp;h&#x3D;900&nbsp;">"#;
        assert_eq!(
            extract_og_image(html).as_deref(),
            Some("https://img.example.com/p?w=900&h=900\u{a0}")
        );
    }

    #[test]
    fn first_og_image_wins() {
        let html = r#"<meta property="og:image" content="first"><meta property="og:image" content="second">"#;
        assert_eq!(extract_og_image(html).as_deref(), Some("first"));
    }

    #[test]
    fn missing_tag_or_content_is_none() {
        assert_eq!(extract_og_image("<html><body>no meta</body></html>"), None);
        assert_eq!(extract_og_image(r#"<meta property="og:image">"#), None);
        assert_eq!(extract_og_image(r#"<meta name="og:image" content="x">"#), None);
    }
}

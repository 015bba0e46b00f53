//! HTML link rewriting.
//!
//! Text substitution, not an HTML parse. Only double-quoted `href`/`src`
//! values that start with `http://` or `https://` are touched; relative,
//! protocol-relative (`//host/..`), single-quoted and unquoted values, and
//! URLs inside CSS or inline scripts pass through as-is.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(https?://[^"]+)""#).expect("valid href regex"));
static SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="(https?://[^"]+)""#).expect("valid src regex"));
static LINK_HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<link[^>]+href="(https?://[^"]+)""#).expect("valid link href regex")
});
static SCRIPT_SRC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<script[^>]+src="(https?://[^"]+)""#).expect("valid script src regex")
});

/// `<proxy_base>?u=<target>`: the proxied form of `target`.
pub fn proxied_url(proxy_base: &str, target: &str) -> String {
    format!("{}?u={}", proxy_base, target)
}

/// Rewrite absolute links in `html` so they route back through `proxy_base`.
///
/// Four passes run in order over the progressively rewritten text: every
/// `href`, every `src`, then `href` inside `<link>` tags and `src` inside
/// `<script>` tags. The last two only see URLs the first two already proxied,
/// and a URL already carrying the proxy prefix is never wrapped again.
pub fn rewrite_links(html: &str, proxy_base: &str) -> String {
    let html = HREF_RE.replace_all(html, |caps: &Captures| {
        format!("href=\"{}\"", proxied_url(proxy_base, &caps[1]))
    });
    let html = SRC_RE.replace_all(&html, |caps: &Captures| {
        format!("src=\"{}\"", proxied_url(proxy_base, &caps[1]))
    });
    let html = rewrite_in_tag(&LINK_HREF_RE, &html, proxy_base);
    rewrite_in_tag(&SCRIPT_SRC_RE, &html, proxy_base)
}

/// Replace the captured URL inside each match of `re`, leaving the rest of the
/// matched tag text intact.
fn rewrite_in_tag(re: &Regex, html: &str, proxy_base: &str) -> String {
    let prefix = proxied_url(proxy_base, "");
    re.replace_all(html, |caps: &Captures| {
        let matched = &caps[0];
        let url = &caps[1];
        if url.starts_with(&prefix) {
            matched.to_string()
        } else {
            matched.replacen(url, &proxied_url(proxy_base, url), 1)
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://proxy.local/";

    #[test]
    fn test_anchor_rewritten_exactly_once() {
        let out = rewrite_links(r#"<a href="http://x.test/p">go</a>"#, BASE);
        let expected = r#"href="http://proxy.local/?u=http://x.test/p""#;

        assert!(out.contains(expected));
        assert_eq!(out.matches(expected).count(), 1);
        assert_eq!(out.matches("?u=").count(), 1);
    }

    #[test]
    fn test_src_rewritten() {
        let out = rewrite_links(r#"<img src="https://img.test/a.png">"#, BASE);
        assert_eq!(out, r#"<img src="http://proxy.local/?u=https://img.test/a.png">"#);
    }

    #[test]
    fn test_link_and_script_tags_not_double_wrapped() {
        let html = concat!(
            r#"<link rel="stylesheet" href="https://cdn.test/site.css">"#,
            r#"<script type="module" src="http://cdn.test/app.js"></script>"#,
        );
        let out = rewrite_links(html, BASE);

        assert_eq!(
            out,
            concat!(
                r#"<link rel="stylesheet" href="http://proxy.local/?u=https://cdn.test/site.css">"#,
                r#"<script type="module" src="http://proxy.local/?u=http://cdn.test/app.js"></script>"#,
            )
        );
    }

    #[test]
    fn test_relative_and_protocol_relative_untouched() {
        let html = r#"<a href="/local/path">a</a><a href="//cdn.test/a">b</a><img src="img/x.png">"#;
        assert_eq!(rewrite_links(html, BASE), html);
    }

    #[test]
    fn test_other_schemes_and_quoting_untouched() {
        let html = concat!(
            r#"<a href="mailto:me@x.test">m</a>"#,
            r#"<a href='http://single.test/'>s</a>"#,
            r#"<a href=http://bare.test/>b</a>"#,
            r#"<a href="HTTP://upper.test/">u</a>"#,
        );
        assert_eq!(rewrite_links(html, BASE), html);
    }

    #[test]
    fn test_multiple_attributes_in_one_document() {
        let html = r#"<a href="http://a.test/1"></a><a href="http://a.test/2"></a><img src="http://a.test/3">"#;
        let out = rewrite_links(html, BASE);

        assert!(out.contains(r#"href="http://proxy.local/?u=http://a.test/1""#));
        assert!(out.contains(r#"href="http://proxy.local/?u=http://a.test/2""#));
        assert!(out.contains(r#"src="http://proxy.local/?u=http://a.test/3""#));
        assert_eq!(out.matches("?u=").count(), 3);
    }

    #[test]
    fn test_target_query_is_inserted_verbatim() {
        let out = rewrite_links(r#"<a href="http://x.test/s?q=1&amp;r=2">"#, BASE);
        assert!(out.contains(r#"href="http://proxy.local/?u=http://x.test/s?q=1&amp;r=2""#));
    }

    #[test]
    fn test_dollar_in_base_is_literal() {
        let out = rewrite_links(r#"<a href="http://x.test/">"#, "http://p.test/$1/");
        assert!(out.contains(r#"href="http://p.test/$1/?u=http://x.test/""#));
    }

    #[test]
    fn test_proxied_url() {
        assert_eq!(
            proxied_url("https://relay.example/fetch", "http://x.test/"),
            "https://relay.example/fetch?u=http://x.test/"
        );
    }
}

//! HTML tags referencing stylesheets and scripts.

use crush_common::AssetKind;

use crate::asset::Attributes;

/// Attributes every stylesheet link carries unless the asset overrides them.
const STYLE_DEFAULTS: [(&str, &str); 3] = [
    ("media", "all"),
    ("type", "text/css"),
    ("rel", "stylesheet"),
];

/// Renders the tag for `kind`.
pub fn tag(kind: AssetKind, url: &str, attributes: &Attributes) -> String {
    match kind {
        AssetKind::Style => style_tag(url, attributes),
        AssetKind::Script => script_tag(url, attributes),
    }
}

/// `<link href="..." media="all" type="text/css" rel="stylesheet">` plus a newline.
///
/// Asset attributes come first; defaults are added for keys the asset does
/// not set.
pub fn style_tag(url: &str, attributes: &Attributes) -> String {
    let mut out = format!("<link href=\"{}\"", escape_html(url));
    push_attributes(&mut out, attributes);
    for (key, value) in STYLE_DEFAULTS {
        if !attributes.contains_key(key) {
            out.push_str(&format!(" {key}=\"{value}\""));
        }
    }
    out.push_str(">\n");
    out
}

/// `<script src="..."></script>` plus a newline.
pub fn script_tag(url: &str, attributes: &Attributes) -> String {
    let mut out = format!("<script src=\"{}\"", escape_html(url));
    push_attributes(&mut out, attributes);
    out.push_str("></script>\n");
    out
}

fn push_attributes(out: &mut String, attributes: &Attributes) {
    for (key, value) in attributes {
        out.push_str(&format!(" {}=\"{}\"", escape_html(key), escape_html(value)));
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn style_with_defaults() {
        assert_eq!(
            style_tag("/cache/0123456789abcdef.css", &Attributes::new()),
            "<link href=\"/cache/0123456789abcdef.css\" media=\"all\" type=\"text/css\" rel=\"stylesheet\">\n"
        );
    }

    #[test]
    fn style_attribute_overrides_default() {
        let tag = style_tag("/a.css", &attrs(&[("media", "print")]));
        assert_eq!(
            tag,
            "<link href=\"/a.css\" media=\"print\" type=\"text/css\" rel=\"stylesheet\">\n"
        );
    }

    #[test]
    fn script_with_attributes() {
        let tag = script_tag("/cache/x.js", &attrs(&[("defer", "defer"), ("async", "async")]));
        assert_eq!(
            tag,
            "<script src=\"/cache/x.js\" async=\"async\" defer=\"defer\"></script>\n"
        );
    }

    #[test]
    fn values_are_escaped() {
        let tag = script_tag("/a.js?x=1&y=2", &attrs(&[("data-x", "\"><script>")]));
        assert!(tag.contains("src=\"/a.js?x=1&amp;y=2\""));
        assert!(tag.contains("data-x=\"&quot;&gt;&lt;script&gt;\""));
    }

    #[test]
    fn tag_dispatches_on_kind() {
        assert!(tag(AssetKind::Style, "/a.css", &Attributes::new()).starts_with("<link"));
        assert!(tag(AssetKind::Script, "/a.js", &Attributes::new()).starts_with("<script"));
    }
}

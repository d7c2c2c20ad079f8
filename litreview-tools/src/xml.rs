//! Minimal XML scanning helpers for the Atom and E-utilities responses.
//!
//! These are not a general XML parser. They find elements by name, slice
//! their inner content, and turn that content into plain text. Nested
//! elements of the *same* name are not supported, which neither feed uses.

/// Locate the next opening tag `<tag ...>` at or after `from`.
///
/// Returns `(tag_start, content_start, self_closing)`. The name must be
/// followed by `>`, `/` or whitespace, so `<Author` never matches
/// `<AuthorList>`.
fn find_open_tag(xml: &str, tag: &str, from: usize) -> Option<(usize, usize, bool)> {
    let needle = format!("<{tag}");
    let mut search = from;
    while let Some(pos) = xml.get(search..)?.find(&needle) {
        let start = search + pos;
        let after = start + needle.len();
        match xml[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => {
                let close = xml[after..].find('>')? + after;
                let self_closing = xml[..close].ends_with('/');
                return Some((start, close + 1, self_closing));
            }
            _ => search = after,
        }
    }
    None
}

/// Extract the inner content of every `<tag>...</tag>` block, in document order.
///
/// Self-closing elements yield an empty string.
pub fn extract_blocks<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let close = format!("</{tag}>");
    let mut blocks = Vec::new();
    let mut search = 0;

    while let Some((_, content_start, self_closing)) = find_open_tag(xml, tag, search) {
        if self_closing {
            blocks.push("");
            search = content_start;
            continue;
        }
        let Some(end) = xml[content_start..].find(&close) else {
            break;
        };
        let content_end = content_start + end;
        blocks.push(&xml[content_start..content_end]);
        search = content_end + close.len();
    }

    blocks
}

/// Extract the raw, trimmed inner content of the first `<tag>` element.
pub fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    extract_blocks(xml, tag)
        .into_iter()
        .next()
        .map(|inner| inner.trim().to_string())
}

/// Extract the first `<tag>` element as plain text: inline markup removed,
/// entities decoded, whitespace collapsed. Empty text is `None`.
pub fn extract_text(xml: &str, tag: &str) -> Option<String> {
    let raw = extract_tag_text(xml, tag)?;
    let text = normalize_whitespace(&decode_entities(&strip_tags(&raw)));
    (!text.is_empty()).then_some(text)
}

/// Extract an attribute value from the opening tag of an element string.
pub fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    let search = format!("{attr}=\"");
    let start = tag.find(&search)? + search.len();
    let end = tag[start..].find('"')? + start;
    Some(decode_entities(&tag[start..end]))
}

/// Remove every `<...>` markup run, keeping the text between them.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the predefined XML entities and numeric character references.
///
/// Unknown or malformed references are left as written.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Normalize whitespace: collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_blocks_respects_tag_boundaries() {
        let xml = "<AuthorList><Author><LastName>Li</LastName></Author>\
                   <Author ValidYN=\"Y\"><LastName>Ng</LastName></Author></AuthorList>";
        let blocks = extract_blocks(xml, "Author");
        assert_eq!(blocks.len(), 2);
        assert_eq!(extract_tag_text(blocks[1], "LastName").as_deref(), Some("Ng"));

        let lists = extract_blocks(xml, "AuthorList");
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn test_self_closing_block_is_empty() {
        let xml = "<a><AbstractText/><AbstractText>Second</AbstractText></a>";
        assert_eq!(extract_blocks(xml, "AbstractText"), vec!["", "Second"]);
    }

    #[test]
    fn test_extract_tag_text_missing() {
        assert!(extract_tag_text("<a>b</a>", "c").is_none());
        assert!(extract_tag_text("<a>unterminated", "a").is_none());
    }

    #[test]
    fn test_extract_text_strips_markup_and_entities() {
        let xml = "<ArticleTitle>Effects of <i>E. coli</i> &amp; \n  friends &#x3B1;</ArticleTitle>";
        assert_eq!(
            extract_text(xml, "ArticleTitle").as_deref(),
            Some("Effects of E. coli & friends α")
        );
        assert!(extract_text("<t>   </t>", "t").is_none());
    }

    #[test]
    fn test_extract_attribute() {
        let tag = r#"<link href="http://arxiv.org/pdf/1706.03762v7" title="pdf"/>"#;
        assert_eq!(
            extract_attribute(tag, "href").as_deref(),
            Some("http://arxiv.org/pdf/1706.03762v7")
        );
        assert!(extract_attribute(tag, "rel").is_none());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt; b &gt; c"), "a < b > c");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("R&D &unknown; & done"), "R&D &unknown; & done");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\t b   c "), "a b c");
    }
}

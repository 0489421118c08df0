//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Table of contents generator
///
/// Walks rendered HTML for `<h1>`..`<h6>` headings up to `max_depth` and
/// builds a nested list linking to the anchors the markdown renderer emits.
pub fn toc(content: &str, max_depth: usize) -> String {
    let mut html = r#"<ol class="toc">"#.to_string();
    let mut current_level = 0;

    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<' && i + 3 < chars.len() && chars[i + 1] == 'h' {
            if let Some(level) = chars[i + 2].to_digit(10) {
                let level = level as usize;
                if level <= max_depth {
                    // Find the closing > of the opening tag
                    if let Some(start) = chars[i..].iter().position(|&c| c == '>') {
                        let start = i + start + 1;
                        let end_tag = format!("</h{}>", level);
                        let end_chars: Vec<char> = end_tag.chars().collect();

                        if let Some(end) = find_sequence(&chars[start..], &end_chars) {
                            let heading: String = chars[start..start + end].iter().collect();
                            let heading = strip_html(&heading);

                            while current_level < level {
                                html.push_str("<ol>");
                                current_level += 1;
                            }
                            while current_level > level {
                                html.push_str("</ol>");
                                current_level -= 1;
                            }

                            let id = slug::slugify(&heading);
                            html.push_str(&format!(
                                "<li class=\"toc-item toc-level-{}\"><a class=\"toc-link\" href=\"#{}\"><span class=\"toc-text\">{}</span></a></li>",
                                level, id, heading
                            ));

                            i = start + end + end_chars.len();
                            continue;
                        }
                    }
                }
            }
        }
        i += 1;
    }

    while current_level > 0 {
        html.push_str("</ol>");
        current_level -= 1;
    }

    html.push_str("</ol>");
    html
}

fn find_sequence(haystack: &[char], needle: &[char]) -> Option<usize> {
    'outer: for i in 0..haystack.len() {
        if i + needle.len() > haystack.len() {
            return None;
        }
        for j in 0..needle.len() {
            if haystack[i + j] != needle[j] {
                continue 'outer;
            }
        }
        return Some(i);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }

    #[test]
    fn test_toc_links_headings() {
        let html = r#"<h2 id="avoid-globals">Avoid globals</h2><p>x</p><h3 id="why">Why</h3>"#;
        let toc_html = toc(html, 3);
        assert!(toc_html.contains(r##"href="#avoid-globals""##));
        assert!(toc_html.contains("toc-level-2"));
        assert!(toc_html.contains("toc-level-3"));
    }

    #[test]
    fn test_toc_respects_max_depth() {
        let html = r#"<h2 id="a">A</h2><h4 id="deep">Deep</h4>"#;
        let toc_html = toc(html, 3);
        assert!(!toc_html.contains("Deep"));
    }
}

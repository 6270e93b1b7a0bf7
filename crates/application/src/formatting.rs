//! Message formatting for display and speech
//!
//! Two one-way renderings of bot text:
//! - [`format_message`] produces display HTML: escaped text with bare
//!   http(s) URLs turned into anchors and newlines into `<br>`
//! - [`clean_for_speech`] produces a speakable string: markup stripped,
//!   newlines folded into sentence pauses, whitespace collapsed
//!
//! `clean_for_speech` is idempotent: feeding its output back through it
//! yields the same string.

/// Render bot text as display HTML
///
/// Escapes HTML-significant characters, then wraps bare `http://` and
/// `https://` URLs in anchor tags and replaces newlines with `<br>`.
/// Escaping happens before linkification, so URLs in the source text
/// cannot smuggle markup through.
#[must_use]
pub fn format_message(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = find_url_start(rest) {
        push_escaped(&mut html, &rest[..start]);

        let after = &rest[start..];
        let end = after
            .find(char::is_whitespace)
            .unwrap_or(after.len());
        let url = &after[..end];

        html.push_str("<a href=\"");
        push_escaped(&mut html, url);
        html.push_str("\" target=\"_blank\">");
        push_escaped(&mut html, url);
        html.push_str("</a>");

        rest = &after[end..];
    }
    push_escaped(&mut html, rest);

    html.replace('\n', "<br>")
}

/// Render bot text as a speakable string
///
/// Strips complete `<...>` tag spans, folds newlines into sentence pauses,
/// and collapses runs of whitespace. The result is trimmed and never
/// contains markup or newlines, so applying this twice equals applying it
/// once.
#[must_use]
pub fn clean_for_speech(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        stripped.push_str(&rest[..open]);
        match rest[open..].find('>') {
            // Drop the whole tag span
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                stripped.push_str(&rest[open..]);
                rest = "";
            },
        }
    }
    stripped.push_str(rest);

    let paused = stripped.replace('\n', ". ");

    let mut cleaned = String::with_capacity(paused.len());
    let mut in_whitespace = false;
    for ch in paused.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else {
            if in_whitespace && !cleaned.is_empty() {
                cleaned.push(' ');
            }
            in_whitespace = false;
            cleaned.push(ch);
        }
    }
    cleaned
}

fn find_url_start(text: &str) -> Option<usize> {
    let http = text.find("http://");
    let https = text.find("https://");
    match (http, https) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_characters() {
        assert_eq!(
            format_message("a <b> & \"c\""),
            "a &lt;b&gt; &amp; &quot;c&quot;"
        );
    }

    #[test]
    fn linkifies_bare_urls() {
        let html = format_message("see https://example.com/recipes for more");
        assert_eq!(
            html,
            "see <a href=\"https://example.com/recipes\" target=\"_blank\">\
             https://example.com/recipes</a> for more"
        );
    }

    #[test]
    fn linkified_url_is_escaped_in_both_positions() {
        let html = format_message("https://example.com/?a=1&b=2");
        assert_eq!(
            html,
            "<a href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\">\
             https://example.com/?a=1&amp;b=2</a>"
        );
    }

    #[test]
    fn newlines_become_line_breaks() {
        assert_eq!(format_message("step 1\nstep 2"), "step 1<br>step 2");
    }

    #[test]
    fn url_ends_at_whitespace() {
        let html = format_message("http://a.test\nnext");
        assert_eq!(
            html,
            "<a href=\"http://a.test\" target=\"_blank\">http://a.test</a><br>next"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(format_message("just text"), "just text");
    }

    #[test]
    fn speech_strips_tags() {
        assert_eq!(
            clean_for_speech("Try the <b>garlic</b> pasta"),
            "Try the garlic pasta"
        );
    }

    #[test]
    fn speech_folds_newlines_into_pauses() {
        assert_eq!(clean_for_speech("Step one\nStep two"), "Step one. Step two");
    }

    #[test]
    fn speech_collapses_whitespace() {
        assert_eq!(clean_for_speech("  a \t b\n  c "), "a b. c");
    }

    #[test]
    fn speech_keeps_lone_angle_bracket() {
        assert_eq!(clean_for_speech("5 < 7"), "5 < 7");
    }

    #[test]
    fn speech_on_empty_input_is_empty() {
        assert_eq!(clean_for_speech(""), "");
        assert_eq!(clean_for_speech("   \n  "), ".");
    }

    #[test]
    fn speech_is_idempotent_on_samples() {
        let samples = [
            "Try the <b>garlic</b> pasta\nwith <i>basil</i>",
            "  spaced   out\n\ntext ",
            "5 < 7 but 9 > 8",
            "plain",
        ];
        for sample in samples {
            let once = clean_for_speech(sample);
            assert_eq!(clean_for_speech(&once), once, "input: {sample:?}");
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn clean_for_speech_is_idempotent(text in ".{0,200}") {
                let once = clean_for_speech(&text);
                prop_assert_eq!(clean_for_speech(&once), once.clone());
            }

            #[test]
            fn clean_output_has_no_newlines_or_tags(text in ".{0,200}") {
                let cleaned = clean_for_speech(&text);
                prop_assert!(!cleaned.contains('\n'));
                prop_assert!(!cleaned.contains("  "));
            }

            #[test]
            fn formatted_output_never_leaks_raw_angle_brackets(
                text in "[a-z <>&\"\n]{0,80}"
            ) {
                let html = format_message(&text);
                let without_markup = html
                    .replace("<br>", "")
                    .replace("&lt;", "")
                    .replace("&gt;", "");
                prop_assert!(!without_markup.contains('<'));
                prop_assert!(!without_markup.contains('>'));
            }
        }
    }
}

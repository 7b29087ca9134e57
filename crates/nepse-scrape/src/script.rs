//! JavaScript snippets evaluated in the page.
//!
//! Every snippet is a single expression that evaluates to a concrete JSON
//! value (never `undefined`). User-supplied strings are only ever placed
//! inside string literals, escaped with [`js_string`].

/// Escape a string for use inside a single-quoted JS literal.
pub fn js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}
            '<' => result.push_str("\\x3c"),
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}

/// `true` once an element matching `selector` is in the DOM.
pub fn element_present(selector: &str) -> String {
    format!(
        "document.querySelector('{}') !== null",
        js_string(selector)
    )
}

/// `true` when no element matching `selector` is displayed.
pub fn element_hidden(selector: &str) -> String {
    format!(
        r#"(() => {{
            const els = [...document.querySelectorAll('{}')];
            return els.every(el => el.offsetParent === null || getComputedStyle(el).display === 'none');
        }})()"#,
        js_string(selector)
    )
}

/// `true` if the page body contains `text`.
pub fn body_contains(text: &str) -> String {
    format!(
        "(document.body ? document.body.innerText : '').includes('{}')",
        js_string(text)
    )
}

/// Overwrite an input's value without keystrokes, then fire the events a
/// date-picker listens to. Evaluates to `false` if the input is missing.
pub fn set_input_value(selector: &str, value: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return false;
            el.value = '';
            el.value = '{}';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            el.blur();
            return true;
        }})()"#,
        js_string(selector),
        js_string(value)
    )
}

/// Same as [`set_input_value`] for the `index`-th matching input.
pub fn set_nth_input_value(selector: &str, index: usize, value: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelectorAll('{}')[{}];
            if (!el) return false;
            el.value = '';
            el.value = '{}';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            el.blur();
            return true;
        }})()"#,
        js_string(selector),
        index,
        js_string(value)
    )
}

/// Number of elements matching `selector`.
pub fn count(selector: &str) -> String {
    format!(
        "document.querySelectorAll('{}').length",
        js_string(selector)
    )
}

/// Click through script so overlays cannot intercept the event.
pub fn click(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        js_string(selector)
    )
}

/// Click the first button whose text contains `label`.
pub fn click_button_with_text(label: &str) -> String {
    format!(
        r#"(() => {{
            const btn = [...document.querySelectorAll('button')]
                .find(b => b.textContent.includes('{}'));
            if (!btn) return false;
            btn.click();
            return true;
        }})()"#,
        js_string(label)
    )
}

/// Outer HTML of the first element matching `selector`, or `""`.
pub fn outer_html(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            return el ? el.outerHTML : '';
        }})()"#,
        js_string(selector)
    )
}

/// Find an enabled pagination control labelled `label` and click it.
/// Evaluates to `false` when there is none, which ends pagination.
pub fn click_next(label: &str) -> String {
    format!(
        r#"(() => {{
            const wanted = '{}'.toLowerCase();
            const candidates = [...document.querySelectorAll('a, button, li')];
            const el = candidates.find(c => {{
                const text = (c.innerText || c.textContent || '').trim().toLowerCase();
                return text === wanted && c.children.length <= 1;
            }});
            if (!el) return false;
            const disabled = el.disabled
                || el.getAttribute('aria-disabled') === 'true'
                || el.classList.contains('disabled')
                || (el.parentElement && el.parentElement.classList.contains('disabled'));
            if (disabled) return false;
            const target = el.tagName === 'LI' && el.querySelector('a') ? el.querySelector('a') : el;
            target.click();
            return true;
        }})()"#,
        js_string(label)
    )
}

/// Cheap fingerprint of an element's HTML (`"<len>:<hash>"`), or `""` if
/// the element is missing.
pub fn signature(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return '';
            const html = el.outerHTML;
            let h = 0;
            for (let i = 0; i < html.length; i++) {{
                h = (h * 31 + html.charCodeAt(i)) | 0;
            }}
            return html.length + ':' + h;
        }})()"#,
        js_string(selector)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_basic() {
        assert_eq!(js_string("hello"), "hello");
        assert_eq!(js_string("it's"), "it\\'s");
        assert_eq!(js_string("a\"b"), "a\\\"b");
        assert_eq!(js_string("abc\0def"), "abcdef");
    }

    #[test]
    fn test_js_string_blocks_script_close() {
        let s = js_string("</script>");
        assert!(!s.contains("</script>"));
        assert!(s.contains("\\x3c/script\\x3e"));
    }

    #[test]
    fn test_selector_is_quoted() {
        let js = element_present("input[name='date']");
        assert_eq!(js, "document.querySelector('input[name=\\'date\\']') !== null");
    }

    #[test]
    fn test_set_input_value_embeds_both() {
        let js = set_input_value("#fromdate", "2024-01-31");
        assert!(js.contains("querySelector('#fromdate')"));
        assert!(js.contains("el.value = '2024-01-31'"));
        assert!(js.contains("'change'"));
    }

    #[test]
    fn test_nth_input_index() {
        let js = set_nth_input_value("input", 1, "01/31/2024");
        assert!(js.contains("querySelectorAll('input')[1]"));
        assert!(js.contains("01/31/2024"));
    }

    #[test]
    fn test_click_next_label() {
        let js = click_next("Next");
        assert!(js.contains("'Next'.toLowerCase()"));
        assert!(js.contains("disabled"));
    }
}

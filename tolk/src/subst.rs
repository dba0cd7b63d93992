//! Old-style `%(name)s` placeholder substitution.
//!
//! Catalog entries keep the placeholder syntax of their source strings, so
//! substitution runs *after* translation. Single pass; a replacement value
//! is never re-scanned for placeholders.

/// Replace `%(name)X` placeholders with values from `vars` and collapse
/// `%%` to `%`. Placeholders without a matching variable, bare positional
/// conversions (`%s`), and malformed tokens are left untouched.
pub(crate) fn subst(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('(') => {
                chars.next();
                let mut key = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ')' {
                        closed = true;
                        break;
                    }
                    key.push(c);
                }
                let conversion = if closed { chars.next() } else { None };
                match conversion {
                    Some(conv) if closed => {
                        if let Some(&(_, value)) =
                            vars.iter().find(|&&(name, _)| name == key)
                        {
                            out.push_str(value);
                        } else {
                            out.push_str("%(");
                            out.push_str(&key);
                            out.push(')');
                            out.push(conv);
                        }
                    }
                    _ => {
                        // truncated token at end of input
                        out.push_str("%(");
                        out.push_str(&key);
                        if closed {
                            out.push(')');
                        }
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

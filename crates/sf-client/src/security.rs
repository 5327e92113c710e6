//! Security and encoding utilities for Salesforce API requests.
//!
//! ## SOQL Injection Prevention
//!
//! User-provided values placed inside SOQL string literals MUST be escaped:
//!
//! ```rust
//! use sf_compose_client::security::soql;
//!
//! let name = soql::escape_string("O'Brien");
//! let query = format!("SELECT Id FROM Account WHERE Name = '{}'", name);
//! assert_eq!(query, "SELECT Id FROM Account WHERE Name = 'O\\'Brien'");
//! ```
//!
//! ## Query-string encoding
//!
//! Two encoders live in [`url`]: a strict one for `key=value` query strings and
//! a form-style one for free-text SOQL where whitespace becomes `+`.

/// SOQL escaping utilities for injection prevention.
pub mod soql {
    /// Escape a string value for use in SOQL queries.
    ///
    /// This function escapes characters that have special meaning in SOQL string literals:
    /// - Single quotes (`'`) are escaped to (`\'`)
    /// - Backslashes (`\`) are escaped to (`\\`)
    /// - Newlines are escaped to (`\n`)
    /// - Carriage returns are escaped to (`\r`)
    /// - Tabs are escaped to (`\t`)
    ///
    /// # Example
    ///
    /// ```rust
    /// use sf_compose_client::security::soql;
    ///
    /// let safe = soql::escape_string("O'Brien & Co.");
    /// assert_eq!(safe, "O\\'Brien & Co.");
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\'' => escaped.push_str("\\'"),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Escape a value for use in a SOQL LIKE clause.
    ///
    /// In addition to standard string escaping, this also escapes
    /// LIKE wildcards (`%` and `_`) to prevent pattern injection.
    #[must_use]
    pub fn escape_like(value: &str) -> String {
        let base_escaped = escape_string(value);
        let mut escaped = String::with_capacity(base_escaped.len() + 8);
        for ch in base_escaped.chars() {
            match ch {
                '%' => escaped.push_str("\\%"),
                '_' => escaped.push_str("\\_"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}

/// URL encoding utilities.
pub mod url {
    /// Percent-encode one value, keeping only RFC 3986 unreserved characters.
    ///
    /// ```rust
    /// use sf_compose_client::security::url;
    ///
    /// assert_eq!(url::encode_param("001/../x"), "001%2F..%2Fx");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// Encode `key=value` pairs joined by `&`, in the given order.
    ///
    /// Keys and values go through [`encode_param`], so a space becomes `%20`.
    ///
    /// ```rust
    /// use sf_compose_client::security::url;
    ///
    /// let qs = url::encode_query_string([("fields", "Name,Phone"), ("q", "a b")]);
    /// assert_eq!(qs, "fields=Name%2CPhone&q=a%20b");
    /// ```
    #[must_use]
    pub fn encode_query_string<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| {
                format!("{}={}", encode_param(key.as_ref()), encode_param(value.as_ref()))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Encode free query text (SOQL) for a `q=` parameter.
    ///
    /// Every whitespace character becomes `+`. Characters allowed in an RFC 3986
    /// query component are kept as-is, except `&`, `+`, `#` and `%`, which are
    /// percent-encoded together with everything outside that set. Braces are
    /// kept so composite references such as `@{NewLead.id}` stay readable to the server.
    ///
    /// ```rust
    /// use sf_compose_client::security::url;
    ///
    /// assert_eq!(
    ///     url::encode_query_text("select id from contact where name = 'Howard Jones'"),
    ///     "select+id+from+contact+where+name+=+'Howard+Jones'"
    /// );
    /// ```
    #[must_use]
    pub fn encode_query_text(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            if ch.is_whitespace() {
                out.push('+');
            } else if ch.is_ascii_alphanumeric() || "-._~!$'()*,;=:@/?{}".contains(ch) {
                out.push(ch);
            } else {
                out.push_str(&encode_param(ch.encode_utf8(&mut buf)));
            }
        }
        out
    }
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// This function:
/// - Truncates messages longer than 500 characters
/// - Removes potential tokens (anything that looks like an access token)
/// - Removes potential session IDs
/// - Masks `password=` / `client_secret=` form fields
pub fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    // Salesforce tokens start with the org id ("00D...") followed by '!'
    if let Ok(token_pattern) = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+") {
        sanitized = token_pattern
            .replace_all(&sanitized, "[REDACTED_TOKEN]")
            .to_string();
    }

    if let Ok(session_pattern) = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}") {
        sanitized = session_pattern
            .replace_all(&sanitized, "sid=[REDACTED]")
            .to_string();
    }

    if let Ok(secret_pattern) = regex_lite::Regex::new(r"(password|client_secret)=[^&\s]*") {
        sanitized = secret_pattern
            .replace_all(&sanitized, "$1=[REDACTED]")
            .to_string();
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

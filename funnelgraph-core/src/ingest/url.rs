//! URL helpers: site name and query arguments.

use std::collections::HashMap;

/// Host part of an absolute URL (`scheme://host/...`), port included.
pub fn host(url: &str) -> Option<&str> {
    let host = url.split('/').nth(2)?;
    Some(host.split(['?', '#']).next().unwrap_or(host))
}

/// Site name of a URL: the label left of the top-level domain.
///
/// `http://shop.example.com/x` gives `example`. A host without dots is
/// returned unchanged; a port is ignored.
pub fn subdomain(url: &str) -> Option<String> {
    let host = host(url)?;
    let mut labels = host.rsplit('.');
    let last = labels.next()?;
    Some(labels.next().unwrap_or(last).to_string())
}

/// Percent-decoded `key=value` pairs of the query string.
///
/// Keys without `=` map to an empty value. Later duplicates win.
pub fn query_args(url: &str) -> HashMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashMap::new();
    };
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s,
    }
}

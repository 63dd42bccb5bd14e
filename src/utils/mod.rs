//! Project-specific utilities live here.

/// Join a base URL and path segments with exactly one `/` between parts.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_separators() {
        assert_eq!(
            join_url("http://localhost:3333/", &["books", "7"]),
            "http://localhost:3333/books/7"
        );
        assert_eq!(
            join_url("http://gw:8080", &["/api/", "categories"]),
            "http://gw:8080/api/categories"
        );
        assert_eq!(join_url("http://gw:8080", &[""]), "http://gw:8080");
    }
}

use url::Url;

/// Resolve a discovered href into an absolute URL
///
/// An href that parses on its own is used as-is; anything else is joined
/// onto `base_url`. Returns `None` when neither works.
pub fn resolve(raw_href: &str, base_url: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(raw_href) {
        return Some(absolute.to_string());
    }

    match Url::parse(base_url).and_then(|base| base.join(raw_href)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            ::log::debug!("Cannot resolve {:?} against {}: {}", raw_href, base_url, e);
            None
        }
    }
}

/// Whether a resolved URL should be fetched as a hop page
pub fn is_hop_eligible(url: &str) -> bool {
    url.starts_with("http")
}

/// A link from the root page, resolved and classified for hop fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopTarget {
    Fetch(String),
    Skip(String),
}

/// Resolve every link in discovery order, duplicates included
pub fn hop_targets(links: &[String], base_url: &str) -> Vec<HopTarget> {
    links
        .iter()
        .map(|link| match resolve(link, base_url) {
            Some(url) if is_hop_eligible(&url) => HopTarget::Fetch(url),
            Some(url) => {
                ::log::debug!("Not following non-http link: {}", url);
                HopTarget::Skip(link.clone())
            }
            None => {
                ::log::warn!("Skipping unresolvable link: {}", link);
                HopTarget::Skip(link.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_href_is_used_verbatim() {
        let resolved = resolve("https://other.com/page?q=1", "http://root.test/").unwrap();
        assert_eq!(resolved, "https://other.com/page?q=1");
    }

    #[test]
    fn test_absolute_href_is_normalized() {
        let resolved = resolve("http://root.test", "http://base.test/").unwrap();
        assert_eq!(resolved, "http://root.test/");
    }

    #[test]
    fn test_relative_href_resolves_against_base() {
        assert_eq!(
            resolve("/x", "http://root.test/dir/page").unwrap(),
            "http://root.test/x"
        );
        assert_eq!(
            resolve("sibling", "http://root.test/dir/page").unwrap(),
            "http://root.test/dir/sibling"
        );
    }

    #[test]
    fn test_unresolvable_href() {
        assert!(resolve("/x", "not a base").is_none());
    }

    #[test]
    fn test_hop_eligibility_is_a_prefix_check() {
        assert!(is_hop_eligible("http://root.test/"));
        assert!(is_hop_eligible("https://root.test/"));
        assert!(!is_hop_eligible("mailto:someone@root.test"));
        assert!(!is_hop_eligible("javascript:void(0)"));
        assert!(!is_hop_eligible("ftp://root.test/file"));
    }

    #[test]
    fn test_hop_targets_keep_order_and_duplicates() {
        let links = vec![
            "http://root.test/home".to_string(),
            "mailto:me@root.test".to_string(),
            "/about".to_string(),
            "http://root.test/home".to_string(),
        ];
        let targets = hop_targets(&links, "http://root.test/");
        assert_eq!(
            targets,
            vec![
                HopTarget::Fetch("http://root.test/home".to_string()),
                HopTarget::Skip("mailto:me@root.test".to_string()),
                HopTarget::Fetch("http://root.test/about".to_string()),
                HopTarget::Fetch("http://root.test/home".to_string()),
            ]
        );
    }
}

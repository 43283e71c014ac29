use crate::error::CompareError;
use crate::release::http::HttpClient;
use serde::Deserialize;

/// Tag listing of the upstream Bootstrap repository, newest first.
pub const BOOTSTRAP_TAGS_URL: &str = "https://api.github.com/repos/twbs/bootstrap/tags?per_page=100";

/// The parts of a hosting-API tag entry the tooling uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagData {
    pub name: String,
    pub zipball_url: String,
}

/// Pick the tag for `version` out of a newest-first listing.
///
/// With no version the newest tag wins. A version matches a tag named
/// exactly like it or like it with a `v` in front (`4.5.0` finds `v4.5.0`).
pub fn select_tag(tags: Vec<TagData>, version: Option<&str>) -> Result<TagData, CompareError> {
    let Some(version) = version else {
        return tags
            .into_iter()
            .next()
            .ok_or_else(|| CompareError::Resolution("No tags found".to_string()));
    };

    let prefixed = format!("v{}", version);
    tags.into_iter()
        .find(|tag| tag.name == version || tag.name == prefixed)
        .ok_or_else(|| CompareError::Resolution(format!("No tag found for version {}", version)))
}

/// Resolve `version` against the Bootstrap tag listing.
pub fn fetch_tag_data(
    client: &dyn HttpClient,
    version: Option<&str>,
) -> Result<TagData, CompareError> {
    fetch_tag_data_from(client, BOOTSTRAP_TAGS_URL, version)
}

pub fn fetch_tag_data_from(
    client: &dyn HttpClient,
    tags_url: &str,
    version: Option<&str>,
) -> Result<TagData, CompareError> {
    let mut response = client.get(tags_url)?;
    let body = response.body_text()?;

    if !response.is_success() {
        return Err(CompareError::Transport {
            status: response.status,
            body,
        });
    }

    let tags: Vec<TagData> = serde_json::from_str(&body)?;
    log::debug!("Fetched {} tags from {}", tags.len(), tags_url);
    select_tag(tags, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> TagData {
        TagData {
            name: name.to_string(),
            zipball_url: format!("https://api.github.com/repos/twbs/bootstrap/zipball/{}", name),
        }
    }

    #[test]
    fn test_select_newest_without_version() {
        let tags = vec![tag("v5.0.0"), tag("v4.6.0")];
        assert_eq!(select_tag(tags, None).unwrap().name, "v5.0.0");
    }

    #[test]
    fn test_select_with_and_without_v_prefix() {
        let tags = vec![tag("v5.0.0"), tag("v4.6.0")];
        assert_eq!(select_tag(tags.clone(), Some("4.6.0")).unwrap().name, "v4.6.0");
        assert_eq!(select_tag(tags, Some("v4.6.0")).unwrap().name, "v4.6.0");
    }

    #[test]
    fn test_select_unknown_version() {
        let err = select_tag(vec![tag("v5.0.0")], Some("3.0.0")).unwrap_err();
        assert!(matches!(err, CompareError::Resolution(_)));
        assert_eq!(err.to_string(), "No tag found for version 3.0.0");
    }

    #[test]
    fn test_select_from_empty_listing() {
        assert!(matches!(
            select_tag(Vec::new(), None),
            Err(CompareError::Resolution(_))
        ));
    }
}

use serde::Deserialize;

/// A package as returned by the origin-API listing endpoints.
///
/// Every field the proxy relies on is optional on the wire; records missing
/// any of them are skipped, never surfaced as errors.
#[derive(Clone, Debug, Deserialize)]
pub struct Package {
    pub name: Option<String>,
    pub owner: Option<PackageOwner>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PackageOwner {
    pub login: Option<String>,
}

/// One concrete revision of a package.
#[derive(Clone, Debug, Deserialize)]
pub struct PackageVersion {
    pub id: u64,
    pub metadata: Option<VersionMetadata>,
}

/// Per-version metadata; `container` is present only for container images.
#[derive(Clone, Debug, Deserialize)]
pub struct VersionMetadata {
    pub container: Option<ContainerMetadata>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContainerMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_with_missing_fields_deserializes() {
        let package: Package = serde_json::from_str(r#"{"name":null,"owner":{"login":null}}"#)
            .expect("should deserialize");

        assert!(package.name.is_none());
        assert!(package.owner.expect("owner should be present").login.is_none());
    }

    #[test]
    fn test_package_ignores_unknown_fields() {
        let raw = r#"{"id":42,"name":"alpha","owner":{"login":"u1","id":7},"visibility":"private"}"#;
        let package: Package = serde_json::from_str(raw).expect("should deserialize");

        assert_eq!(package.name.as_deref(), Some("alpha"));
        assert_eq!(
            package.owner.and_then(|owner| owner.login).as_deref(),
            Some("u1")
        );
    }

    #[test]
    fn test_version_without_container_metadata() {
        let version: PackageVersion =
            serde_json::from_str(r#"{"id":1,"metadata":{"package_type":"npm"}}"#)
                .expect("should deserialize");

        assert_eq!(version.id, 1);
        assert!(version.metadata.expect("metadata present").container.is_none());
    }

    #[test]
    fn test_version_with_container_tags() {
        let raw = r#"{"id":2,"metadata":{"package_type":"container","container":{"tags":["latest","v1"]}}}"#;
        let version: PackageVersion = serde_json::from_str(raw).expect("should deserialize");

        let container = version
            .metadata
            .and_then(|metadata| metadata.container)
            .expect("container metadata present");
        assert_eq!(container.tags, ["latest", "v1"]);
    }

    #[test]
    fn test_container_tags_default_to_empty() {
        let container: ContainerMetadata =
            serde_json::from_str("{}").expect("should deserialize");

        assert!(container.tags.is_empty());
    }
}

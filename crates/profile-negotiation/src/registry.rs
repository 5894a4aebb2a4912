//! Per-resource-kind profile registry.
//!
//! The registry is populated once during start-up and only read afterwards,
//! so it is shared behind an `Arc` without any locking.

use std::collections::{HashMap, HashSet};

use crate::errors::ConfigurationError;
use crate::profiles::ProfileDescriptor;

/// Immutable table of profiles, keyed by resource kind.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    kinds: HashMap<String, Vec<ProfileDescriptor>>,
    /// Registration order of the resource kinds.
    order: Vec<String>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the profiles for a resource kind.
    ///
    /// Rejects the list unless it is non-empty, has unique tokens, exactly one
    /// default profile, and every profile has at least one media type with
    /// exactly one marked default.
    pub fn register(
        &mut self,
        resource_kind: impl Into<String>,
        descriptors: Vec<ProfileDescriptor>,
    ) -> Result<(), ConfigurationError> {
        let kind = resource_kind.into();
        if self.kinds.contains_key(&kind) {
            return Err(ConfigurationError::DuplicateResourceKind(kind));
        }

        validate(&kind, &descriptors)?;

        self.order.push(kind.clone());
        self.kinds.insert(kind, descriptors);
        Ok(())
    }

    /// Get the profiles registered for a resource kind, in registration order.
    pub fn lookup(&self, resource_kind: &str) -> Result<&[ProfileDescriptor], ConfigurationError> {
        self.kinds
            .get(resource_kind)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigurationError::UnknownResourceKind(resource_kind.to_string()))
    }

    /// Whether the resource kind is registered.
    pub fn contains(&self, resource_kind: &str) -> bool {
        self.kinds.contains_key(resource_kind)
    }

    /// Registered resource kinds, in registration order.
    pub fn resource_kinds(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered resource kinds.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no resource kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn validate(kind: &str, descriptors: &[ProfileDescriptor]) -> Result<(), ConfigurationError> {
    if descriptors.is_empty() {
        return Err(ConfigurationError::NoProfiles(kind.to_string()));
    }

    let mut seen = HashSet::new();
    for profile in descriptors {
        if !seen.insert(profile.token.as_str()) {
            return Err(ConfigurationError::DuplicateToken {
                kind: kind.to_string(),
                token: profile.token.clone(),
            });
        }

        if profile.media_types.is_empty() {
            return Err(ConfigurationError::NoMediaTypes {
                kind: kind.to_string(),
                token: profile.token.clone(),
            });
        }

        let default_media_types = profile
            .media_types
            .iter()
            .filter(|m| m.is_default_for_profile)
            .count();
        if default_media_types != 1 {
            return Err(ConfigurationError::DefaultMediaTypeCount {
                kind: kind.to_string(),
                token: profile.token.clone(),
                count: default_media_types,
            });
        }
    }

    let default_profiles = descriptors.iter().filter(|p| p.is_default).count();
    if default_profiles != 1 {
        return Err(ConfigurationError::DefaultProfileCount {
            kind: kind.to_string(),
            count: default_profiles,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::MediaTypeDescriptor;

    fn profile(token: &str) -> ProfileDescriptor {
        ProfileDescriptor::new(token, format!("http://example.com/def/{}", token), token)
            .with_media_type(MediaTypeDescriptor::default_type("text/turtle"))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ProfileRegistry::new();
        registry
            .register("stratunit", vec![profile("su").as_default(), profile("geosp")])
            .unwrap();

        let profiles = registry.lookup("stratunit").unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].token, "su");
        assert_eq!(profiles[1].token, "geosp");
        assert!(registry.contains("stratunit"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_kind() {
        let registry = ProfileRegistry::new();
        assert_eq!(
            registry.lookup("province"),
            Err(ConfigurationError::UnknownResourceKind("province".to_string()))
        );
    }

    #[test]
    fn test_reject_empty_profile_list() {
        let mut registry = ProfileRegistry::new();
        assert_eq!(
            registry.register("feature", Vec::new()),
            Err(ConfigurationError::NoProfiles("feature".to_string()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reject_duplicate_tokens() {
        let mut registry = ProfileRegistry::new();
        let err = registry
            .register("feature", vec![profile("geosp").as_default(), profile("geosp")])
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateToken { ref token, .. } if token == "geosp"));
    }

    #[test]
    fn test_reject_missing_default_profile() {
        let mut registry = ProfileRegistry::new();
        let err = registry
            .register("feature", vec![profile("geosp"), profile("oai")])
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DefaultProfileCount { count: 0, .. }));
    }

    #[test]
    fn test_reject_two_default_profiles() {
        let mut registry = ProfileRegistry::new();
        let err = registry
            .register(
                "feature",
                vec![profile("geosp").as_default(), profile("oai").as_default()],
            )
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DefaultProfileCount { count: 2, .. }));
    }

    #[test]
    fn test_reject_default_media_type_violations() {
        let mut registry = ProfileRegistry::new();

        let no_default = ProfileDescriptor::new("geosp", "http://example.com/geosp", "GeoSPARQL")
            .with_media_types(["text/turtle", "application/ld+json"])
            .as_default();
        let err = registry.register("feature", vec![no_default]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DefaultMediaTypeCount { count: 0, .. }
        ));

        let two_defaults = ProfileDescriptor::new("geosp", "http://example.com/geosp", "GeoSPARQL")
            .with_media_type(MediaTypeDescriptor::default_type("text/turtle"))
            .with_media_type(MediaTypeDescriptor::default_type("application/ld+json"))
            .as_default();
        let err = registry.register("feature", vec![two_defaults]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DefaultMediaTypeCount { count: 2, .. }
        ));

        let no_media = ProfileDescriptor::new("geosp", "http://example.com/geosp", "GeoSPARQL")
            .as_default();
        let err = registry.register("feature", vec![no_media]).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoMediaTypes { .. }));

        // Failed registrations leave nothing behind
        assert!(!registry.contains("feature"));
    }

    #[test]
    fn test_reject_duplicate_kind() {
        let mut registry = ProfileRegistry::new();
        registry
            .register("feature", vec![profile("geosp").as_default()])
            .unwrap();
        assert_eq!(
            registry.register("feature", vec![profile("oai").as_default()]),
            Err(ConfigurationError::DuplicateResourceKind("feature".to_string()))
        );
    }

    #[test]
    fn test_resource_kinds_keep_registration_order() {
        let mut registry = ProfileRegistry::new();
        for kind in ["stratunit", "feature", "province"] {
            registry
                .register(kind, vec![profile("geosp").as_default()])
                .unwrap();
        }
        let kinds: Vec<&str> = registry.resource_kinds().collect();
        assert_eq!(kinds, vec!["stratunit", "feature", "province"]);
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProfileRegistry>();
    }
}

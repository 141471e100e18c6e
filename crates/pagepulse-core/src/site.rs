use std::collections::HashMap;

use crate::config::Config;

/// The one hostname this deployment recognizes.
pub const BLOG_HOSTNAME: &str = "blog.codepromptfu.com";

/// Immutable hostname -> GA4 property id table, built once from config.
///
/// Unknown hostnames resolve to `None`, never a default property. The
/// caller decides what absence means; `resolve` itself never errors.
#[derive(Debug, Clone, Default)]
pub struct SiteMap {
    entries: HashMap<String, String>,
}

impl SiteMap {
    pub fn from_config(config: &Config) -> Self {
        let mut entries = HashMap::new();
        if let Some(id) = &config.property_id_1 {
            entries.insert(BLOG_HOSTNAME.to_string(), id.clone());
        }
        Self { entries }
    }

    pub fn resolve(&self, site: &str) -> Option<&str> {
        self.entries.get(site).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(property_id_1: Option<&str>) -> Config {
        Config {
            port: 3000,
            credentials_path: "/tmp/key.json".to_string(),
            property_id_1: property_id_1.map(str::to_string),
        }
    }

    #[test]
    fn resolves_recognized_hostname() {
        let sites = SiteMap::from_config(&config_with(Some("123456")));
        assert_eq!(sites.resolve(BLOG_HOSTNAME), Some("123456"));
    }

    #[test]
    fn unknown_hostname_is_absent() {
        let sites = SiteMap::from_config(&config_with(Some("123456")));
        assert_eq!(sites.resolve("unknown.example.com"), None);
        assert_eq!(sites.resolve(""), None);
    }

    #[test]
    fn unset_property_id_leaves_table_empty() {
        let sites = SiteMap::from_config(&config_with(None));
        assert_eq!(sites.resolve(BLOG_HOSTNAME), None);
    }
}

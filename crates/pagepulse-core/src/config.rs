#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Path to the Google service-account key file.
    pub credentials_path: String,
    /// GA4 property id for the one recognized site. Unset leaves the site
    /// table empty, so every lookup resolves to absent.
    pub property_id_1: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            credentials_path: std::env::var("GOOGLE_APPLICATION_CREDENTIALS").map_err(|_| {
                "GOOGLE_APPLICATION_CREDENTIALS must point to a service-account key file"
                    .to_string()
            })?,
            property_id_1: std::env::var("GA_PROPERTY_ID_1").ok(),
        })
    }
}

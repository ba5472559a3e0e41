//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// SMTP configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Image hosting configuration.
    #[serde(default)]
    pub images: ImageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin; any origin when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,
    /// Upper bound on a request body, multipart uploads included.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Directory that receives in-flight uploads before they go to the image host.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: None,
            max_upload_bytes: default_max_upload_bytes(),
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("packline-uploads")
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_expiry_secs: default_token_expiry(),
        }
    }
}

fn default_token_expiry() -> u64 {
    86_400 // 1 day
}

/// SMTP configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Use an implicit-TLS relay; plain SMTP otherwise (local catchers).
    pub tls: bool,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Inbox that receives forwarded contact forms.
    pub inbox: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            tls: false,
            from_email: "no-reply@packline.local".to_string(),
            from_name: "Packline".to_string(),
            inbox: "admin@packline.local".to_string(),
        }
    }
}

/// Where uploaded images end up.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageProviderConfig {
    /// Cloudinary upload API.
    Cloudinary {
        /// Cloud name (first path segment of the API).
        cloud_name: String,
        /// API key.
        api_key: String,
        /// API secret used for request signing.
        api_secret: String,
    },
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./storage/images"),
        }
    }
}

/// Image hosting configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Backend that stores the images.
    pub provider: ImageProviderConfig,
    /// Base URL that object-store keys are served under.
    ///
    /// Ignored by Cloudinary, which returns its own URLs.
    pub public_base_url: String,
    /// Folder for product images.
    pub product_folder: String,
    /// Folder for blog main images.
    pub blog_folder: String,
    /// Folder for blog content-block icons.
    pub blog_icon_folder: String,
    /// Largest accepted image, in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: ImageProviderConfig::default(),
            public_base_url: "http://localhost:8080/images".to_string(),
            product_folder: "products".to_string(),
            blog_folder: "blogs".to_string(),
            blog_icon_folder: "blog-icons".to_string(),
            max_file_size: 10 * 1024 * 1024,
            allowed_mime_types: [
                "image/png",
                "image/jpeg",
                "image/gif",
                "image/webp",
                "image/svg+xml",
                "image/avif",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PACKLINE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

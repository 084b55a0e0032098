#[derive(Debug, thiserror::Error)]
pub enum BriefmailError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported config format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("JSON parse error in {path}: {source}")]
    JsonParse {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    YamlParse {
        path: std::path::PathBuf,
        source: serde_yaml::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: std::path::PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value for '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Handlebars template error in '{name}': {reason}")]
    HandlebarsTemplate { name: String, reason: String },

    #[error("Handlebars render error in '{name}': {reason}")]
    HandlebarsRender { name: String, reason: String },

    #[error("CSS inlining error: {reason}")]
    CssInline { reason: String },

    #[error("stylesheet file not found: {path}")]
    StylesheetNotFound { path: std::path::PathBuf },

    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("SMTP connection error: {reason}")]
    SmtpConnect { reason: String },

    #[error("SMTP send error for {recipient}: {reason}")]
    SmtpSend { recipient: String, reason: String },

    #[error("keyring error: {reason}")]
    Keyring { reason: String },

    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
}

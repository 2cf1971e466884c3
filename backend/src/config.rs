use std::path::PathBuf;

use clap::Parser;

/// Command line and environment settings of the section builder server.
#[derive(Debug, Clone, Parser)]
#[command(name = "section-builder", version, about = "Section builder dashboard server")]
pub struct Config {
    #[arg(long, env = "SECTION_BUILDER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "SECTION_BUILDER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite file holding saved sections.
    #[arg(long, env = "SECTION_BUILDER_DB", default_value = "sections.sqlite")]
    pub database: PathBuf,

    /// Directory uploaded images are written to.
    #[arg(long, env = "SECTION_BUILDER_ASSET_DIR", default_value = "assets")]
    pub asset_dir: PathBuf,

    /// URL prefix under which stored images are served.
    #[arg(long, env = "SECTION_BUILDER_ASSET_URL", default_value = "/api/assets")]
    pub asset_url_prefix: String,

    /// Largest accepted JSON body in bytes. Inline images travel in the body.
    #[arg(long, env = "SECTION_BUILDER_JSON_LIMIT", default_value_t = 10 * 1024 * 1024)]
    pub json_limit: usize,

    /// Do not open the dashboard in a browser on start.
    #[arg(long, env = "SECTION_BUILDER_NO_BROWSER")]
    pub no_browser: bool,
}

impl Config {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Public URL of a stored asset file.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.asset_url_prefix.trim_end_matches('/'), file_name)
    }

    #[cfg(test)]
    pub fn for_tests(dir: &std::path::Path) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: dir.join("sections.sqlite"),
            asset_dir: dir.join("assets"),
            asset_url_prefix: "/api/assets".to_string(),
            json_limit: 1024 * 1024,
            no_browser: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let config = Config::parse_from(["section-builder"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.url(), "http://127.0.0.1:8080");
        assert!(!config.no_browser);
    }

    #[test]
    fn asset_urls_join_cleanly() {
        let mut config = Config::parse_from(["section-builder", "--asset-url-prefix", "/media/"]);
        assert_eq!(config.asset_url("ab.png"), "/media/ab.png");
        config.asset_url_prefix = "https://cdn.example.com".into();
        assert_eq!(config.asset_url("ab.png"), "https://cdn.example.com/ab.png");
    }
}

pub mod catalog;
pub mod compare;
pub mod content;
pub mod domain;
pub mod filter;
pub mod format;
pub mod lookup;
pub mod session;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub catalog_path: Option<String>,
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(v) => Some(
                    v.trim()
                        .parse::<u16>()
                        .with_context(|| format!("PORT must be a port number (got {v:?})"))?,
                ),
                Err(_) => None,
            };

            Ok(Self {
                catalog_path: std::env::var("PINFOCUS_CATALOG_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                port,
            })
        }

        pub fn port_or_default(&self) -> u16 {
            self.port.unwrap_or(3000)
        }
    }
}

use clap::{Args, Parser};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::client::{DEFAULT_EXPIRY_NOTICE, DEFAULT_LOGIN_ROUTE, DEFAULT_ROOT_ROUTE, Routes};

/// Flags shared by every CLI invocation.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file path
    #[arg(short, long, global = true, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Backend base URL
    #[arg(long, global = true, env = "FITNESS_BASE_URL")]
    pub base_url: Option<String>,

    /// File holding the persisted session
    #[arg(long, global = true, env = "FITNESS_SESSION_FILE")]
    pub session_file: Option<String>,

    /// Emit JSON logs
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Parser, Debug)]
struct ConfigCli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub file: String,
    pub login_route: String,
    pub root_route: String,
    pub expiry_notice: String,
}

impl SessionConfig {
    pub fn routes(&self) -> Routes {
        Routes {
            login: self.login_route.clone(),
            root: self.root_route.clone(),
            expiry_notice: self.expiry_notice.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = ConfigCli::try_parse_from(args)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_args(&cli.config)
    }

    /// Priority: CLI flag > `FITNESS_` environment > config file > defaults.
    pub fn from_args(args: &ConfigArgs) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("backend.base_url", "http://localhost:8080")?
            .set_default("session.file", ".fitness-session.json")?
            .set_default("session.login_route", DEFAULT_LOGIN_ROUTE)?
            .set_default("session.root_route", DEFAULT_ROOT_ROUTE)?
            .set_default("session.expiry_notice", DEFAULT_EXPIRY_NOTICE)?
            .set_default("log.level", "info")?
            .set_default("log.format", "text")?;

        builder = match &args.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // E.g. FITNESS_BACKEND__BASE_URL=http://api:8080
        builder = builder.add_source(
            Environment::with_prefix("FITNESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &args.base_url {
            builder = builder.set_override("backend.base_url", url.as_str())?;
        }
        if let Some(file) = &args.session_file {
            builder = builder.set_override("session.file", file.as_str())?;
        }
        if args.json_logs {
            builder = builder.set_override("log.format", "json")?;
        }

        builder.build()?.try_deserialize()
    }
}

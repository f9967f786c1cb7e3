//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::NonZeroUsize,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::catalog::MergeOrder;
use crate::application::inject::DEFAULT_INJECTION_CAP;
use crate::application::pagination::{DEFAULT_PAGE_SIZE, PageScheme};
use crate::application::seo::SiteContext;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PUBLIC_SITE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_SITE_NAME: &str = "Vetrina";
const DEFAULT_TAGLINE: &str = "Design, development, and growth notes from the studio";
const DEFAULT_KEYWORDS_FILE: &str = "keywords.json";

/// Command-line arguments for the Vetrina binary.
#[derive(Debug, Parser)]
#[command(name = "vetrina", version, about = "Vetrina blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VETRINA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the public HTTP server.
    Serve(Box<ServeArgs>),
    /// Inspect and maintain the keyword/link configuration store.
    Keywords(KeywordsArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the remote catalog endpoint URL.
    #[arg(long = "remote-base-url", value_name = "URL")]
    pub remote_base_url: Option<String>,

    /// Override the remote catalog request timeout.
    #[arg(long = "remote-timeout-seconds", value_name = "SECONDS")]
    pub remote_timeout_seconds: Option<u64>,

    /// Override the catalog merge order (remote_first|static_first).
    #[arg(long = "remote-merge-order", value_name = "ORDER")]
    pub remote_merge_order: Option<String>,

    /// Override the blog page size.
    #[arg(long = "blog-page-size", value_name = "COUNT")]
    pub blog_page_size: Option<usize>,

    /// Override the pagination scheme (index|id_range).
    #[arg(long = "blog-page-scheme", value_name = "SCHEME")]
    pub blog_page_scheme: Option<String>,

    /// Override the per-post injected link cap.
    #[arg(long = "blog-injection-cap", value_name = "COUNT")]
    pub blog_injection_cap: Option<usize>,

    /// Override the public site origin used in canonical URLs and feeds.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub public_site_url: Option<String>,

    /// Override the keyword store file path.
    #[arg(long = "keywords-file", value_name = "PATH")]
    pub keywords_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct KeywordsArgs {
    #[command(subcommand)]
    pub command: KeywordsCommand,
}

#[derive(Debug, Subcommand, Clone)]
pub enum KeywordsCommand {
    /// Print the keyword store as JSON, or write it to a file.
    Export(KeywordsExportArgs),
    /// Replace the keyword store from a JSON document.
    Import(KeywordsImportArgs),
    /// Check keyword targets against the post catalog.
    Validate,
    /// List keyword entries in deterministic order.
    List,
}

#[derive(Debug, Args, Clone)]
pub struct KeywordsExportArgs {
    /// Destination file; stdout when omitted.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct KeywordsImportArgs {
    /// JSON document to import.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub remote: RemoteSettings,
    pub blog: BlogSettings,
    pub keywords: KeywordSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Endpoint of the content store's posts listing; `None` disables the
    /// remote catalog entirely.
    pub base_url: Option<Url>,
    pub timeout: Duration,
    pub merge_order: MergeOrder,
}

#[derive(Debug, Clone)]
pub struct BlogSettings {
    pub page_size: NonZeroUsize,
    pub page_scheme: PageScheme,
    pub injection_cap: usize,
    pub site: SiteContext,
}

#[derive(Debug, Clone)]
pub struct KeywordSettings {
    pub file: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("VETRINA").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Keywords(_)) | None => {
            raw.apply_serve_overrides(&ServeOverrides::default())
        }
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    remote: RawRemoteSettings,
    blog: RawBlogSettings,
    keywords: RawKeywordSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.remote_base_url.as_ref() {
            self.remote.base_url = Some(url.clone());
        }
        if let Some(seconds) = overrides.remote_timeout_seconds {
            self.remote.timeout_seconds = Some(seconds);
        }
        if let Some(order) = overrides.remote_merge_order.as_ref() {
            self.remote.merge_order = Some(order.clone());
        }
        if let Some(size) = overrides.blog_page_size {
            self.blog.page_size = Some(size);
        }
        if let Some(scheme) = overrides.blog_page_scheme.as_ref() {
            self.blog.page_scheme = Some(scheme.clone());
        }
        if let Some(cap) = overrides.blog_injection_cap {
            self.blog.injection_cap = Some(cap);
        }
        if let Some(url) = overrides.public_site_url.as_ref() {
            self.blog.public_site_url = Some(url.clone());
        }
        if let Some(file) = overrides.keywords_file.as_ref() {
            self.keywords.file = Some(file.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            remote,
            blog,
            keywords,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            remote: build_remote_settings(remote)?,
            blog: build_blog_settings(blog)?,
            keywords: build_keyword_settings(keywords),
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let candidate = format!("{host}:{port}");
    let addr = candidate
        .parse()
        .map_err(|err| LoadError::invalid("server.addr", format!("invalid address `{candidate}`: {err}")))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_remote_settings(remote: RawRemoteSettings) -> Result<RemoteSettings, LoadError> {
    let base_url = match remote.base_url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(Url::parse(value).map_err(|err| {
            LoadError::invalid("remote.base_url", format!("invalid URL `{value}`: {err}"))
        })?),
    };

    let timeout_seconds = remote.timeout_seconds.unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "remote.timeout_seconds",
            "must be greater than zero",
        ));
    }

    let merge_order = match remote.merge_order.as_deref() {
        None => MergeOrder::default(),
        Some(value) => parse_merge_order(value)
            .ok_or_else(|| LoadError::invalid("remote.merge_order", format!("unknown order `{value}`")))?,
    };

    Ok(RemoteSettings {
        base_url,
        timeout: Duration::from_secs(timeout_seconds),
        merge_order,
    })
}

fn build_blog_settings(blog: RawBlogSettings) -> Result<BlogSettings, LoadError> {
    let page_size_value = blog.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let page_size = NonZeroUsize::new(page_size_value)
        .ok_or_else(|| LoadError::invalid("blog.page_size", "must be greater than zero"))?;

    let page_scheme = match blog.page_scheme.as_deref() {
        None => PageScheme::default(),
        Some(value) => parse_page_scheme(value)
            .ok_or_else(|| LoadError::invalid("blog.page_scheme", format!("unknown scheme `{value}`")))?,
    };

    let injection_cap = blog.injection_cap.unwrap_or(DEFAULT_INJECTION_CAP);

    let public_site_url = blog
        .public_site_url
        .unwrap_or_else(|| DEFAULT_PUBLIC_SITE_URL.to_string());
    Url::parse(&public_site_url).map_err(|err| {
        LoadError::invalid(
            "blog.public_site_url",
            format!("invalid URL `{public_site_url}`: {err}"),
        )
    })?;

    let site = SiteContext {
        public_site_url,
        site_name: blog
            .site_name
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        tagline: blog.tagline.unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
    };

    Ok(BlogSettings {
        page_size,
        page_scheme,
        injection_cap,
        site,
    })
}

fn build_keyword_settings(keywords: RawKeywordSettings) -> KeywordSettings {
    KeywordSettings {
        file: keywords
            .file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYWORDS_FILE)),
    }
}

fn parse_merge_order(value: &str) -> Option<MergeOrder> {
    match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "remote_first" => Some(MergeOrder::RemoteFirst),
        "static_first" => Some(MergeOrder::StaticFirst),
        _ => None,
    }
}

fn parse_page_scheme(value: &str) -> Option<PageScheme> {
    match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "index" => Some(PageScheme::Index),
        "id_range" => Some(PageScheme::IdRange),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRemoteSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
    merge_order: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBlogSettings {
    page_size: Option<usize>,
    page_scheme: Option<String>,
    injection_cap: Option<usize>,
    public_site_url: Option<String>,
    site_name: Option<String>,
    tagline: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawKeywordSettings {
    file: Option<PathBuf>,
}

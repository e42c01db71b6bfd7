use anyhow::{bail, Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

use collection::{fetch_from_network, fetch_from_storage, Collection, FetchOptions, SplitConfig};

#[derive(Parser)]
#[command(name = "postman-split", author, version, about = "Split a Postman collection into smaller collections, one per folder chunk", long_about = None)]
struct Cli {
    /// Local collection file to split
    #[arg(long)]
    collection: Option<PathBuf>,

    /// Collection URL; takes precedence over --collection
    #[arg(long)]
    url: Option<String>,

    /// Directory for the generated collections
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of requests in each generated folder
    #[arg(long, allow_negative_numbers = true)]
    max_requests: Option<i64>,

    /// Identifier written to info._postman_id of every generated collection
    #[arg(long)]
    postman_id: Option<String>,

    /// API key sent as X-Api-Key when downloading
    #[arg(long, env = "POSTMAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of worker threads writing chunks
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Copy collection variables, auth and scripts into every chunk
    #[arg(long)]
    inherit_settings: bool,

    /// Chunk top-level requests as a folder with this name instead of skipping them
    #[arg(long)]
    loose_requests_group: Option<String>,

    /// Download timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// YAML file with defaults for the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn split_config(&self) -> Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::from_yaml_file(path)?,
            None => SplitConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(max_requests) = self.max_requests {
            config.max_requests = max_requests;
        }
        if let Some(postman_id) = &self.postman_id {
            config.postman_id = postman_id.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if self.inherit_settings {
            config.inherit_settings = true;
        }
        if let Some(group) = &self.loose_requests_group {
            config.loose_requests_group = Some(group.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        Ok(config)
    }

    async fn load_source(&self, config: &SplitConfig) -> Result<Option<Collection>> {
        match (self.url.as_deref(), &self.collection) {
            (Some(url), _) if !url.is_empty() => {
                let options = FetchOptions {
                    timeout: config.timeout(),
                    api_key: self.api_key.clone(),
                };
                tokio::select! {
                    fetched = fetch_from_network(url, &options) => Ok(fetched?),
                    _ = tokio::signal::ctrl_c() => bail!("interrupted while downloading {}", url),
                }
            }
            (_, Some(path)) => Ok(Some(fetch_from_storage(path)?)),
            _ => bail!("no source given: pass --collection <file> or --url <url>"),
        }
    }
}

/// Rewrites the historical single-dash flags (`-maxRequests=5`, `-postmanId x`)
/// into their clap spellings. Arguments that are not valid UTF-8 pass through untouched.
fn normalize_legacy_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    const LEGACY: [(&str, &str); 5] = [
        ("-collection", "--collection"),
        ("-url", "--url"),
        ("-output", "--output"),
        ("-maxRequests", "--max-requests"),
        ("-postmanId", "--postman-id"),
    ];

    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let (flag, value) = match text.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (text, None),
            };
            match LEGACY.iter().find(|(old, _)| *old == flag) {
                Some((_, new)) => match value {
                    Some(value) => OsString::from(format!("{}={}", new, value)),
                    None => OsString::from(*new),
                },
                None => arg,
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.split_config()?;
    // Reject a bad limit before touching the network or the disk.
    config.limit()?;

    let Some(source) = cli.load_source(&config).await? else {
        println!("No collection available, nothing written.");
        return Ok(());
    };
    info!(
        name = %source.info.name,
        requests = source.request_count(),
        max_requests = config.max_requests,
        "splitting collection"
    );

    let output_dir = config.output_dir.clone();
    let report = tokio::task::spawn_blocking(move || collection::run(&source, &config))
        .await
        .context("split task panicked")??;

    println!(
        "Wrote {} collection(s) to {}",
        report.files_written(),
        output_dir.display()
    );

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("Error: {} ({}): {}", failure.name, failure.path.display(), failure.error);
        }
        eprintln!("{} chunk(s) failed", report.failures.len());
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_legacy_flags_are_rewritten() {
        let normalized = normalize_legacy_flags(args(&[
            "postman-split",
            "-collection",
            "api.json",
            "-maxRequests=5",
            "-postmanId",
            "abc",
            "-output",
            "out",
        ]));

        assert_eq!(
            normalized,
            args(&[
                "postman-split",
                "--collection",
                "api.json",
                "--max-requests=5",
                "--postman-id",
                "abc",
                "--output",
                "out",
            ])
        );
    }

    #[test]
    fn test_other_args_are_left_alone() {
        let normalized = normalize_legacy_flags(args(&["postman-split", "-j", "4", "x=-url"]));
        assert_eq!(normalized, args(&["postman-split", "-j", "4", "x=-url"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_pass_through() {
        use std::os::unix::ffi::OsStringExt;

        let path = OsString::from_vec(b"/tmp/out\xff".to_vec());
        let normalized = normalize_legacy_flags(vec![
            OsString::from("postman-split"),
            OsString::from("-output"),
            path.clone(),
        ]);

        assert_eq!(
            normalized,
            vec![OsString::from("postman-split"), OsString::from("--output"), path]
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.yaml");
        std::fs::write(&path, "max_requests: 25\npostman_id: from-file\njobs: 2\n").unwrap();

        let cli = Cli::parse_from(args(&[
            "postman-split",
            "--config",
            path.to_str().unwrap(),
            "--max-requests",
            "-3",
        ]));
        let config = cli.split_config().unwrap();

        assert_eq!(config.max_requests, -3);
        assert_eq!(config.postman_id, "from-file");
        assert_eq!(config.jobs, 2);
        assert!(config.limit().is_err());
    }
}

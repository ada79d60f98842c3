use relcopy::config::{PartialBody, PartialConfig, PartialRemote, RepoCoordinates, SortOrder};
use relcopy::core::{RelcopyError, RelcopyResult};
use relcopy::di::ServiceContainer;
use relcopy::release::ReleaseCopier;
use std::path::PathBuf;
use tracing::{debug, info};

/// Values taken from the command line and environment
#[derive(Debug, Default)]
pub struct CopyOptions {
    pub config_file: Option<PathBuf>,
    pub tag: Option<String>,
    pub source: Option<String>,
    pub source_token: Option<String>,
    pub source_api_url: Option<String>,
    pub source_upload_url: Option<String>,
    pub dest: Option<String>,
    pub dest_token: Option<String>,
    pub dest_api_url: Option<String>,
    pub dest_upload_url: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub asset_filter: Vec<String>,
    pub body_pattern: Option<String>,
    pub body_replacement: Option<String>,
    pub all: bool,
    pub sort: Option<String>,
    pub dry_run: bool,
}

pub async fn run(options: CopyOptions) -> RelcopyResult<()> {
    let file_layer = match &options.config_file {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            PartialConfig::load(path)?
        }
        None => PartialConfig::default(),
    };
    let config = file_layer.merge(overrides(options)?).into_config()?;

    // Reject a bad tag/--all combination before building any client
    config.mode()?;

    let services = ServiceContainer::new(&config)?;
    let report = ReleaseCopier::new(config, &services).run().await?;

    let verb = if report.dry_run { "would copy" } else { "copied" };
    info!(
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        "done: {} [{}], skipped [{}]",
        verb,
        report.copied.join(", "),
        report.skipped.join(", ")
    );
    Ok(())
}

/// Turn command-line values into the top configuration layer
///
/// Flags can only switch boolean options on, so `--all` absent on the
/// command line leaves `copy_all: true` from a config file in place.
fn overrides(options: CopyOptions) -> RelcopyResult<PartialConfig> {
    Ok(PartialConfig {
        source: PartialRemote {
            repo: parse_repo(options.source, "--source")?,
            token: options.source_token,
            api_url: options.source_api_url,
            upload_url: options.source_upload_url,
        },
        destination: PartialRemote {
            repo: parse_repo(options.dest, "--dest")?,
            token: options.dest_token,
            api_url: options.dest_api_url,
            upload_url: options.dest_upload_url,
        },
        staging_dir: options.staging_dir,
        tag: options.tag,
        copy_all: options.all.then_some(true),
        asset_filter: (!options.asset_filter.is_empty()).then_some(options.asset_filter),
        body: PartialBody {
            pattern: options.body_pattern,
            replacement: options.body_replacement,
        },
        sort: options
            .sort
            .map(|s| s.parse::<SortOrder>())
            .transpose()
            .map_err(|e| RelcopyError::Config(format!("--sort: {}", e)))?,
        dry_run: options.dry_run.then_some(true),
    })
}

fn parse_repo(value: Option<String>, flag: &str) -> RelcopyResult<Option<RepoCoordinates>> {
    value
        .map(|v| v.parse::<RepoCoordinates>())
        .transpose()
        .map_err(|e| RelcopyError::Config(format!("{}: {}", flag, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_parse_repositories() {
        let layer = overrides(CopyOptions {
            source: Some("octo/app".to_string()),
            dest: Some("octo/mirror".to_string()),
            tag: Some("v1.0.0".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(layer.source.repo, Some(RepoCoordinates::new("octo", "app")));
        assert_eq!(layer.destination.repo, Some(RepoCoordinates::new("octo", "mirror")));
        assert_eq!(layer.tag.as_deref(), Some("v1.0.0"));
        assert_eq!(layer.copy_all, None);
        assert_eq!(layer.asset_filter, None);
    }

    #[test]
    fn test_malformed_repository_is_config_error() {
        let err = overrides(CopyOptions {
            source: Some("not-a-repo".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, RelcopyError::Config(_)));
        assert!(err.to_string().contains("--source"));
    }

    #[test]
    fn test_unknown_sort_is_config_error() {
        let err = overrides(CopyOptions {
            sort: Some("alphabetical".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, RelcopyError::Config(_)));
    }

    #[test]
    fn test_flags_only_switch_options_on() {
        let file = PartialConfig {
            copy_all: Some(true),
            dry_run: Some(true),
            ..Default::default()
        };
        let merged = file.merge(overrides(CopyOptions::default()).unwrap());
        assert_eq!(merged.copy_all, Some(true));
        assert_eq!(merged.dry_run, Some(true));

        let layer = overrides(CopyOptions {
            all: true,
            sort: Some("date".to_string()),
            asset_filter: vec![r"\.zip$".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(layer.copy_all, Some(true));
        assert_eq!(layer.sort, Some(SortOrder::Date));
        assert_eq!(layer.asset_filter, Some(vec![r"\.zip$".to_string()]));
    }
}

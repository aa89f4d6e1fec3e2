//! Validated run configuration.
//!
//! [`UploadConfig::from_args`] turns parsed command-line flags into the
//! immutable settings the pool runs with. Every check that can fail happens
//! here, so a bad bucket name or a missing source directory aborts the run
//! before the scanner or any worker has started.

use std::path::PathBuf;

use rusoto_core::Region;

use crate::cli::Args;
use crate::error::ConfigError;
use crate::models::Acl;

/// Where and how files are uploaded. Shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    pub prefix: String,
    pub acl: Acl,
    pub source_root: PathBuf,
}

/// How the S3 client resolves credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variables, profile file, container, then instance metadata
    Default,
    /// A named profile from the shared credentials file
    Profile(String),
    /// Instance metadata only
    InstanceRole,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub target: UploadTarget,
    pub workers: usize,
    pub queue_capacity: usize,
    pub region: Region,
    pub credentials: CredentialSource,
    pub report_path: Option<PathBuf>,
    pub strict: bool,
}

impl UploadConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.bucket.trim().is_empty() {
            return Err(ConfigError::EmptyBucket);
        }
        if args.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if args.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }

        let source_root = args.source_dir.clone();
        if !source_root.exists() {
            return Err(ConfigError::SourceNotFound(source_root));
        }
        if !source_root.is_dir() {
            return Err(ConfigError::SourceNotDirectory(source_root));
        }

        let region = resolve_region(&args.region, args.endpoint.as_deref())?;

        let credentials = if args.ec2_role {
            CredentialSource::InstanceRole
        } else if let Some(profile) = &args.profile {
            CredentialSource::Profile(profile.clone())
        } else {
            CredentialSource::Default
        };

        Ok(UploadConfig {
            target: UploadTarget {
                bucket: args.bucket.clone(),
                prefix: args.subfolder.clone(),
                acl: args.acl,
                source_root,
            },
            workers: args.workers,
            queue_capacity: args.queue_capacity,
            region,
            credentials,
            report_path: args.report.clone(),
            strict: args.strict,
        })
    }
}

/// Parse a region name, or build a custom region when an endpoint is given
pub fn resolve_region(name: &str, endpoint: Option<&str>) -> Result<Region, ConfigError> {
    match endpoint {
        Some(endpoint) => {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
            }
            Ok(Region::Custom {
                name: name.to_string(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
            })
        }
        None => name
            .parse::<Region>()
            .map_err(|_| ConfigError::InvalidRegion(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(extra: &[&str], source: &std::path::Path) -> Args {
        let mut argv = vec!["s3-fast-upload", "--bucket", "test-bucket"];
        argv.extend_from_slice(extra);
        let source = source.to_string_lossy().to_string();
        let mut argv: Vec<String> = argv.into_iter().map(String::from).collect();
        argv.push(source);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_from_args_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = UploadConfig::from_args(&parse(&[], temp_dir.path())).unwrap();

        assert_eq!(config.target.bucket, "test-bucket");
        assert_eq!(config.target.prefix, "");
        assert_eq!(config.target.acl, Acl::Private);
        assert_eq!(config.target.source_root, temp_dir.path());
        assert_eq!(config.workers, 100);
        assert_eq!(config.region.name(), "us-west-1");
        assert_eq!(config.credentials, CredentialSource::Default);
        assert!(!config.strict);
    }

    #[test]
    fn test_empty_bucket_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = parse(&[], temp_dir.path());
        args.bucket = "  ".to_string();
        assert!(matches!(UploadConfig::from_args(&args), Err(ConfigError::EmptyBucket)));
    }

    #[test]
    fn test_zero_workers_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let args = parse(&["--workers", "0"], temp_dir.path());
        assert!(matches!(UploadConfig::from_args(&args), Err(ConfigError::NoWorkers)));
    }

    #[test]
    fn test_zero_queue_capacity_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let args = parse(&["--queue-capacity", "0"], temp_dir.path());
        assert!(matches!(
            UploadConfig::from_args(&args),
            Err(ConfigError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let args = parse(&[], &missing);
        assert!(matches!(
            UploadConfig::from_args(&args),
            Err(ConfigError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_file_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        let args = parse(&[], &file);
        assert!(matches!(
            UploadConfig::from_args(&args),
            Err(ConfigError::SourceNotDirectory(_))
        ));
    }

    #[test]
    fn test_credential_source_selection() {
        let temp_dir = TempDir::new().unwrap();

        let args = parse(&["--ec2-role"], temp_dir.path());
        assert_eq!(
            UploadConfig::from_args(&args).unwrap().credentials,
            CredentialSource::InstanceRole
        );

        let args = parse(&["--profile", "forensics"], temp_dir.path());
        assert_eq!(
            UploadConfig::from_args(&args).unwrap().credentials,
            CredentialSource::Profile("forensics".to_string())
        );
    }

    #[test]
    fn test_resolve_region() {
        assert_eq!(resolve_region("eu-west-1", None).unwrap().name(), "eu-west-1");
        assert!(matches!(
            resolve_region("invalid-region", None),
            Err(ConfigError::InvalidRegion(_))
        ));

        let custom = resolve_region("minio", Some("http://localhost:9000/")).unwrap();
        assert_eq!(
            custom,
            Region::Custom {
                name: "minio".to_string(),
                endpoint: "http://localhost:9000".to_string(),
            }
        );

        assert!(matches!(
            resolve_region("minio", Some("localhost:9000")),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }
}

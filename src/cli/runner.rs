//! CLI runner - executes commands

use crate::auth::Credential;
use crate::cli::commands::{Cli, Commands, CredentialArgs, FilterArgs};
use crate::config::Settings;
use crate::console::{ConsoleApi, Device, DeviceFilter};
use crate::decode::{load_csv, CsvDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RateLimiterConfig};
use crate::sync::{
    apply_removals, apply_updates, group_assignments, owner_assignments, plan_duplicate_removals,
    plan_group_updates, plan_tag_updates, GroupColumns, OwnerTagOptions, SyncPlan,
};
use crate::types::BackoffType;
use chrono::{TimeDelta, Utc};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::ListDevices {
                credential,
                filter,
                names_only,
            } => self.list_devices(credential, filter, *names_only).await,
            Commands::SyncGroups {
                credential,
                csv_file,
                device_column,
                group_column,
                dry_run,
            } => {
                let columns = GroupColumns {
                    device: device_column.clone(),
                    group: group_column.clone(),
                };
                self.sync_groups(credential, csv_file, &columns, *dry_run)
                    .await
            }
            Commands::SyncTags {
                credential,
                csv_file,
                hostname_column,
                owner_column,
                tag_prefix,
                dry_run,
            } => {
                let options = OwnerTagOptions {
                    hostname_column: *hostname_column,
                    owner_column: *owner_column,
                    tag_prefix: tag_prefix.clone(),
                };
                self.sync_tags(credential, csv_file, &options, *dry_run)
                    .await
            }
            Commands::RemoveDuplicates {
                credential,
                disconnected_minutes,
                dry_run,
            } => {
                self.remove_duplicates(credential, *disconnected_minutes, *dry_run)
                    .await
            }
        }
    }

    /// Settings file (if any) with command-line overrides applied
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(retries) = self.cli.max_retries {
            settings.http.max_retries = retries;
        }
        if let Some(secs) = self.cli.retry_delay {
            let backoff = &mut settings.http.retry_backoff;
            backoff.backoff_type = BackoffType::Constant;
            backoff.initial_ms = secs.checked_mul(1000).ok_or_else(|| {
                Error::invalid_value("retry_delay", format!("{secs} seconds is out of range"))
            })?;
            backoff.max_ms = backoff.max_ms.max(backoff.initial_ms);
        }
        if let Some(backoff_type) = self.cli.backoff {
            settings.http.retry_backoff.backoff_type = backoff_type;
        }
        if let Some(timeout) = self.cli.timeout {
            settings.http.timeout_seconds = timeout;
        }
        if let Some(rps) = self.cli.requests_per_second {
            settings.http.rate_limit = Some(RateLimiterConfig::per_second(rps));
        }

        Ok(settings)
    }

    fn console(&self, args: &CredentialArgs) -> Result<ConsoleApi> {
        let settings = self.settings()?;
        if let Some(base_url) = &settings.base_url {
            url::Url::parse(base_url)?;
        }
        let credential = Credential::new(&args.org_id, &args.api_key)?;
        let client = HttpClient::new(settings.client_config(), credential)?;
        Ok(ConsoleApi::new(client))
    }

    async fn list_devices(
        &self,
        credential: &CredentialArgs,
        filter: &FilterArgs,
        names_only: bool,
    ) -> Result<()> {
        let api = self.console(credential)?;
        let devices = api.list_devices(&DeviceFilter::from(filter)).await?;

        if names_only {
            print!("{}", names_listing(&devices));
        } else {
            println!("{}", serde_json::to_string_pretty(&devices)?);
        }
        Ok(())
    }

    async fn sync_groups(
        &self,
        credential: &CredentialArgs,
        csv_file: &Path,
        columns: &GroupColumns,
        dry_run: bool,
    ) -> Result<()> {
        let start = Instant::now();
        let source = csv_file.display().to_string();

        let body = load_csv(csv_file)?;
        let (header, records) = CsvDecoder::new().records(&body)?;
        let assignments = group_assignments(&header, &records, columns, &source)?;
        info!("Read {} assignment(s) from {}", assignments.len(), source);

        let api = self.console(credential)?;
        let devices = api.list_devices(&DeviceFilter::default()).await?;
        let groups = api.list_groups().await?;

        let plan = plan_group_updates(&assignments, &devices, &groups);
        let updated = self.apply_plan(&api, &plan, dry_run).await?;

        info!(
            "Group sync complete: {} device(s) updated in {:.2}s",
            updated,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    async fn sync_tags(
        &self,
        credential: &CredentialArgs,
        csv_file: &Path,
        options: &OwnerTagOptions,
        dry_run: bool,
    ) -> Result<()> {
        let start = Instant::now();
        let source = csv_file.display().to_string();

        let body = load_csv(csv_file)?;
        let rows = CsvDecoder::with_options(',', false).rows(&body);
        let (assignments, row_warnings) = owner_assignments(&rows, options, &source)?;
        for warning in &row_warnings {
            warn!("{}", warning);
        }
        info!("Read {} owner(s) from {}", assignments.len(), source);

        let api = self.console(credential)?;
        let devices = api.list_devices(&DeviceFilter::default()).await?;

        let plan = plan_tag_updates(&assignments, &devices, &options.tag_prefix);
        let updated = self.apply_plan(&api, &plan, dry_run).await?;

        info!(
            "Tag sync complete: {} device(s) updated in {:.2}s",
            updated,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    async fn remove_duplicates(
        &self,
        credential: &CredentialArgs,
        disconnected_minutes: i64,
        dry_run: bool,
    ) -> Result<()> {
        let window = disconnect_window(disconnected_minutes)?;
        let api = self.console(credential)?;
        let devices = api.list_devices(&DeviceFilter::default()).await?;

        let removals = plan_duplicate_removals(&devices, Utc::now(), window)?;
        if removals.is_empty() {
            info!("No disconnected duplicates found");
            return Ok(());
        }

        for removal in &removals {
            println!(
                "{}\t{}\t{}",
                removal.device_id,
                removal.display_name,
                removal.disconnected_at.to_rfc3339()
            );
        }

        let removed = apply_removals(&api, &removals, dry_run).await?;
        info!("Removed {} duplicate device(s)", removed);
        Ok(())
    }

    async fn apply_plan(&self, api: &ConsoleApi, plan: &SyncPlan, dry_run: bool) -> Result<usize> {
        for warning in &plan.warnings {
            warn!("{}", warning);
        }
        if plan.is_empty() {
            info!("Nothing to update");
            return Ok(0);
        }
        apply_updates(api, &plan.updates, dry_run).await
    }
}

/// One display name per line, then the count
fn names_listing(devices: &[Device]) -> String {
    let mut out = String::new();
    for device in devices {
        out.push_str(&device.display_name);
        out.push('\n');
    }
    out.push_str(&format!("\nTotal devices listed: {}\n", devices.len()));
    out
}

/// Minutes a duplicate must have been disconnected, as a time delta
fn disconnect_window(minutes: i64) -> Result<TimeDelta> {
    TimeDelta::try_minutes(minutes).ok_or_else(|| {
        Error::invalid_value("disconnected_minutes", format!("{minutes} is out of range"))
    })
}

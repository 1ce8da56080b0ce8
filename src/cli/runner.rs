//! CLI runner - executes commands

use crate::api::{Client, SubscriberUpdate};
use crate::cli::commands::{parse_assignment, Cli, Commands};
use crate::config::ClientConfig;
use crate::decode::{DecoderConfig, RepeatedElements, Value, XmlObjectifier};
use crate::error::{Error, Result, ResultExt};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

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
        if let Commands::Decode { file, accumulate } = &self.cli.command {
            let value = Self::decode_file(file, self.decode_policy(*accumulate)?)?;
            return self.output(&value);
        }

        let client = Client::new(self.client_config()?)?;

        match &self.cli.command {
            Commands::Plans => {
                let plans = client.get_plans().await?;
                info!(count = plans.len(), "Fetched subscription plans");
                self.output(&plans)
            }
            Commands::Get { id } => self.output(&client.get_subscriber(*id).await?),
            Commands::Create { id, screen_name } => {
                self.output(&client.create_subscriber(*id, screen_name).await?)
            }
            Commands::GetOrCreate { id, screen_name } => {
                let result = client.get_or_create_subscriber(*id, screen_name).await?;
                info!(id, created = result.was_created(), "Resolved subscriber");
                self.output(&json!({
                    "created": result.was_created(),
                    "subscriber": result.into_inner(),
                }))
            }
            Commands::Update { id, fields } => {
                let update = Self::build_update(fields)?;
                client.update_subscriber(*id, &update).await?;
                self.output(&json!({ "updated": id, "fields": update.len() }))
            }
            Commands::Trial { id, plan_id } => {
                self.output(&client.subscribe_to_free_trial(*id, *plan_id).await?)
            }
            Commands::CompSubscription {
                id,
                quantity,
                units,
                feature_level,
            } => {
                let result = client
                    .create_complimentary_subscription(*id, *quantity, *units, feature_level)
                    .await?;
                self.output(&result)
            }
            Commands::CompExtension {
                id,
                quantity,
                units,
            } => {
                let result = client
                    .create_complimentary_time_extension(*id, *quantity, *units)
                    .await?;
                self.output(&result)
            }
            Commands::Delete { id } => {
                let status = client.delete_subscriber(*id).await?;
                self.output(&Self::destructive_outcome(status))
            }
            Commands::Cleanup => {
                let status = client.cleanup().await?;
                self.output(&Self::destructive_outcome(status))
            }
            Commands::SignupUrl {
                id,
                plan_id,
                screen_name,
            } => {
                let url = client.signup_url(*id, *plan_id, screen_name)?;
                self.output(&json!({ "url": url.as_str() }))
            }
            Commands::Query { path, verb, body } => {
                let body = body
                    .as_ref()
                    .map(|file| {
                        fs::read_to_string(file)
                            .with_context(|| format!("Failed to read {}", file.display()))
                    })
                    .transpose()?;
                let response = client.query(path, body.as_deref(), verb).await?;
                info!(path = %path, verb = %verb, status = response.status, "Query completed");
                self.output(&json!({ "status": response.status, "body": response.body }))
            }
            Commands::Decode { .. } => Ok(()),
        }
    }

    /// Config from file, then `SPREEDLY_*` variables, then flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        config.apply_env();
        self.apply_flags(&mut config);
        Ok(config)
    }

    fn apply_flags(&self, config: &mut ClientConfig) {
        if let Some(token) = &self.cli.token {
            config.token.clone_from(token);
        }
        if let Some(site) = &self.cli.site {
            config.site_name.clone_from(site);
        }
        if let Some(host) = &self.cli.host {
            config.host.clone_from(host);
        }
    }

    /// Build an update from `FIELD=VALUE` arguments
    fn build_update(fields: &[String]) -> Result<SubscriberUpdate> {
        let pairs = fields
            .iter()
            .map(|arg| {
                parse_assignment(arg)
                    .ok_or_else(|| Error::Other(format!("Expected FIELD=VALUE, got '{arg}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        SubscriberUpdate::from_pairs(pairs)
    }

    fn destructive_outcome(status: Option<u16>) -> serde_json::Value {
        json!({ "status": status, "skipped": status.is_none() })
    }

    /// `--accumulate` wins, then the config file's `repeated_elements`
    fn decode_policy(&self, accumulate: bool) -> Result<RepeatedElements> {
        if accumulate {
            return Ok(RepeatedElements::Accumulate);
        }
        match &self.cli.config {
            Some(path) => Ok(ClientConfig::from_file(path)?.repeated_elements),
            None => Ok(RepeatedElements::default()),
        }
    }

    /// Decode an XML file (`-` reads stdin)
    fn decode_file(path: &Path, policy: RepeatedElements) -> Result<Value> {
        let xml = if path == Path::new("-") {
            std::io::read_to_string(std::io::stdin())?
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        };

        XmlObjectifier::new(DecoderConfig::default().repeated_elements(policy)).decode(&xml)
    }

    /// Render a result as JSON
    fn render(&self, value: &impl Serialize) -> Result<String> {
        let rendered = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }

    /// Print a result to stdout
    fn output(&self, value: &impl Serialize) -> Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }
}

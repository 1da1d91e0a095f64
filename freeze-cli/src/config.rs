//! Configuration module
//!
//! Resolves connection settings and the target from the command-line flags
//! and, when requested, from the Codefresh CLI credentials file.

use freeze_orchestrator::Target;
use tracing::{info, warn};

use crate::cfconfig::CfConfig;
use crate::commands::CommonArgs;
use crate::error::{CliError, Result};

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Codefresh API base URL
    pub host: String,
    /// API token sent as-is in the Authorization header
    pub token: String,
    pub target: Target,
    /// Pipelines per listing page, 0 for unbounded
    pub page_size: u64,
}

impl Config {
    pub fn resolve(args: &CommonArgs) -> Result<Self> {
        let (token, host) = if args.use_cfconfig {
            info!(
                "\"--use-cfconfig\" was enabled. \"--token\" and \"--host\" will be ignored even if passed"
            );
            let cfconfig = CfConfig::load(args.cfconfig.as_deref())?;
            let context_name = match non_empty(args.cfconfig_context.as_deref()) {
                Some(name) => name.to_string(),
                None => {
                    warn!("\"--cfconfig-context\" was not set, using current context");
                    cfconfig.current_context.clone()
                }
            };
            let context = cfconfig.context(&context_name).ok_or_else(|| {
                CliError::Validation(format!(
                    "Context {} was not found in CLI config",
                    context_name
                ))
            })?;
            info!(
                "Context \"{}\" was loaded. Host: \"{}\"",
                context_name, context.url
            );
            (Some(context.token.clone()), context.url.clone())
        } else {
            (args.token.clone(), args.host.clone())
        };

        let token = non_empty(token.as_deref()).ok_or_else(|| {
            CliError::Validation(
                "Token was not defined. Please use \"--token\" or \"--use-cfconfig\" flag"
                    .to_string(),
            )
        })?;

        Ok(Self {
            host,
            token: token.to_string(),
            target: resolve_target(args.pipeline_id.as_deref(), args.project_id.as_deref())?,
            page_size: args.page_size,
        })
    }
}

/// Picks the single target among the pipeline and project ids
pub fn resolve_target(pipeline_id: Option<&str>, project_id: Option<&str>) -> Result<Target> {
    match (non_empty(pipeline_id), non_empty(project_id)) {
        (Some(pipeline_id), None) => Ok(Target::Pipeline(pipeline_id.to_string())),
        (None, Some(project_id)) => Ok(Target::Project(project_id.to_string())),
        (None, None) => Err(CliError::Validation(
            "Neither Pipeline ID nor Project ID has been defined. Please use \"--pipeline-id\" or \"--project-id\" flag"
                .to_string(),
        )),
        (Some(_), Some(_)) => Err(CliError::Validation(
            "Both Pipeline ID and Project ID have been defined. Please choose \"--pipeline-id\" or \"--project-id\" flag"
                .to_string(),
        )),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

//! Service command handlers.

use hassctl_api::{HassClient, ServiceDefinition, ServiceDomain};
use tabled::Tabled;

use crate::cli::{OutputFormat, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

use super::{OutputOpts, states, util};

// ── Table row ───────────────────────────────────────────────────────

/// One row per `domain.service`; the JSON/YAML views keep the server's
/// per-domain grouping.
#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Fields")]
    fields: String,
}

impl ServiceRow {
    fn new(domain: &str, service: &str, def: &ServiceDefinition) -> Self {
        Self {
            service: format!("{domain}.{service}"),
            name: def.name.clone().unwrap_or_default(),
            fields: field_summary(def),
        }
    }
}

/// Field names, required ones marked with `*`.
fn field_summary(def: &ServiceDefinition) -> String {
    def.fields
        .iter()
        .map(|(name, field)| {
            if field.required {
                format!("{name}*")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn qualified_names(domains: &[ServiceDomain]) -> Vec<String> {
    domains
        .iter()
        .flat_map(|d| d.services.keys().map(move |s| format!("{}.{s}", d.domain)))
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &HassClient,
    args: ServicesArgs,
    out: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        ServicesCommand::List { domain } => {
            let mut domains = client.get_services().await?;
            if let Some(domain) = domain.as_deref() {
                domains.retain(|d| d.domain == domain);
            }

            let rendered = match out.format {
                OutputFormat::Table => {
                    let rows: Vec<ServiceRow> = domains
                        .iter()
                        .flat_map(|d| {
                            d.services
                                .iter()
                                .map(|(name, def)| ServiceRow::new(&d.domain, name, def))
                        })
                        .collect();
                    output::render_table(&rows)
                }
                OutputFormat::Plain => qualified_names(&domains).join("\n"),
                OutputFormat::Json => output::render_json(&domains, false)?,
                OutputFormat::JsonCompact => output::render_json(&domains, true)?,
                OutputFormat::Yaml => output::render_yaml(&domains)?,
            };
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        ServicesCommand::Call {
            domain,
            service,
            data,
        } => {
            let data = util::parse_optional_object("data", data.as_deref())?;
            let changed = client
                .call_service(&domain, &service, data.as_ref())
                .await?;
            out.status(&format!(
                "✓ Called {domain}.{service} ({} state(s) changed)",
                changed.len()
            ));
            states::print_states(&changed, out)
        }
    }
}

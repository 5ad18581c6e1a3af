//! Server-level commands: health check and configuration snapshot.

use hassctl_api::{ApiStatus, Config, HassClient};

use crate::error::CliError;
use crate::output;

use super::OutputOpts;

pub async fn health(client: &HassClient, out: &OutputOpts) -> Result<(), CliError> {
    let status: ApiStatus = client.health().await?;
    let painter = out.painter;
    let base_url = client.base_url().to_string();

    let rendered = output::render_single(
        out.format,
        &status,
        |s| {
            format!(
                "{} {}  {}",
                painter.success("✓"),
                s.message,
                painter.muted(&base_url)
            )
        },
        |s| s.message.clone(),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}

pub async fn config_info(client: &HassClient, out: &OutputOpts) -> Result<(), CliError> {
    let config = client.get_config().await?;
    let painter = out.painter;

    let rendered = output::render_single(
        out.format,
        &config,
        |c| output::detail_block(painter, &detail_pairs(c)),
        |c| c.version.clone(),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}

fn detail_pairs(c: &Config) -> Vec<(&'static str, String)> {
    let units = &c.unit_system;
    let mut pairs = vec![
        ("Location", c.location_name.clone()),
        ("Version", c.version.clone()),
        ("State", c.state.clone()),
        ("Time zone", c.time_zone.clone()),
        ("Coordinates", format!("{}, {}", c.latitude, c.longitude)),
        ("Elevation", c.elevation.to_string()),
        (
            "Units",
            format!(
                "{} / {} / {} / {}",
                units.temperature, units.length, units.mass, units.volume
            ),
        ),
        ("Components", c.components.len().to_string()),
        ("Config dir", c.config_dir.clone()),
    ];
    if let Some(url) = &c.external_url {
        pairs.push(("External URL", url.clone()));
    }
    if let Some(url) = &c.internal_url {
        pairs.push(("Internal URL", url.clone()));
    }
    if c.safe_mode {
        pairs.push(("Safe mode", "yes".into()));
    }
    pairs
}

//! Entity state command handlers.

use hassctl_api::{HassClient, State, StateUpdate};
use tabled::Tabled;

use crate::cli::{StatesArgs, StatesCommand};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::{OutputOpts, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct StateRow {
    #[tabled(rename = "Entity ID")]
    entity_id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Last Changed")]
    last_changed: String,
}

impl StateRow {
    pub fn new(s: &State, painter: Painter) -> Self {
        Self {
            entity_id: s.entity_id.clone(),
            state: painter.state(&s.state),
            name: s.friendly_name().to_owned(),
            last_changed: local_time(s.last_changed_at()),
        }
    }
}

fn local_time(at: Option<chrono::DateTime<chrono::FixedOffset>>) -> String {
    at.map(|t| {
        t.with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
    .unwrap_or_default()
}

/// Key/value view of one state, attributes last in key order.
fn detail(s: &State, painter: Painter) -> String {
    let mut pairs = vec![
        ("Entity ID", s.entity_id.clone()),
        ("State", painter.state(&s.state)),
        ("Name", s.friendly_name().to_owned()),
        ("Last changed", local_time(s.last_changed_at())),
        ("Last updated", local_time(s.last_updated_at())),
    ];
    pairs.retain(|(_, v)| !v.is_empty());
    let summary = output::detail_block(painter, &pairs);
    if s.attributes.is_empty() {
        return summary;
    }

    let mut attrs: Vec<(&str, String)> = s
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), util::display_value(v)))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    format!(
        "{summary}\n\n{}\n{}",
        painter.label("Attributes"),
        output::detail_block(painter, &attrs)
    )
}

fn print_state(state: &State, out: &OutputOpts) -> Result<(), CliError> {
    let painter = out.painter;
    let rendered = output::render_single(
        out.format,
        state,
        |s| detail(s, painter),
        |s| s.state.clone(),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}

/// Render a list of states (shared with `services call`).
pub fn print_states(states: &[State], out: &OutputOpts) -> Result<(), CliError> {
    let painter = out.painter;
    let rendered = output::render_list(
        out.format,
        states,
        |s| StateRow::new(s, painter),
        |s| s.entity_id.clone(),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &HassClient,
    args: StatesArgs,
    out: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        StatesCommand::List { domain } => {
            let mut states = client.get_states().await?;
            if let Some(domain) = domain.as_deref() {
                states.retain(|s| s.domain() == domain);
            }
            print_states(&states, out)
        }

        StatesCommand::Get { entity_id } => {
            let state = client.get_state(&entity_id).await?;
            print_state(&state, out)
        }

        StatesCommand::Set {
            entity_id,
            state,
            attributes,
        } => {
            let mut update = StateUpdate::new(state);
            if let Some(attrs) = util::parse_optional_object("attributes", attributes.as_deref())? {
                update = update.with_attributes(attrs);
            }
            let stored = client.set_state(&entity_id, &update).await?;
            out.status(&format!("✓ State of {entity_id} set to '{}'", stored.state));
            print_state(&stored, out)
        }
    }
}

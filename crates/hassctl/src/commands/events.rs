//! Event command handlers.

use hassctl_api::{ApiStatus, EventListener, HassClient};
use tabled::Tabled;

use crate::cli::{EventsArgs, EventsCommand};
use crate::error::CliError;
use crate::output;

use super::{OutputOpts, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Listeners")]
    listeners: u64,
}

impl From<&EventListener> for EventRow {
    fn from(e: &EventListener) -> Self {
        Self {
            event: e.event.clone(),
            listeners: e.listener_count,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &HassClient,
    args: EventsArgs,
    out: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List => {
            let events = client.get_events().await?;
            let rendered = output::render_list(
                out.format,
                &events,
                |e| EventRow::from(e),
                |e| e.event.clone(),
            )?;
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        EventsCommand::Fire { event_type, data } => {
            let data = util::parse_optional_object("data", data.as_deref())?;
            let message = client.fire_event(&event_type, data.as_ref()).await?;

            let ack = ApiStatus { message };
            let painter = out.painter;
            let rendered = output::render_single(
                out.format,
                &ack,
                |a| format!("{} {}", painter.success("✓"), a.message),
                |a| a.message.clone(),
            )?;
            output::print_output(&rendered, out.quiet);
            Ok(())
        }
    }
}

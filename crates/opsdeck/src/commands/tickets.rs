//! Ticket command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, CommandResult, Controller, EntityId, Ticket};

use crate::cli::{GlobalOpts, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Arc<Ticket>> for TicketRow {
    fn from(t: &Arc<Ticket>) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title.clone(),
            device: t.device.clone().unwrap_or_default(),
            status: t.status.to_string(),
            assignee: t
                .assignee_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            updated: util::fmt_time(t.updated_at),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: TicketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TicketsCommand::List => {
            let mut tickets: Vec<Arc<Ticket>> =
                controller.tickets_snapshot().iter().cloned().collect();
            // Most recently updated first.
            tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

            let out = output::render_list(
                &global.output,
                &tickets,
                |x| TicketRow::from(x),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Summary => {
            let summary = controller.ticket_summary();
            let out = output::render_single(
                &global.output,
                &summary,
                |s| {
                    format!(
                        "open: {}\nrepairing: {}\ncompleted: {}\nclosed: {}\ntotal: {}",
                        s.open,
                        s.repairing,
                        s.completed,
                        s.closed,
                        s.total()
                    )
                },
                |s| s.total().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Repair {
            id,
            assignee,
            notes,
        } => {
            let result = controller
                .execute(CoreCommand::RepairTicket {
                    id: id.into(),
                    assignee_id: assignee.map(EntityId::from),
                    notes,
                })
                .await?;
            if let CommandResult::Ticket(ticket) = result {
                output::print_success(
                    &format!("Ticket '{}' is now {}", ticket.title, ticket.status),
                    &global.color,
                    global.quiet,
                );
            }
            Ok(())
        }

        TicketsCommand::Complete { id } => {
            if !util::confirm(
                &format!("Complete ticket '{id}'? The customer will be notified."),
                global.yes,
            )? {
                return Ok(());
            }
            let result = controller
                .execute(CoreCommand::CompleteTicket { id: id.into() })
                .await?;
            if let CommandResult::Ticket(ticket) = result {
                output::print_success(
                    &format!("Ticket '{}' completed", ticket.title),
                    &global.color,
                    global.quiet,
                );
            }
            Ok(())
        }
    }
}

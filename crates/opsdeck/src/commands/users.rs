//! User command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, Controller, Ticket, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Arc<User>> for UserRow {
    fn from(u: &Arc<User>) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            name: u.display_name.clone().unwrap_or_default(),
            email: u.email.clone().unwrap_or_default(),
            enabled: if u.enabled { "yes" } else { "no" }.into(),
        }
    }
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Ticket> for TicketRow {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title.clone(),
            status: t.status.to_string(),
            updated: util::fmt_time(t.updated_at),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let mut users: Vec<Arc<User>> = controller.users_snapshot().iter().cloned().collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));

            let out = output::render_list(
                &global.output,
                &users,
                |x| UserRow::from(x),
                |u| u.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::ResetPassword { user } => {
            let id = util::resolve_user_id(controller, &user)?;
            if !util::confirm(
                &format!("Reset password for '{user}'? The old password stops working."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::ResetPassword { user_id: id })
                .await?;
            output::print_success("Password reset requested", &global.color, global.quiet);
            Ok(())
        }

        UsersCommand::Tickets { user } => {
            let id = util::resolve_user_id(controller, &user)?;
            let tickets = controller.tickets_by_user(&id).await?;

            let out = output::render_list(
                &global.output,
                &tickets,
                |x| TicketRow::from(x),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

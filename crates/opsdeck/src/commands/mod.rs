//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod projects;
pub mod promotions;
pub mod regions;
pub mod roles;
pub mod stores;
pub mod tickets;
pub mod users;
pub mod util;

use opsdeck_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(controller, args, global).await,
        Command::Roles(args) => roles::handle(controller, args, global).await,
        Command::Stores(args) => stores::handle(controller, args, global).await,
        Command::Regions(args) => regions::handle(controller, args, global).await,
        Command::Tickets(args) => tickets::handle(controller, args, global).await,
        Command::Promotions(args) => promotions::handle(controller, args, global).await,
        Command::Projects(args) => projects::handle(controller, args, global).await,
        Command::Whoami => whoami(controller, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Show the authenticated principal, re-fetched from the server.
async fn whoami(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let user = controller.refresh_session_user().await?;

    let out = crate::output::render_single(
        &global.output,
        user.as_ref(),
        |u| {
            let role = u
                .role_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            format!(
                "username: {}\nname: {}\nrole: {role}\npermissions: {}",
                u.username,
                u.display_name.clone().unwrap_or_default(),
                u.permissions.join(", ")
            )
        },
        |u| u.username.clone(),
    );
    crate::output::print_output(&out, global.quiet);
    Ok(())
}

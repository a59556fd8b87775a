//! Role command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, Controller, Role, RoleDraft};

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Permissions")]
    permissions: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Role>> for RoleRow {
    fn from(r: &Arc<Role>) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            permissions: r.permissions.len().to_string(),
            description: r.description.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List => {
            let mut roles: Vec<Arc<Role>> = controller.roles_snapshot().iter().cloned().collect();
            roles.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &roles,
                |x| RoleRow::from(x),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Create {
            name,
            description,
            permissions,
        } => {
            controller
                .execute(CoreCommand::CreateRole(RoleDraft {
                    name,
                    description,
                    permissions,
                }))
                .await?;
            output::print_success("Role created", &global.color, global.quiet);
            Ok(())
        }

        RolesCommand::Update {
            id,
            name,
            description,
            permissions,
        } => {
            controller
                .execute(CoreCommand::UpdateRole {
                    id: id.into(),
                    draft: RoleDraft {
                        name,
                        description,
                        permissions,
                    },
                })
                .await?;
            output::print_success("Role updated", &global.color, global.quiet);
            Ok(())
        }

        RolesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete role '{id}'? This is destructive."), global.yes)? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteRole { id: id.into() })
                .await?;
            output::print_success("Role deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}

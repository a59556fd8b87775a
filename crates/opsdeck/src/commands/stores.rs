//! Store command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, Controller, EntityId, Store, StoreDraft};

use crate::cli::{GlobalOpts, StoresArgs, StoresCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Arc<Store>> for StoreRow {
    fn from(s: &Arc<Store>) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            region: s
                .region_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            enabled: if s.enabled { "yes" } else { "no" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: StoresArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StoresCommand::List => {
            let mut stores: Vec<Arc<Store>> =
                controller.stores_snapshot().iter().cloned().collect();
            stores.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &stores,
                |x| StoreRow::from(x),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StoresCommand::Create {
            name,
            region,
            address,
            phone,
            disabled,
        } => {
            controller
                .execute(CoreCommand::CreateStore(StoreDraft {
                    name,
                    region_id: region.map(EntityId::from),
                    address,
                    phone,
                    enabled: !disabled,
                }))
                .await?;
            output::print_success("Store created", &global.color, global.quiet);
            Ok(())
        }

        StoresCommand::Update {
            id,
            name,
            region,
            address,
            phone,
            enabled,
        } => {
            controller
                .execute(CoreCommand::UpdateStore {
                    id: id.into(),
                    draft: StoreDraft {
                        name,
                        region_id: region.map(EntityId::from),
                        address,
                        phone,
                        enabled,
                    },
                })
                .await?;
            output::print_success("Store updated", &global.color, global.quiet);
            Ok(())
        }

        StoresCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete store '{id}'? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteStore { id: id.into() })
                .await?;
            output::print_success("Store deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}

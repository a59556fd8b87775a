//! Region command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, Controller, Region, RegionDraft};

use crate::cli::{GlobalOpts, RegionsArgs, RegionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
}

impl From<&Arc<Region>> for RegionRow {
    fn from(r: &Arc<Region>) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            code: r.code.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: RegionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegionsCommand::List => {
            let mut regions: Vec<Arc<Region>> =
                controller.regions_snapshot().iter().cloned().collect();
            regions.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &regions,
                |x| RegionRow::from(x),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RegionsCommand::Create { name, code } => {
            controller
                .execute(CoreCommand::CreateRegion(RegionDraft { name, code }))
                .await?;
            output::print_success("Region created", &global.color, global.quiet);
            Ok(())
        }

        RegionsCommand::Update { id, name, code } => {
            controller
                .execute(CoreCommand::UpdateRegion {
                    id: id.into(),
                    draft: RegionDraft { name, code },
                })
                .await?;
            output::print_success("Region updated", &global.color, global.quiet);
            Ok(())
        }

        RegionsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete region '{id}'? Stores keep working but lose the grouping."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteRegion { id: id.into() })
                .await?;
            output::print_success("Region deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}

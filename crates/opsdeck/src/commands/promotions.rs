//! Promotion command handlers.

use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::{Command as CoreCommand, Controller, Promotion, PromotionDraft};

use crate::cli::{GlobalOpts, PromotionsArgs, PromotionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PromotionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Arc<Promotion>> for PromotionRow {
    fn from(p: &Arc<Promotion>) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            starts: util::fmt_time(p.starts_at),
            ends: util::fmt_time(p.ends_at),
            active: if p.active { "yes" } else { "no" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: PromotionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PromotionsCommand::List => {
            let mut promotions: Vec<Arc<Promotion>> =
                controller.promotions_snapshot().iter().cloned().collect();
            promotions.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));

            let out = output::render_list(
                &global.output,
                &promotions,
                |x| PromotionRow::from(x),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PromotionsCommand::Create {
            title,
            body,
            starts,
            ends,
            inactive,
        } => {
            let draft = PromotionDraft {
                title,
                body,
                starts_at: starts
                    .as_deref()
                    .map(|s| util::parse_timestamp("starts", s))
                    .transpose()?,
                ends_at: ends
                    .as_deref()
                    .map(|s| util::parse_timestamp("ends", s))
                    .transpose()?,
                active: !inactive,
            };
            controller
                .execute(CoreCommand::CreatePromotion(draft))
                .await?;
            output::print_success("Promotion created", &global.color, global.quiet);
            Ok(())
        }

        PromotionsCommand::Update {
            id,
            title,
            body,
            starts,
            ends,
            active,
        } => {
            let draft = PromotionDraft {
                title,
                body,
                starts_at: starts
                    .as_deref()
                    .map(|s| util::parse_timestamp("starts", s))
                    .transpose()?,
                ends_at: ends
                    .as_deref()
                    .map(|s| util::parse_timestamp("ends", s))
                    .transpose()?,
                active,
            };
            controller
                .execute(CoreCommand::UpdatePromotion {
                    id: id.into(),
                    draft,
                })
                .await?;
            output::print_success("Promotion updated", &global.color, global.quiet);
            Ok(())
        }

        PromotionsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete promotion '{id}'? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeletePromotion { id: id.into() })
                .await?;
            output::print_success("Promotion deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}

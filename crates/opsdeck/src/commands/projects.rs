//! Project and board command handlers.
//!
//! `move-task` / `move-section` speak the same adjacency contract the
//! board UI uses: the server derives the new rank from the before/after
//! neighbors, the client never supplies one.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;
use opsdeck_core::board::{MovePosition, MoveTaskPosition};
use opsdeck_core::{
    Command as CoreCommand, Controller, EntityId, Project, TaskStatus, TaskUpdate,
};

use crate::cli::{GlobalOpts, ProjectsArgs, ProjectsCommand, TaskStatusArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Project>> for ProjectRow {
    fn from(p: &Arc<Project>) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            description: p.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AttachmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
}

impl From<&opsdeck_core::Attachment> for AttachmentRow {
    fn from(a: &opsdeck_core::Attachment) -> Self {
        Self {
            id: a.id.to_string(),
            file: a.file_name.clone(),
            size: format!("{} B", a.size_bytes),
            uploaded: util::fmt_time(a.uploaded_at),
        }
    }
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(arg: TaskStatusArg) -> Self {
        match arg {
            TaskStatusArg::Todo => Self::Todo,
            TaskStatusArg::Doing => Self::Doing,
            TaskStatusArg::Done => Self::Done,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    controller: &Controller,
    args: ProjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProjectsCommand::List => {
            let mut projects: Vec<Arc<Project>> =
                controller.projects_snapshot().iter().cloned().collect();
            projects.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &projects,
                |x| ProjectRow::from(x),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Show { project } => {
            let detail = controller.project_detail(&EntityId::from(project)).await?;
            let out = output::render_single(
                &global.output,
                &detail,
                |p| {
                    format!(
                        "id: {}\nname: {}\ndescription: {}",
                        p.id,
                        p.name,
                        p.description.clone().unwrap_or_default()
                    )
                },
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Board { project } => {
            let project_id = EntityId::from(project);
            let key = opsdeck_core::ResourceKey::ProjectBoard(project_id.clone());

            // Board data is fetched on demand; pull it through the cache
            // and wait for the refetch to land (initial snapshot is empty).
            let mut rx = controller.board(&project_id);
            controller.invalidate(key.clone());

            let board = match tokio::time::timeout(
                std::time::Duration::from_secs(global.timeout),
                rx.changed(),
            )
            .await
            {
                Ok(Ok(())) => rx.borrow().clone(),
                _ => {
                    if let opsdeck_core::QueryState::Error(message) = controller.query_state(&key)
                    {
                        return Err(CliError::ApiError {
                            message,
                            status: None,
                        });
                    }
                    controller.board_snapshot(&project_id)
                }
            };

            let mut out = String::new();
            for sec in &board.sections {
                let _ = writeln!(out, "{} [{}]", sec.name, sec.id);
                for task in board.tasks_in(&sec.id) {
                    let due = task
                        .due_date
                        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
                        .unwrap_or_default();
                    let _ = writeln!(
                        out,
                        "  [{}] {} ({}){}",
                        task.status, task.name, task.id, due
                    );
                }
            }
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ProjectsCommand::CreateTask {
            project,
            section,
            name,
        } => {
            controller
                .execute(CoreCommand::CreateTask {
                    project_id: project.into(),
                    section_id: section.into(),
                    name,
                })
                .await?;
            output::print_success("Task created", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::RenameTask {
            project,
            task,
            name,
        } => {
            controller
                .execute(CoreCommand::UpdateTask {
                    project_id: project.into(),
                    task_id: task.into(),
                    update: TaskUpdate::rename(name),
                })
                .await?;
            output::print_success("Task renamed", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::SetStatus {
            project,
            task,
            status,
        } => {
            controller
                .execute(CoreCommand::UpdateTask {
                    project_id: project.into(),
                    task_id: task.into(),
                    update: TaskUpdate::set_status(status.into()),
                })
                .await?;
            output::print_success("Task status updated", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::DeleteTask { project, task } => {
            if !util::confirm(
                &format!("Delete task '{task}'? Subtasks and attachments go with it."),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteTask {
                    project_id: project.into(),
                    task_id: task.into(),
                })
                .await?;
            output::print_success("Task deleted", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::MoveTask {
            project,
            task,
            section,
            before,
            after,
        } => {
            controller
                .execute(CoreCommand::MoveTask {
                    project_id: project.into(),
                    position: MoveTaskPosition {
                        task_id: task.into(),
                        section_id: section.into(),
                        before_id: before.map(EntityId::from),
                        after_id: after.map(EntityId::from),
                    },
                })
                .await?;
            output::print_success("Task moved", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::CreateSection { project, name } => {
            controller
                .execute(CoreCommand::CreateSection {
                    project_id: project.into(),
                    name,
                })
                .await?;
            output::print_success("Section created", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::RenameSection {
            project,
            section,
            name,
        } => {
            controller
                .execute(CoreCommand::RenameSection {
                    project_id: project.into(),
                    section_id: section.into(),
                    name,
                })
                .await?;
            output::print_success("Section renamed", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::MoveSection {
            project,
            section,
            before,
            after,
        } => {
            controller
                .execute(CoreCommand::MoveSection {
                    project_id: project.into(),
                    position: MovePosition {
                        item_id: section.into(),
                        before_id: before.map(EntityId::from),
                        after_id: after.map(EntityId::from),
                    },
                })
                .await?;
            output::print_success("Section moved", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::AddSubtask {
            project,
            task,
            name,
        } => {
            controller
                .execute(CoreCommand::AddSubtask {
                    project_id: project.into(),
                    task_id: task.into(),
                    name,
                })
                .await?;
            output::print_success("Subtask added", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::ToggleSubtask {
            project,
            task,
            subtask,
            done,
        } => {
            controller
                .execute(CoreCommand::ToggleSubtask {
                    project_id: project.into(),
                    task_id: task.into(),
                    subtask_id: subtask.into(),
                    done,
                })
                .await?;
            output::print_success("Subtask updated", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::DeleteSubtask {
            project,
            task,
            subtask,
        } => {
            controller
                .execute(CoreCommand::DeleteSubtask {
                    project_id: project.into(),
                    task_id: task.into(),
                    subtask_id: subtask.into(),
                })
                .await?;
            output::print_success("Subtask deleted", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::Attachments { project, task } => {
            let attachments = controller
                .task_attachments(&EntityId::from(project), &EntityId::from(task))
                .await?;
            let out = output::render_list(
                &global.output,
                &attachments,
                |x| AttachmentRow::from(x),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::AddAttachment {
            project,
            task,
            file_name,
            size,
        } => {
            controller
                .execute(CoreCommand::AddAttachment {
                    project_id: project.into(),
                    task_id: task.into(),
                    file_name,
                    size_bytes: size,
                })
                .await?;
            output::print_success("Attachment registered", &global.color, global.quiet);
            Ok(())
        }

        ProjectsCommand::DeleteAttachment {
            project,
            task,
            attachment,
        } => {
            if !util::confirm(
                &format!("Delete attachment '{attachment}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            controller
                .execute(CoreCommand::DeleteAttachment {
                    project_id: project.into(),
                    task_id: task.into(),
                    attachment_id: attachment.into(),
                })
                .await?;
            output::print_success("Attachment deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}

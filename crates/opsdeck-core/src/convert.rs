// ── Wire-to-domain conversions ──
//
// One From impl per resource. Unknown status strings degrade to the
// default variant rather than failing the whole payload; the server is
// trusted but new enum values must not brick older clients.

use std::str::FromStr;

use opsdeck_api::models::{
    AttachmentDto, BoardDto, ProjectDto, PromotionDto, RegionDto, RoleDto, SectionDto, StoreDto,
    SubtaskDto, TaskDto, TicketDto, TicketSummaryDto, UserDto, UserInfoDto,
};

use crate::model::{
    Attachment, BoardSnapshot, EntityId, ItemId, Project, Promotion, Region, Role, Section,
    SessionUser, Store, Subtask, Task, TaskStatus, Ticket, TicketStatus, TicketSummary, User,
};

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            username: dto.username,
            display_name: dto.display_name,
            email: dto.email,
            role_id: dto.role_id.map(EntityId::from),
            store_id: dto.store_id.map(EntityId::from),
            enabled: dto.enabled,
        }
    }
}

impl From<UserInfoDto> for SessionUser {
    fn from(dto: UserInfoDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            username: dto.username,
            display_name: dto.display_name,
            role_id: dto.role_id.map(EntityId::from),
            permissions: dto.permissions,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(dto: RoleDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            description: dto.description,
            permissions: dto.permissions,
        }
    }
}

impl From<StoreDto> for Store {
    fn from(dto: StoreDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            region_id: dto.region_id.map(EntityId::from),
            address: dto.address,
            phone: dto.phone,
            enabled: dto.enabled,
        }
    }
}

impl From<RegionDto> for Region {
    fn from(dto: RegionDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            code: dto.code,
        }
    }
}

impl From<TicketDto> for Ticket {
    fn from(dto: TicketDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            title: dto.title,
            device: dto.device,
            customer: dto.customer,
            status: TicketStatus::from_str(&dto.status).unwrap_or_default(),
            assignee_id: dto.assignee_id.map(EntityId::from),
            store_id: dto.store_id.map(EntityId::from),
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<TicketSummaryDto> for TicketSummary {
    fn from(dto: TicketSummaryDto) -> Self {
        Self {
            open: dto.open,
            repairing: dto.repairing,
            completed: dto.completed,
            closed: dto.closed,
        }
    }
}

impl From<PromotionDto> for Promotion {
    fn from(dto: PromotionDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            title: dto.title,
            body: dto.body,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            active: dto.active,
        }
    }
}

impl From<ProjectDto> for Project {
    fn from(dto: ProjectDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            description: dto.description,
        }
    }
}

impl From<SectionDto> for Section {
    fn from(dto: SectionDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            project_id: EntityId::from(dto.project_id),
            name: dto.name,
            rank: dto.rank,
        }
    }
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: ItemId::Persisted(EntityId::from(dto.id)),
            section_id: EntityId::from(dto.section_id),
            name: dto.name,
            status: TaskStatus::from_str(&dto.status).unwrap_or_default(),
            due_date: dto.due_date,
            rank: dto.rank,
            subtasks: dto.subtasks.into_iter().map(Subtask::from).collect(),
            attachment_count: dto.attachment_count,
        }
    }
}

impl From<SubtaskDto> for Subtask {
    fn from(dto: SubtaskDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            done: dto.done,
        }
    }
}

impl From<AttachmentDto> for Attachment {
    fn from(dto: AttachmentDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            task_id: EntityId::from(dto.task_id),
            file_name: dto.file_name,
            size_bytes: dto.size_bytes,
            uploaded_at: dto.uploaded_at,
        }
    }
}

impl From<BoardDto> for BoardSnapshot {
    fn from(dto: BoardDto) -> Self {
        let mut sections: Vec<Section> = dto.sections.into_iter().map(Section::from).collect();
        sections.sort_by(|a, b| a.rank.cmp(&b.rank));

        let mut tasks: Vec<Task> = dto.tasks.into_iter().map(Task::from).collect();
        tasks.sort_by(|a, b| a.rank.cmp(&b.rank));

        Self { sections, tasks }
    }
}

// ── Domain-to-wire conversions (mutation payloads) ──────────────────

impl From<&crate::command::RoleDraft> for opsdeck_api::models::RoleBody {
    fn from(draft: &crate::command::RoleDraft) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            permissions: draft.permissions.clone(),
        }
    }
}

impl From<&crate::command::StoreDraft> for opsdeck_api::models::StoreBody {
    fn from(draft: &crate::command::StoreDraft) -> Self {
        Self {
            name: draft.name.clone(),
            region_id: draft.region_id.as_ref().map(ToString::to_string),
            address: draft.address.clone(),
            phone: draft.phone.clone(),
            enabled: draft.enabled,
        }
    }
}

impl From<&crate::command::RegionDraft> for opsdeck_api::models::RegionBody {
    fn from(draft: &crate::command::RegionDraft) -> Self {
        Self {
            name: draft.name.clone(),
            code: draft.code.clone(),
        }
    }
}

impl From<&crate::command::PromotionDraft> for opsdeck_api::models::PromotionBody {
    fn from(draft: &crate::command::PromotionDraft) -> Self {
        Self {
            title: draft.title.clone(),
            body: draft.body.clone(),
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            active: draft.active,
        }
    }
}

impl From<&crate::command::TaskUpdate> for opsdeck_api::models::TaskUpdateBody {
    fn from(update: &crate::command::TaskUpdate) -> Self {
        Self {
            name: update.name.clone(),
            status: update.status.map(|s| s.to_string()),
            due_date: update.due_date,
        }
    }
}

impl From<&crate::board::MoveTaskPosition> for opsdeck_api::models::MoveTaskBody {
    fn from(pos: &crate::board::MoveTaskPosition) -> Self {
        Self {
            item_id: pos.task_id.to_string(),
            section_id: pos.section_id.to_string(),
            before_id: pos.before_id.as_ref().map(ToString::to_string),
            after_id: pos.after_id.as_ref().map(ToString::to_string),
        }
    }
}

impl From<&crate::board::MovePosition> for opsdeck_api::models::MoveSectionBody {
    fn from(pos: &crate::board::MovePosition) -> Self {
        Self {
            item_id: pos.item_id.to_string(),
            before_id: pos.before_id.as_ref().map(ToString::to_string),
            after_id: pos.after_id.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use opsdeck_api::models::BoardDto;

    fn task_dto(id: &str, section: &str, rank: &str) -> TaskDto {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "sectionId": section,
            "name": id,
            "status": "todo",
            "rank": rank
        }))
        .unwrap()
    }

    #[test]
    fn board_conversion_orders_by_rank() {
        let dto = BoardDto {
            sections: vec![
                serde_json::from_value(serde_json::json!({
                    "id": "s2", "projectId": "p", "name": "Doing", "rank": "b"
                }))
                .unwrap(),
                serde_json::from_value(serde_json::json!({
                    "id": "s1", "projectId": "p", "name": "TODO", "rank": "a"
                }))
                .unwrap(),
            ],
            tasks: vec![
                task_dto("t2", "s1", "m"),
                task_dto("t1", "s1", "f"),
            ],
        };

        let board = BoardSnapshot::from(dto);
        assert_eq!(board.sections[0].id, EntityId::from("s1"));
        assert_eq!(board.sections[1].id, EntityId::from("s2"));
        assert_eq!(
            board.tasks[0].id,
            ItemId::Persisted(EntityId::from("t1"))
        );
    }

    #[test]
    fn unknown_status_degrades_to_default() {
        let dto = task_dto("t1", "s1", "a");
        let mut dto = dto;
        dto.status = "blocked".into(); // not a known status
        let task = Task::from(dto);
        assert_eq!(task.status, TaskStatus::Todo);
    }
}

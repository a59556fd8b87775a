// Project-board endpoints
//
// Sections and tasks are ordered by server-assigned rank strings. Move
// requests never carry a rank -- only the target position expressed as
// the adjacent persisted neighbors at the moment of the drop. The server
// computes the new rank and the next board read reflects it.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AttachmentBody, AttachmentDto, BoardDto, DoneBody, MoveSectionBody, MoveTaskBody, NameBody,
    ProjectDto, SectionDto, SubtaskDto, TaskCreateBody, TaskDto, TaskUpdateBody,
};

impl ApiClient {
    /// `GET /api/projects`
    pub async fn list_projects(&self) -> Result<Vec<ProjectDto>, Error> {
        let url = self.api_url("projects")?;
        debug!("listing projects");
        self.get(url).await
    }

    /// `GET /api/projects/{id}`
    pub async fn project_detail(&self, id: &str) -> Result<ProjectDto, Error> {
        let url = self.api_url(&format!("projects/{id}"))?;
        self.get(url).await
    }

    /// The full board for a project: sections plus every task.
    ///
    /// `GET /api/projects/{id}/tasks`
    pub async fn project_board(&self, id: &str) -> Result<BoardDto, Error> {
        let url = self.api_url(&format!("projects/{id}/tasks"))?;
        debug!(project = id, "fetching board");
        self.get(url).await
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// `POST /api/projects/{id}/tasks`
    pub async fn create_task(
        &self,
        project_id: &str,
        body: &TaskCreateBody,
    ) -> Result<TaskDto, Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks"))?;
        self.post(url, body).await
    }

    /// `PATCH /api/projects/{id}/tasks/{taskId}`
    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        body: &TaskUpdateBody,
    ) -> Result<TaskDto, Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}"))?;
        self.patch(url, body).await
    }

    /// `DELETE /api/projects/{id}/tasks/{taskId}`
    pub async fn delete_task(&self, project_id: &str, task_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}"))?;
        self.delete_ack(url).await
    }

    /// Reposition a task: target section plus adjacent persisted neighbors.
    ///
    /// `PUT /api/projects/{id}/tasks/{taskId}/move`
    pub async fn move_task(
        &self,
        project_id: &str,
        task_id: &str,
        body: &MoveTaskBody,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}/move"))?;
        debug!(
            task = task_id,
            before = body.before_id.as_deref(),
            after = body.after_id.as_deref(),
            "moving task"
        );
        self.put_ack(url, body).await
    }

    // ── Sections ─────────────────────────────────────────────────────

    /// `POST /api/projects/{id}/sections`
    pub async fn create_section(
        &self,
        project_id: &str,
        body: &NameBody,
    ) -> Result<SectionDto, Error> {
        let url = self.api_url(&format!("projects/{project_id}/sections"))?;
        self.post(url, body).await
    }

    /// `PATCH /api/projects/{id}/sections/{sectionId}`
    pub async fn rename_section(
        &self,
        project_id: &str,
        section_id: &str,
        body: &NameBody,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("projects/{project_id}/sections/{section_id}"))?;
        self.patch_ack(url, body).await
    }

    /// `PUT /api/projects/{id}/sections/{sectionId}/move`
    pub async fn move_section(
        &self,
        project_id: &str,
        section_id: &str,
        body: &MoveSectionBody,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("projects/{project_id}/sections/{section_id}/move"))?;
        debug!(
            section = section_id,
            before = body.before_id.as_deref(),
            after = body.after_id.as_deref(),
            "moving section"
        );
        self.put_ack(url, body).await
    }

    // ── Subtasks ─────────────────────────────────────────────────────

    /// `POST /api/projects/{id}/tasks/{taskId}/subtasks`
    pub async fn add_subtask(
        &self,
        project_id: &str,
        task_id: &str,
        body: &NameBody,
    ) -> Result<SubtaskDto, Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}/subtasks"))?;
        self.post(url, body).await
    }

    /// `PATCH /api/projects/{id}/tasks/{taskId}/subtasks/{subtaskId}`
    pub async fn toggle_subtask(
        &self,
        project_id: &str,
        task_id: &str,
        subtask_id: &str,
        done: bool,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "projects/{project_id}/tasks/{task_id}/subtasks/{subtask_id}"
        ))?;
        self.patch_ack(url, &DoneBody { done }).await
    }

    /// `DELETE /api/projects/{id}/tasks/{taskId}/subtasks/{subtaskId}`
    pub async fn delete_subtask(
        &self,
        project_id: &str,
        task_id: &str,
        subtask_id: &str,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "projects/{project_id}/tasks/{task_id}/subtasks/{subtask_id}"
        ))?;
        self.delete_ack(url).await
    }

    // ── Attachments ──────────────────────────────────────────────────

    /// `GET /api/projects/{id}/tasks/{taskId}/attachments`
    pub async fn list_attachments(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Vec<AttachmentDto>, Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}/attachments"))?;
        self.get(url).await
    }

    /// Register an attachment's metadata. Binary upload happens through the
    /// file service; this API only tracks the record.
    ///
    /// `POST /api/projects/{id}/tasks/{taskId}/attachments`
    pub async fn add_attachment(
        &self,
        project_id: &str,
        task_id: &str,
        body: &AttachmentBody,
    ) -> Result<AttachmentDto, Error> {
        let url = self.api_url(&format!("projects/{project_id}/tasks/{task_id}/attachments"))?;
        self.post(url, body).await
    }

    /// `DELETE /api/projects/{id}/tasks/{taskId}/attachments/{attachmentId}`
    pub async fn delete_attachment(
        &self,
        project_id: &str,
        task_id: &str,
        attachment_id: &str,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "projects/{project_id}/tasks/{task_id}/attachments/{attachment_id}"
        ))?;
        self.delete_ack(url).await
    }
}

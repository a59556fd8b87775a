// Support-ticket endpoints
//
// Tickets move through open -> repairing -> completed/closed on the
// server; the client only requests the transitions and re-reads.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RepairBody, TicketDto, TicketSummaryDto};

impl ApiClient {
    /// `GET /api/tickets`
    pub async fn list_tickets(&self) -> Result<Vec<TicketDto>, Error> {
        let url = self.api_url("tickets")?;
        debug!("listing tickets");
        self.get(url).await
    }

    /// Tickets assigned to (or created by) a given user.
    ///
    /// `GET /api/tickets/by-user/{id}`
    pub async fn tickets_by_user(&self, user_id: &str) -> Result<Vec<TicketDto>, Error> {
        let url = self.api_url(&format!("tickets/by-user/{user_id}"))?;
        self.get(url).await
    }

    /// Per-status counts across all tickets.
    ///
    /// `GET /api/tickets/summary`
    pub async fn ticket_summary(&self) -> Result<TicketSummaryDto, Error> {
        let url = self.api_url("tickets/summary")?;
        self.get(url).await
    }

    /// Move a ticket into the repairing state, optionally assigning it.
    ///
    /// `POST /api/tickets/{id}/repair`
    pub async fn repair_ticket(&self, id: &str, body: &RepairBody) -> Result<TicketDto, Error> {
        let url = self.api_url(&format!("tickets/{id}/repair"))?;
        debug!(id, "starting repair");
        self.post(url, body).await
    }

    /// Mark a ticket completed.
    ///
    /// `POST /api/tickets/{id}/complete`
    pub async fn complete_ticket(&self, id: &str) -> Result<TicketDto, Error> {
        let url = self.api_url(&format!("tickets/{id}/complete"))?;
        debug!(id, "completing ticket");
        self.post(url, &serde_json::json!({})).await
    }
}

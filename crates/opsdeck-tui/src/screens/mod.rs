//! Screen implementations. Each screen is a top-level Component.

pub mod board;
pub mod org;
pub mod promotions;
pub mod tickets;
pub mod users;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Board, Box::new(board::BoardScreen::new())),
        (ScreenId::Tickets, Box::new(tickets::TicketsScreen::new())),
        (ScreenId::Users, Box::new(users::UsersScreen::new())),
        (ScreenId::Org, Box::new(org::OrgScreen::new())),
        (
            ScreenId::Promotions,
            Box::new(promotions::PromotionsScreen::new()),
        ),
    ]
}

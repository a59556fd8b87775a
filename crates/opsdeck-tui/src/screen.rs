//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Board, // 1
    Tickets,    // 2
    Users,      // 3
    Org,        // 4
    Promotions, // 5
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 5] = [
        Self::Board,
        Self::Tickets,
        Self::Users,
        Self::Org,
        Self::Promotions,
    ];

    /// Numeric key (1-5) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Board => 1,
            Self::Tickets => 2,
            Self::Users => 3,
            Self::Org => 4,
            Self::Promotions => 5,
        }
    }

    /// Screen from a numeric key (1-5). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Board),
            2 => Some(Self::Tickets),
            3 => Some(Self::Users),
            4 => Some(Self::Org),
            5 => Some(Self::Promotions),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Board => "Board",
            Self::Tickets => "Tickets",
            Self::Users => "Users",
            Self::Org => "Org",
            Self::Promotions => "Promos",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        assert_eq!(ScreenId::Promotions.next(), ScreenId::Board);
        assert_eq!(ScreenId::Board.prev(), ScreenId::Promotions);
    }

    #[test]
    fn number_round_trips() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(9), None);
    }
}

use crate::types::{SessionFilter, UserSession};

impl SessionFilter {
    /// True when every set criterion holds for the session.
    ///
    /// Range bounds are inclusive on both ends; an inverted range
    /// (`from > to`, `min > max`) simply matches nothing.
    pub fn matches(&self, session: &UserSession) -> bool {
        if let Some(ref search) = self.search {
            if !search.is_empty() {
                let needle = search.to_lowercase();
                let hit = session.user_id.to_lowercase().contains(&needle)
                    || session.events.iter().any(|e| {
                        e.action.to_lowercase().contains(&needle)
                            || e.service.to_lowercase().contains(&needle)
                    });
                if !hit {
                    return false;
                }
            }
        }

        if let Some(status) = self.status {
            if session.status != status {
                return false;
            }
        }

        if let Some(from) = self.from {
            if session.start_time < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if session.start_time > to {
                return false;
            }
        }

        let minutes = session.duration_secs / 60.0;

        if let Some(min) = self.min_minutes {
            if minutes < min {
                return false;
            }
        }

        if let Some(max) = self.max_minutes {
            if minutes > max {
                return false;
            }
        }

        true
    }

    /// Conjunction of two filters: each criterion is tightened to the more
    /// restrictive of the pair (range bounds narrow; term and status keep
    /// the first one set).
    pub fn and(self, other: SessionFilter) -> SessionFilter {
        SessionFilter {
            search: self.search.or(other.search),
            status: self.status.or(other.status),
            from: match (self.from, other.from) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
            to: match (self.to, other.to) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
            min_minutes: match (self.min_minutes, other.min_minutes) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
            max_minutes: match (self.max_minutes, other.max_minutes) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Select the sessions matching the filter, preserving input order.
pub fn apply(sessions: &[UserSession], filter: &SessionFilter) -> Vec<UserSession> {
    sessions
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}

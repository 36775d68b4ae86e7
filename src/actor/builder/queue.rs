//! Single-slot rebuild queue.
//!
//! ```text
//!          request            request
//! Idle ─────────────▶ Building ────────▶ Building(pending)
//!  ▲                     │                     │
//!  └──── complete ───────┘                     │ complete: start one more
//!                        ▲─────────────────────┘
//! ```
//!
//! At most one build runs and at most one more is owed. Any number of
//! requests during a build collapse into that single follow-up, which starts
//! after the running one finishes and therefore sees the newest sources.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildQueue {
    #[default]
    Idle,
    Building {
        pending: bool,
    },
}

impl BuildQueue {
    /// Record a rebuild request. Returns `true` if a build should start now.
    pub fn request(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Building { pending: false };
                true
            }
            Self::Building { pending } => {
                *pending = true;
                false
            }
        }
    }

    /// Record that the running build finished. Returns `true` if the owed
    /// follow-up should start now.
    pub fn complete(&mut self) -> bool {
        match *self {
            Self::Building { pending: true } => {
                *self = Self::Building { pending: false };
                true
            }
            Self::Building { pending: false } | Self::Idle => {
                *self = Self::Idle;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_when_idle_starts() {
        let mut queue = BuildQueue::default();
        assert!(queue.request());
        assert_eq!(queue, BuildQueue::Building { pending: false });
        assert!(!queue.complete());
        assert_eq!(queue, BuildQueue::Idle);
    }

    #[test]
    fn test_requests_during_build_coalesce() {
        let mut queue = BuildQueue::default();
        assert!(queue.request());

        // Three more changes while the first build runs
        assert!(!queue.request());
        assert!(!queue.request());
        assert!(!queue.request());
        assert_eq!(queue, BuildQueue::Building { pending: true });

        // Exactly one follow-up
        assert!(queue.complete());
        assert_eq!(queue, BuildQueue::Building { pending: false });
        assert!(!queue.complete());
        assert_eq!(queue, BuildQueue::Idle);
    }

    #[test]
    fn test_request_during_follow_up() {
        let mut queue = BuildQueue::default();
        queue.request();
        queue.request();
        assert!(queue.complete());

        assert!(!queue.request());
        assert!(queue.complete());
        assert!(!queue.complete());
    }
}

//! Return reachability of statements
//!
//! Every statement visit yields a [`StatementType`]. Branches merge with
//! [`StatementType::join`]; statement sequences fold with
//! [`StatementType::then`].

/// Whether control leaving a statement has definitely returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    /// Control always reaches the end of the statement
    NotReturning,
    /// Every path returns or throws
    Returning,
    /// Some paths return, others fall through
    MaybeReturning,
}

impl StatementType {
    /// Merge two alternative paths
    pub fn join(self, other: StatementType) -> StatementType {
        if self == other {
            self
        } else {
            StatementType::MaybeReturning
        }
    }

    /// Sequence `next` after `self`
    pub fn then(self, next: StatementType) -> StatementType {
        match (self, next) {
            (StatementType::NotReturning, next) => next,
            (StatementType::Returning, _) => StatementType::Returning,
            (StatementType::MaybeReturning, StatementType::Returning) => StatementType::Returning,
            (StatementType::MaybeReturning, _) => StatementType::MaybeReturning,
        }
    }

    pub fn is_returning(self) -> bool {
        self == StatementType::Returning
    }
}

#[cfg(test)]
mod tests {
    use super::StatementType::*;

    #[test]
    fn test_join() {
        assert_eq!(Returning.join(Returning), Returning);
        assert_eq!(NotReturning.join(NotReturning), NotReturning);
        assert_eq!(Returning.join(NotReturning), MaybeReturning);
        assert_eq!(NotReturning.join(MaybeReturning), MaybeReturning);
        assert_eq!(MaybeReturning.join(MaybeReturning), MaybeReturning);
    }

    #[test]
    fn test_then() {
        assert_eq!(NotReturning.then(Returning), Returning);
        assert_eq!(NotReturning.then(MaybeReturning), MaybeReturning);
        assert_eq!(MaybeReturning.then(Returning), Returning);
        assert_eq!(MaybeReturning.then(NotReturning), MaybeReturning);
        assert_eq!(Returning.then(NotReturning), Returning);
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlmagestError {
    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Invalid geographic location: {0}")]
    InvalidLocation(String),

    #[error("Body not found: {0}")]
    BodyNotFound(String),

    #[error("Body '{body}' references parent index {parent} which does not precede it in the arena")]
    InvalidBodyHierarchy { body: String, parent: usize },

    #[error("Duplicate body name: {0}")]
    DuplicateBodyName(String),
}

impl PartialEq for AlmagestError {
    fn eq(&self, other: &Self) -> bool {
        use AlmagestError::*;
        match (self, other) {
            (InvalidOrbitalElements(a), InvalidOrbitalElements(b)) => a == b,
            (InvalidCalendarDate(a), InvalidCalendarDate(b)) => a == b,
            (InvalidLocation(a), InvalidLocation(b)) => a == b,
            (BodyNotFound(a), BodyNotFound(b)) => a == b,
            (
                InvalidBodyHierarchy { body: a, parent: pa },
                InvalidBodyHierarchy { body: b, parent: pb },
            ) => a == b && pa == pb,
            (DuplicateBodyName(a), DuplicateBodyName(b)) => a == b,
            _ => false,
        }
    }
}

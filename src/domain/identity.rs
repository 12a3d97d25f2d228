use super::todo::OwnerId;

/// An already authenticated principal acting on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: OwnerId,
    pub display_name: String,
}

impl Caller {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: OwnerId::new(id), display_name: display_name.into() }
    }
}

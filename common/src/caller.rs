/// The party on whose behalf a request is being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// A caller whose bearer credential resolved to an account identifier.
    Account(String),

    /// A caller that presented no credential at all.
    Anonymous,
}

impl Caller {
    pub fn account(id: impl Into<String>) -> Self {
        Self::Account(id.into())
    }

    /// The account identifier of an authenticated caller.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Caller::Account(id) => Some(id.as_str()),
            Caller::Anonymous => None,
        }
    }
}

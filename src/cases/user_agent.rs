use super::{FieldCheck, TestCase};
use crate::client_info::ClientInfo;
use crate::fixtures::FixtureRecord;

/// Expected browser fields for one user-agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentCase {
    pub user_agent: String,
    pub family: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

impl UserAgentCase {
    /// Build from a `test_ua.yaml`-style record.
    pub fn from_record(record: &FixtureRecord) -> anyhow::Result<Self> {
        Ok(UserAgentCase {
            user_agent: record.require("user_agent_string")?.to_string(),
            family: record.require("family")?.to_string(),
            major: record.optional("major").map(str::to_string),
            minor: record.optional("minor").map(str::to_string),
            patch: record.optional("patch").map(str::to_string),
        })
    }
}

impl TestCase for UserAgentCase {
    type Parsed = ClientInfo;

    fn input(&self) -> &str {
        &self.user_agent
    }

    fn verify(&self, parsed: &ClientInfo) -> anyhow::Result<()> {
        let actual = &parsed.user_agent;
        let mut check = FieldCheck::new(&self.user_agent);
        check.field("Family", Some(self.family.as_str()), Some(actual.family.as_str()));
        check.field("Major", self.major.as_deref(), actual.major.as_deref());
        check.field("Minor", self.minor.as_deref(), actual.minor.as_deref());
        check.field("Patch", self.patch.as_deref(), actual.patch.as_deref());
        check.finish()
    }
}

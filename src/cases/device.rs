use super::{FieldCheck, TestCase};
use crate::client_info::ClientInfo;
use crate::fixtures::FixtureRecord;

/// Expected device fields for one user-agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCase {
    pub user_agent: String,
    pub family: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl DeviceCase {
    /// Build from a `test_device.yaml`-style record.
    pub fn from_record(record: &FixtureRecord) -> anyhow::Result<Self> {
        Ok(DeviceCase {
            user_agent: record.require("user_agent_string")?.to_string(),
            family: record.require("family")?.to_string(),
            brand: record.optional("brand").map(str::to_string),
            model: record.optional("model").map(str::to_string),
        })
    }
}

impl TestCase for DeviceCase {
    type Parsed = ClientInfo;

    fn input(&self) -> &str {
        &self.user_agent
    }

    fn verify(&self, parsed: &ClientInfo) -> anyhow::Result<()> {
        let actual = &parsed.device;
        let mut check = FieldCheck::new(&self.user_agent);
        check.field("Family", Some(self.family.as_str()), Some(actual.family.as_str()));
        check.field("Brand", self.brand.as_deref(), actual.brand.as_deref());
        check.field("Model", self.model.as_deref(), actual.model.as_deref());
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_info::Device;

    #[test]
    fn test_brand_and_model() {
        let record = FixtureRecord::new()
            .with_field("user_agent_string", "Mozilla/5.0 (iPhone; CPU iPhone OS 9_1)")
            .with_field("family", "iPhone")
            .with_field("brand", "Apple")
            .with_field("model", "iPhone");
        let case = DeviceCase::from_record(&record).unwrap();

        let parsed = ClientInfo {
            device: Device::new("iPhone").with_brand_model(Some("Apple"), Some("iPhone")),
            ..Default::default()
        };
        assert!(case.verify(&parsed).is_ok());

        let unbranded = ClientInfo {
            device: Device::new("iPhone"),
            ..Default::default()
        };
        let msg = case.verify(&unbranded).unwrap_err().to_string();
        assert!(msg.contains("Brand - expected 'Apple' but got <none>"));
        assert!(msg.contains("Model - expected 'iPhone' but got <none>"));
    }
}

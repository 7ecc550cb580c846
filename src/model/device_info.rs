use std::collections::BTreeSet;

/// Capabilities reported by the firmware
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Protocol versions, e.g. `FIDO_2_0`
    pub versions: Vec<String>,
    pub extensions: BTreeSet<String>,
}

impl DeviceInfo {
    pub fn new<I, S>(versions: Vec<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            versions,
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn supports_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

use serde::{Deserialize, Serialize};

/// Subset of the `https://ipinfo.io/json` response the widget uses.
///
/// The service returns many more fields (city, org, ...); they are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpInfo {
    pub ip: String,
}

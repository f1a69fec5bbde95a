//! Managed network device records from the controller inventory.

use crate::DeviceId;
use serde::{Deserialize, Serialize};

/// A managed network device as listed by `GET network-device`.
///
/// Fetched once per session and immutable thereafter; this client never
/// mutates inventory. Unknown inventory fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Controller-assigned unique identifier.
    #[serde(rename = "instanceUuid")]
    pub id: DeviceId,

    /// Management address the device is reached on.
    #[serde(rename = "managementIpAddress")]
    pub ip: String,

    /// Device hostname, if the controller knows one.
    #[serde(default)]
    pub hostname: String,

    /// Platform description, e.g. "Cisco Catalyst 9300 Switch".
    #[serde(rename = "type", default)]
    pub kind: String,
}

use std::net::IpAddr;

use network_interface::{NetworkInterface, NetworkInterfaceConfig};

use crate::error::CaptureError;

/// Name and addresses of a local network device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub addrs: Vec<IpAddr>,
}

impl Device {
    /// A "suitable" device has at least one IPv4 address, and none of its addresses is a loopback.
    fn is_suitable(&self) -> bool {
        self.addrs.iter().any(IpAddr::is_ipv4) && !self.addrs.iter().any(IpAddr::is_loopback)
    }
}

/// Lists the local network devices.
pub fn list_devices() -> Result<Vec<Device>, CaptureError> {
    let devices = NetworkInterface::show().map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut list: Vec<Device> = Vec::new();
    // the same device is listed once per address on some platforms
    for device in devices {
        let addrs = device.addr.iter().map(|address| address.ip());
        if let Some(existing) = list.iter_mut().find(|d| d.name == device.name) {
            existing.addrs.extend(addrs);
        } else {
            list.push(Device {
                name: device.name,
                addrs: addrs.collect(),
            });
        }
    }
    Ok(list)
}

/// Returns the interface to capture on: `requested` if it exists,
/// otherwise the first suitable device.
pub fn select_interface(
    devices: &[Device],
    requested: Option<&str>,
) -> Result<String, CaptureError> {
    match requested {
        Some(name) => devices
            .iter()
            .find(|device| device.name == name)
            .map(|device| device.name.clone())
            .ok_or_else(|| CaptureError::UnknownInterface(name.to_string())),
        None => devices
            .iter()
            .find(|device| device.is_suitable())
            .map(|device| device.name.clone())
            .ok_or(CaptureError::NoInterface),
    }
}

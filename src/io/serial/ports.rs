// src/io/serial/ports.rs
//
// Device enumeration: a fresh snapshot of attached serial ports on every call.

use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use std::fmt;

use crate::io::error::EnumerationError;

/// A serial device a plotter may be attached to.
///
/// Identity is the port name; the remaining fields only describe the device.
#[derive(Clone, Debug, Serialize)]
pub struct PlotterPort {
    pub port_name: String,
    pub port_type: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

impl PlotterPort {
    /// Port known only by name (typed by the user or read from settings)
    pub fn named(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            port_type: "Unknown".to_string(),
            manufacturer: None,
            product: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.port_name
    }

    /// One-line description for selection lists, e.g. `USB FTDI FT232R`
    pub fn description(&self) -> String {
        let mut parts = vec![self.port_type.clone()];
        parts.extend(self.manufacturer.iter().cloned());
        parts.extend(self.product.iter().cloned());
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            parts.push(format!("[{:04x}:{:04x}]", vid, pid));
        }
        parts.join(" ")
    }
}

impl PartialEq for PlotterPort {
    fn eq(&self, other: &Self) -> bool {
        self.port_name == other.port_name
    }
}

impl Eq for PlotterPort {}

impl fmt::Display for PlotterPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.port_name)
    }
}

impl From<SerialPortInfo> for PlotterPort {
    fn from(p: SerialPortInfo) -> Self {
        let (port_type, manufacturer, product, serial_number, vid, pid) = match p.port_type {
            SerialPortType::UsbPort(info) => (
                "USB".to_string(),
                info.manufacturer,
                info.product,
                info.serial_number,
                Some(info.vid),
                Some(info.pid),
            ),
            SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None, None, None, None, None),
            SerialPortType::PciPort => ("PCI".to_string(), None, None, None, None, None),
            SerialPortType::Unknown => ("Unknown".to_string(), None, None, None, None, None),
        };
        PlotterPort {
            port_name: p.port_name,
            port_type,
            manufacturer,
            product,
            serial_number,
            vid,
            pid,
        }
    }
}

/// On macOS only /dev/cu.* (calling unit) devices are offered.
/// The /dev/tty.* twins block on open waiting for carrier detect.
fn is_listable(port_name: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        !port_name.starts_with("/dev/tty.")
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = port_name;
        true
    }
}

/// Turn the platform's port list into the sorted list offered to the user
fn collect_ports(ports: Vec<SerialPortInfo>) -> Vec<PlotterPort> {
    let mut ports: Vec<PlotterPort> = ports
        .into_iter()
        .filter(|p| is_listable(&p.port_name))
        .map(PlotterPort::from)
        .collect();
    ports.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    ports
}

/// List the serial ports currently attached.
///
/// Nothing is cached: every call asks the platform again.
pub fn list_ports() -> Result<Vec<PlotterPort>, EnumerationError> {
    let ports = collect_ports(serialport::available_ports()?);
    tlog!("[ports] Found {} serial port(s)", ports.len());
    Ok(ports)
}

//! Static chip information

/// Chip description returned by `Max30105Driver::info()`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    /// Chip name
    pub chip_name: &'static str,
    /// Manufacturer name
    pub manufacturer_name: &'static str,
    /// Bus interface
    pub interface: &'static str,
    /// Minimum supply voltage in V
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage in V
    pub supply_voltage_max_v: f32,
    /// Maximum supply current in mA
    pub max_current_ma: f32,
    /// Minimum operating temperature in °C
    pub temperature_min: f32,
    /// Maximum operating temperature in °C
    pub temperature_max: f32,
    /// Driver version, `major * 1000 + minor * 100`
    pub driver_version: u32,
}

impl DeviceInfo {
    /// MAX30105 description
    pub const MAX30105: Self = Self {
        chip_name: "Maxim Integrated MAX30105",
        manufacturer_name: "Maxim Integrated",
        interface: "IIC",
        supply_voltage_min_v: 1.7,
        supply_voltage_max_v: 2.0,
        max_current_ma: 50.0,
        temperature_min: -40.0,
        temperature_max: 85.0,
        driver_version: 1000,
    };
}

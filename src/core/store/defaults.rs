//! Default electronics catalog loaded by `bomq init` and `bomq reset`

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::CatalogStore;
use crate::core::error::QuoteError;
use crate::entities::BomLine;

/// Static seed data; positions are 1-based in declaration order
pub struct DefaultCatalog;

impl DefaultCatalog {
    /// (name, submission date)
    pub const ASSEMBLIES: &'static [(&'static str, &'static str)] = &[
        ("Microcontrollers and Processors", "2024-01-02"),
        ("Memory and Storage", "2024-01-03"),
        ("Power Management", "2024-01-04"),
        ("Oscillators and Timing", "2024-01-05"),
        ("Communication Modules", "2024-01-06"),
        ("Input/Output Interfaces", "2024-01-07"),
        ("Connectors and Interfaces", "2024-01-08"),
        ("Displays and Indicators", "2024-01-09"),
        ("Passive Components", "2024-01-10"),
        ("Mechanical and Assembly Components", "2024-01-11"),
        ("Control and Feedback", "2024-01-12"),
    ];

    /// (name, unit price)
    pub const COMPONENTS: &'static [(&'static str, &'static str)] = &[
        ("ATmega328", "2.0"),
        ("STM32", "0.5"),
        ("ESP32", "0.3"),
        ("EEPROM", "0.2"),
        ("Oscillator", "0.1"),
        ("Voltage Regulator", "0.1"),
        ("DC-DC Converter", "0.2"),
        ("Pin Header", "0.05"),
        ("JST Connector", "0.05"),
        ("USB Port", "0.1"),
        ("UART Module", "0.1"),
        ("I2C Module", "0.1"),
        ("SPI Module", "0.1"),
        ("Wi-Fi Module", "0.2"),
        ("Bluetooth Module", "0.2"),
        ("JTAG", "0.1"),
        ("SWD (Serial Wire Debug)", "0.1"),
        ("GPIO Ports", "0.2"),
        ("ADC (Analog-to-Digital Converter)", "0.2"),
        ("DAC (Digital-to-Analog Converter)", "0.2"),
        ("LED Indicators", "0.05"),
        ("Push Button Switches", "0.05"),
        ("PCB", "0.3"),
        ("Heat Sink", "0.1"),
        ("Resistors", "0.1"),
        ("Capacitors", "0.1"),
        ("Diodes", "0.1"),
        ("Transistors", "0.1"),
        ("Inductors", "0.1"),
        ("Relays", "0.2"),
        ("Potentiometers", "0.1"),
        ("Temperature Sensors", "0.2"),
        ("Hall Effect Sensors", "0.2"),
        ("Touch Sensors", "0.2"),
        ("Relay Module", "0.2"),
        ("Buzzer", "0.1"),
        ("RTC (Real-Time Clock)", "0.2"),
        ("LCD Display", "0.3"),
        ("OLED Display", "0.3"),
        ("Battery Holder", "0.1"),
        ("Fuse", "0.05"),
    ];

    /// (assembly position, component position, quantity per unit)
    pub const BOM_LINES: &'static [(usize, usize, &'static str)] = &[
        (1, 1, "2.0"), (1, 2, "0.5"), (1, 3, "0.3"),
        (2, 4, "0.2"),
        (3, 5, "0.1"), (3, 6, "0.2"), (3, 7, "0.1"),
        (4, 8, "0.1"), (4, 9, "0.2"),
        (5, 10, "0.1"), (5, 11, "0.1"), (5, 12, "0.1"), (5, 13, "0.2"), (5, 14, "0.2"),
        (6, 15, "0.2"), (6, 16, "0.2"), (6, 17, "0.2"), (6, 18, "0.2"), (6, 19, "0.2"), (6, 20, "0.2"),
        (7, 21, "0.05"), (7, 22, "0.05"), (7, 23, "0.1"), (7, 24, "0.2"),
        (8, 25, "0.05"), (8, 26, "0.3"), (8, 27, "0.3"),
        (9, 28, "0.1"), (9, 29, "0.1"), (9, 30, "0.1"), (9, 31, "0.1"), (9, 32, "0.1"),
        (10, 33, "0.3"), (10, 34, "0.1"), (10, 35, "0.05"),
        (11, 36, "0.05"), (11, 37, "0.1"), (11, 38, "0.2"),
    ];
}

fn seed_decimal(text: &str) -> Result<Decimal, QuoteError> {
    Decimal::from_str(text)
        .map_err(|e| QuoteError::integrity(format!("bad seed value '{}': {}", text, e)))
}

impl CatalogStore {
    /// Insert the default catalog into an empty store
    pub(super) fn seed_defaults(&mut self) -> Result<(), QuoteError> {
        let mut component_ids = Vec::with_capacity(DefaultCatalog::COMPONENTS.len());
        for (name, price) in DefaultCatalog::COMPONENTS {
            component_ids.push(self.insert_component(name, seed_decimal(price)?)?);
        }

        for (pos, (name, created)) in DefaultCatalog::ASSEMBLIES.iter().enumerate() {
            let created = NaiveDate::parse_from_str(created, super::DATE_FORMAT).map_err(|e| {
                QuoteError::integrity(format!("bad seed date '{}': {}", created, e))
            })?;

            let mut bom = Vec::new();
            for (asm_pos, cmp_pos, qty) in DefaultCatalog::BOM_LINES {
                if *asm_pos != pos + 1 {
                    continue;
                }
                let component_id = component_ids.get(cmp_pos - 1).copied().ok_or_else(|| {
                    QuoteError::integrity(format!("seed BOM line points at component #{}", cmp_pos))
                })?;
                bom.push(BomLine::new(component_id, seed_decimal(qty)?));
            }

            self.insert_assembly_dated(name, created, &bom)?;
        }

        tracing::debug!(
            components = DefaultCatalog::COMPONENTS.len(),
            assemblies = DefaultCatalog::ASSEMBLIES.len(),
            "default catalog seeded"
        );
        Ok(())
    }
}

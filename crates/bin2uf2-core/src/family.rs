use std::fmt;

// See https://github.com/microsoft/uf2/blob/master/utils/uf2families.json for list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
#[allow(non_camel_case_types)]
pub enum Family {
    /// Raspberry Pi RP2040
    #[default]
    RP2040 = 0xe48bff56,

    /// Raspberry Pi Microcontrollers: Absolute (unpartitioned) download
    RP2XXX_ABSOLUTE = 0xe48bff57,

    /// Raspberry Pi Microcontrollers: Data partition download
    RP2XXX_DATA = 0xe48bff58,

    /// Raspberry Pi RP2350, Secure Arm image
    RP2350_ARM_S = 0xe48bff59,

    /// Raspberry Pi RP2350, RISC-V image
    RP2350_RISCV = 0xe48bff5a,

    /// Raspberry Pi RP2350, Non-secure Arm image
    RP2350_ARM_NS = 0xe48bff5b,

    /// Microchip (Atmel) SAMD21
    SAMD21 = 0x68ed2b88,

    /// Microchip (Atmel) SAMD51
    SAMD51 = 0x55114460,

    /// Nordic NRF52832
    NRF52 = 0x1b57745f,

    /// Nordic NRF52840
    NRF52840 = 0xada52840,

    /// ST STM32F1xx
    STM32F1 = 0x5ee21072,

    /// ST STM32F4xx
    STM32F4 = 0x57755a57,

    /// Espressif ESP32-S2
    ESP32S2 = 0xbfdd4eee,
}

impl Family {
    pub const ALL: &'static [Family] = &[
        Family::RP2040,
        Family::RP2XXX_ABSOLUTE,
        Family::RP2XXX_DATA,
        Family::RP2350_ARM_S,
        Family::RP2350_RISCV,
        Family::RP2350_ARM_NS,
        Family::SAMD21,
        Family::SAMD51,
        Family::NRF52,
        Family::NRF52840,
        Family::STM32F1,
        Family::STM32F4,
        Family::ESP32S2,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Family::RP2040 => "RP2040",
            Family::RP2XXX_ABSOLUTE => "RP2XXX_ABSOLUTE",
            Family::RP2XXX_DATA => "RP2XXX_DATA",
            Family::RP2350_ARM_S => "RP2350_ARM_S",
            Family::RP2350_RISCV => "RP2350_RISCV",
            Family::RP2350_ARM_NS => "RP2350_ARM_NS",
            Family::SAMD21 => "SAMD21",
            Family::SAMD51 => "SAMD51",
            Family::NRF52 => "NRF52",
            Family::NRF52840 => "NRF52840",
            Family::STM32F1 => "STM32F1",
            Family::STM32F4 => "STM32F4",
            Family::ESP32S2 => "ESP32S2",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.id() == id)
    }

    pub fn find_by_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.short_name().eq_ignore_ascii_case(name))
    }
}

impl From<Family> for u32 {
    fn from(family: Family) -> Self {
        family.id()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010x})", self.short_name(), self.id())
    }
}

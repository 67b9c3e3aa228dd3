use crate::{boards::BoardInfo, family::Family};

// RP2350 can boot from partitions elsewhere in flash, a flat binary still
// lands at the start of the XIP window.
pub const FLASH_START_RP2350: u32 = 0x10000000;

#[derive(Debug, Default, Clone)]
pub struct RP2350;

impl BoardInfo for RP2350 {
    fn family(&self) -> Family {
        // Arm secure is what the bootrom expects after a BOOTSEL power cycle.
        Family::RP2350_ARM_S
    }

    fn flash_start(&self) -> u32 {
        FLASH_START_RP2350
    }

    fn board_name(&self) -> &'static str {
        "rp2350"
    }
}

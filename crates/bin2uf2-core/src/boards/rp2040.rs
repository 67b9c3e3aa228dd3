use crate::{boards::BoardInfo, family::Family};

pub const FLASH_START_RP2040: u32 = 0x10000000;

#[derive(Debug, Default, Clone)]
pub struct RP2040;

impl BoardInfo for RP2040 {
    fn family(&self) -> Family {
        Family::RP2040
    }

    fn flash_start(&self) -> u32 {
        FLASH_START_RP2040
    }

    fn board_name(&self) -> &'static str {
        "rp2040"
    }
}

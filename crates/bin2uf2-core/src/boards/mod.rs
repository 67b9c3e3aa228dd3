pub use rp2040::RP2040;
pub use rp2350::RP2350;

use crate::{family::Family, Uf2Config};

pub mod rp2040;
pub mod rp2350;

/// This is a helper struct, which allows you to iterate over every board defined
pub struct BoardIter {
    inner: std::vec::IntoIter<Box<dyn BoardInfo>>,
}

impl BoardIter {
    pub fn new() -> Self {
        Self {
            inner: vec![
                Box::new(RP2040) as Box<dyn BoardInfo>,
                Box::new(RP2350),
            ]
            .into_iter(),
        }
    }

    pub fn find_by_name(name: &str) -> Option<Box<dyn BoardInfo>> {
        Self::new().find(|board| board.board_name().eq_ignore_ascii_case(name))
    }
}

impl Default for BoardIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BoardIter {
    type Item = Box<dyn BoardInfo>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Default encoding parameters for a known board.
pub trait BoardInfo {
    /// The family the board's bootloader accepts
    fn family(&self) -> Family;

    /// Address the first block is written to
    fn flash_start(&self) -> u32;

    fn board_name(&self) -> &'static str;

    fn config(&self) -> Uf2Config {
        Uf2Config::new(self.flash_start(), self.family())
    }
}

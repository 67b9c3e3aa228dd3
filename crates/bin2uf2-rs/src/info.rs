use std::{fs, path::Path};

use bin2uf2_core::{family::Family, inspect::summarize};
use log::info;

use crate::error::CliError;

pub fn describe_family(family_id: u32) -> String {
    match Family::from_id(family_id) {
        Some(family) => family.to_string(),
        None => format!("unknown ({:#010x})", family_id),
    }
}

pub fn info(input_path: &Path) -> Result<(), CliError> {
    let data = fs::read(input_path).map_err(|source| CliError::FailedToReadInput {
        path: input_path.to_owned(),
        source,
    })?;

    let summary = summarize(&data).map_err(|source| CliError::InvalidUf2 {
        path: input_path.to_owned(),
        source,
    })?;

    info!("{}", input_path.display());
    info!("  blocks:  {}", summary.num_blocks);
    match summary.family_id {
        Some(id) => info!("  family:  {}", describe_family(id)),
        None => info!("  family:  not present"),
    }
    if let (Some(first), Some(last)) = (summary.first_addr, summary.last_addr) {
        info!("  address: {:#010x}..={:#010x}", first, last);
    }
    info!("  payload: {} bytes", summary.payload_bytes);

    Ok(())
}

use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use bin2uf2_core::{encoded_len, uf2::UF2_BLOCK_SIZE, write_output, Bin2Uf2Error, Uf2Config};
use log::{debug, info};

use crate::{error::CliError, info::describe_family, reporter::ProgressWriter};

pub fn convert(input_path: &Path, output_path: &Path, config: &Uf2Config) -> Result<(), CliError> {
    let data = fs::read(input_path).map_err(|source| CliError::FailedToReadInput {
        path: input_path.to_owned(),
        source,
    })?;

    info!("Using UF2 Family {}", describe_family(config.family_id));
    debug!("Base address {:#010x}", config.base_addr);

    // Refuse before the output file exists so a bad range leaves nothing behind
    let num_blocks = config.block_count(data.len())?;

    let output = File::create(output_path).map_err(|source| CliError::FailedToCreateOutput {
        path: output_path.to_owned(),
        source,
    })?;

    info!("Writing program to disk");
    let len = u64::from(num_blocks) * UF2_BLOCK_SIZE as u64;
    let mut writer = ProgressWriter::new(len, BufWriter::new(output));

    let result = write_output(&data, &mut writer, config)
        .map_err(|err| match err {
            Bin2Uf2Error::FailedToWrite(source) => CliError::FailedToWriteOutput {
                path: output_path.to_owned(),
                source,
            },
            err => CliError::Encode(err),
        })
        .and_then(|()| {
            writer
                .finish()
                .map(drop)
                .map_err(|source| CliError::FailedToWriteOutput {
                    path: output_path.to_owned(),
                    source,
                })
        });

    if let Err(err) = result {
        // The half written image is useless, the write error is what matters
        let _ = fs::remove_file(output_path);
        return Err(err);
    }

    info!(
        "{} bytes -> {} bytes UF2 ({})",
        data.len(),
        encoded_len(data.len()),
        output_path.display()
    );

    Ok(())
}

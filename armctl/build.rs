use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    EmitBuilder::builder()
        .build_timestamp()
        .rustc_semver()
        .emit()?;

    Ok(())
}

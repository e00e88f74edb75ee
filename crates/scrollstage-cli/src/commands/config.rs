use anyhow::Result;

use scrollstage_core::StageConfig;

pub fn show(config: &StageConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", StageConfig::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = StageConfig::config_path();
    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }

    StageConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

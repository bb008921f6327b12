use anyhow::Result;
use desens_config::Config;

pub fn handle(path_only: bool) -> Result<()> {
    let path = Config::config_path();
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

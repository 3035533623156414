use clap::Subcommand;
use metronomo_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load();
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load();
            for (key, value) in config.entries() {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}

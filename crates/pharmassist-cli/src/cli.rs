use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "pharmassist")]
#[command(about = "Ask about drug-drug interactions or general drug information")]
pub struct Args {
    /// Extra TOML config file, layered over config/default.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user (the password comes from DB_PASSWORD)
    #[arg(long)]
    pub user: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Connect to the database at start-up
    #[arg(long)]
    pub connect: bool,
}

impl Args {
    /// Flags win over config files and environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.database.host = host.clone();
        }
        if let Some(port) = self.port {
            config.database.port = port;
        }
        if let Some(user) = &self.user {
            config.database.user = user.clone();
        }
        if let Some(database) = &self.database {
            config.database.database = database.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["pharmassist", "--host", "db.internal", "--port", "6543", "--connect"]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert!(args.connect);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "postgres");
    }

    #[test]
    fn test_no_flags_leave_config_alone() {
        let args = Args::parse_from(["pharmassist"]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert!(!args.connect);
        assert!(args.config.is_none());
        assert_eq!(config.database.database, "postgres");
    }
}

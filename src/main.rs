mod bake;
mod cli;
mod export;
mod watch;

use std::error::Error;

use clap::Parser;

use crate::bake::Action;
use crate::cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let action = if cli.preview {
        Action::Preview
    } else {
        Action::Create
    };
    let cfg = cli.resolve_config()?;
    log::debug!("bake config: {:?}", cfg);

    match (cli.watch, cli.config.as_deref()) {
        (true, Some(path)) => {
            // A bad initial config should not stop the watcher; the next save may fix it.
            if let Err(e) = bake::run(&cfg, action) {
                log::warn!("initial bake failed: {}", e);
            }
            watch::watch_config(cli, path, action)
        }
        _ => {
            bake::run(&cfg, action)?;
            Ok(())
        }
    }
}

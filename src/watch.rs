use std::error::Error;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use notify::{EventKind, RecursiveMode, Watcher};

use crate::bake::{self, Action, BakeReport};
use crate::cli::Cli;

// Editors often save in several writes; coalesce them into one re-bake.
const SETTLE: Duration = Duration::from_millis(150);

/// Re-runs `action` each time the config file changes. Blocks until the
/// watcher shuts down.
pub fn watch_config(cli: &Cli, config_path: &Path, action: Action) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel::<()>();
    let file_name = config_path.file_name().map(|n| n.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res {
            match event.kind {
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if ours {
                        let _ = tx.send(());
                    }
                }
                _ => {}
            }
        }
    })?;
    // Watch the directory so atomic-rename saves keep being observed.
    let dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    log::info!("watching {} for changes", config_path.display());

    while rx.recv().is_ok() {
        thread::sleep(SETTLE);
        for _ in rx.try_iter() {}
        if let Err(e) = on_change(cli, config_path, action) {
            log::warn!("re-bake failed; previous output kept ({}): {}", config_path.display(), e);
        }
    }
    Ok(())
}

/// One settled change of the watched file. `Ok(None)` when the file is gone;
/// any error leaves the previous output untouched.
pub fn on_change(cli: &Cli, config_path: &Path, action: Action) -> Result<Option<BakeReport>, Box<dyn Error>> {
    if !config_path.exists() {
        log::warn!("bake config missing: {}", config_path.display());
        return Ok(None);
    }
    let cfg = cli.resolve_config()?;
    log::info!("bake config reloaded from {}", config_path.display());
    bake::run(&cfg, action).map(Some)
}

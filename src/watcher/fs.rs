use crate::event::AppEvent;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Watches a single file and sends `make_event()` whenever it is written,
/// created, replaced or removed. The parent directory is watched because
/// editors commonly save by renaming a temporary file over the original.
pub fn watch_file(
    path: &Path,
    tx: mpsc::UnboundedSender<AppEvent>,
    make_event: fn() -> AppEvent,
) -> notify::Result<RecommendedWatcher> {
    let target = absolute(path);
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = target.file_name().map(|n| n.to_os_string());

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else { return };
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }
        let touches_target = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if touches_target {
            let _ = tx.send(make_event());
        }
    })?;

    if dir.exists() {
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    }

    Ok(watcher)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

use env_logger::{Env, Target};
use std::fs;
use std::io;
use std::path::PathBuf;

pub fn init() {
    init_with(None);
}

/// Respect RUST_LOG if set, otherwise default to info.
pub fn init_with(log_file: Option<PathBuf>) {
    // Append to the requested log file; if it cannot be opened (permissions,
    // readonly FS, etc.), fall back to stderr.
    let target = log_file
        .and_then(|path| {
            (|| -> io::Result<Target> {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)?;
                Ok(Target::Pipe(Box::new(file)))
            })()
            .ok()
        })
        .unwrap_or(Target::Stderr);

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(target)
        .try_init();
}

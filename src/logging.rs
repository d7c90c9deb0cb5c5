use chrono::{Local, NaiveDate};
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },
    #[error("logger already initialized: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Файл журнала на конкретный день
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Уровень по умолчанию `info`, меняется через `RUST_LOG`.
/// С `log_dir` пишет в файл за сегодня (дописывая), иначе в stderr.
pub fn init(log_dir: Option<&Path>) -> Result<(), LoggingError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(dir) = log_dir {
        let path = log_file_path(dir, Local::now().date_naive());
        let file = fs::create_dir_all(dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
            .map_err(|source| LoggingError::File { path: path.clone(), source })?;

        builder.target(Target::Pipe(Box::new(file)));
        builder.try_init()?;
        log::info!("Logging to {}", path.display());
    } else {
        builder.try_init()?;
    }

    Ok(())
}

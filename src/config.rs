/// Capacity of the buffered reader used when loading graph files.
pub const READ_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Smallest number of vertices a rayon task is split down to.
pub const RAYON_MIN_LEN: usize = 1024;

/// Template of the progress bar drawn while a graph file is parsed.
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Environment variable selecting the log format (`human` or `json`).
pub const LOG_FORMAT_ENV: &str = "CCPROP_LOG_FORMAT";

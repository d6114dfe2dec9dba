use std::{
    fs::{self, OpenOptions, Permissions},
    io::Write,
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{GenError, Result},
    script::SCRIPT_NAME,
};

const SCRIPT_MODE: u32 = 0o755;

/// Writes `text` to `<workspace>/pipa-run.sh`, replacing any earlier script.
///
/// New files get mode 0755 at creation; an existing file is reset to 0755
/// since `open` keeps the old mode.
pub fn write_script(workspace: &Path, text: &str) -> Result<PathBuf> {
    let path = workspace.join(SCRIPT_NAME);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(SCRIPT_MODE)
        .open(&path)
        .map_err(|e| GenError::io(&path, e))?;

    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| GenError::io(&path, e))?;

    let mode = file
        .metadata()
        .map_err(|e| GenError::io(&path, e))?
        .permissions()
        .mode();
    if mode & 0o777 != SCRIPT_MODE {
        fs::set_permissions(&path, Permissions::from_mode(SCRIPT_MODE))
            .map_err(|e| GenError::io(&path, e))?;
    }

    debug!(path = %path.display(), bytes = text.len(), "script written");
    Ok(path)
}

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the service home directory.
///
/// - `None` (or blank) => `<user home>/<default_subdir>`
/// - `~` or `~/...` => expanded against the user home
/// - relative paths => made absolute against the current directory
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().context("cannot determine the user home directory");

    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some("~") => user_home()?,
        Some(p) if p.starts_with("~/") || p.starts_with("~\\") => user_home()?.join(&p[2..]),
        Some(p) if p.starts_with('~') => bail!("unsupported home_dir form '{p}'"),
        Some(p) => absolutize(Path::new(p))?,
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir '{}'", path.display()))?;
    }
    Ok(path)
}

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("cannot read current directory")?
        .join(p))
}

use std::path::Path;

/// Logo bytes plus the problems met while looking for them.
#[derive(Debug, Clone, Default)]
pub struct SpecLogoLoad {
    /// Image bytes, when a logo file could be read.
    pub v_logo: Option<Vec<u8>>,
    /// Problems with an explicitly requested logo.
    pub warnings: Vec<String>,
}

/// Read the explicit logo, else the default one.
///
/// Neither is required. An unreadable explicit path is a warning and does not
/// fall back to the default.
pub fn load_logo(path_explicit: Option<&Path>, path_default: &Path) -> SpecLogoLoad {
    let mut spec = SpecLogoLoad::default();
    match path_explicit {
        Some(path) => match std::fs::read(path) {
            Ok(v_logo) => spec.v_logo = Some(v_logo),
            Err(err) => {
                let c_warning = format!("Could not read logo {}: {err}", path.display());
                tracing::warn!("{c_warning}");
                spec.warnings.push(c_warning);
            }
        },
        None => match std::fs::read(path_default) {
            Ok(v_logo) => spec.v_logo = Some(v_logo),
            Err(_) => {
                tracing::warn!(
                    path = %path_default.display(),
                    "Default logo not found; reports render without it"
                );
            }
        },
    }
    spec
}

use std::path::Path;

use patch_helper_core::Area;
use patch_helper_host::{AssetKind, AssetRequest};
use tracing::debug;

use crate::error::CheckError;
use crate::traits::HostMetadata;

const APP_CODE_PREFIX: &str = "app/code/";

/// Where a changed vendor file lives from the application's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPathResult {
    /// The file belongs to a module and maps to `app/code/<Vendor>/<Module>/…`.
    Module {
        module: String,
        vendor_path: String,
        app_path: String,
    },
    /// The file belongs to a library; libraries cannot be overridden per file.
    Library { library: String, vendor_path: String },
    /// Neither a module nor a library owns the file.
    Unmapped,
}

impl AppPathResult {
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        match self {
            Self::Module { module, .. } => Some(module),
            Self::Library { .. } | Self::Unmapped => None,
        }
    }

    #[must_use]
    pub fn app_path(&self) -> Option<&str> {
        match self {
            Self::Module { app_path, .. } => Some(app_path),
            Self::Library { .. } | Self::Unmapped => None,
        }
    }

    /// The normalized vendor path, when the file is mapped at all.
    #[must_use]
    pub fn vendor_path(&self) -> Option<&str> {
        match self {
            Self::Module { vendor_path, .. } | Self::Library { vendor_path, .. } => {
                Some(vendor_path)
            }
            Self::Unmapped => None,
        }
    }

    /// Module-relative remainder of the vendor path, e.g. `view/frontend/web/js/a.js`.
    #[must_use]
    pub fn module_subpath(&self) -> Option<&str> {
        let app_path = self.app_path()?;
        let module_dir = module_app_dir(self.module()?);
        app_path.strip_prefix(module_dir.as_str())
    }
}

fn module_app_dir(module: &str) -> String {
    match module.split_once('_') {
        Some((vendor, name)) => format!("{APP_CODE_PREFIX}{vendor}/{name}/"),
        None => format!("{APP_CODE_PREFIX}{module}/"),
    }
}

fn normalize_vendor_path<'p>(vendor_path: &'p str, root: &Path) -> &'p str {
    let relative = Path::new(vendor_path)
        .strip_prefix(root)
        .ok()
        .and_then(Path::to_str)
        .unwrap_or(vendor_path);
    relative.trim_start_matches("./")
}

/// Maps a changed vendor path to its application-code equivalent.
///
/// Modules take precedence over libraries, and within each map the deepest
/// matching prefix wins.
#[must_use]
pub fn resolve_app_path(vendor_path: &str, host: &dyn HostMetadata) -> AppPathResult {
    let path = normalize_vendor_path(vendor_path, host.root());

    if let Some(found) = host.paths_to_modules().find(path) {
        let app_path = format!("{}{}", module_app_dir(found.name), found.remainder(path));
        return AppPathResult::Module {
            module: found.name.to_string(),
            vendor_path: path.to_string(),
            app_path,
        };
    }

    if let Some(found) = host.paths_to_libraries().find(path) {
        debug!(path, library = found.name, "path belongs to a library");
        return AppPathResult::Library {
            library: found.name.to_string(),
            vendor_path: path.to_string(),
        };
    }

    debug!(path, "path matches no module or library");
    AppPathResult::Unmapped
}

/// The asset request a module view file corresponds to, if it is a theme-able
/// asset (`web/`, `templates/` or `email/` below `view/<area>/`).
#[must_use]
pub fn asset_request(resolved: &AppPathResult) -> Option<AssetRequest> {
    let (area, below_area) = Area::split_view_path(resolved.module_subpath()?)?;
    let (kind, file) = AssetKind::split_view_subpath(below_area)?;
    Some(AssetRequest {
        area,
        module: resolved.module()?.to_string(),
        kind,
        file: file.to_string(),
    })
}

/// One candidate override path per custom theme that can serve `request`.
#[must_use]
pub fn theme_override_candidates(host: &dyn HostMetadata, request: &AssetRequest) -> Vec<String> {
    request
        .area
        .theme_areas()
        .iter()
        .flat_map(|&area| host.custom_themes(area))
        .filter_map(|theme| {
            let themed = AssetRequest {
                area: theme.area,
                ..request.clone()
            };
            host.resolve_minified_candidate(theme, &themed)
        })
        .collect()
}

/// PHP class name of a resolved `app/code` path, e.g. `Magento\Checkout\Model\Cart`.
///
/// # Errors
///
/// Returns [`CheckError::InvalidAppPath`] when the path is not a PHP file
/// below `app/code/`.
pub fn class_name(app_path: &str) -> Result<String, CheckError> {
    app_path
        .strip_prefix(APP_CODE_PREFIX)
        .and_then(|path| path.strip_suffix(".php"))
        .filter(|path| !path.is_empty())
        .map(|path| path.replace('/', "\\"))
        .ok_or_else(|| CheckError::InvalidAppPath {
            path: app_path.to_string(),
        })
}

/// Project-relative file that defines `class`, located through its module.
#[must_use]
pub fn class_file(host: &dyn HostMetadata, class: &str) -> Option<String> {
    let mut parts = class.trim_start_matches('\\').splitn(3, '\\');
    let (vendor, module, rest) = (parts.next()?, parts.next()?, parts.next()?);
    let prefix = host
        .paths_to_modules()
        .prefix_of(&format!("{vendor}_{module}"))?;
    Some(format!("{prefix}{}.php", rest.replace('\\', "/")))
}

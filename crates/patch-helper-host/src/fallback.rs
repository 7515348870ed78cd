use std::path::Path;

use patch_helper_core::Area;

use crate::theme::Theme;

/// Which view subdirectory an asset lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `web/`: JavaScript, knockout `.html` templates, styles.
    Static,
    /// `templates/`: `.phtml` templates.
    Template,
    /// `email/`: email `.html` templates.
    Email,
}

impl AssetKind {
    #[must_use]
    pub fn directory(self) -> &'static str {
        match self {
            Self::Static => "web",
            Self::Template => "templates",
            Self::Email => "email",
        }
    }

    /// Splits the part of a path below `view/<area>/` into kind and file,
    /// e.g. `web/js/a.js` gives `(Static, "js/a.js")`.
    #[must_use]
    pub fn split_view_subpath(subpath: &str) -> Option<(Self, &str)> {
        let (directory, file) = subpath.split_once('/')?;
        let kind = match directory {
            "web" => Self::Static,
            "templates" => Self::Template,
            "email" => Self::Email,
            _ => return None,
        };
        (!file.is_empty()).then_some((kind, file))
    }
}

/// A module asset to locate through the theme fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub area: Area,
    pub module: String,
    pub kind: AssetKind,
    pub file: String,
}

/// Locates module assets the way the storefront does: theme ancestry first,
/// then the module's own view directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeFallbackResolver {
    minify_js: bool,
}

impl ThemeFallbackResolver {
    #[must_use]
    pub fn new(minify_js: bool) -> Self {
        Self { minify_js }
    }

    /// Directories searched for `request`, most specific first.
    #[must_use]
    pub fn candidate_dirs(
        &self,
        ancestry: &[&Theme],
        module_dir: Option<&str>,
        request: &AssetRequest,
    ) -> Vec<String> {
        let kind_dir = request.kind.directory();
        let mut dirs: Vec<String> = ancestry
            .iter()
            .map(|theme| format!("{}/{}/{kind_dir}", theme.path, request.module))
            .collect();
        if let Some(module_dir) = module_dir {
            let module_dir = module_dir.trim_end_matches('/');
            dirs.push(format!("{module_dir}/view/{}/{kind_dir}", request.area));
            if request.area != Area::Base {
                dirs.push(format!("{module_dir}/view/base/{kind_dir}"));
            }
        }
        dirs
    }

    /// File names to probe in each directory; minified variants first.
    #[must_use]
    pub fn file_variants(&self, file: &str) -> Vec<String> {
        match file.strip_suffix(".js") {
            Some(stem) if self.minify_js && !stem.ends_with(".min") => {
                vec![format!("{stem}.min.js"), file.to_string()]
            }
            _ => vec![file.to_string()],
        }
    }

    /// First existing project-relative path for `request`.
    #[must_use]
    pub fn resolve(
        &self,
        root: &Path,
        ancestry: &[&Theme],
        module_dir: Option<&str>,
        request: &AssetRequest,
    ) -> Option<String> {
        let variants = self.file_variants(&request.file);
        self.candidate_dirs(ancestry, module_dir, request)
            .into_iter()
            .flat_map(|dir| variants.iter().map(move |file| format!("{dir}/{file}")))
            .find(|candidate| root.join(candidate).is_file())
    }
}

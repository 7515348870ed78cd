use std::fmt;

use serde::{Deserialize, Serialize};

/// Application area a file or configuration scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Global,
    Frontend,
    Adminhtml,
    Base,
}

impl Area {
    /// Areas that carry their own dependency-injection configuration.
    pub const CONFIG_AREAS: [Area; 3] = [Area::Global, Area::Frontend, Area::Adminhtml];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Frontend => "frontend",
            Self::Adminhtml => "adminhtml",
            Self::Base => "base",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "global" => Some(Self::Global),
            "frontend" => Some(Self::Frontend),
            "adminhtml" => Some(Self::Adminhtml),
            "base" => Some(Self::Base),
            _ => None,
        }
    }

    /// Splits a module-relative path at its `view/<area>/` directory.
    ///
    /// Returns the area and the remainder below it, e.g.
    /// `view/frontend/web/js/a.js` gives `(Frontend, "web/js/a.js")`.
    #[must_use]
    pub fn split_view_path(path: &str) -> Option<(Self, &str)> {
        let start = if path.starts_with("view/") {
            0
        } else {
            path.find("/view/")? + 1
        };
        let after_view = &path[start + "view/".len()..];
        let (area_name, rest) = after_view.split_once('/')?;
        let area = match Self::from_name(area_name)? {
            Self::Global => return None,
            area => area,
        };
        Some((area, rest))
    }

    /// Theme areas whose themes can override files of this view area.
    #[must_use]
    pub fn theme_areas(self) -> &'static [Area] {
        match self {
            Self::Frontend => &[Area::Frontend],
            Self::Adminhtml => &[Area::Adminhtml],
            Self::Base => &[Area::Frontend, Area::Adminhtml],
            Self::Global => &[],
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod db_schema;
mod di;
mod error;
mod fallback;
mod hyva;
mod path_map;
mod snapshot;
mod theme;

pub const MAGENTO_VENDOR_PREFIX: &str = "vendor/magento/";

pub use db_schema::{DbSchemaIndex, SchemaFile, TableDeclaration};
pub use di::{AreaConfig, PluginDeclaration};
pub use error::HostError;
pub use fallback::{AssetKind, AssetRequest, ThemeFallbackResolver};
pub use path_map::{PathMap, PathMatch};
pub use snapshot::{HostSnapshot, load_snapshot, parse_snapshot};
pub use theme::{Theme, ThemeDeclaration, ThemeId, ThemeTree};

pub type Result<T> = std::result::Result<T, HostError>;

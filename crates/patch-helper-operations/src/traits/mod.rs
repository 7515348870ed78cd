mod host_metadata;

pub use host_metadata::HostMetadata;

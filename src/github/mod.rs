mod api;
pub(crate) mod client;
mod error;

pub use api::{ContainerMetadata, Package, PackageOwner, PackageVersion, VersionMetadata};
pub use client::{GitHubClient, PackagesClient};
pub use error::Error;

#[cfg(test)]
pub use client::MockPackagesClient;

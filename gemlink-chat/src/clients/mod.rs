// 外部协作方客户端：trait + 本地实现 + 远端实现
// External collaborator clients: trait + local impl + remote impl

pub mod auth;
pub mod blobs;
pub mod contacts;
pub mod profiles;

pub use auth::{AuthService, DevAuthService, RemoteAuthService};
pub use blobs::{BlobStore, LocalBlobStore};
pub use contacts::{ContactNetwork, RemoteContactNetwork, StaticContactNetwork};
pub use profiles::{Profile, ProfileLookup, StaticProfileLookup};

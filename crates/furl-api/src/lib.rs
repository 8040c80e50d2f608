//! Typed records for the slice of the Bluesky XRPC API that furl consumes.
//!
//! Pure data: serde types with camelCase wire names and `$type`-tagged
//! unions. All transport and session handling lives in `furl-common`.

pub mod embed;
pub mod feed;
pub mod identity;
pub mod richtext;
pub mod session;
pub mod xrpc;

pub use embed::{
    AspectRatio, EmbedView, External, ExternalView, ImageView, ImagesView, RecordView,
    RecordWithMediaView, VideoView, ViewRecord,
};
pub use feed::{Author, GetPostThreadResponse, Post, PostView, ThreadViewPost};
pub use identity::ResolveHandleResponse;
pub use richtext::{ByteSlice, Facet, FacetFeature};
pub use session::{CreateSessionRequest, Session};
pub use xrpc::XrpcErrorResponse;

//! Qbank Storage Library
//!
//! File retrieval for question attachments. The provider stores objects under
//! two resource families ("raw" documents and "image"s) and two delivery
//! types ("upload" is publicly fetchable, "authenticated" requires a signed
//! URL). Historical records may have been stored under either family
//! regardless of actual content, so retrieval walks a fixed strategy chain:
//!
//! 1. direct GET of the stored URL,
//! 2. signed URLs over the four delivery/family combinations,
//! 3. a legacy local uploads directory.
//!
//! Each strategy is tried exactly once, in order, with a bounded per-attempt
//! timeout; only exhaustion of the whole chain is surfaced to the caller.

pub mod extension;
pub mod local;
pub mod locator;
pub mod signer;

pub use extension::{classify, derive_extension, extract_version, ResourceFamily};
pub use local::LocalUploads;
pub use locator::{signed_attempts, FileLocator, LocatorError, RetrievedFile};
pub use signer::{CloudSigner, DeliveryType, SignedUrlRequest, UrlSigner};

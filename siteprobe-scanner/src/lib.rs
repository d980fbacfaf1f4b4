pub mod body;
pub mod candidate;
pub mod error;
pub mod extract;
pub mod identity;
pub mod pacer;
pub mod policy;
pub mod prober;
pub mod transport;
pub mod verdict;

pub use candidate::{ConfigShape, EndpointCandidate, Extraction, PathSegment, SourcePath};
pub use error::{ProbeFailure, ScanError, TransportErrorKind};
pub use extract::{extract, extract_with_shape};
pub use identity::{ClientIdentity, IdentityPool};
pub use pacer::Pacer;
pub use policy::{ProbeConfig, RetryPolicy, TlsVerification, WeakBodyPolicy};
pub use prober::Prober;
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use verdict::{LiveSignal, Outcome, ProbeVerdict};

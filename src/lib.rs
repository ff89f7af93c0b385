//! Entitylink: identity resolution and KB membership for entity-annotation
//! benchmarking.
//!
//! Given a URI produced by an annotation system under test, the crate
//! computes its same-as closure across knowledge bases, decides whether any
//! equivalent URI belongs to a recognized knowledge base, verifies that the
//! entity actually exists, and answers subsumption queries over an
//! externally supplied class hierarchy.

pub mod check;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod hierarchy;
pub mod kb;
pub mod meaning;
pub mod sameas;

pub use check::{EntityChecker, EntityCheckerManager, HttpEntityChecker};
pub use config::Config;
pub use coordinator::ResolutionCoordinator;
pub use error::{
    CacheError, ConfigError, EntitylinkError, HierarchyError, ResolutionError, Result,
};
pub use hierarchy::{ClassHierarchyLoader, SubClassInferencer};
pub use kb::KbClassifier;
pub use meaning::{domain_of, Existence, Meaning};
pub use sameas::{
    cache::{FileBackedCache, InMemoryCache},
    CrawlingDecorator, DomainRetrieverManager, ErrorFixingRetriever, HttpSameAsRetriever,
    SameAsRetriever, SingleUriAdapter, SingleUriSameAsRetriever, WikiDbpediaBridgingRetriever,
    WikipediaApiRetriever,
};

pub mod batch;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod source;

pub use batch::BatchResolver;
pub use normalize::normalize;
pub use pipeline::MetadataPipeline;
pub use resolver::SingleUrlResolver;
pub use source::{CitationSource, CitoidSource, MockCitationSource, MockResponse};

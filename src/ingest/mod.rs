pub mod walker;
pub mod rst;
pub mod sections;
pub mod normalize;
pub mod corpus;

pub use walker::{FileMetadata, discover_files};
pub use rst::{Document, Node, parse_document};
pub use sections::{Attribute, AttributeValue, ValueShape, parse_pair};
pub use normalize::{TaskRecord, TaskRecords, norm_taskname, normalize};
pub use corpus::{Corpus, ErrorPolicy, LoadReport, load_corpus, load_file, parse_records};

//! Item templates describe the shape a record must have before it can be
//! stored. They are loaded once from a YAML file keyed by item kind:
//!
//! ```yaml
//! content:
//!   name: string
//!   size: integer
//!   type:
//!     type: string
//!     one_of: [image, video]
//!   description:
//!     type: string
//!     required: false
//! ```

mod template;

pub use template::{FieldSpec, FieldType, ItemTemplate, ItemTemplates, TemplateError, Violation};

pub const CONTENT_KIND: &str = "content";

#![forbid(unsafe_code)]

//! Classical-style inheritance on top of prototype delegation.
//!
//! Start from [`base()`], derive frozen prototypes with
//! [`Prototype::extend`], and construct mutable instances with
//! [`Prototype::construct`]:
//!
//! ```
//! use selfish_core::{AttributeSet, Value, base};
//!
//! let parent = base().extend(&[&AttributeSet::new()
//!     .with("name", "parent")
//!     .with_method("method", |this, _| {
//!         Ok(Value::from(format!("hello {}", this.get("name")?)))
//!     })]);
//! let child = parent.extend(&[&AttributeSet::new().with("name", "child")]);
//!
//! let mut instance = child.construct(&[]).unwrap();
//! assert_eq!(instance.call("method", &[]).unwrap(), Value::from("hello child"));
//! assert!(parent.is_prototype_of(&instance));
//! assert!(parent.try_set("name", Value::Null).is_err());
//! ```

pub mod ancestry;
pub mod attribute;
pub mod config;
pub mod error;
pub mod instance;
pub mod merge;
pub mod prototype;
pub mod space;
pub mod value;

pub use ancestry::{Ancestry, is_prototype_of, value_is_prototype_of};
pub use attribute::{AttributeDescriptor, AttributeSet, AttributeSource};
pub use config::{MAX_LINEAGE_DEPTH, SpaceConfig};
pub use error::{
    ErrorCodeEntry, ErrorCodeRegistry, Mutation, ObjectError, ViolationCause, error_code_registry,
};
pub use instance::{Instance, ObjectView, Receiver};
pub use prototype::{INITIALIZE, Prototype, base};
pub use space::{CompositionEvent, CompositionEventType, CompositionOutcome, ObjectSpace};
pub use value::{Getter, Method, ObjectId, Value};

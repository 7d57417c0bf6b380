//! # Verity
//!
//! Small test assertions: deep equality, emptiness and nil checks over a
//! type-erased [`Value`], a uniform tabular failure report, and a
//! panic-expectation helper.
//!
//! ```rust
//! use verity::{assert, TestContext, Value};
//!
//! let t = TestContext::current();
//! assert::not_equal(&t, 5, 6, &[]);
//! assert::empty(&t, Value::nil_map(), &[]);
//! ```

pub use crate::errors::{InspectError, InspectResult, MessageError};
pub use crate::report::{Report, ReportConfig, Trace};
pub use crate::sink::{FailureSink, Process, TestContext};
pub use crate::value::{Callable, Channel, FloatType, IntType, Kind, MapKey, Struct, Value};

pub mod assert;
pub mod errors;
pub mod inspect;
pub mod message;
pub mod predicates;
pub mod report;
pub mod sink;
pub mod value;

mod macros;

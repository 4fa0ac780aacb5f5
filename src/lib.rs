#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating most pub functions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Module structure — foo::FooClient pattern by design
#![allow(clippy::module_name_repetitions)]
// Style preference — keeping format!("{}", x) over format!("{x}") for complex exprs
#![allow(clippy::uninlined_format_args)]

pub mod completion;
pub mod config;
pub mod errors;
pub mod media;
pub mod reply;
pub mod server;
pub mod store;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

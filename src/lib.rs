mod bindings;
mod bridge;
mod config;
mod device_fingerprinting_form;
mod embed;
mod fields;
mod flow;
mod form;
mod interop;
mod localization;
mod reason_codes;
mod schema;
mod step_up_form;

pub use bridge::*;
pub use config::*;
pub use device_fingerprinting_form::*;
pub use embed::*;
pub use fields::*;
pub use flow::*;
pub use form::*;
pub use interop::*;
pub use localization::*;
pub use reason_codes::*;
pub use schema::*;
pub use step_up_form::*;

//! Creating an account and changing the details of an existing one.
//!
//! Both pages share one form and one set of rules for what counts as valid
//! details. The backend has the final say, e.g. on whether an email is taken.

mod form;
mod profile;
mod register;

pub use form::UserForm;
pub use profile::{profile_form, put_profile};
pub use register::{get_register_page, post_register};

//! Refuse to run outside an interactive command line.
//!
//! The tools rewrite and rename files in place, so they must never be
//! triggered by a web server. A CGI environment is recognised by the
//! variables every CGI gateway sets for its children.

use std::ffi::OsString;
use thiserror::Error;

const CGI_VARIABLES: &[&str] = &["GATEWAY_INTERFACE", "REQUEST_METHOD"];

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Not in shell.")]
pub struct InvocationError;

/// Check the current process environment.
pub fn ensure_shell() -> Result<(), InvocationError> {
    check_environment(|name| std::env::var_os(name))
}

/// Check an environment given as a lookup function.
pub fn check_environment(lookup: impl Fn(&str) -> Option<OsString>) -> Result<(), InvocationError> {
    if CGI_VARIABLES.iter().any(|name| lookup(name).is_some()) {
        return Err(InvocationError);
    }
    Ok(())
}

//! HTTP driving adapters. Each submodule builds the routes for one area of the API and translates
//! between HTTP requests and calls into the [domain][crate::domain].

pub mod auth;
pub mod docs;
pub mod health;
pub mod todo;
pub mod user;

#[cfg(test)]
pub mod test_util;

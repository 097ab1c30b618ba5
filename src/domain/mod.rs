//! Business logic for the user and todo list services. Each submodule exposes "driving ports"
//! (traits the HTTP layer calls into) and "driven ports" (traits the persistence layer implements).

pub mod todo;
pub mod user;

#[cfg(test)]
pub mod test_util;

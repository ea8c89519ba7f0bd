#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]

//! Wire models exchanged between the civic portal front ends and the
//! platform API: identities, roles, authentication payloads and system
//! status.

pub mod models;

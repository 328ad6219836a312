//! Command-line support for the `snmp-scan` binary.

pub mod args;

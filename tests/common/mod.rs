//! Shared test infrastructure for snmp-scan.
//!
//! Provides TestAgent (in-process SNMPv1 agent), scripted adapters and
//! fixtures.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod adapters;
pub mod agent;
pub mod fixtures;

pub use adapters::{Script, ScriptedAdapter};
pub use agent::{AgentMode, TestAgent};
pub use fixtures::{
    COMMUNITY, credential, devices, nonexistent_oid, oid_set, sys_descr, sys_name, sys_uptime,
    system_mib,
};

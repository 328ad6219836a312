//! Standard test fixtures.

use snmp_scan::scan::{Credential, Device, OidSet};
use snmp_scan::{Oid, Value, oid};
use std::collections::BTreeMap;

/// Community the test agent answers to.
pub const COMMUNITY: &str = "public";

/// Standard system MIB entries (1.3.6.1.2.1.1).
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(sys_descr(), Value::from("Test SNMP Agent"));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(sys_uptime(), Value::TimeTicks(123456));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::from("admin@test.local"));
    data.insert(sys_name(), Value::from("test-agent"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), Value::from("Test Lab"));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));

    data
}

/// sysDescr.0
pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}

/// sysUpTime.0
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

/// sysName.0
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// An OID no test agent serves.
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

/// Parse device lines with the standard port.
pub fn devices(lines: &[&str]) -> Vec<Device> {
    lines
        .iter()
        .map(|line| Device::parse(line, 161).expect("valid device line"))
        .collect()
}

/// An OID set from dotted strings.
pub fn oid_set(oids: &[&str]) -> OidSet {
    OidSet::parse_all(oids.iter().copied()).expect("valid OIDs")
}

/// The test community as a credential.
pub fn credential() -> Credential {
    Credential::new(COMMUNITY).expect("non-empty community")
}

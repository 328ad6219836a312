//! Command-line arguments for `snmp-scan`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::scan::input::InputSource;
use crate::scan::{AdapterConfig, DEFAULT_PORT, ScanConfig};

/// Poll every device in a list for a fixed set of OIDs (SNMPv1 GET) and
/// write the results as JSON.
#[derive(Debug, Parser)]
#[command(name = "snmp-scan", version, about)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Input and output locations.
#[derive(Debug, Parser)]
pub struct InputArgs {
    /// File with one device address per line (host, host:port or [v6]:port).
    #[arg(short = 'i', long = "devices", default_value = "input.txt")]
    pub devices: PathBuf,

    /// File with one dotted-decimal OID per line.
    #[arg(short = 'o', long = "oids", default_value = "oids.txt")]
    pub oids: PathBuf,

    /// Where to write the JSON results.
    #[arg(short = 'w', long = "output", default_value = "output.json")]
    pub output: PathBuf,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Port for devices that do not name one.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl InputArgs {
    /// The loader settings these arguments describe.
    pub fn source(&self) -> InputSource {
        InputSource {
            devices: self.devices.clone(),
            oids: self.oids.clone(),
            community: self.community.clone(),
            port: self.port,
        }
    }
}

/// Polling behaviour.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Per-device response timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "5", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Maximum devices polled at once (unbounded when absent).
    #[arg(short = 'j', long = "concurrency", value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Give up on devices still pending after this many seconds.
    #[arg(long = "deadline", value_parser = parse_seconds)]
    pub deadline: Option<Duration>,
}

impl ScanArgs {
    /// Adapter settings.
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            timeout: self.timeout,
        }
    }

    /// Orchestrator settings.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            concurrency: self
                .concurrency
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
            deadline: self.deadline,
        }
    }
}

/// Logging verbosity.
#[derive(Debug, Parser)]
pub struct LogArgs {
    /// Enable debug logging (snmp_scan=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_scan=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl LogArgs {
    /// The filter implied by the flags.
    pub fn filter(&self) -> &'static str {
        if self.trace {
            "snmp_scan=trace"
        } else if self.debug {
            "snmp_scan=debug"
        } else {
            "snmp_scan=warn"
        }
    }

    /// Install a stderr subscriber. `RUST_LOG`, when set, overrides the flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.filter()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Parse a non-negative number of seconds, fractions allowed.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{}' is not a valid duration", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["snmp-scan"]).unwrap();
        assert_eq!(args.input.devices, PathBuf::from("input.txt"));
        assert_eq!(args.input.oids, PathBuf::from("oids.txt"));
        assert_eq!(args.input.output, PathBuf::from("output.json"));
        assert_eq!(args.input.community, "public");
        assert_eq!(args.input.port, 161);
        assert_eq!(args.scan.adapter_config().timeout, Duration::from_secs(5));
        assert_eq!(args.scan.scan_config(), ScanConfig::default());
        assert_eq!(args.log.filter(), "snmp_scan=warn");
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "snmp-scan", "-i", "devs", "-o", "o", "-w", "out", "-c", "private", "-p", "1161",
            "-t", "0.5", "-j", "32", "--deadline", "30", "-D",
        ])
        .unwrap();
        assert_eq!(args.input.source().community, "private");
        assert_eq!(args.input.source().port, 1161);
        assert_eq!(args.scan.timeout, Duration::from_millis(500));
        assert_eq!(
            args.scan.scan_config(),
            ScanConfig {
                concurrency: Some(32),
                deadline: Some(Duration::from_secs(30)),
            }
        );
        assert_eq!(args.log.filter(), "snmp_scan=trace");
    }

    #[test]
    fn huge_concurrency_is_accepted() {
        let args = Args::try_parse_from(["snmp-scan", "-j", "18446744073709551615"]).unwrap();
        assert!(args.scan.scan_config().concurrency.is_some());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["snmp-scan", "-j", "0"]).is_err());
        assert!(Args::try_parse_from(["snmp-scan", "-t", "-1"]).is_err());
        assert!(Args::try_parse_from(["snmp-scan", "-t", "soon"]).is_err());
        assert!(Args::try_parse_from(["snmp-scan", "-p", "70000"]).is_err());
    }
}

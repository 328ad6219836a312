//! snmp-scan: poll a device list for a fixed OID set and write JSON.

use clap::Parser;
use snmp_scan::cli::args::Args;
use snmp_scan::scan::{Scanner, SnmpAdapter, input, output};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.log.init_tracing();

    let inputs = match input::load(&args.input.source()).await {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let scanner = Scanner::with_config(
        SnmpAdapter::new(args.scan.adapter_config()),
        args.scan.scan_config(),
    );
    let batch = scanner
        .run_batch(&inputs.devices, &inputs.credential, &inputs.oids)
        .await;

    if let Err(e) = output::write_json(&args.input.output, &batch).await {
        eprintln!("Error: {}", e);
        // Keep the polled data: dump it where the caller can still see it.
        match output::to_json_string(&batch) {
            Ok(json) => print!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

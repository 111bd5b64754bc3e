#![no_main]

use covgate::config::GateConfig;
use covgate::gate::run;
use covgate::snapshot::CoverageSnapshot;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary summaries must either be rejected or gate cleanly, never panic
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(snapshot) = CoverageSnapshot::from_json_str(input, "fuzz") {
            let _ = run(&snapshot, &snapshot, &GateConfig::default());
        }
    }
});

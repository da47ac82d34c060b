use std::sync::Mutex;

use serde::Serialize;

use crate::config::Config;
use crate::doctor::Doctor;

/// Shared server state: the doctor engine plus run counters for the
/// dashboard heartbeat.
pub struct ClinicState {
    pub doctor: Doctor,
    pub config: Config,
    pub stats: Mutex<ClinicStats>,
}

impl ClinicState {
    pub fn new(doctor: Doctor, config: Config) -> Self {
        Self {
            doctor,
            config,
            stats: Mutex::new(ClinicStats::default()),
        }
    }

    pub fn record_consultation(&self, failed: bool, archived: bool) {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        stats.consultations += 1;
        if failed {
            stats.failures += 1;
        }
        if archived {
            stats.archived += 1;
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ClinicStats {
    pub consultations: u64,
    pub failures: u64,
    pub archived: u64,
}

#[derive(Serialize)]
pub struct DashboardStatus {
    pub stats: ClinicStats,
    pub output_dir: String,
}

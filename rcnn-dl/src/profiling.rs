//! The profiling toolkit that can be disabled in compile-time.

#[cfg(feature = "profiling")]
use crate::common::*;
#[cfg(feature = "profiling")]
use std::collections::HashSet;

#[cfg(feature = "profiling")]
lazy_static::lazy_static! {
    static ref PROFILING_CONFIG: ProfilingConfig = {
        let config: ProfilingConfig = match envy::prefixed("RCNNDL_").from_env() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load profiling environment variables, fallback to default values: {:?}", err);
                Default::default()
            }
        };
        config
    };
}

/// Profiling options loaded from `RCNNDL_` prefixed environment variables.
#[cfg(feature = "profiling")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilingConfig {
    /// Comma separated timing names to report. All timings are reported if unset.
    pub profiling_whitelist: Option<HashSet<String>>,
}

#[cfg(feature = "profiling")]
#[derive(Debug)]
pub struct Timing {
    name: &'static str,
    instant: Instant,
    elapsed: Vec<(&'static str, Duration)>,
}

#[cfg(not(feature = "profiling"))]
#[derive(Debug)]
pub struct Timing;

impl Timing {
    pub fn new(name: &'static str) -> Self {
        #[cfg(feature = "profiling")]
        {
            Self {
                name,
                instant: Instant::now(),
                elapsed: vec![],
            }
        }

        #[cfg(not(feature = "profiling"))]
        {
            let _ = name;
            Self
        }
    }

    pub fn set_record(&mut self, name: &'static str) {
        #[cfg(feature = "profiling")]
        {
            self.elapsed.push((name, self.instant.elapsed()));
            self.instant = Instant::now();
        }

        #[cfg(not(feature = "profiling"))]
        let _ = name;
    }

    pub fn report(&self) {
        #[cfg(feature = "profiling")]
        {
            let can_report = PROFILING_CONFIG
                .profiling_whitelist
                .as_ref()
                .map(|whitelist| whitelist.contains(self.name))
                .unwrap_or(true);

            if can_report {
                info!("profiling report for '{}'", self.name);
                self.elapsed.iter().for_each(|(name, elapsed)| {
                    info!("- {}\t{:?}", name, elapsed);
                });
            }
        }
    }
}

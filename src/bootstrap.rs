//! Hand-off to the application entry point
//!
//! Once the configuration is resolved, control passes to an external
//! bootstrap that owns everything after that (request loop, routing,
//! persistence). The bootstrap only sees the resolved settings.

use crate::error::{Error, Result};
use crate::resolver::ResolvedConfig;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Variable holding the WordPress directory, always ending in `/`
const ABSPATH: &str = "ABSPATH";

fn abspath(dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    format!("{}/", dir.trim_end_matches('/'))
}

/// Something that takes over execution once configuration is resolved
pub trait Bootstrap {
    /// Start the application with the resolved settings.
    ///
    /// # Errors
    ///
    /// Implementations report failures to start or abnormal termination.
    fn boot(&self, config: &ResolvedConfig) -> Result<()>;
}

/// Runs an external program, with no arguments, as the bootstrap
///
/// Every resolved setting is exported into the program's environment under its
/// key (`DB_NAME=wordpress`, `WP_DEBUG=false`, `WP_REDIS_PORT=6379`), on top of
/// the current process environment. With a working directory, `ABSPATH` is
/// also exported as that directory with a trailing `/`. The call blocks until
/// the program exits.
///
/// # Example
///
/// ```rust,no_run
/// use wpenv::{Bootstrap, CommandBootstrap, ConfigResolver, DefaultEnvSource, ResolverOptions};
/// use wpenv::WordPressConfig;
///
/// let resolver = ConfigResolver::for_schema::<WordPressConfig>(ResolverOptions::default())?;
/// let config = resolver.resolve(&DefaultEnvSource);
///
/// CommandBootstrap::new("/usr/local/bin/docker-entrypoint")
///     .workdir("/var/www/html")
///     .boot(&config)?;
/// # Ok::<(), wpenv::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandBootstrap {
    program: PathBuf,
    workdir: Option<PathBuf>,
}

impl CommandBootstrap {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: None,
        }
    }

    /// Run the program from this directory
    #[must_use]
    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, config: &ResolvedConfig) -> Command {
        let mut command = Command::new(&self.program);
        command.envs(config.to_env_pairs());
        if let Some(ref dir) = self.workdir {
            command.current_dir(dir).env(ABSPATH, abspath(dir));
        }
        command
    }
}

impl Bootstrap for CommandBootstrap {
    fn boot(&self, config: &ResolvedConfig) -> Result<()> {
        let program = self.program.display().to_string();
        info!("Handing off to {program} with {} settings", config.len());

        let status = self
            .command(config)
            .status()
            .map_err(|source| Error::BootstrapSpawn {
                program: program.clone(),
                source,
            })?;

        debug!("{program} exited with {status}");
        if status.success() {
            Ok(())
        } else {
            Err(Error::BootstrapExited {
                program,
                code: status.code(),
            })
        }
    }
}

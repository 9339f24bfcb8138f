use std::process::ExitCode;

use tracing::{error, info};
use worldorder::{WindowHost, World};

use super::bootstrap::AppWiring;
use super::scenes;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let host = match WindowHost::new(&app.config) {
        Ok(host) => host,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let session = app.session;
    let mut world = World::new(host, app.config, app.scenes);
    let routed = world.run(app.start, |from, result| scenes::route(&session, from, result));
    if let Err(err) = routed {
        error!(error = %err, "world_failed");
        return ExitCode::FAILURE;
    }

    info!("goodbye");
    ExitCode::SUCCESS
}

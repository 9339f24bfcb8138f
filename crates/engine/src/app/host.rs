use thiserror::Error;
use winit::error::{EventLoopError, OsError};

use crate::canvas::Canvas;

use super::Input;

/// Window and device side of the loop: event pumping, input, the drawing
/// surface and presentation.
pub trait Host {
    fn is_closed(&self) -> bool;

    /// Pumps pending events and refreshes [`Host::input`] for the coming
    /// frame. May close the host.
    fn poll(&mut self);

    fn input(&self) -> &dyn Input;

    fn canvas(&mut self) -> &mut dyn Canvas;

    fn present(&mut self) -> Result<(), HostError>;
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize pixel surface: {0}")]
    CreateSurface(#[source] pixels::Error),
    #[error("failed to present frame: {0}")]
    Present(#[source] pixels::Error),
}

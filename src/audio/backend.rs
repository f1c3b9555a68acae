use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

use open::that as open_link;
use thiserror::Error;

/// Failure to acquire, poll, or release a playback handle.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no player command configured")]
    NoPlayer,
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to hand {url} to the system player")]
    Open {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to query player status")]
    Poll(#[source] io::Error),
    #[error("failed to stop player")]
    Stop(#[source] io::Error),
    #[error("player exited with {status}")]
    Exited { status: ExitStatus },
}

/// Something that can start playing a URL.
pub trait AudioBackend {
    fn start(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}

/// One active playback. Dropping a handle without `stop` is allowed; the
/// player always stops before letting go.
pub trait PlaybackHandle {
    /// `Ok(true)` once the audio has played to the end.
    fn poll_finished(&mut self) -> Result<bool, PlaybackError>;
    fn stop(&mut self) -> Result<(), PlaybackError>;
}

/// Plays through an external command line player such as `mpv` or `ffplay`.
/// The URL is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    /// Build from a full command line, e.g. `["mpv", "--no-video"]`.
    pub fn from_command(command: &[String]) -> Result<Self, PlaybackError> {
        let (program, args) = command.split_first().ok_or(PlaybackError::NoPlayer)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl AudioBackend for CommandBackend {
    fn start(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(Box::new(ChildHandle { child: Some(child) }))
    }
}

struct ChildHandle {
    child: Option<Child>,
}

impl PlaybackHandle for ChildHandle {
    fn poll_finished(&mut self) -> Result<bool, PlaybackError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(true);
        };
        match child.try_wait().map_err(PlaybackError::Poll)? {
            None => Ok(false),
            Some(status) => {
                self.child = None;
                if status.success() {
                    Ok(true)
                } else {
                    Err(PlaybackError::Exited { status })
                }
            }
        }
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if child.try_wait().map_err(PlaybackError::Stop)?.is_none() {
            child.kill().map_err(PlaybackError::Stop)?;
        }
        child.wait().map_err(PlaybackError::Stop)?;
        Ok(())
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Hands the URL to whatever the desktop uses for mp3 links. The request
/// completes immediately and cannot be stopped from here.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpenBackend;

impl AudioBackend for SystemOpenBackend {
    fn start(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        open_link(url).map_err(|source| PlaybackError::Open {
            url: url.to_string(),
            source,
        })?;
        Ok(Box::new(DetachedHandle))
    }
}

struct DetachedHandle;

impl PlaybackHandle for DetachedHandle {
    fn poll_finished(&mut self) -> Result<bool, PlaybackError> {
        Ok(true)
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Either backend, picked from configuration at startup.
pub enum ConfiguredBackend {
    Command(CommandBackend),
    System(SystemOpenBackend),
}

impl AudioBackend for ConfiguredBackend {
    fn start(&self, url: &str) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        match self {
            ConfiguredBackend::Command(backend) => backend.start(url),
            ConfiguredBackend::System(backend) => backend.start(url),
        }
    }
}

impl ConfiguredBackend {
    /// An empty command means "use the system handler".
    pub fn from_command(command: &[String]) -> Self {
        match CommandBackend::from_command(command) {
            Ok(backend) => ConfiguredBackend::Command(backend),
            Err(_) => ConfiguredBackend::System(SystemOpenBackend),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            CommandBackend::from_command(&[]),
            Err(PlaybackError::NoPlayer)
        ));
        assert!(matches!(
            ConfiguredBackend::from_command(&[]),
            ConfiguredBackend::System(_)
        ));
    }

    #[test]
    fn finished_process_reports_completion() {
        let backend = CommandBackend::from_command(&command(&["true"])).unwrap();
        let mut handle = backend.start("ignored").unwrap();
        let mut finished = false;
        for _ in 0..200 {
            if handle.poll_finished().unwrap() {
                finished = true;
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(finished);
    }

    #[test]
    fn long_running_process_can_be_stopped() {
        let backend = CommandBackend::from_command(&command(&["sleep"])).unwrap();
        let mut handle = backend.start("30").unwrap();
        assert!(!handle.poll_finished().unwrap());
        handle.stop().unwrap();
        assert!(handle.poll_finished().unwrap());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let backend =
            CommandBackend::from_command(&command(&["sura-reader-no-such-player"])).unwrap();
        assert!(matches!(
            backend.start("x"),
            Err(PlaybackError::Spawn { .. })
        ));
    }
}

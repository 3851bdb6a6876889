// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Operator commands read from the console.

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
commands:
  next, n (or empty line)   show the next image
  prev, p                   show the previous image
  goto, g <n>               show image number n (as numbered by `list`)
  list, ls                  list the images in the current directory
  cd <dir>                  browse another directory (clears the cache)
  zoom, z <fraction>        crop this fraction of the height from the top
  in, +                     zoom in one step
  out, -                    zoom out one step
  rotate, r <degrees>       rotate counter-clockwise to an absolute angle
  left, l                   rotate one step counter-clockwise
  right, rr                 rotate one step clockwise
  reset                     clear zoom and rotation
  clear                     drop every cached frame
  stats                     show render cache statistics
  capacity <n>              change the render cache capacity
  mem                       show process memory usage
  help, h, ?                show this help
  quit, q, exit             leave the viewer";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Next,
    Prev,
    /// Zero-based playlist index
    Goto(usize),
    List,
    Cd(PathBuf),
    Zoom(f64),
    ZoomIn,
    ZoomOut,
    Rotate(f64),
    Left,
    Right,
    Reset,
    Clear,
    Stats,
    Capacity(NonZeroUsize),
    Memory,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "goto" | "g" => {
                let n: usize = argument("goto", "an image number", rest)?;
                n.checked_sub(1)
                    .map(Command::Goto)
                    .ok_or_else(|| ParseCommandError::InvalidArgument {
                        command: "goto",
                        value: rest.to_string(),
                    })
            }
            "list" | "ls" => Ok(Command::List),
            "cd" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "cd",
                        expected: "a directory",
                    });
                }
                Ok(Command::Cd(PathBuf::from(rest)))
            }
            "zoom" | "z" => finite("zoom", "a fraction", rest).map(Command::Zoom),
            "in" | "+" => Ok(Command::ZoomIn),
            "out" | "-" => Ok(Command::ZoomOut),
            "rotate" | "r" => finite("rotate", "an angle in degrees", rest).map(Command::Rotate),
            "left" | "l" => Ok(Command::Left),
            "right" | "rr" => Ok(Command::Right),
            "reset" => Ok(Command::Reset),
            "clear" => Ok(Command::Clear),
            "stats" => Ok(Command::Stats),
            "capacity" => argument("capacity", "a positive entry count", rest).map(Command::Capacity),
            "mem" => Ok(Command::Memory),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(ParseCommandError::Unknown(word.to_string())),
        }
    }
}

fn argument<T: FromStr>(
    command: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<T, ParseCommandError> {
    if value.is_empty() {
        return Err(ParseCommandError::MissingArgument { command, expected });
    }
    value
        .parse()
        .map_err(|_| ParseCommandError::InvalidArgument {
            command,
            value: value.to_string(),
        })
}

fn finite(command: &'static str, expected: &'static str, value: &str) -> Result<f64, ParseCommandError> {
    let parsed: f64 = argument(command, expected, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseCommandError::InvalidArgument {
            command,
            value: value.to_string(),
        })
    }
}

/// Step sizes for the relative zoom and rotate commands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Steps {
    pub zoom: f64,
    pub rotate: f64,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            zoom: 0.1,
            rotate: 90.0,
        }
    }
}

/// Zoom and rotation of the image currently on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub rotation: f64,
}

impl ViewState {
    /// The view that `command` asks for, or `None` if the command does not
    /// change the view.
    ///
    /// Zoom never steps below zero but may step to 1.0 or beyond; rendering
    /// rejects such views and the caller keeps the current state. Rotation is
    /// normalized to `0..360`. Values are rounded to six decimals so that
    /// stepping in and back out lands on the same cache key.
    pub fn apply(&self, command: &Command, steps: &Steps) -> Option<ViewState> {
        let next = match command {
            Command::Zoom(zoom) => ViewState {
                zoom: *zoom,
                ..*self
            },
            Command::ZoomIn => ViewState {
                zoom: self.zoom + steps.zoom,
                ..*self
            },
            Command::ZoomOut => ViewState {
                zoom: (self.zoom - steps.zoom).max(0.0),
                ..*self
            },
            Command::Rotate(rotation) => ViewState {
                rotation: *rotation,
                ..*self
            },
            Command::Left => ViewState {
                rotation: self.rotation + steps.rotate,
                ..*self
            },
            Command::Right => ViewState {
                rotation: self.rotation - steps.rotate,
                ..*self
            },
            Command::Reset => ViewState::default(),
            _ => return None,
        };

        Some(ViewState {
            zoom: round6(next.zoom),
            rotation: round6(next.rotation.rem_euclid(360.0)),
        })
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

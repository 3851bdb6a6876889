// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use args::Args;
use clap::Parser;
use kms_slideshow::{
    command::{Command, Steps, ViewState, HELP},
    decode::DecodeLimits,
    error::DisplayError,
    framebuffer::{DisplaySink, MemorySink},
    memory::MemoryStats,
    playlist::Playlist,
    render::Pipeline,
    viewer::{Presented, Viewer},
};
use std::{error::Error, path::Path};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    signal::unix::{signal, SignalKind},
};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, Layer};

mod args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args)?;

    let pipeline = Pipeline::new(
        args.filter.into(),
        DecodeLimits {
            max_pixels: args.max_pixels,
        },
    );
    let playlist = Playlist::open(&args.directory)?;
    info!(
        directory = %playlist.dir().display(),
        images = playlist.len(),
        "opened image directory"
    );

    match args.headless {
        Some(size) => {
            let sink = MemorySink::new(size.width, size.height);
            let viewer = Viewer::new(sink, args.cache_capacity, pipeline);
            run(viewer, playlist, &args).await
        }
        None => run_kms(pipeline, playlist, &args).await,
    }
}

fn init_tracing(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level);

    let journald = if args.no_journald {
        None
    } else {
        // Not every target runs systemd.
        tracing_journald::layer()
            .ok()
            .map(|layer| layer.with_filter(level))
    };

    let tracy = args.tracy.then(tracing_tracy::TracyLayer::default);

    let subscriber = tracing_subscriber::registry()
        .with(stderr_log)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

#[cfg(target_os = "linux")]
async fn run_kms(pipeline: Pipeline, playlist: Playlist, args: &Args) -> Result<(), Box<dyn Error>> {
    use kms_slideshow::{console::ConsoleGuard, kms::KmsSink};

    // Dropped last so the console returns to text mode after the CRTC is restored.
    let _console = match ConsoleGuard::acquire(&args.tty) {
        Ok(guard) => Some(guard),
        Err(err) => {
            warn!(tty = %args.tty.display(), %err, "console left in its current mode");
            None
        }
    };

    let sink = KmsSink::open(&args.device)?;
    let viewer = Viewer::new(sink, args.cache_capacity, pipeline);
    run(viewer, playlist, args).await
}

#[cfg(not(target_os = "linux"))]
async fn run_kms(_: Pipeline, _: Playlist, _: &Args) -> Result<(), Box<dyn Error>> {
    Err("KMS output requires Linux, use --headless WIDTHxHEIGHT".into())
}

/// Reads operator commands until `quit`, end of input or a termination
/// signal. Returns early only on a display failure.
async fn run<S: DisplaySink>(
    mut viewer: Viewer<S>,
    mut playlist: Playlist,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    let steps = Steps {
        zoom: args.zoom_step,
        rotate: args.rotate_step,
    };
    let mut view = ViewState::default();

    viewer.clear_display()?;
    match playlist.current() {
        Some(path) => {
            show(&mut viewer, path, view)?;
        }
        None => println!("no images in {}", playlist.dir().display()),
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            _ = sigterm.recv() => {
                info!("terminated");
                break;
            }
            _ = sighup.recv() => {
                info!("hangup");
                break;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            Command::Next | Command::Prev | Command::Goto(_) => {
                let count = playlist.len();
                let path = match command {
                    Command::Next => playlist.next(),
                    Command::Prev => playlist.prev(),
                    Command::Goto(index) => playlist.select(index),
                    _ => None,
                };
                match path {
                    Some(path) => {
                        view = ViewState::default();
                        show(&mut viewer, path, view)?;
                    }
                    None if count == 0 => println!("no images"),
                    None => println!("only {count} images"),
                }
            }
            Command::List => {
                for (index, path) in playlist.iter().enumerate() {
                    let marker = if index == playlist.index() { '*' } else { ' ' };
                    let name = path.file_name().unwrap_or(path.as_os_str());
                    println!("{marker}{:>4} {}", index + 1, name.to_string_lossy());
                }
            }
            Command::Cd(dir) => match Playlist::open(&dir) {
                Ok(next) => {
                    viewer.clear_cache();
                    playlist = next;
                    view = ViewState::default();
                    info!(directory = %dir.display(), images = playlist.len(), "changed directory");
                    match playlist.current() {
                        Some(path) => {
                            show(&mut viewer, path, view)?;
                        }
                        None => println!("no images in {}", dir.display()),
                    }
                }
                Err(err) => println!("{}: {err}", dir.display()),
            },
            Command::Clear => {
                viewer.clear_cache();
                println!("cache cleared");
            }
            Command::Stats => {
                let stats = viewer.cache_stats();
                println!(
                    "entries: {}/{} hits: {} misses: {} evictions: {} bytes: {}",
                    stats.len, stats.capacity, stats.hits, stats.misses, stats.evictions, stats.bytes
                );
            }
            Command::Capacity(capacity) => {
                viewer.set_capacity(capacity);
                println!("cache capacity: {capacity}");
            }
            Command::Memory => {
                let cached = viewer.cache_stats().bytes as f64 / (1024.0 * 1024.0);
                match MemoryStats::current() {
                    Ok(memory) => println!("{memory} cache: {cached:.1}MB"),
                    Err(err) => println!("memory statistics unavailable: {err} cache: {cached:.1}MB"),
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            _ => {
                let Some(next) = view.apply(&command, &steps) else {
                    continue;
                };
                let Some(path) = playlist.current() else {
                    println!("no images");
                    continue;
                };
                if show(&mut viewer, path, next)? {
                    view = next;
                }
            }
        }
    }

    if let Err(err) = viewer.clear_display() {
        warn!(%err, "failed to blank display on exit");
    }
    Ok(())
}

/// Presents `path` with `view`. Returns whether the frame reached the
/// display.
fn show<S: DisplaySink>(
    viewer: &mut Viewer<S>,
    path: &Path,
    view: ViewState,
) -> Result<bool, DisplayError> {
    match viewer.render_and_display(path, view.zoom, view.rotation)? {
        Presented::Shown => {
            println!("{}", path.display());
            Ok(true)
        }
        Presented::Skipped(err) => {
            println!("skipped: {err}");
            Ok(false)
        }
    }
}

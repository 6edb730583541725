//! Motion task
//!
//! Owns the motion engine, the square sensors and the turn LEDs. Jobs
//! arrive from the bus task through `JOB`; while idle the board is
//! rescanned periodically to follow the players' moves.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use gantry_core::board::{BoardWatch, WatchOutcome};
use gantry_core::config::BoardConfig;
use gantry_core::session::{ErrorKind, Job};
use gantry_core::traits::TurnIndicator;

use crate::channels::{JOB, SESSION};
use crate::hardware::{Engine, Leds, Scanner};

/// Idle board watch settings
#[derive(Debug, Clone, Copy)]
pub struct WatchSettings {
    pub enabled: bool,
    pub interval: Duration,
    pub stable_scans: u8,
}

impl From<&BoardConfig> for WatchSettings {
    fn from(cfg: &BoardConfig) -> Self {
        Self {
            enabled: cfg.watch,
            interval: Duration::from_millis(u64::from(cfg.watch_interval_ms.max(1))),
            stable_scans: cfg.stable_scans,
        }
    }
}

/// Motion task - run jobs and watch the board
#[embassy_executor::task]
pub async fn motion_task(
    mut engine: Engine,
    mut scanner: Scanner,
    mut leds: Leds,
    settings: WatchSettings,
) {
    info!("Motion task started");

    let mut watch = BoardWatch::new(settings.stable_scans);
    watch.observe(scanner.scan());
    leds.show(watch.turn());

    loop {
        let job = if settings.enabled {
            match select(JOB.wait(), Timer::after(settings.interval)).await {
                Either::First(job) => job,
                Either::Second(()) => {
                    watch_board(&mut scanner, &mut watch, &mut leds);
                    continue;
                }
            }
        } else {
            JOB.wait().await
        };

        run_job(job, &mut engine, &mut scanner, &mut watch).await;
    }
}

async fn run_job(job: Job, engine: &mut Engine, scanner: &mut Scanner, watch: &mut BoardWatch) {
    match job {
        Job::Home => {
            info!("Homing");
            match engine.home().await {
                Ok(()) => {
                    info!("Homing complete");
                    SESSION.lock(|s| s.borrow_mut().complete_action());
                }
                Err(e) => {
                    error!("Homing failed: {}", e);
                    SESSION.lock(|s| s.borrow_mut().fail(ErrorKind::from(e)));
                }
            }
        }
        Job::Carry { pick, drop } => {
            info!("Carry {} -> {}", pick, drop);
            match engine.carry(pick, drop).await {
                Ok(()) => {
                    SESSION.lock(|s| s.borrow_mut().complete_action());
                    // The robot moved the piece; do not count it as a player move
                    watch.rebaseline(scanner.scan());
                }
                Err(e) => {
                    warn!("Carry rejected: {}", e);
                    SESSION.lock(|s| s.borrow_mut().fail(ErrorKind::from(e)));
                }
            }
        }
        Job::ScanBoard => {
            let snapshot = scanner.scan();
            debug!("Board scan: {} occupied", snapshot.occupied_count());
            SESSION.lock(|s| s.borrow_mut().complete_scan(&snapshot));
        }
    }
}

fn watch_board(scanner: &mut Scanner, watch: &mut BoardWatch, leds: &mut Leds) {
    match watch.observe(scanner.scan()) {
        WatchOutcome::PlayerMoved(turn) => {
            info!("Player move detected, {} to move", turn);
            leds.show(turn);
        }
        WatchOutcome::Baseline => leds.show(watch.turn()),
        WatchOutcome::Unchanged | WatchOutcome::Settling => {}
    }
}

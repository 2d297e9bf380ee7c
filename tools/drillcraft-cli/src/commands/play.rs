//! Play a drill in the terminal.

use std::path::PathBuf;

use drillcraft_common::{counts_per_second, AppConfig, RateController, TickClock};
use drillcraft_engine::{Playback, TimelineStore};
use drillcraft_model::{DrillDocument, DrillSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::load_document;

pub async fn run(
    path: PathBuf,
    from: f64,
    to: Option<f64>,
    fps: Option<u32>,
    bpm: Option<f64>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let doc = load_document(&path)?;
    let store = TimelineStore::from_document(&doc);

    let bpm = bpm.unwrap_or(doc.bpm);
    if bpm <= 0.0 {
        anyhow::bail!("Tempo must be positive, got {bpm} bpm");
    }

    let mut playback = Playback::for_sets(store.sets(), doc.settings.phrase_length);
    playback.set_counts_per_second(counts_per_second(bpm));
    let end = to.unwrap_or(playback.max_count());
    playback.play_range(from, end);

    let rate = RateController::new(fps.unwrap_or(config.playback.tick_rate_hz));
    let mut ticker = tokio::time::interval(rate.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut clock = TickClock::start();

    info!(
        drill = %doc.title,
        bpm,
        from = playback.current_count(),
        to = end.min(playback.max_count()),
        "Starting playback"
    );
    println!("Playing '{}' at {bpm} bpm (Ctrl+C to stop)", doc.title);

    let mut last_whole: Option<i64> = None;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                playback.pause();
                println!();
                println!("Stopped at count {:.2}", playback.current_count());
                break;
            }
        }

        let dt = clock.tick();
        let count = playback.tick(dt);
        let whole = count.floor() as i64;
        if last_whole != Some(whole) {
            last_whole = Some(whole);
            print_frame(&doc, &playback, store.sets());
        }

        if !playback.is_playing() {
            debug!(count, elapsed_secs = clock.elapsed_secs(), "Playback finished");
            break;
        }
    }

    Ok(())
}

fn print_frame(doc: &DrillDocument, playback: &Playback, sets: &[DrillSet]) {
    let frame = playback.frame(sets);
    let cells: Vec<String> = doc
        .performers
        .iter()
        .filter_map(|p| {
            frame
                .get(&p.id)
                .map(|pos| format!("{}=({:.1},{:.1})", p.id, pos.x, pos.y))
        })
        .collect();
    println!("{:>7.2}  {}", playback.current_count(), cells.join("  "));
}

mod config;
mod stage;
mod timeline;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use clap::Parser;
use event_reel::{Category, EventQueue};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use stage::Stage;
use timeline::TimelineFile;

fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,event_reel=debug"));

	tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer().with_target(true)).init();
}

fn main() -> Result<()> {
	init_tracing();

	let config = Config::parse();
	config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

	let timeline = TimelineFile::load(&config.timeline)?;
	let mut queue_config = timeline.config.clone();
	if let Some(watermark) = config.starvation_watermark {
		queue_config = queue_config.with_starvation_watermark(watermark);
	}

	let mut queue = EventQueue::new(queue_config)?;
	let effects = Rc::new(Cell::new(0));
	let mut dispatcher = Stage::dispatcher(&effects);

	// Caption text lives here for the whole run; events only share it
	let mut captions = Vec::new();
	let installed = timeline.install(&mut queue, &mut captions)?;
	info!(installed, heads = queue.len(), fps = config.fps, "Timeline loaded");

	let frame_ms = config.frame_ms();
	let mut frame = 0;
	while !queue.is_empty() && frame < config.max_frames {
		queue.handle_events(frame_ms, &mut dispatcher);
		frame += 1;
		debug!(frame, summary = ?queue.summary(), "Frame complete");
	}

	if queue.is_empty() {
		info!(frames = frame, effects = effects.get(), "Timeline finished");
	} else {
		warn!(frames = frame, remaining = queue.len(), "Frame budget exhausted with events pending");
	}

	// Scene exit keeps permanent events; a pending music change still gets played
	queue.clear_list_flushing(Category::Music, &mut dispatcher);
	queue.free_list();

	Ok(())
}

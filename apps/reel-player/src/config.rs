use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "reel-player")]
#[command(about = "Run an event timeline through a simulated frame loop", long_about = None)]
pub struct Config {
	/// Timeline file (JSON)
	#[arg(short, long, env = "REEL_TIMELINE")]
	pub timeline: PathBuf,

	/// Simulated frames per second
	#[arg(long, env = "REEL_FPS", default_value = "60")]
	pub fps: u32,

	/// Give up after this many frames even if events remain
	#[arg(long, env = "REEL_MAX_FRAMES", default_value = "36000")]
	pub max_frames: u64,

	/// Override the timeline's starvation watermark
	#[arg(long, env = "REEL_STARVATION_WATERMARK")]
	pub starvation_watermark: Option<usize>,
}

impl Config {
	pub fn validate(&self) -> Result<(), String> {
		if self.fps == 0 || self.fps > 1000 {
			return Err("fps must be between 1 and 1000".to_string());
		}

		if self.max_frames == 0 {
			return Err("max_frames must be greater than 0".to_string());
		}

		Ok(())
	}

	/// Whole milliseconds per simulated frame
	pub fn frame_ms(&self) -> u32 {
		1000 / self.fps
	}
}

use serde::{Deserialize, Serialize};

/// Collaborator family an event is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	Text,
	Sample,
	Voice,
	Music,
	Background,
	Animation,
	Scene,
	PaletteCycle,
	Panel,
	Script,
	Cursor,
	Surface,
	PaletteFade,
	CrossFade,
}

impl Category {
	pub fn all() -> [Category; 14] {
		[
			Category::Text,
			Category::Sample,
			Category::Voice,
			Category::Music,
			Category::Background,
			Category::Animation,
			Category::Scene,
			Category::PaletteCycle,
			Category::Panel,
			Category::Script,
			Category::Cursor,
			Category::Surface,
			Category::PaletteFade,
			Category::CrossFade,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Category::Text => "text",
			Category::Sample => "sample",
			Category::Voice => "voice",
			Category::Music => "music",
			Category::Background => "background",
			Category::Animation => "animation",
			Category::Scene => "scene",
			Category::PaletteCycle => "palette_cycle",
			Category::Panel => "panel",
			Category::Script => "script",
			Category::Cursor => "cursor",
			Category::Surface => "surface",
			Category::PaletteFade => "palette_fade",
			Category::CrossFade => "cross_fade",
		}
	}
}

impl std::fmt::Display for Category {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// ============================================================================
// Operations, one enum per category
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
	Display,
	Remove,
	Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOp {
	Play,
	Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceOp {
	Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicOp {
	Play,
	Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundOp {
	/// Composite the background; param 0 non-zero also applies its palette
	Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationOp {
	Play,
	Stop,
	SetFlag,
	ClearFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneOp {
	End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOp {
	Start,
	Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelOp {
	Activate,
	Deactivate,
	SetStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptOp {
	Exec,
	Wake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorOp {
	Show,
	Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceOp {
	Fill,
	SetFlag,
	ClearFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeOp {
	BlackToPalette,
	PaletteToBlack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossFadeOp {
	Blend,
}

// ============================================================================
// Action
// ============================================================================

/// What an event does when it fires: the category plus its operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Text(TextOp),
	Sample(SampleOp),
	Voice(VoiceOp),
	Music(MusicOp),
	Background(BackgroundOp),
	Animation(AnimationOp),
	Scene(SceneOp),
	PaletteCycle(CycleOp),
	Panel(PanelOp),
	Script(ScriptOp),
	Cursor(CursorOp),
	Surface(SurfaceOp),
	PaletteFade(FadeOp),
	CrossFade(CrossFadeOp),
}

impl Action {
	pub fn category(&self) -> Category {
		match self {
			Action::Text(_) => Category::Text,
			Action::Sample(_) => Category::Sample,
			Action::Voice(_) => Category::Voice,
			Action::Music(_) => Category::Music,
			Action::Background(_) => Category::Background,
			Action::Animation(_) => Category::Animation,
			Action::Scene(_) => Category::Scene,
			Action::PaletteCycle(_) => Category::PaletteCycle,
			Action::Panel(_) => Category::Panel,
			Action::Script(_) => Category::Script,
			Action::Cursor(_) => Category::Cursor,
			Action::Surface(_) => Category::Surface,
			Action::PaletteFade(_) => Category::PaletteFade,
			Action::CrossFade(_) => Category::CrossFade,
		}
	}

	/// Whether the action is driven by a completion fraction rather than fired once
	pub fn is_progressive(&self) -> bool {
		matches!(self, Action::PaletteFade(_) | Action::CrossFade(_))
	}
}

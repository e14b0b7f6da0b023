//! Default prompt texts for the three workflows.

pub const CAPTION_PROMPT: &str = include_str!("../data/prompts/caption.txt");
pub const VQA_PROMPT: &str = include_str!("../data/prompts/vqa.txt");
pub const PERSONA_SYSTEM: &str = include_str!("../data/prompts/persona_system.txt");
pub const PERSONA_PROMPT: &str = include_str!("../data/prompts/persona_user.txt");

/// Default name for the derived persona model.
pub const PERSONA_NAME: &str = "dog-lover";

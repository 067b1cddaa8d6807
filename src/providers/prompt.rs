/// System prompt for the recipe cleanup pass.
///
/// Loaded from `prompt.txt` at compile time so it can be edited as plain text.
pub const RECIPE_CLEANUP_PROMPT: &str = include_str!("prompt.txt");

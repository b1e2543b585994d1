/// Default location of the log file, relative to the working directory.
pub const LOG: &str = "./codium-viewer.log";

/// Marker placed in a lesson's starter code to indicate where the caret should
/// land once the code is loaded. Only the first occurrence is consumed.
pub const CARET: &str = "CARET";

/// Prefix applied to every rendered bullet point.
pub const BULLET_INDENT: &str = "    ";

pub const PROMPT_RESET: &str = "Are you sure you want to reset your code?";
pub const PROMPT_SOLUTION: &str = "Are you sure you want to see the solution \
                                   code?\nThis will overwrite your current code.";
